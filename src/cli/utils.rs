//! CLI utility functions
//!
//! Common helpers shared across CLI commands: store opening and
//! user/community lookup by ID or name.

use anyhow::{bail, Context, Result};
use ulid::Ulid;

use crate::config::Config;
use crate::core::model::{Community, User};
use crate::core::store::Store;

/// Open the store for the active repository, applying config tunables
pub fn open_store(config: &Config) -> Result<Store> {
    let db_path = config.database_path();
    if !db_path.exists() {
        bail!(
            "Database not found at {}. Run 'rep init' first.",
            db_path.display()
        );
    }
    let mut store = Store::open(&db_path).context("Failed to open database")?;
    store.set_vote_retries(config.engine.vote_retries);
    Ok(store)
}

/// Find a user by ULID or username
pub fn find_user(store: &Store, target: &str) -> Result<User> {
    if let Ok(id) = Ulid::from_string(target) {
        if let Some(user) = store.user(id)? {
            return Ok(user);
        }
    }
    store
        .user_by_username(target)?
        .ok_or_else(|| anyhow::anyhow!("User not found: {}", target))
}

/// Find a community by ULID or name
pub fn find_community(store: &Store, target: &str) -> Result<Community> {
    if let Ok(id) = Ulid::from_string(target) {
        if let Some(community) = store.community(id)? {
            return Ok(community);
        }
    }
    store
        .community_by_name(target)?
        .ok_or_else(|| anyhow::anyhow!("Community not found: {}", target))
}

/// Parse a content ULID argument
pub fn parse_content_id(target: &str) -> Result<Ulid> {
    Ulid::from_string(target).map_err(|_| anyhow::anyhow!("Invalid content ID: {}", target))
}
