//! `rep reconcile` command
//!
//! Recompute denormalized aggregates from ground truth. The incremental vote
//! path keeps them fresh; this is the repair mechanism for drift.
//!
//! # Usage
//! ```bash
//! rep reconcile karma ada
//! rep reconcile reputation ada rustaceans
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::cli::utils::{find_community, find_user, open_store};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    #[command(subcommand)]
    pub command: ReconcileCommands,
}

#[derive(Subcommand, Debug)]
pub enum ReconcileCommands {
    /// Recompute a user's global karma from their content
    Karma {
        /// Username or user ID
        user: String,
    },

    /// Recompute a user's reputation in one community
    Reputation {
        /// Username or user ID
        user: String,

        /// Community name or ID
        community: String,
    },
}

pub fn execute(args: ReconcileArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match args.command {
        ReconcileCommands::Karma { user } => {
            let user = find_user(&store, &user)?;
            let totals = store.recompute_user_karma(user.id)?;
            println!(
                "{} Karma recomputed for {}",
                "✓".green(),
                user.username.cyan().bold()
            );
            println!(
                "   {} total ({} post + {} comment)",
                totals.total_karma, totals.post_karma, totals.comment_karma
            );
        }
        ReconcileCommands::Reputation { user, community } => {
            let user = find_user(&store, &user)?;
            let community = find_community(&store, &community)?;
            let rep = store.recompute_community_reputation(user.id, community.id)?;
            println!(
                "{} Reputation recomputed for {} in {}",
                "✓".green(),
                user.username.cyan().bold(),
                community.name.cyan()
            );
            println!(
                "   {} karma ({} post + {} comment), {} posts, {} comments",
                rep.total_karma,
                rep.post_karma,
                rep.comment_karma,
                rep.posts_count,
                rep.comments_count
            );
        }
    }
    Ok(())
}
