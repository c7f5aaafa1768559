//! `rep user` command
//!
//! # Usage
//! ```bash
//! rep user add ada            # Register a user
//! rep user show ada           # Karma and trust summary
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::cli::utils::{find_user, open_store};
use crate::config::Config;
use crate::core::model::User;

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Username (unique)
        username: String,
    },

    /// Show a user's karma and trust summary
    Show {
        /// Username or user ID
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(args: UserArgs) -> Result<()> {
    let config = Config::load()?;

    match args.command {
        UserCommands::Add { username } => add(&config, &username),
        UserCommands::Show { user, json } => show(&config, &user, json),
    }
}

fn add(config: &Config, username: &str) -> Result<()> {
    let store = open_store(config)?;
    let user = User::new(username);
    store.insert_user(&user)?;

    println!("{} User registered: {}", "✓".green(), username.cyan().bold());
    println!("   ID: {}", user.id);
    Ok(())
}

fn show(config: &Config, target: &str, json: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let user = find_user(&store, target)?;
    let karma = store.user_karma(user.id)?;
    let trust = store.get_or_compute_trust_level(user.id)?;

    if json {
        let out = serde_json::json!({
            "id": user.id.to_string(),
            "username": user.username,
            "created_at": user.created_at.to_rfc3339(),
            "karma": karma,
            "trust": trust,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", user.username.cyan().bold());
    println!("  ID:        {}", user.id);
    println!("  Joined:    {}", user.created_at.format("%Y-%m-%d"));
    println!(
        "  Karma:     {} ({} post + {} comment)",
        karma.total_karma, karma.post_karma, karma.comment_karma
    );
    println!(
        "  Trust:     {} ({}, level {})",
        trust.trust_score,
        trust.level_name.bold(),
        trust.level
    );
    Ok(())
}
