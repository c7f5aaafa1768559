//! `rep community` command
//!
//! # Usage
//! ```bash
//! rep community add rustaceans
//! rep community show rustaceans
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::cli::utils::{find_community, open_store};
use crate::config::Config;
use crate::core::model::Community;

#[derive(Args, Debug)]
pub struct CommunityArgs {
    #[command(subcommand)]
    pub command: CommunityCommands,
}

#[derive(Subcommand, Debug)]
pub enum CommunityCommands {
    /// Register a new community
    Add {
        /// Community name (unique)
        name: String,
    },

    /// Show a community
    Show {
        /// Community name or ID
        community: String,
    },
}

pub fn execute(args: CommunityArgs) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    match args.command {
        CommunityCommands::Add { name } => {
            let community = Community::new(&name);
            store.insert_community(&community)?;
            println!("{} Community created: {}", "✓".green(), name.cyan().bold());
            println!("   ID: {}", community.id);
        }
        CommunityCommands::Show { community } => {
            let community = find_community(&store, &community)?;
            println!("{}", community.name.cyan().bold());
            println!("  ID:      {}", community.id);
            println!("  Created: {}", community.created_at.format("%Y-%m-%d"));
        }
    }
    Ok(())
}
