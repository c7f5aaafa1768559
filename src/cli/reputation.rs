//! `rep reputation` command
//!
//! A user's karma and content counts in one community. Zeros when the pair
//! has no record yet.
//!
//! # Usage
//! ```bash
//! rep reputation ada rustaceans
//! rep reputation ada rustaceans --json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::utils::{find_community, find_user, open_store};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ReputationArgs {
    /// Username or user ID
    pub user: String,

    /// Community name or ID
    pub community: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ReputationArgs) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let user = find_user(&store, &args.user)?;
    let community = find_community(&store, &args.community)?;
    let rep = store.community_reputation(user.id, community.id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rep)?);
        return Ok(());
    }

    println!(
        "{} in {}",
        user.username.cyan().bold(),
        community.name.cyan()
    );
    println!("  Total karma:   {}", rep.total_karma.to_string().bold());
    println!("  Post karma:    {}", rep.post_karma);
    println!("  Comment karma: {}", rep.comment_karma);
    println!("  Posts:         {}", rep.posts_count);
    println!("  Comments:      {}", rep.comments_count);
    Ok(())
}
