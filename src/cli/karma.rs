//! `rep karma` command
//!
//! # Usage
//! ```bash
//! rep karma ada                 # Global karma
//! rep karma ada --communities   # Per-community breakdown
//! rep karma ada --json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::utils::{find_user, open_store};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct KarmaArgs {
    /// Username or user ID
    pub user: String,

    /// Include per-community reputation
    #[arg(short, long)]
    pub communities: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: KarmaArgs) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let user = find_user(&store, &args.user)?;
    let karma = store.user_karma(user.id)?;
    let reputations = if args.communities {
        store.community_reputations(user.id)?
    } else {
        Vec::new()
    };

    if args.json {
        let out = serde_json::json!({
            "user_id": user.id.to_string(),
            "username": user.username,
            "karma": karma,
            "communities": reputations,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", user.username.cyan().bold());
    println!("  Total karma:   {}", karma.total_karma.to_string().bold());
    println!("  Post karma:    {}", karma.post_karma);
    println!("  Comment karma: {}", karma.comment_karma);

    if args.communities {
        if reputations.is_empty() {
            println!("\nNo community participation yet.");
        } else {
            println!("\nCommunities:");
            for rep in &reputations {
                let name = store
                    .community(rep.community_id)?
                    .map(|c| c.name)
                    .unwrap_or_else(|| rep.community_id.to_string());
                println!(
                    "  {}: {} karma ({} posts, {} comments)",
                    name.cyan(),
                    rep.total_karma,
                    rep.posts_count,
                    rep.comments_count
                );
            }
        }
    }
    Ok(())
}
