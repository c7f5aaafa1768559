//! `rep post` and `rep comment` commands
//!
//! Register counter-bearing content. Content bodies live in the platform
//! proper; the engine only tracks authorship, community scope, and counters.
//!
//! # Usage
//! ```bash
//! rep post ada --community rustaceans
//! rep post ada                           # profile post, no community
//! rep comment grace 01J9ZK...            # comment under a post
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::utils::{find_community, find_user, open_store, parse_content_id};
use crate::config::Config;
use crate::core::model::Content;

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Author (username or ID)
    pub author: String,

    /// Community the post belongs to (name or ID)
    #[arg(short, long)]
    pub community: Option<String>,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Author (username or ID)
    pub author: String,

    /// Parent post ID
    pub post: String,
}

pub fn run_post(args: PostArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    let author = find_user(&store, &args.author)?;
    let community = args
        .community
        .as_deref()
        .map(|c| find_community(&store, c))
        .transpose()?;

    let post = Content::post(author.id, community.as_ref().map(|c| c.id));
    store.register_content(&post)?;

    println!("{} Post registered: {}", "✓".green(), post.id);
    println!("   Author: {}", author.username);
    if let Some(community) = community {
        println!("   Community: {}", community.name);
    }
    Ok(())
}

pub fn run_comment(args: CommentArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    let author = find_user(&store, &args.author)?;
    let parent_id = parse_content_id(&args.post)?;

    let comment = Content::comment(author.id, parent_id);
    store.register_content(&comment)?;

    println!("{} Comment registered: {}", "✓".green(), comment.id);
    println!("   Author: {}", author.username);
    println!("   Post: {}", parent_id);
    Ok(())
}
