//! `rep vote` command
//!
//! Cast, toggle, or flip a vote on a post or comment.
//!
//! # Usage
//! ```bash
//! rep vote grace 01J9ZK... up      # upvote
//! rep vote grace 01J9ZK... up      # same again: removes the vote
//! rep vote grace 01J9ZK... down    # flip
//! ```

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;

use crate::cli::utils::{find_user, open_store, parse_content_id};
use crate::config::Config;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn value(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Voter (username or ID)
    pub voter: String,

    /// Target post or comment ID
    pub target: String,

    /// Vote direction
    #[arg(value_enum)]
    pub direction: Direction,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: VoteArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    let voter = find_user(&store, &args.voter)?;
    let target_id = parse_content_id(&args.target)?;

    let Some(target) = store.content(target_id)? else {
        bail!("Content not found: {}", target_id);
    };

    let outcome = store.cast_vote(voter.id, target.kind, target_id, args.direction.value())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "{} Vote {}: score {} ({}↑ {}↓)",
        "✓".green(),
        outcome.state,
        outcome.vote_score.to_string().bold(),
        outcome.upvotes,
        outcome.downvotes
    );
    Ok(())
}
