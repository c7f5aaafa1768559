//! `rep leaderboard` command
//!
//! Top users by trust score, ties broken by record order.

use anyhow::Result;
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::utils::open_store;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct LeaderboardArgs {
    /// Number of users to show
    #[arg(short, long)]
    pub limit: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Score")]
    trust_score: u32,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Karma")]
    total_karma: i64,
}

pub fn run(args: LeaderboardArgs) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let limit = args.limit.unwrap_or(config.display.leaderboard_limit);
    let records = store.trust_leaderboard(limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No trust levels yet. Run 'rep trust recompute-all' first.");
        return Ok(());
    }

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let username = store
                .user(record.user_id)
                .ok()
                .flatten()
                .map(|u| u.username)
                .unwrap_or_else(|| record.user_id.to_string());
            Row {
                rank: i + 1,
                username,
                trust_score: record.trust_score,
                level: record.level_name.clone(),
                total_karma: record.total_karma,
            }
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
