//! `rep levels` command
//!
//! Users at one discrete trust level, paginated.
//!
//! # Usage
//! ```bash
//! rep levels 3                  # Trusted users
//! rep levels 0 --limit 10 --skip 20
//! ```

use anyhow::{bail, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::utils::open_store;
use crate::config::Config;
use crate::core::trust::TrustLevel;

#[derive(Args, Debug)]
pub struct LevelsArgs {
    /// Trust level (0-4)
    pub level: u8,

    /// Page size
    #[arg(short, long)]
    pub limit: Option<i64>,

    /// Rows to skip
    #[arg(short, long, default_value_t = 0)]
    pub skip: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Score")]
    trust_score: u32,
    #[tabled(rename = "Karma")]
    total_karma: i64,
    #[tabled(rename = "Communities")]
    communities: i64,
}

pub fn run(args: LevelsArgs) -> Result<()> {
    let Some(level) = TrustLevel::from_number(args.level) else {
        bail!("Invalid trust level: {} (expected 0-4)", args.level);
    };

    let config = Config::load()?;
    let store = open_store(&config)?;

    let limit = args.limit.unwrap_or(config.display.level_page_size);
    let (records, total) = store.users_by_trust_level(level, limit, args.skip)?;

    if args.json {
        let out = serde_json::json!({
            "level": level.number(),
            "level_name": level.name(),
            "total": total,
            "limit": limit,
            "skip": args.skip,
            "users": records,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Level {} {} ({} total)\n",
        level.number(),
        level.name(),
        total
    );

    if records.is_empty() {
        println!("No users at this level.");
        return Ok(());
    }

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            let username = store
                .user(record.user_id)
                .ok()
                .flatten()
                .map(|u| u.username)
                .unwrap_or_else(|| record.user_id.to_string());
            Row {
                username,
                trust_score: record.trust_score,
                total_karma: record.total_karma,
                communities: record.communities_participated_in,
            }
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));

    let shown = args.skip + records.len() as i64;
    if shown < total {
        println!("\nShowing {} of {}. Use --skip {} for the next page.", shown, total, shown);
    }
    Ok(())
}
