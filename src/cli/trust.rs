//! `rep trust` command
//!
//! # Usage
//! ```bash
//! rep trust show ada           # Stored trust level (computed on first read)
//! rep trust breakdown ada      # Component-by-component view
//! rep trust recompute ada      # Refresh one user
//! rep trust recompute-all      # Refresh everyone, tolerating failures
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::cli::utils::{find_user, open_store};
use crate::config::Config;
use crate::core::model::TrustLevelRecord;

#[derive(Args, Debug)]
pub struct TrustArgs {
    #[command(subcommand)]
    pub command: TrustCommands,
}

#[derive(Subcommand, Debug)]
pub enum TrustCommands {
    /// Show a user's trust level
    Show {
        /// Username or user ID
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the component breakdown of a user's trust score
    Breakdown {
        /// Username or user ID
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute one user's trust level
    Recompute {
        /// Username or user ID
        user: String,
    },

    /// Recompute trust levels for all users
    RecomputeAll {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(args: TrustArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match args.command {
        TrustCommands::Show { user, json } => {
            let user = find_user(&store, &user)?;
            let record = store.get_or_compute_trust_level(user.id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_summary(&user.username, &record);
            }
        }
        TrustCommands::Breakdown { user, json } => {
            let user = find_user(&store, &user)?;
            let record = store.get_or_compute_trust_level(user.id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_breakdown(&user.username, &record);
            }
        }
        TrustCommands::Recompute { user } => {
            let user = find_user(&store, &user)?;
            let record = store.recompute_trust_level(user.id)?;
            println!("{} Trust level recomputed", "✓".green());
            print_summary(&user.username, &record);
        }
        TrustCommands::RecomputeAll { json } => {
            let outcome = store.recompute_all_trust_levels()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{} All trust levels recomputed", "✓".green());
                println!("   Processed:  {}", outcome.processed);
                println!("   Successful: {}", outcome.successful);
                println!("   Failed:     {}", outcome.failed);
            }
        }
    }
    Ok(())
}

fn print_summary(username: &str, record: &TrustLevelRecord) {
    println!("{}", username.cyan().bold());
    println!(
        "  Trust score: {} / 100",
        record.trust_score.to_string().bold()
    );
    println!(
        "  Level:       {} ({})",
        record.level,
        record.level_name.bold()
    );
    println!(
        "  Calculated:  {}",
        record.last_calculated_at.format("%Y-%m-%d %H:%M")
    );
}

fn print_breakdown(username: &str, record: &TrustLevelRecord) {
    print_summary(username, record);
    println!("\nComponents:");
    println!(
        "  Karma         {:>3} / 25   ({} post + {} comment karma)",
        record.karma_component, record.post_karma, record.comment_karma
    );
    println!(
        "  Account age   {:>3} / 15   ({} days)",
        record.account_age_component, record.account_age_days
    );
    println!(
        "  Reports       {:>3} / 30   ({}/{} reports accepted)",
        record.report_component, record.reports_accepted, record.reports_received
    );
    println!(
        "  Participation {:>3} / 30   ({} communities, {} community karma)",
        record.participation_component,
        record.communities_participated_in,
        record.community_karma
    );
}
