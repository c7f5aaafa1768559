//! `rep report` command
//!
//! Record a moderation report outcome against a user. The report workflow
//! itself lives in the platform; the engine only keeps the aggregates that
//! feed the trust score.
//!
//! # Usage
//! ```bash
//! rep report ada              # report received, not upheld
//! rep report ada --accepted   # report received and upheld
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::utils::{find_user, open_store};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Username or user ID the report targets
    pub user: String,

    /// The report was upheld by moderation
    #[arg(long)]
    pub accepted: bool,
}

pub fn run(args: ReportArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    let user = find_user(&store, &args.user)?;
    let stats = store.record_report(user.id, args.accepted)?;

    println!(
        "{} Report recorded against {}",
        "✓".green(),
        user.username.cyan().bold()
    );
    println!(
        "   {} received, {} accepted",
        stats.received, stats.accepted
    );
    Ok(())
}
