//! Stats command - Trust statistics grouped by level

use anyhow::Result;
use clap::Args;

use crate::cli::utils::open_store;
use crate::config::Config;

/// Stats command arguments
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute stats command
pub fn execute(args: StatsArgs) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let (stats, total) = store.trust_statistics()?;

    if args.json {
        let out = serde_json::json!({
            "total_users": total,
            "by_level": stats,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("📊 Trust Statistics\n");
    println!("  Scored users: {}", total);

    if stats.is_empty() {
        println!("\nNo trust levels yet. Run 'rep trust recompute-all' first.");
        return Ok(());
    }

    println!();
    for slice in &stats {
        println!(
            "  L{} {:<17} {:>5} users  avg {:>5.1}  min {:>3}  max {:>3}",
            slice.level,
            slice.level_name,
            slice.count,
            slice.avg_trust_score,
            slice.min_trust_score,
            slice.max_trust_score
        );
    }

    println!("\n📁 Database: {}", config.database_path().display());
    Ok(())
}
