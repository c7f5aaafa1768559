//! rep CLI - Entry point
//!
//! Usage: rep <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repledger::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => repledger::cli::init::run(args),
        Commands::User(args) => repledger::cli::user::execute(args),
        Commands::Community(args) => repledger::cli::community::execute(args),
        Commands::Post(args) => repledger::cli::content::run_post(args),
        Commands::Comment(args) => repledger::cli::content::run_comment(args),
        Commands::Vote(args) => repledger::cli::vote::run(args),
        Commands::Karma(args) => repledger::cli::karma::run(args),
        Commands::Reputation(args) => repledger::cli::reputation::run(args),
        Commands::Report(args) => repledger::cli::report::run(args),
        Commands::Trust(args) => repledger::cli::trust::execute(args),
        Commands::Leaderboard(args) => repledger::cli::leaderboard::run(args),
        Commands::Levels(args) => repledger::cli::levels::run(args),
        Commands::Stats(args) => repledger::cli::stats::execute(args),
        Commands::Reconcile(args) => repledger::cli::reconcile::execute(args),
    }
}
