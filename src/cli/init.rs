//! `rep init` command
//!
//! Initializes a new rep repository.
//!
//! # Usage
//! ```bash
//! rep init                    # Initialize in current directory
//! rep init /path/to/project   # Initialize in specific path
//! rep init --global           # Initialize global ~/.rep
//! ```

use anyhow::{bail, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::store::Store;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Initialize global config (~/.rep)
    #[arg(long)]
    pub global: bool,

    /// Force re-initialization
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    // 1. Determine target path
    let base_path = if args.global {
        directories::UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        args.path.unwrap_or_else(|| PathBuf::from("."))
    };

    let rep_dir = base_path.join(".rep");

    // 2. Check if already initialized
    if rep_dir.exists() && !args.force {
        bail!(
            "Directory {} is already a rep repository. Use --force to reinitialize.",
            base_path.display()
        );
    }

    println!("🚀 Initializing rep in: {}", base_path.display());

    // 3. Create .rep/ directory
    fs::create_dir_all(&rep_dir)?;

    // 4. Create config file
    let config = Config::default();
    let config_path = rep_dir.join("config.toml");
    config.save_to(&config_path)?;

    // 5. Initialize SQLite database with schema
    let db_path = rep_dir.join("data.db");
    let _store = Store::open(&db_path)?;

    println!("\n✅ Initialized rep repository");
    println!("   Config: {}", config_path.display());
    println!("   Database: {}", db_path.display());
    println!("\nNext steps:");
    println!("  rep user add <username>");
    println!("  rep post <author> --community <community>");
    println!("  rep vote <voter> <target> up");

    Ok(())
}
