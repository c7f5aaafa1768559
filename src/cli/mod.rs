//! CLI module - Command definitions and handlers

use clap::{Parser, Subcommand};

pub mod community;
pub mod content;
pub mod init;
pub mod karma;
pub mod leaderboard;
pub mod levels;
pub mod reconcile;
pub mod report;
pub mod reputation;
pub mod stats;
pub mod trust;
pub mod user;
pub mod utils;
pub mod vote;

/// rep - Reputation ledger and trust scoring
///
/// One vote per (user, target) with toggle/flip semantics, incrementally
/// maintained karma and community reputation, and derived trust levels.
#[derive(Parser, Debug)]
#[command(name = "rep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new rep repository
    Init(init::InitArgs),

    /// Manage users
    User(user::UserArgs),

    /// Manage communities
    Community(community::CommunityArgs),

    /// Register a post
    Post(content::PostArgs),

    /// Register a comment under a post
    Comment(content::CommentArgs),

    /// Cast a vote on a post or comment
    Vote(vote::VoteArgs),

    /// Show a user's karma
    Karma(karma::KarmaArgs),

    /// Show a user's reputation in a community
    Reputation(reputation::ReputationArgs),

    /// Record a report outcome against a user
    Report(report::ReportArgs),

    /// Trust levels: show, breakdown, recompute
    Trust(trust::TrustArgs),

    /// Top users by trust score
    Leaderboard(leaderboard::LeaderboardArgs),

    /// List users at a trust level
    Levels(levels::LevelsArgs),

    /// Trust statistics grouped by level
    Stats(stats::StatsArgs),

    /// Recompute aggregates from ground truth
    Reconcile(reconcile::ReconcileArgs),
}
