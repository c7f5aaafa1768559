//! Core data structures
//!
//! The vote ledger is the only durable record of voter intent; every other
//! struct here mirrors a denormalized aggregate kept in step with it.
//!
//! # Key Properties
//! - **Vote**: at most one per (voter, target kind, target id)
//! - **ContentCounters**: `vote_score == upvote_count - downvote_count`
//! - **CommunityReputation**: `total_karma == post_karma + comment_karma`
//! - **TrustLevelRecord**: derived snapshot, reproducible from the rest

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::error::EngineError;

/// What a vote points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TargetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" => Ok(TargetKind::Post),
            "comment" => Ok(TargetKind::Comment),
            _ => anyhow::bail!("Unknown target kind: {}", s),
        }
    }
}

/// A validated vote polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Numeric value as stored in the ledger
    pub fn value(&self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            VoteValue::Up => VoteValue::Down,
            VoteValue::Down => VoteValue::Up,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = EngineError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(EngineError::InvalidVoteValue(other)),
        }
    }
}

/// A user known to the engine (identity itself is managed elsewhere;
/// `created_at` feeds the account-age trust component)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Ulid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new(),
            username: username.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A community that scopes reputation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: Ulid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Community {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A post or comment with its vote counters.
///
/// Posts may belong to a community; comments always have a parent post and
/// take their community from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: Ulid,
    pub kind: TargetKind,
    pub author_id: Ulid,
    pub community_id: Option<Ulid>,
    pub parent_post_id: Option<Ulid>,
    pub vote_score: i64,
    pub upvote_count: i64,
    pub downvote_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Content {
    /// A new post, optionally scoped to a community
    pub fn post(author_id: Ulid, community_id: Option<Ulid>) -> Self {
        Self {
            id: Ulid::new(),
            kind: TargetKind::Post,
            author_id,
            community_id,
            parent_post_id: None,
            vote_score: 0,
            upvote_count: 0,
            downvote_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        }
    }

    /// A new comment under a post
    pub fn comment(author_id: Ulid, parent_post_id: Ulid) -> Self {
        Self {
            id: Ulid::new(),
            kind: TargetKind::Comment,
            author_id,
            community_id: None,
            parent_post_id: Some(parent_post_id),
            vote_score: 0,
            upvote_count: 0,
            downvote_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// One ledger entry: a user's current vote on one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: Ulid,
    pub target_kind: TargetKind,
    pub target_id: Ulid,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a cast did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    /// First vote on this target by this user
    Created,
    /// Same value cast again: the vote was removed
    Removed,
    /// Opposite value cast: the vote changed sign
    Flipped,
}

impl std::fmt::Display for VoteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteState::Created => write!(f, "created"),
            VoteState::Removed => write!(f, "removed"),
            VoteState::Flipped => write!(f, "flipped"),
        }
    }
}

/// Target counters after a cast, plus what happened
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub vote_score: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub state: VoteState,
}

/// Per-user global karma
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KarmaTotals {
    pub post_karma: i64,
    pub comment_karma: i64,
    pub total_karma: i64,
}

impl KarmaTotals {
    pub fn new(post_karma: i64, comment_karma: i64) -> Self {
        Self {
            post_karma,
            comment_karma,
            total_karma: post_karma + comment_karma,
        }
    }
}

/// Per-(user, community) karma and content counts
#[derive(Debug, Clone, Serialize)]
pub struct CommunityReputation {
    pub user_id: Ulid,
    pub community_id: Ulid,
    pub post_karma: i64,
    pub comment_karma: i64,
    pub total_karma: i64,
    pub posts_count: i64,
    pub comments_count: i64,
}

impl CommunityReputation {
    /// Zero-valued reputation for a pair with no record yet
    pub fn empty(user_id: Ulid, community_id: Ulid) -> Self {
        Self {
            user_id,
            community_id,
            post_karma: 0,
            comment_karma: 0,
            total_karma: 0,
            posts_count: 0,
            comments_count: 0,
        }
    }
}

/// Report aggregates consumed from the moderation workflow
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReportStats {
    pub received: i64,
    pub accepted: i64,
}

/// Persisted trust snapshot for one user
#[derive(Debug, Clone, Serialize)]
pub struct TrustLevelRecord {
    pub user_id: Ulid,
    pub level: u8,
    pub level_name: String,
    pub trust_score: u32,
    pub karma_component: i64,
    pub account_age_component: i64,
    pub report_component: i64,
    pub participation_component: i64,
    pub total_karma: i64,
    pub post_karma: i64,
    pub comment_karma: i64,
    pub account_age_days: i64,
    pub reports_received: i64,
    pub reports_accepted: i64,
    pub communities_participated_in: i64,
    pub community_karma: i64,
    pub last_calculated_at: DateTime<Utc>,
}

/// Result of a batch trust recompute
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchOutcome {
    pub processed: u64,
    pub successful: u64,
    pub failed: u64,
}

/// Per-level slice of the trust statistics view
#[derive(Debug, Clone, Serialize)]
pub struct LevelStats {
    pub level: u8,
    pub level_name: String,
    pub count: i64,
    pub avg_trust_score: f64,
    pub min_trust_score: i64,
    pub max_trust_score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_value_try_from() {
        assert_eq!(VoteValue::try_from(1).unwrap(), VoteValue::Up);
        assert_eq!(VoteValue::try_from(-1).unwrap(), VoteValue::Down);
        assert!(matches!(
            VoteValue::try_from(0),
            Err(EngineError::InvalidVoteValue(0))
        ));
        assert!(matches!(
            VoteValue::try_from(2),
            Err(EngineError::InvalidVoteValue(2))
        ));
    }

    #[test]
    fn test_vote_value_opposite() {
        assert_eq!(VoteValue::Up.opposite(), VoteValue::Down);
        assert_eq!(VoteValue::Down.opposite(), VoteValue::Up);
        assert_eq!(VoteValue::Up.value(), 1);
        assert_eq!(VoteValue::Down.value(), -1);
    }

    #[test]
    fn test_target_kind_round_trip() {
        assert_eq!("post".parse::<TargetKind>().unwrap(), TargetKind::Post);
        assert_eq!(
            "comment".parse::<TargetKind>().unwrap(),
            TargetKind::Comment
        );
        assert!("thread".parse::<TargetKind>().is_err());
        assert_eq!(format!("{}", TargetKind::Post), "post");
    }

    #[test]
    fn test_karma_totals_sum() {
        let totals = KarmaTotals::new(10, -3);
        assert_eq!(totals.total_karma, 7);
    }

    #[test]
    fn test_new_content_starts_at_zero() {
        let author = Ulid::new();
        let post = Content::post(author, None);
        assert_eq!(post.vote_score, 0);
        assert_eq!(post.upvote_count, 0);
        assert_eq!(post.downvote_count, 0);
        assert_eq!(post.kind, TargetKind::Post);

        let comment = Content::comment(author, post.id);
        assert_eq!(comment.parent_post_id, Some(post.id));
        assert_eq!(comment.kind, TargetKind::Comment);
    }
}
