//! Store - SQLite backend
//!
//! Single source of truth for the vote ledger plus the denormalized
//! aggregates derived from it (content counters, user karma, community
//! reputation, trust snapshots).
//!
//! # Key Points
//! - WAL mode with a busy timeout for concurrent callers
//! - Every multi-row mutation runs inside one transaction
//! - Counter upserts are single-statement `INSERT .. ON CONFLICT`,
//!   never read-then-decide

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use ulid::Ulid;

use super::error::{EngineError, EngineResult};
use super::model::{
    Community, CommunityReputation, Content, KarmaTotals, ReportStats, TargetKind, User, Vote,
    VoteValue,
};

/// How many times a contended vote transaction is retried before the
/// operation surfaces as retryable
pub const DEFAULT_VOTE_RETRIES: u32 = 3;

/// Database storage
pub struct Store {
    pub(crate) conn: Connection,
    path: Option<std::path::PathBuf>,
    pub(crate) vote_retries: u32,
}

impl Store {
    /// Open or create a database
    pub fn open(path: &Path) -> EngineResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // WAL for concurrent readers, busy timeout so writers queue briefly
        // instead of failing immediately
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000; PRAGMA foreign_keys=ON;")?;

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
            vote_retries: DEFAULT_VOTE_RETRIES,
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let store = Self {
            conn,
            path: None,
            vote_retries: DEFAULT_VOTE_RETRIES,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Clone by opening a new connection to the same database
    pub fn clone_connection(&self) -> EngineResult<Self> {
        match &self.path {
            Some(path) => Self::open(path),
            None => Self::open_memory(),
        }
    }

    /// Override the bounded retry count for contended vote transactions
    pub fn set_vote_retries(&mut self, retries: u32) {
        self.vote_retries = retries.max(1);
    }

    /// Initialize database schema
    fn init_schema(&self) -> EngineResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS communities (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            -- Posts and comments with their denormalized vote counters.
            -- Comments reference a parent post and inherit its community.
            CREATE TABLE IF NOT EXISTS contents (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL CHECK (kind IN ('post', 'comment')),
                author_id TEXT NOT NULL REFERENCES users(id),
                community_id TEXT REFERENCES communities(id),
                parent_post_id TEXT REFERENCES contents(id),
                vote_score INTEGER NOT NULL DEFAULT 0,
                upvote_count INTEGER NOT NULL DEFAULT 0,
                downvote_count INTEGER NOT NULL DEFAULT 0,
                comment_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_contents_author ON contents(author_id, kind);
            CREATE INDEX IF NOT EXISTS idx_contents_community ON contents(community_id);
            CREATE INDEX IF NOT EXISTS idx_contents_parent ON contents(parent_post_id);

            -- The ledger. The primary key makes one-vote-per-target a
            -- storage-level guarantee, not a convention.
            CREATE TABLE IF NOT EXISTS votes (
                user_id TEXT NOT NULL REFERENCES users(id),
                target_kind TEXT NOT NULL CHECK (target_kind IN ('post', 'comment')),
                target_id TEXT NOT NULL,
                value INTEGER NOT NULL CHECK (value IN (1, -1)),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, target_kind, target_id)
            );

            CREATE INDEX IF NOT EXISTS idx_votes_target ON votes(target_kind, target_id);

            CREATE TABLE IF NOT EXISTS user_karma (
                user_id TEXT PRIMARY KEY REFERENCES users(id),
                post_karma INTEGER NOT NULL DEFAULT 0,
                comment_karma INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS community_reputation (
                user_id TEXT NOT NULL REFERENCES users(id),
                community_id TEXT NOT NULL REFERENCES communities(id),
                post_karma INTEGER NOT NULL DEFAULT 0,
                comment_karma INTEGER NOT NULL DEFAULT 0,
                total_karma INTEGER NOT NULL DEFAULT 0,
                posts_count INTEGER NOT NULL DEFAULT 0,
                comments_count INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, community_id)
            );

            -- Aggregates consumed from the external moderation workflow
            CREATE TABLE IF NOT EXISTS report_stats (
                user_id TEXT PRIMARY KEY REFERENCES users(id),
                received INTEGER NOT NULL DEFAULT 0,
                accepted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS trust_levels (
                user_id TEXT PRIMARY KEY REFERENCES users(id),
                level INTEGER NOT NULL,
                level_name TEXT NOT NULL,
                trust_score INTEGER NOT NULL,
                karma_component INTEGER NOT NULL,
                account_age_component INTEGER NOT NULL,
                report_component INTEGER NOT NULL,
                participation_component INTEGER NOT NULL,
                total_karma INTEGER NOT NULL,
                post_karma INTEGER NOT NULL,
                comment_karma INTEGER NOT NULL,
                account_age_days INTEGER NOT NULL,
                reports_received INTEGER NOT NULL,
                reports_accepted INTEGER NOT NULL,
                communities_participated_in INTEGER NOT NULL,
                community_karma INTEGER NOT NULL,
                last_calculated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_trust_levels_score ON trust_levels(trust_score DESC);
            CREATE INDEX IF NOT EXISTS idx_trust_levels_level ON trust_levels(level);
            "#,
        )?;

        Ok(())
    }

    // === Users ===

    /// Register a user
    pub fn insert_user(&self, user: &User) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, username, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id.to_string(),
                user.username,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a user by ID
    pub fn user(&self, id: Ulid) -> EngineResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, created_at, updated_at FROM users WHERE id = ?1",
                [id.to_string()],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by username
    pub fn user_by_username(&self, username: &str) -> EngineResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, created_at, updated_at FROM users WHERE username = ?1",
                [username],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// All user IDs, in insertion order (drives batch recompute)
    pub fn all_user_ids(&self) -> EngineResult<Vec<Ulid>> {
        let mut stmt = self.conn.prepare("SELECT id FROM users ORDER BY rowid")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids.into_iter().map(|s| parse_ulid(&s)).collect())
    }

    fn user_exists(&self, id: Ulid) -> EngineResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Error unless the user exists
    pub(crate) fn require_user(&self, id: Ulid) -> EngineResult<()> {
        if self.user_exists(id)? {
            Ok(())
        } else {
            Err(EngineError::UserNotFound(id))
        }
    }

    // === Communities ===

    /// Register a community
    pub fn insert_community(&self, community: &Community) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO communities (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                community.id.to_string(),
                community.name,
                community.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a community by ID
    pub fn community(&self, id: Ulid) -> EngineResult<Option<Community>> {
        let community = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM communities WHERE id = ?1",
                [id.to_string()],
                |row| {
                    Ok(Community {
                        id: parse_ulid(&row.get::<_, String>(0)?),
                        name: row.get(1)?,
                        created_at: parse_timestamp(&row.get::<_, String>(2)?),
                    })
                },
            )
            .optional()?;
        Ok(community)
    }

    /// Get a community by name
    pub fn community_by_name(&self, name: &str) -> EngineResult<Option<Community>> {
        let community = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM communities WHERE name = ?1",
                [name],
                |row| {
                    Ok(Community {
                        id: parse_ulid(&row.get::<_, String>(0)?),
                        name: row.get(1)?,
                        created_at: parse_timestamp(&row.get::<_, String>(2)?),
                    })
                },
            )
            .optional()?;
        Ok(community)
    }

    pub(crate) fn require_community(&self, id: Ulid) -> EngineResult<()> {
        if self.community(id)?.is_some() {
            Ok(())
        } else {
            Err(EngineError::CommunityNotFound(id))
        }
    }

    // === Content ===

    /// Register a post or comment and bump the content counts that hang off
    /// it (parent post's comment count, community posts/comments counts).
    ///
    /// Content lifecycle is owned elsewhere; this is the hook the creation
    /// path calls so the counters this engine owns stay in step.
    pub fn register_content(&mut self, content: &Content) -> EngineResult<()> {
        self.require_user(content.author_id)?;

        // A comment's community is its parent post's community
        let community_id = match content.kind {
            TargetKind::Post => {
                if let Some(cid) = content.community_id {
                    self.require_community(cid)?;
                }
                content.community_id
            }
            TargetKind::Comment => {
                let parent_id = content.parent_post_id.ok_or(EngineError::TargetNotFound {
                    kind: TargetKind::Post,
                    id: Ulid::nil(),
                })?;
                let parent =
                    self.content(parent_id)?
                        .filter(|c| c.kind == TargetKind::Post)
                        .ok_or(EngineError::TargetNotFound {
                            kind: TargetKind::Post,
                            id: parent_id,
                        })?;
                parent.community_id
            }
        };

        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO contents (
                id, kind, author_id, community_id, parent_post_id,
                vote_score, upvote_count, downvote_count, comment_count, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, 0, 0, ?6)
            "#,
            params![
                content.id.to_string(),
                content.kind.as_str(),
                content.author_id.to_string(),
                content.community_id.map(|id| id.to_string()),
                content.parent_post_id.map(|id| id.to_string()),
                content.created_at.to_rfc3339(),
            ],
        )?;

        if content.kind == TargetKind::Comment {
            if let Some(parent_id) = content.parent_post_id {
                tx.execute(
                    "UPDATE contents SET comment_count = comment_count + 1 WHERE id = ?1",
                    [parent_id.to_string()],
                )?;
            }
        }

        if let Some(cid) = community_id {
            bump_content_counts(&tx, content.author_id, cid, content.kind)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Record content creation against community reputation counts.
    /// No-op when the content has no community.
    pub fn record_content_created(
        &mut self,
        author_id: Ulid,
        community_id: Option<Ulid>,
        kind: TargetKind,
    ) -> EngineResult<()> {
        let Some(cid) = community_id else {
            return Ok(());
        };
        self.require_user(author_id)?;
        self.require_community(cid)?;

        let tx = self.conn.transaction()?;
        bump_content_counts(&tx, author_id, cid, kind)?;
        tx.commit()?;
        Ok(())
    }

    /// Get content by ID
    pub fn content(&self, id: Ulid) -> EngineResult<Option<Content>> {
        let content = self
            .conn
            .query_row(
                r#"
                SELECT id, kind, author_id, community_id, parent_post_id,
                       vote_score, upvote_count, downvote_count, comment_count, created_at
                FROM contents WHERE id = ?1
                "#,
                [id.to_string()],
                Self::row_to_content,
            )
            .optional()?;
        Ok(content)
    }

    // === Votes ===

    /// Current vote by a user on a target, if any
    pub fn vote(
        &self,
        user_id: Ulid,
        target_kind: TargetKind,
        target_id: Ulid,
    ) -> EngineResult<Option<Vote>> {
        let vote = self
            .conn
            .query_row(
                r#"
                SELECT user_id, target_kind, target_id, value, created_at, updated_at
                FROM votes
                WHERE user_id = ?1 AND target_kind = ?2 AND target_id = ?3
                "#,
                params![
                    user_id.to_string(),
                    target_kind.as_str(),
                    target_id.to_string()
                ],
                Self::row_to_vote,
            )
            .optional()?;
        Ok(vote)
    }

    /// Total number of ledger entries (diagnostics)
    pub fn vote_count(&self) -> EngineResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM votes", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Karma / reputation reads ===

    /// A user's global karma, zeros when no row exists yet
    pub fn user_karma(&self, user_id: Ulid) -> EngineResult<KarmaTotals> {
        let totals = self
            .conn
            .query_row(
                "SELECT post_karma, comment_karma FROM user_karma WHERE user_id = ?1",
                [user_id.to_string()],
                |row| Ok(KarmaTotals::new(row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(totals.unwrap_or_default())
    }

    /// A user's reputation in one community, zeros when no row exists
    pub fn community_reputation(
        &self,
        user_id: Ulid,
        community_id: Ulid,
    ) -> EngineResult<CommunityReputation> {
        let rep = self
            .conn
            .query_row(
                r#"
                SELECT user_id, community_id, post_karma, comment_karma,
                       total_karma, posts_count, comments_count
                FROM community_reputation
                WHERE user_id = ?1 AND community_id = ?2
                "#,
                params![user_id.to_string(), community_id.to_string()],
                Self::row_to_reputation,
            )
            .optional()?;
        Ok(rep.unwrap_or_else(|| CommunityReputation::empty(user_id, community_id)))
    }

    /// All of a user's community reputation rows
    pub fn community_reputations(&self, user_id: Ulid) -> EngineResult<Vec<CommunityReputation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT user_id, community_id, post_karma, comment_karma,
                   total_karma, posts_count, comments_count
            FROM community_reputation
            WHERE user_id = ?1
            ORDER BY total_karma DESC
            "#,
        )?;
        let reps = stmt
            .query_map([user_id.to_string()], Self::row_to_reputation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reps)
    }

    /// Participation summary: (community count, summed community karma)
    pub(crate) fn participation(&self, user_id: Ulid) -> EngineResult<(i64, i64)> {
        let row = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(total_karma), 0) FROM community_reputation WHERE user_id = ?1",
            [user_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(row)
    }

    // === Report aggregates ===

    /// Record a report against a user; `accepted` also counts it as upheld
    /// by moderation. Report lifecycle itself lives outside this engine.
    pub fn record_report(&mut self, user_id: Ulid, accepted: bool) -> EngineResult<ReportStats> {
        self.require_user(user_id)?;
        let accepted_inc: i64 = if accepted { 1 } else { 0 };
        self.conn.execute(
            r#"
            INSERT INTO report_stats (user_id, received, accepted) VALUES (?1, 1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET
                received = received + 1,
                accepted = accepted + excluded.accepted
            "#,
            params![user_id.to_string(), accepted_inc],
        )?;
        self.report_stats(user_id)
    }

    /// Report aggregates for a user, zeros when never reported
    pub fn report_stats(&self, user_id: Ulid) -> EngineResult<ReportStats> {
        let stats = self
            .conn
            .query_row(
                "SELECT received, accepted FROM report_stats WHERE user_id = ?1",
                [user_id.to_string()],
                |row| {
                    Ok(ReportStats {
                        received: row.get(0)?,
                        accepted: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(stats.unwrap_or_default())
    }

    // === Row mappers ===

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: parse_ulid(&row.get::<_, String>(0)?),
            username: row.get(1)?,
            created_at: parse_timestamp(&row.get::<_, String>(2)?),
            updated_at: parse_timestamp(&row.get::<_, String>(3)?),
        })
    }

    fn row_to_content(row: &rusqlite::Row) -> rusqlite::Result<Content> {
        let kind_str: String = row.get(1)?;
        Ok(Content {
            id: parse_ulid(&row.get::<_, String>(0)?),
            kind: kind_str.parse().unwrap_or(TargetKind::Post),
            author_id: parse_ulid(&row.get::<_, String>(2)?),
            community_id: row.get::<_, Option<String>>(3)?.map(|s| parse_ulid(&s)),
            parent_post_id: row.get::<_, Option<String>>(4)?.map(|s| parse_ulid(&s)),
            vote_score: row.get(5)?,
            upvote_count: row.get(6)?,
            downvote_count: row.get(7)?,
            comment_count: row.get(8)?,
            created_at: parse_timestamp(&row.get::<_, String>(9)?),
        })
    }

    fn row_to_vote(row: &rusqlite::Row) -> rusqlite::Result<Vote> {
        let kind_str: String = row.get(1)?;
        let raw: i64 = row.get(3)?;
        Ok(Vote {
            user_id: parse_ulid(&row.get::<_, String>(0)?),
            target_kind: kind_str.parse().unwrap_or(TargetKind::Post),
            target_id: parse_ulid(&row.get::<_, String>(2)?),
            value: VoteValue::try_from(raw).unwrap_or(VoteValue::Up),
            created_at: parse_timestamp(&row.get::<_, String>(4)?),
            updated_at: parse_timestamp(&row.get::<_, String>(5)?),
        })
    }

    fn row_to_reputation(row: &rusqlite::Row) -> rusqlite::Result<CommunityReputation> {
        Ok(CommunityReputation {
            user_id: parse_ulid(&row.get::<_, String>(0)?),
            community_id: parse_ulid(&row.get::<_, String>(1)?),
            post_karma: row.get(2)?,
            comment_karma: row.get(3)?,
            total_karma: row.get(4)?,
            posts_count: row.get(5)?,
            comments_count: row.get(6)?,
        })
    }
}

/// Upsert-increment the posts/comments counts on community reputation.
/// Single statement so two concurrent first-time writers cannot both insert.
fn bump_content_counts(
    tx: &rusqlite::Transaction,
    author_id: Ulid,
    community_id: Ulid,
    kind: TargetKind,
) -> EngineResult<()> {
    let (posts_inc, comments_inc): (i64, i64) = match kind {
        TargetKind::Post => (1, 0),
        TargetKind::Comment => (0, 1),
    };
    tx.execute(
        r#"
        INSERT INTO community_reputation (
            user_id, community_id, post_karma, comment_karma, total_karma,
            posts_count, comments_count, updated_at
        ) VALUES (?1, ?2, 0, 0, 0, ?3, ?4, ?5)
        ON CONFLICT(user_id, community_id) DO UPDATE SET
            posts_count = posts_count + excluded.posts_count,
            comments_count = comments_count + excluded.comments_count,
            updated_at = excluded.updated_at
        "#,
        params![
            author_id.to_string(),
            community_id.to_string(),
            posts_inc,
            comments_inc,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub(crate) fn parse_ulid(s: &str) -> Ulid {
    Ulid::from_string(s).unwrap_or_else(|_| Ulid::nil())
}

pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_round_trip() -> EngineResult<()> {
        let store = Store::open_memory()?;
        let user = User::new("ada");
        store.insert_user(&user)?;

        let loaded = store.user(user.id)?.unwrap();
        assert_eq!(loaded.username, "ada");
        assert_eq!(loaded.id, user.id);

        let by_name = store.user_by_username("ada")?.unwrap();
        assert_eq!(by_name.id, user.id);

        assert!(store.user(Ulid::new())?.is_none());
        Ok(())
    }

    #[test]
    fn test_register_post_bumps_community_counts() -> EngineResult<()> {
        let mut store = Store::open_memory()?;
        let user = User::new("ada");
        store.insert_user(&user)?;
        let community = Community::new("rustaceans");
        store.insert_community(&community)?;

        let post = Content::post(user.id, Some(community.id));
        store.register_content(&post)?;

        let rep = store.community_reputation(user.id, community.id)?;
        assert_eq!(rep.posts_count, 1);
        assert_eq!(rep.comments_count, 0);
        assert_eq!(rep.total_karma, 0);
        Ok(())
    }

    #[test]
    fn test_register_comment_bumps_parent_and_community() -> EngineResult<()> {
        let mut store = Store::open_memory()?;
        let author = User::new("ada");
        let commenter = User::new("grace");
        store.insert_user(&author)?;
        store.insert_user(&commenter)?;
        let community = Community::new("rustaceans");
        store.insert_community(&community)?;

        let post = Content::post(author.id, Some(community.id));
        store.register_content(&post)?;

        let comment = Content::comment(commenter.id, post.id);
        store.register_content(&comment)?;

        let parent = store.content(post.id)?.unwrap();
        assert_eq!(parent.comment_count, 1);

        // Commenter participates in the community through the parent post
        let rep = store.community_reputation(commenter.id, community.id)?;
        assert_eq!(rep.comments_count, 1);
        assert_eq!(rep.posts_count, 0);
        Ok(())
    }

    #[test]
    fn test_post_without_community_creates_no_reputation() -> EngineResult<()> {
        let mut store = Store::open_memory()?;
        let user = User::new("ada");
        store.insert_user(&user)?;

        let post = Content::post(user.id, None);
        store.register_content(&post)?;

        assert_eq!(store.community_reputations(user.id)?.len(), 0);
        Ok(())
    }

    #[test]
    fn test_comment_on_missing_post_rejected() {
        let mut store = Store::open_memory().unwrap();
        let user = User::new("ada");
        store.insert_user(&user).unwrap();

        let comment = Content::comment(user.id, Ulid::new());
        let err = store.register_content(&comment).unwrap_err();
        assert!(matches!(err, EngineError::TargetNotFound { .. }));
    }

    #[test]
    fn test_record_content_created_without_community_is_noop() -> EngineResult<()> {
        let mut store = Store::open_memory()?;
        let user = User::new("ada");
        store.insert_user(&user)?;

        store.record_content_created(user.id, None, TargetKind::Post)?;
        assert_eq!(store.community_reputations(user.id)?.len(), 0);
        Ok(())
    }

    #[test]
    fn test_report_stats_accumulate() -> EngineResult<()> {
        let mut store = Store::open_memory()?;
        let user = User::new("ada");
        store.insert_user(&user)?;

        assert_eq!(store.report_stats(user.id)?.received, 0);

        store.record_report(user.id, false)?;
        store.record_report(user.id, true)?;
        let stats = store.record_report(user.id, false)?;

        assert_eq!(stats.received, 3);
        assert_eq!(stats.accepted, 1);
        Ok(())
    }

    #[test]
    fn test_karma_reads_zero_when_absent() -> EngineResult<()> {
        let store = Store::open_memory()?;
        let user = User::new("ada");
        store.insert_user(&user)?;

        let karma = store.user_karma(user.id)?;
        assert_eq!(karma, KarmaTotals::default());

        let rep = store.community_reputation(user.id, Ulid::new())?;
        assert_eq!(rep.total_karma, 0);
        assert_eq!(rep.posts_count, 0);
        Ok(())
    }
}
