//! Vote ledger
//!
//! `cast_vote` is the only write path for vote state. One call performs one
//! ledger mutation (create, remove, or flip) plus the three counter updates
//! that depend on it (target counters, author karma, community reputation)
//! inside a single immediate transaction. Either all four land or none do.
//!
//! # Transition table
//!
//! | existing vote | requested | action  | delta |
//! |---------------|-----------|---------|-------|
//! | none          | v         | create  | v     |
//! | same as v     | v         | remove  | -v    |
//! | opposite of v | v         | flip    | 2v    |

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::{debug, warn};
use ulid::Ulid;

use super::error::{EngineError, EngineResult};
use super::model::{TargetKind, VoteOutcome, VoteState, VoteValue};
use super::store::Store;

/// What a cast does to the ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VoteAction {
    Create,
    Remove,
    Flip,
}

/// Planned effect of one cast: the ledger action plus the count adjustments
/// every downstream counter must see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    pub action: VoteAction,
    pub state: VoteState,
    /// Applied identically to vote score, author karma, community karma
    pub delta: i64,
    pub upvote_delta: i64,
    pub downvote_delta: i64,
}

impl Transition {
    /// Pure transition planning from current ledger state
    pub fn plan(existing: Option<VoteValue>, requested: VoteValue) -> Self {
        match existing {
            None => Self {
                action: VoteAction::Create,
                state: VoteState::Created,
                delta: requested.value(),
                upvote_delta: (requested == VoteValue::Up) as i64,
                downvote_delta: (requested == VoteValue::Down) as i64,
            },
            Some(current) if current == requested => Self {
                action: VoteAction::Remove,
                state: VoteState::Removed,
                delta: -requested.value(),
                upvote_delta: -((requested == VoteValue::Up) as i64),
                downvote_delta: -((requested == VoteValue::Down) as i64),
            },
            Some(_) => Self {
                action: VoteAction::Flip,
                state: VoteState::Flipped,
                delta: 2 * requested.value(),
                upvote_delta: if requested == VoteValue::Up { 1 } else { -1 },
                downvote_delta: if requested == VoteValue::Down { 1 } else { -1 },
            },
        }
    }
}

/// Target row fields needed to plan and apply a cast
struct TargetRow {
    author_id: Ulid,
    community_id: Option<Ulid>,
    parent_post_id: Option<Ulid>,
    vote_score: i64,
    upvote_count: i64,
    downvote_count: i64,
}

impl Store {
    /// Cast a vote on a post or comment.
    ///
    /// Validation (`value` must be exactly +1 or -1, the target must exist,
    /// authors cannot vote on their own content) happens before any write.
    /// Contended transactions retry up to the configured bound, then surface
    /// as a retryable [`EngineError::Busy`] with no partial state.
    pub fn cast_vote(
        &mut self,
        voter_id: Ulid,
        target_kind: TargetKind,
        target_id: Ulid,
        value: i64,
    ) -> EngineResult<VoteOutcome> {
        let value = VoteValue::try_from(value)?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_cast_vote(voter_id, target_kind, target_id, value) {
                Err(EngineError::Storage(err)) if is_busy(&err) => {
                    if attempt >= self.vote_retries {
                        warn!(
                            voter = %voter_id,
                            target = %target_id,
                            attempts = attempt,
                            "vote transaction kept conflicting, giving up"
                        );
                        return Err(EngineError::Busy(attempt));
                    }
                    debug!(
                        voter = %voter_id,
                        target = %target_id,
                        attempt,
                        "vote transaction conflicted, retrying"
                    );
                }
                other => return other,
            }
        }
    }

    fn try_cast_vote(
        &mut self,
        voter_id: Ulid,
        target_kind: TargetKind,
        target_id: Ulid,
        value: VoteValue,
    ) -> EngineResult<VoteOutcome> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let target = tx
            .query_row(
                r#"
                SELECT author_id, community_id, parent_post_id,
                       vote_score, upvote_count, downvote_count
                FROM contents WHERE id = ?1 AND kind = ?2
                "#,
                params![target_id.to_string(), target_kind.as_str()],
                |row| {
                    Ok(TargetRow {
                        author_id: super::store::parse_ulid(&row.get::<_, String>(0)?),
                        community_id: row
                            .get::<_, Option<String>>(1)?
                            .map(|s| super::store::parse_ulid(&s)),
                        parent_post_id: row
                            .get::<_, Option<String>>(2)?
                            .map(|s| super::store::parse_ulid(&s)),
                        vote_score: row.get(3)?,
                        upvote_count: row.get(4)?,
                        downvote_count: row.get(5)?,
                    })
                },
            )
            .optional()?
            .ok_or(EngineError::TargetNotFound {
                kind: target_kind,
                id: target_id,
            })?;

        if target.author_id == voter_id {
            return Err(EngineError::SelfVoteForbidden(target_kind));
        }

        let existing: Option<VoteValue> = tx
            .query_row(
                "SELECT value FROM votes WHERE user_id = ?1 AND target_kind = ?2 AND target_id = ?3",
                params![
                    voter_id.to_string(),
                    target_kind.as_str(),
                    target_id.to_string()
                ],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .map(|raw| VoteValue::try_from(raw).unwrap_or(VoteValue::Up));

        let plan = Transition::plan(existing, value);

        // 1. Ledger row
        match plan.action {
            VoteAction::Create => {
                tx.execute(
                    r#"
                    INSERT INTO votes (user_id, target_kind, target_id, value, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                    "#,
                    params![
                        voter_id.to_string(),
                        target_kind.as_str(),
                        target_id.to_string(),
                        value.value(),
                        now,
                    ],
                )?;
            }
            VoteAction::Remove => {
                tx.execute(
                    "DELETE FROM votes WHERE user_id = ?1 AND target_kind = ?2 AND target_id = ?3",
                    params![
                        voter_id.to_string(),
                        target_kind.as_str(),
                        target_id.to_string()
                    ],
                )?;
            }
            VoteAction::Flip => {
                tx.execute(
                    r#"
                    UPDATE votes SET value = ?4, updated_at = ?5
                    WHERE user_id = ?1 AND target_kind = ?2 AND target_id = ?3
                    "#,
                    params![
                        voter_id.to_string(),
                        target_kind.as_str(),
                        target_id.to_string(),
                        value.value(),
                        now,
                    ],
                )?;
            }
        }

        // 2. Target counters
        tx.execute(
            r#"
            UPDATE contents SET
                vote_score = vote_score + ?2,
                upvote_count = upvote_count + ?3,
                downvote_count = downvote_count + ?4
            WHERE id = ?1
            "#,
            params![
                target_id.to_string(),
                plan.delta,
                plan.upvote_delta,
                plan.downvote_delta
            ],
        )?;

        // 3. Author karma
        let (post_delta, comment_delta) = match target_kind {
            TargetKind::Post => (plan.delta, 0i64),
            TargetKind::Comment => (0i64, plan.delta),
        };
        tx.execute(
            r#"
            INSERT INTO user_karma (user_id, post_karma, comment_karma, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                post_karma = post_karma + excluded.post_karma,
                comment_karma = comment_karma + excluded.comment_karma,
                updated_at = excluded.updated_at
            "#,
            params![
                target.author_id.to_string(),
                post_delta,
                comment_delta,
                now
            ],
        )?;

        // 4. Community reputation, when the target resolves to a community
        let community_id = match target_kind {
            TargetKind::Post => target.community_id,
            TargetKind::Comment => match target.parent_post_id {
                Some(parent_id) => tx
                    .query_row(
                        "SELECT community_id FROM contents WHERE id = ?1",
                        [parent_id.to_string()],
                        |row| row.get::<_, Option<String>>(0),
                    )
                    .optional()?
                    .flatten()
                    .map(|s| super::store::parse_ulid(&s)),
                None => None,
            },
        };

        if let Some(cid) = community_id {
            tx.execute(
                r#"
                INSERT INTO community_reputation (
                    user_id, community_id, post_karma, comment_karma, total_karma,
                    posts_count, comments_count, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6)
                ON CONFLICT(user_id, community_id) DO UPDATE SET
                    post_karma = post_karma + excluded.post_karma,
                    comment_karma = comment_karma + excluded.comment_karma,
                    total_karma = total_karma + excluded.total_karma,
                    updated_at = excluded.updated_at
                "#,
                params![
                    target.author_id.to_string(),
                    cid.to_string(),
                    post_delta,
                    comment_delta,
                    plan.delta,
                    now
                ],
            )?;
        }

        tx.commit()?;

        debug!(
            voter = %voter_id,
            target = %target_id,
            kind = %target_kind,
            state = %plan.state,
            delta = plan.delta,
            "vote applied"
        );

        Ok(VoteOutcome {
            vote_score: target.vote_score + plan.delta,
            upvotes: target.upvote_count + plan.upvote_delta,
            downvotes: target.downvote_count + plan.downvote_delta,
            state: plan.state,
        })
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::DatabaseBusy
                || e.code == rusqlite::ErrorCode::DatabaseLocked
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Community, Content, User};

    /// Two users, a community, and a post by the first user
    fn fixture() -> (Store, User, User, Community, Content) {
        let mut store = Store::open_memory().unwrap();
        let author = User::new("ada");
        let voter = User::new("grace");
        store.insert_user(&author).unwrap();
        store.insert_user(&voter).unwrap();
        let community = Community::new("rustaceans");
        store.insert_community(&community).unwrap();
        let post = Content::post(author.id, Some(community.id));
        store.register_content(&post).unwrap();
        (store, author, voter, community, post)
    }

    #[test]
    fn test_transition_table() {
        use VoteValue::{Down, Up};

        let t = Transition::plan(None, Up);
        assert_eq!((t.action, t.delta, t.upvote_delta, t.downvote_delta),
            (VoteAction::Create, 1, 1, 0));

        let t = Transition::plan(None, Down);
        assert_eq!((t.action, t.delta, t.upvote_delta, t.downvote_delta),
            (VoteAction::Create, -1, 0, 1));

        let t = Transition::plan(Some(Up), Up);
        assert_eq!((t.action, t.delta, t.upvote_delta, t.downvote_delta),
            (VoteAction::Remove, -1, -1, 0));

        let t = Transition::plan(Some(Down), Down);
        assert_eq!((t.action, t.delta, t.upvote_delta, t.downvote_delta),
            (VoteAction::Remove, 1, 0, -1));

        let t = Transition::plan(Some(Down), Up);
        assert_eq!((t.action, t.delta, t.upvote_delta, t.downvote_delta),
            (VoteAction::Flip, 2, 1, -1));

        let t = Transition::plan(Some(Up), Down);
        assert_eq!((t.action, t.delta, t.upvote_delta, t.downvote_delta),
            (VoteAction::Flip, -2, -1, 1));
    }

    #[test]
    fn test_first_vote_creates_record_and_moves_score() {
        let (mut store, author, voter, _community, post) = fixture();

        let outcome = store
            .cast_vote(voter.id, TargetKind::Post, post.id, 1)
            .unwrap();
        assert_eq!(outcome.vote_score, 1);
        assert_eq!(outcome.upvotes, 1);
        assert_eq!(outcome.downvotes, 0);
        assert_eq!(outcome.state, VoteState::Created);

        assert!(store.vote(voter.id, TargetKind::Post, post.id).unwrap().is_some());
        assert_eq!(store.vote_count().unwrap(), 1);
        assert_eq!(store.user_karma(author.id).unwrap().post_karma, 1);
    }

    #[test]
    fn test_same_value_twice_removes_vote() {
        let (mut store, author, voter, _community, post) = fixture();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();
        let outcome = store
            .cast_vote(voter.id, TargetKind::Post, post.id, 1)
            .unwrap();

        assert_eq!(outcome.vote_score, 0);
        assert_eq!(outcome.upvotes, 0);
        assert_eq!(outcome.state, VoteState::Removed);
        assert!(store.vote(voter.id, TargetKind::Post, post.id).unwrap().is_none());
        assert_eq!(store.vote_count().unwrap(), 0);
        assert_eq!(store.user_karma(author.id).unwrap().post_karma, 0);
    }

    #[test]
    fn test_flip_moves_score_by_two() {
        let (mut store, author, voter, _community, post) = fixture();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();
        let outcome = store
            .cast_vote(voter.id, TargetKind::Post, post.id, -1)
            .unwrap();

        assert_eq!(outcome.vote_score, -1);
        assert_eq!(outcome.upvotes, 0);
        assert_eq!(outcome.downvotes, 1);
        assert_eq!(outcome.state, VoteState::Flipped);
        // still exactly one ledger row
        assert_eq!(store.vote_count().unwrap(), 1);
        assert_eq!(store.user_karma(author.id).unwrap().post_karma, -1);
    }

    #[test]
    fn test_downvote_from_neutral_moves_by_one() {
        let (mut store, _author, voter, _community, post) = fixture();

        let outcome = store
            .cast_vote(voter.id, TargetKind::Post, post.id, -1)
            .unwrap();
        assert_eq!(outcome.vote_score, -1);
        assert_eq!(outcome.downvotes, 1);
    }

    #[test]
    fn test_score_invariant_over_sequences() {
        let (mut store, _author, voter, _community, post) = fixture();
        let other = User::new("linus");
        store.insert_user(&other).unwrap();

        // Arbitrary toggle/flip sequence across two voters
        let casts = [
            (voter.id, 1),
            (other.id, -1),
            (voter.id, -1), // flip
            (other.id, -1), // remove
            (voter.id, -1), // remove
            (other.id, 1),
            (voter.id, 1),
            (voter.id, -1), // flip
        ];
        for (who, v) in casts {
            store.cast_vote(who, TargetKind::Post, post.id, v).unwrap();
        }

        let content = store.content(post.id).unwrap().unwrap();
        assert_eq!(content.vote_score, content.upvote_count - content.downvote_count);
        assert!(content.upvote_count >= 0);
        assert!(content.downvote_count >= 0);
    }

    #[test]
    fn test_self_vote_rejected_without_side_effects() {
        let (mut store, author, _voter, _community, post) = fixture();

        let err = store
            .cast_vote(author.id, TargetKind::Post, post.id, 1)
            .unwrap_err();
        assert!(matches!(err, EngineError::SelfVoteForbidden(TargetKind::Post)));

        let content = store.content(post.id).unwrap().unwrap();
        assert_eq!(content.vote_score, 0);
        assert_eq!(store.vote_count().unwrap(), 0);
        assert_eq!(store.user_karma(author.id).unwrap().total_karma, 0);
    }

    #[test]
    fn test_invalid_value_rejected_before_lookup() {
        let (mut store, _author, voter, _community, _post) = fixture();

        // Target doesn't even exist: validation must win
        let err = store
            .cast_vote(voter.id, TargetKind::Post, Ulid::new(), 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidVoteValue(0)));

        let err = store
            .cast_vote(voter.id, TargetKind::Post, Ulid::new(), 5)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidVoteValue(5)));
    }

    #[test]
    fn test_missing_target_rejected() {
        let (mut store, _author, voter, _community, _post) = fixture();

        let missing = Ulid::new();
        let err = store
            .cast_vote(voter.id, TargetKind::Post, missing, 1)
            .unwrap_err();
        assert!(matches!(err, EngineError::TargetNotFound { .. }));
    }

    #[test]
    fn test_kind_mismatch_is_not_found() {
        let (mut store, _author, voter, _community, post) = fixture();

        // The post exists, but not as a comment
        let err = store
            .cast_vote(voter.id, TargetKind::Comment, post.id, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::TargetNotFound {
                kind: TargetKind::Comment,
                ..
            }
        ));
    }

    #[test]
    fn test_post_vote_updates_community_reputation() {
        let (mut store, author, voter, community, post) = fixture();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();

        let rep = store.community_reputation(author.id, community.id).unwrap();
        assert_eq!(rep.post_karma, 1);
        assert_eq!(rep.comment_karma, 0);
        assert_eq!(rep.total_karma, 1);
    }

    #[test]
    fn test_comment_vote_attributes_to_parent_community() {
        let (mut store, author, voter, community, post) = fixture();

        let comment = Content::comment(author.id, post.id);
        store.register_content(&comment).unwrap();

        store
            .cast_vote(voter.id, TargetKind::Comment, comment.id, 1)
            .unwrap();

        let karma = store.user_karma(author.id).unwrap();
        assert_eq!(karma.comment_karma, 1);
        assert_eq!(karma.post_karma, 0);

        let rep = store.community_reputation(author.id, community.id).unwrap();
        assert_eq!(rep.comment_karma, 1);
        assert_eq!(rep.total_karma, 1);
    }

    #[test]
    fn test_vote_without_community_skips_reputation() {
        let mut store = Store::open_memory().unwrap();
        let author = User::new("ada");
        let voter = User::new("grace");
        store.insert_user(&author).unwrap();
        store.insert_user(&voter).unwrap();

        let post = Content::post(author.id, None);
        store.register_content(&post).unwrap();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();

        assert_eq!(store.user_karma(author.id).unwrap().post_karma, 1);
        assert_eq!(store.community_reputations(author.id).unwrap().len(), 0);
    }

    #[test]
    fn test_total_karma_invariant_after_mixed_votes() {
        let (mut store, author, voter, community, post) = fixture();
        let comment = Content::comment(author.id, post.id);
        store.register_content(&comment).unwrap();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();
        store
            .cast_vote(voter.id, TargetKind::Comment, comment.id, -1)
            .unwrap();

        let rep = store.community_reputation(author.id, community.id).unwrap();
        assert_eq!(rep.total_karma, rep.post_karma + rep.comment_karma);
        assert_eq!(rep.total_karma, 0);
    }
}
