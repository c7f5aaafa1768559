//! Reconciliation
//!
//! Authoritative recompute of the denormalized aggregates from ground truth
//! (content rows and their current vote scores). The incremental path in
//! `ledger` keeps these fresh; this path makes them exact again after drift
//! from partial failures, manual edits, or migrations.
//!
//! Recompute reads and overwrites inside one transaction, so running it
//! concurrently with live voting is safe: the worst case is a result that is
//! stale by one in-flight vote, corrected by the next run.

use rusqlite::params;
use tracing::debug;
use ulid::Ulid;

use super::error::EngineResult;
use super::model::{CommunityReputation, KarmaTotals};
use super::store::Store;

impl Store {
    /// Recompute a user's global karma from their content's vote scores and
    /// overwrite the stored aggregate. Idempotent.
    pub fn recompute_user_karma(&mut self, user_id: Ulid) -> EngineResult<KarmaTotals> {
        self.require_user(user_id)?;

        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let post_karma: i64 = tx.query_row(
            "SELECT COALESCE(SUM(vote_score), 0) FROM contents WHERE author_id = ?1 AND kind = 'post'",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        let comment_karma: i64 = tx.query_row(
            "SELECT COALESCE(SUM(vote_score), 0) FROM contents WHERE author_id = ?1 AND kind = 'comment'",
            [user_id.to_string()],
            |row| row.get(0),
        )?;

        tx.execute(
            r#"
            INSERT INTO user_karma (user_id, post_karma, comment_karma, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                post_karma = excluded.post_karma,
                comment_karma = excluded.comment_karma,
                updated_at = excluded.updated_at
            "#,
            params![user_id.to_string(), post_karma, comment_karma, now],
        )?;

        tx.commit()?;

        let totals = KarmaTotals::new(post_karma, comment_karma);
        debug!(user = %user_id, post_karma, comment_karma, "user karma recomputed");
        Ok(totals)
    }

    /// Recompute one (user, community) reputation row from ground truth and
    /// overwrite it. Comment karma is attributed through the parent post's
    /// community, exactly as the incremental vote path attributes it.
    pub fn recompute_community_reputation(
        &mut self,
        user_id: Ulid,
        community_id: Ulid,
    ) -> EngineResult<CommunityReputation> {
        self.require_user(user_id)?;
        self.require_community(community_id)?;

        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let (post_karma, posts_count): (i64, i64) = tx.query_row(
            r#"
            SELECT COALESCE(SUM(vote_score), 0), COUNT(*)
            FROM contents
            WHERE author_id = ?1 AND kind = 'post' AND community_id = ?2
            "#,
            params![user_id.to_string(), community_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let (comment_karma, comments_count): (i64, i64) = tx.query_row(
            r#"
            SELECT COALESCE(SUM(c.vote_score), 0), COUNT(*)
            FROM contents c
            JOIN contents p ON c.parent_post_id = p.id
            WHERE c.author_id = ?1 AND c.kind = 'comment' AND p.community_id = ?2
            "#,
            params![user_id.to_string(), community_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let total_karma = post_karma + comment_karma;

        tx.execute(
            r#"
            INSERT INTO community_reputation (
                user_id, community_id, post_karma, comment_karma, total_karma,
                posts_count, comments_count, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id, community_id) DO UPDATE SET
                post_karma = excluded.post_karma,
                comment_karma = excluded.comment_karma,
                total_karma = excluded.total_karma,
                posts_count = excluded.posts_count,
                comments_count = excluded.comments_count,
                updated_at = excluded.updated_at
            "#,
            params![
                user_id.to_string(),
                community_id.to_string(),
                post_karma,
                comment_karma,
                total_karma,
                posts_count,
                comments_count,
                now
            ],
        )?;

        tx.commit()?;

        debug!(
            user = %user_id,
            community = %community_id,
            total_karma,
            "community reputation recomputed"
        );

        Ok(CommunityReputation {
            user_id,
            community_id,
            post_karma,
            comment_karma,
            total_karma,
            posts_count,
            comments_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Community, Content, TargetKind, User};

    fn fixture() -> (Store, User, User, Community, Content, Content) {
        let mut store = Store::open_memory().unwrap();
        let author = User::new("ada");
        let voter = User::new("grace");
        store.insert_user(&author).unwrap();
        store.insert_user(&voter).unwrap();
        let community = Community::new("rustaceans");
        store.insert_community(&community).unwrap();
        let post = Content::post(author.id, Some(community.id));
        store.register_content(&post).unwrap();
        let comment = Content::comment(author.id, post.id);
        store.register_content(&comment).unwrap();
        (store, author, voter, community, post, comment)
    }

    #[test]
    fn test_recompute_matches_incremental() {
        let (mut store, author, voter, _community, post, comment) = fixture();
        let other = User::new("linus");
        store.insert_user(&other).unwrap();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();
        store.cast_vote(other.id, TargetKind::Post, post.id, 1).unwrap();
        store.cast_vote(voter.id, TargetKind::Comment, comment.id, -1).unwrap();
        store.cast_vote(other.id, TargetKind::Comment, comment.id, -1).unwrap();
        store.cast_vote(voter.id, TargetKind::Comment, comment.id, -1).unwrap(); // remove
        store.cast_vote(other.id, TargetKind::Post, post.id, -1).unwrap(); // flip

        let incremental = store.user_karma(author.id).unwrap();
        let recomputed = store.recompute_user_karma(author.id).unwrap();
        assert_eq!(incremental, recomputed);
        // post: +1 +1 then flip -> 0; comment: -1 -1 then removal -> -1
        assert_eq!(recomputed.post_karma, 0);
        assert_eq!(recomputed.comment_karma, -1);
    }

    #[test]
    fn test_recompute_repairs_drift() {
        let (mut store, author, voter, _community, post, _comment) = fixture();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();

        // Simulate drift from a manual edit
        store
            .conn
            .execute(
                "UPDATE user_karma SET post_karma = 999 WHERE user_id = ?1",
                [author.id.to_string()],
            )
            .unwrap();
        assert_eq!(store.user_karma(author.id).unwrap().post_karma, 999);

        let repaired = store.recompute_user_karma(author.id).unwrap();
        assert_eq!(repaired.post_karma, 1);
        assert_eq!(store.user_karma(author.id).unwrap().post_karma, 1);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let (mut store, author, voter, _community, post, _comment) = fixture();
        store.cast_vote(voter.id, TargetKind::Post, post.id, -1).unwrap();

        let first = store.recompute_user_karma(author.id).unwrap();
        let second = store.recompute_user_karma(author.id).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recompute_without_content_is_zero() {
        let mut store = Store::open_memory().unwrap();
        let user = User::new("ada");
        store.insert_user(&user).unwrap();

        let totals = store.recompute_user_karma(user.id).unwrap();
        assert_eq!(totals, KarmaTotals::default());
    }

    #[test]
    fn test_recompute_community_reputation_matches_incremental() {
        let (mut store, author, voter, community, post, comment) = fixture();

        store.cast_vote(voter.id, TargetKind::Post, post.id, 1).unwrap();
        store.cast_vote(voter.id, TargetKind::Comment, comment.id, 1).unwrap();

        let incremental = store.community_reputation(author.id, community.id).unwrap();
        let recomputed = store
            .recompute_community_reputation(author.id, community.id)
            .unwrap();

        assert_eq!(incremental.post_karma, recomputed.post_karma);
        assert_eq!(incremental.comment_karma, recomputed.comment_karma);
        assert_eq!(incremental.total_karma, recomputed.total_karma);
        assert_eq!(recomputed.posts_count, 1);
        assert_eq!(recomputed.comments_count, 1);
        assert_eq!(
            recomputed.total_karma,
            recomputed.post_karma + recomputed.comment_karma
        );
    }

    #[test]
    fn test_recompute_community_reputation_repairs_counts() {
        let (mut store, author, _voter, community, _post, _comment) = fixture();

        store
            .conn
            .execute(
                "UPDATE community_reputation SET posts_count = 40, total_karma = -7 WHERE user_id = ?1",
                [author.id.to_string()],
            )
            .unwrap();

        let repaired = store
            .recompute_community_reputation(author.id, community.id)
            .unwrap();
        assert_eq!(repaired.posts_count, 1);
        assert_eq!(repaired.comments_count, 1);
        assert_eq!(repaired.total_karma, 0);
    }

    #[test]
    fn test_recompute_unknown_community_rejected() {
        let (mut store, author, _voter, _community, _post, _comment) = fixture();
        let err = store
            .recompute_community_reputation(author.id, Ulid::new())
            .unwrap_err();
        assert!(matches!(err, crate::core::error::EngineError::CommunityNotFound(_)));
    }
}
