//! Trust level persistence and read paths
//!
//! Wraps the pure calculator in `trust`: gathers inputs (karma, account age,
//! report aggregates, community participation), persists the resulting
//! snapshot, and serves the cheap read views (leaderboard, by-level pages,
//! aggregate statistics) without recomputing per request.
//!
//! The only read that may compute is `get_or_compute_trust_level`, for a
//! user with no snapshot yet.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::warn;
use ulid::Ulid;

use super::error::{EngineError, EngineResult};
use super::model::{BatchOutcome, LevelStats, TrustLevelRecord};
use super::store::{parse_timestamp, parse_ulid, Store};
use super::trust::{TrustCalculator, TrustInputs, TrustLevel};

impl Store {
    /// Gather the calculator inputs for a user as of `now`
    pub(crate) fn trust_inputs_at(
        &self,
        user_id: Ulid,
        now: DateTime<Utc>,
    ) -> EngineResult<TrustInputs> {
        let user = self.user(user_id)?.ok_or(EngineError::UserNotFound(user_id))?;
        let karma = self.user_karma(user_id)?;
        let reports = self.report_stats(user_id)?;
        let (communities, community_karma) = self.participation(user_id)?;

        let account_age_days = (now - user.created_at).num_days().max(0);

        Ok(TrustInputs {
            total_karma: karma.total_karma,
            post_karma: karma.post_karma,
            comment_karma: karma.comment_karma,
            account_age_days,
            reports_received: reports.received,
            reports_accepted: reports.accepted,
            communities_participated_in: communities,
            total_community_karma: community_karma,
        })
    }

    /// Recompute and persist a user's trust snapshot
    pub fn recompute_trust_level(&mut self, user_id: Ulid) -> EngineResult<TrustLevelRecord> {
        self.recompute_trust_level_at(user_id, Utc::now())
    }

    pub(crate) fn recompute_trust_level_at(
        &mut self,
        user_id: Ulid,
        now: DateTime<Utc>,
    ) -> EngineResult<TrustLevelRecord> {
        let inputs = self.trust_inputs_at(user_id, now)?;
        let breakdown = TrustCalculator::new().compute(&inputs);

        let record = TrustLevelRecord {
            user_id,
            level: breakdown.level.number(),
            level_name: breakdown.level.name().to_string(),
            trust_score: breakdown.trust_score,
            karma_component: breakdown.karma.round() as i64,
            account_age_component: breakdown.account_age.round() as i64,
            report_component: breakdown.reports.round() as i64,
            participation_component: breakdown.participation.round() as i64,
            total_karma: inputs.total_karma,
            post_karma: inputs.post_karma,
            comment_karma: inputs.comment_karma,
            account_age_days: inputs.account_age_days,
            reports_received: inputs.reports_received,
            reports_accepted: inputs.reports_accepted,
            communities_participated_in: inputs.communities_participated_in,
            community_karma: inputs.total_community_karma,
            last_calculated_at: now,
        };

        self.conn.execute(
            r#"
            INSERT INTO trust_levels (
                user_id, level, level_name, trust_score,
                karma_component, account_age_component, report_component, participation_component,
                total_karma, post_karma, comment_karma, account_age_days,
                reports_received, reports_accepted, communities_participated_in, community_karma,
                last_calculated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            ON CONFLICT(user_id) DO UPDATE SET
                level = excluded.level,
                level_name = excluded.level_name,
                trust_score = excluded.trust_score,
                karma_component = excluded.karma_component,
                account_age_component = excluded.account_age_component,
                report_component = excluded.report_component,
                participation_component = excluded.participation_component,
                total_karma = excluded.total_karma,
                post_karma = excluded.post_karma,
                comment_karma = excluded.comment_karma,
                account_age_days = excluded.account_age_days,
                reports_received = excluded.reports_received,
                reports_accepted = excluded.reports_accepted,
                communities_participated_in = excluded.communities_participated_in,
                community_karma = excluded.community_karma,
                last_calculated_at = excluded.last_calculated_at
            "#,
            params![
                user_id.to_string(),
                record.level as i64,
                record.level_name,
                record.trust_score as i64,
                record.karma_component,
                record.account_age_component,
                record.report_component,
                record.participation_component,
                record.total_karma,
                record.post_karma,
                record.comment_karma,
                record.account_age_days,
                record.reports_received,
                record.reports_accepted,
                record.communities_participated_in,
                record.community_karma,
                record.last_calculated_at.to_rfc3339(),
            ],
        )?;

        Ok(record)
    }

    /// Persisted snapshot for a user, if one exists
    pub fn trust_level(&self, user_id: Ulid) -> EngineResult<Option<TrustLevelRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{TRUST_SELECT} WHERE user_id = ?1"),
                [user_id.to_string()],
                row_to_trust,
            )
            .optional()?;
        Ok(record)
    }

    /// Read the snapshot, computing it first for a user with no row yet
    pub fn get_or_compute_trust_level(&mut self, user_id: Ulid) -> EngineResult<TrustLevelRecord> {
        if let Some(record) = self.trust_level(user_id)? {
            return Ok(record);
        }
        self.recompute_trust_level(user_id)
    }

    /// Recompute every user's trust snapshot. Per-user failures are logged
    /// and counted; the batch always runs to completion.
    pub fn recompute_all_trust_levels(&mut self) -> EngineResult<BatchOutcome> {
        let users = self.all_user_ids()?;
        let mut outcome = BatchOutcome::default();

        for user_id in users {
            outcome.processed += 1;
            match self.recompute_trust_level(user_id) {
                Ok(_) => outcome.successful += 1,
                Err(err) => {
                    warn!(user = %user_id, error = %err, "trust recompute failed, continuing");
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Top users by trust score, ties broken by record order
    pub fn trust_leaderboard(&self, limit: i64) -> EngineResult<Vec<TrustLevelRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TRUST_SELECT} ORDER BY trust_score DESC, rowid ASC LIMIT ?1"))?;
        let records = stmt
            .query_map([limit], row_to_trust)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// One page of users at a discrete trust level, plus the total count at
    /// that level for pagination
    pub fn users_by_trust_level(
        &self,
        level: TrustLevel,
        limit: i64,
        skip: i64,
    ) -> EngineResult<(Vec<TrustLevelRecord>, i64)> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRUST_SELECT} WHERE level = ?1 ORDER BY trust_score DESC, rowid ASC LIMIT ?2 OFFSET ?3"
        ))?;
        let records = stmt
            .query_map(params![level.number() as i64, limit, skip], row_to_trust)?
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM trust_levels WHERE level = ?1",
            [level.number() as i64],
            |row| row.get(0),
        )?;

        Ok((records, total))
    }

    /// Count/avg/min/max trust score per level, plus the overall row count
    pub fn trust_statistics(&self) -> EngineResult<(Vec<LevelStats>, i64)> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT level, COUNT(*), AVG(trust_score), MIN(trust_score), MAX(trust_score)
            FROM trust_levels
            GROUP BY level
            ORDER BY level
            "#,
        )?;
        let stats = stmt
            .query_map([], |row| {
                let level: i64 = row.get(0)?;
                Ok(LevelStats {
                    level: level as u8,
                    level_name: TrustLevel::from_number(level as u8)
                        .map(|l| l.name().to_string())
                        .unwrap_or_default(),
                    count: row.get(1)?,
                    avg_trust_score: row.get(2)?,
                    min_trust_score: row.get(3)?,
                    max_trust_score: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM trust_levels", [], |row| row.get(0))?;

        Ok((stats, total))
    }
}

const TRUST_SELECT: &str = r#"
    SELECT user_id, level, level_name, trust_score,
           karma_component, account_age_component, report_component, participation_component,
           total_karma, post_karma, comment_karma, account_age_days,
           reports_received, reports_accepted, communities_participated_in, community_karma,
           last_calculated_at
    FROM trust_levels
"#;

fn row_to_trust(row: &rusqlite::Row) -> rusqlite::Result<TrustLevelRecord> {
    Ok(TrustLevelRecord {
        user_id: parse_ulid(&row.get::<_, String>(0)?),
        level: row.get::<_, i64>(1)? as u8,
        level_name: row.get(2)?,
        trust_score: row.get::<_, i64>(3)? as u32,
        karma_component: row.get(4)?,
        account_age_component: row.get(5)?,
        report_component: row.get(6)?,
        participation_component: row.get(7)?,
        total_karma: row.get(8)?,
        post_karma: row.get(9)?,
        comment_karma: row.get(10)?,
        account_age_days: row.get(11)?,
        reports_received: row.get(12)?,
        reports_accepted: row.get(13)?,
        communities_participated_in: row.get(14)?,
        community_karma: row.get(15)?,
        last_calculated_at: parse_timestamp(&row.get::<_, String>(16)?),
    })
}
