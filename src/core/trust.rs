//! Trust Scoring
//!
//! Composite 0-100 trust score derived from:
//! - Global karma (post + comment)
//! - Account age
//! - Report history (reports received vs accepted against the user)
//! - Community participation (breadth and community karma)
//!
//! The calculator is a pure function of its inputs: two calls with identical
//! inputs produce identical output. Persistence lives in `trust_store`.

use serde::Serialize;

/// Trust scoring configuration
#[derive(Debug, Clone)]
pub struct TrustParams {
    /// Karma at which the karma component saturates
    pub karma_cap: f64,
    /// Maximum points from karma
    pub karma_points: f64,

    /// Account age (days) at which the age component saturates
    pub age_cap_days: f64,
    /// Maximum points from account age
    pub age_points: f64,

    /// Maximum points from report history
    pub report_points: f64,

    /// Community count at which the diversity half saturates
    pub community_cap: f64,
    /// Maximum points from community diversity
    pub diversity_points: f64,
    /// Community karma at which the karma half saturates
    pub community_karma_cap: f64,
    /// Maximum points from community karma
    pub community_karma_points: f64,
}

impl Default for TrustParams {
    fn default() -> Self {
        Self {
            karma_cap: 1000.0,
            karma_points: 25.0,

            age_cap_days: 180.0,
            age_points: 15.0,

            report_points: 30.0,

            community_cap: 5.0,
            diversity_points: 15.0,
            community_karma_cap: 500.0,
            community_karma_points: 15.0,
        }
    }
}

/// Discrete trust level, derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Newcomer,
    Member,
    Contributor,
    Trusted,
    CommunityLeader,
}

impl TrustLevel {
    /// Level for a score. Boundaries resolve upward: 20 is Member, 19 is not.
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            TrustLevel::CommunityLeader
        } else if score >= 60 {
            TrustLevel::Trusted
        } else if score >= 40 {
            TrustLevel::Contributor
        } else if score >= 20 {
            TrustLevel::Member
        } else {
            TrustLevel::Newcomer
        }
    }

    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            0 => Some(TrustLevel::Newcomer),
            1 => Some(TrustLevel::Member),
            2 => Some(TrustLevel::Contributor),
            3 => Some(TrustLevel::Trusted),
            4 => Some(TrustLevel::CommunityLeader),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            TrustLevel::Newcomer => 0,
            TrustLevel::Member => 1,
            TrustLevel::Contributor => 2,
            TrustLevel::Trusted => 3,
            TrustLevel::CommunityLeader => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrustLevel::Newcomer => "Newcomer",
            TrustLevel::Member => "Member",
            TrustLevel::Contributor => "Contributor",
            TrustLevel::Trusted => "Trusted",
            TrustLevel::CommunityLeader => "Community Leader",
        }
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the score depends on, fetched by the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustInputs {
    pub total_karma: i64,
    pub post_karma: i64,
    pub comment_karma: i64,
    pub account_age_days: i64,
    pub reports_received: i64,
    pub reports_accepted: i64,
    pub communities_participated_in: i64,
    pub total_community_karma: i64,
}

/// Component scores plus the composite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustBreakdown {
    /// 0-25 from global karma
    pub karma: f64,
    /// 0-15 from account age
    pub account_age: f64,
    /// 0-30 from report history
    pub reports: f64,
    /// 0-30 from community participation
    pub participation: f64,
    /// Rounded, clamped composite
    pub trust_score: u32,
    pub level: TrustLevel,
}

/// Trust calculator
pub struct TrustCalculator {
    params: TrustParams,
}

impl TrustCalculator {
    pub fn new() -> Self {
        Self {
            params: TrustParams::default(),
        }
    }

    pub fn with_params(params: TrustParams) -> Self {
        Self { params }
    }

    /// Karma component: saturates at `karma_cap`, floors at zero
    pub fn karma_component(&self, total_karma: i64) -> f64 {
        let ratio = (total_karma as f64 / self.params.karma_cap).clamp(0.0, 1.0);
        ratio * self.params.karma_points
    }

    /// Account age component: saturates at `age_cap_days`
    pub fn account_age_component(&self, account_age_days: i64) -> f64 {
        let ratio = (account_age_days as f64 / self.params.age_cap_days).clamp(0.0, 1.0);
        ratio * self.params.age_points
    }

    /// Report component: full credit with no reports, otherwise scaled by
    /// the fraction of received reports that were NOT accepted
    pub fn report_component(&self, reports_received: i64, reports_accepted: i64) -> f64 {
        if reports_received <= 0 {
            return self.params.report_points;
        }
        let acceptance = reports_accepted as f64 / reports_received as f64;
        (self.params.report_points * (1.0 - acceptance)).max(0.0)
    }

    /// Participation component: community diversity plus community karma
    pub fn participation_component(&self, communities: i64, community_karma: i64) -> f64 {
        let diversity = (communities as f64 / self.params.community_cap).clamp(0.0, 1.0)
            * self.params.diversity_points;
        let karma = (community_karma as f64 / self.params.community_karma_cap).clamp(0.0, 1.0)
            * self.params.community_karma_points;
        diversity + karma
    }

    /// Compute the full breakdown. Deterministic given `inputs`.
    pub fn compute(&self, inputs: &TrustInputs) -> TrustBreakdown {
        let karma = self.karma_component(inputs.total_karma);
        let account_age = self.account_age_component(inputs.account_age_days);
        let reports = self.report_component(inputs.reports_received, inputs.reports_accepted);
        let participation = self.participation_component(
            inputs.communities_participated_in,
            inputs.total_community_karma,
        );

        let total = (karma + account_age + reports + participation).clamp(0.0, 100.0);
        let trust_score = total.round() as u32;

        TrustBreakdown {
            karma,
            account_age,
            reports,
            participation,
            trust_score,
            level: TrustLevel::from_score(trust_score),
        }
    }
}

impl Default for TrustCalculator {
    fn default() -> Self {
        Self::new()
    }
}
