use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Proposed,
    Confirmed,
    Completed,
}

impl FixtureStatus {
    /// Lifecycle transition table. Re-writing the current status is allowed
    /// where the transition is not destructive (repeated confirms); result
    /// submission may jump straight from `proposed` to `completed` and may
    /// re-run on a completed fixture to correct a score.
    pub fn can_transition(self, to: FixtureStatus) -> bool {
        use FixtureStatus::*;
        match (self, to) {
            (Proposed, Proposed) => true,
            (Proposed, Confirmed) => true,
            (Proposed, Completed) => true,
            (Confirmed, Confirmed) => true,
            (Confirmed, Completed) => true,
            (Completed, Completed) => true,
            (Confirmed, Proposed) => false,
            (Completed, Proposed) => false,
            (Completed, Confirmed) => false,
        }
    }
}

impl std::fmt::Display for FixtureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureStatus::Proposed => write!(f, "proposed"),
            FixtureStatus::Confirmed => write!(f, "confirmed"),
            FixtureStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Fixture {
    pub id: Uuid,
    pub season_id: Uuid,
    pub sport_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub fixture_date: Option<DateTime<Utc>>,
    pub status: FixtureStatus,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureInput {
    pub season_id: Uuid,
    pub sport_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub fixture_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInput {
    pub home_team_score: i32,
    pub away_team_score: i32,
}

#[cfg(test)]
mod tests {
    use super::FixtureStatus::*;

    #[test]
    fn no_transition_leaves_completed_except_correction() {
        assert!(Completed.can_transition(Completed));
        assert!(!Completed.can_transition(Proposed));
        assert!(!Completed.can_transition(Confirmed));
    }

    #[test]
    fn result_submission_does_not_require_confirmation() {
        assert!(Proposed.can_transition(Completed));
        assert!(Confirmed.can_transition(Completed));
    }

    #[test]
    fn confirm_is_idempotent_and_never_rolls_back() {
        assert!(Proposed.can_transition(Confirmed));
        assert!(Confirmed.can_transition(Confirmed));
        assert!(!Confirmed.can_transition(Proposed));
    }
}
