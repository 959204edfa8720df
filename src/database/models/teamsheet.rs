use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::fixture::Fixture;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Teamsheet {
    pub id: Uuid,
    pub fixture_id: Uuid,
    pub team_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One selected player with display identity, as rendered on a matchday
/// sheet.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamsheetPlayer {
    pub player_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub is_starter: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsheetView {
    #[serde(flatten)]
    pub teamsheet: Teamsheet,
    pub players: Vec<TeamsheetPlayer>,
}

/// A fixture with both sides' sheets; either side may not have submitted
/// yet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTeamsheets {
    pub fixture: Fixture,
    pub home: Option<TeamsheetView>,
    pub away: Option<TeamsheetView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsheetInput {
    pub team_id: Uuid,
    pub players: Vec<TeamsheetEntryInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsheetEntryInput {
    pub player_id: Uuid,
    pub position: Option<String>,
    #[serde(default = "default_starter")]
    pub is_starter: bool,
}

fn default_starter() -> bool {
    true
}
