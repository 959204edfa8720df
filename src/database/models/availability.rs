use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One player's answer for one fixture, kept unique per (fixture, player).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Availability {
    pub id: Uuid,
    pub fixture_id: Uuid,
    pub user_id: Uuid,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An answer joined to the player's display identity, as shown to a captain
/// picking a teamsheet.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FixtureAvailability {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInput {
    pub is_available: bool,
}
