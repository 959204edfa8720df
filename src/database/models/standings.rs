use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::fixture::{Fixture, FixtureStatus};

/// Team identity within a (season, sport) scope, the input to standings
/// computation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamRecord {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team_id: Uuid,
    pub team_name: String,
    pub played: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub goals_for: i32,
    pub goals_against: i32,
}

impl StandingRow {
    fn new(team: &TeamRecord) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for - self.goals_against
    }

    fn record(&mut self, scored: i32, conceded: i32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        if scored > conceded {
            self.wins += 1;
        } else if scored < conceded {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }
}

/// Fold completed fixtures into per-team counters. Teams with no completed
/// fixtures keep all-zero counters; fixtures that are not completed, lack a
/// score, or reference teams outside the scope are ignored. The output
/// preserves the input team order.
pub fn accumulate(teams: &[TeamRecord], fixtures: &[Fixture]) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = teams.iter().map(StandingRow::new).collect();

    for fixture in fixtures {
        if fixture.status != FixtureStatus::Completed {
            continue;
        }
        let (Some(home_score), Some(away_score)) =
            (fixture.home_team_score, fixture.away_team_score)
        else {
            continue;
        };

        for row in rows.iter_mut() {
            if row.team_id == fixture.home_team_id {
                row.record(home_score, away_score);
            } else if row.team_id == fixture.away_team_id {
                row.record(away_score, home_score);
            }
        }
    }

    rows
}

/// Rank by wins descending, then goal difference descending. The sort is
/// stable, so ties beyond goal difference keep the incoming (deterministic)
/// order.
pub fn rank(rows: &mut [StandingRow]) {
    rows.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
    });
}
