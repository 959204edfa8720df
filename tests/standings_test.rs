mod common;

use actix_web::test as actix_test;
use serde_json::json;
use serial_test::serial;

use intramural_api::database::models::UserRole;

#[test]
#[serial]
fn the_table_reflects_a_played_fixture() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let home_captain = common::seed_user(UserRole::Player).await;
        let away_captain = common::seed_user(UserRole::Player).await;
        let home = common::seed_team(&home_captain, &sport, &season).await;
        let away = common::seed_team(&away_captain, &sport, &season).await;
        let fixture = common::seed_fixture(&home, &away).await;

        let recorded = actix_test::call_service(
            &app,
            common::post(
                &format!("/api/v1/fixtures/{}/result", fixture.id),
                &common::token_for(&home_captain),
                json!({ "homeTeamScore": 3, "awayTeamScore": 1 }),
            ),
        )
        .await;
        assert_eq!(recorded.status(), 200);

        let resp = actix_test::call_service(
            &app,
            common::get(
                &format!("/api/v1/league/standings/{}/{}", season.id, sport.id),
                &common::token_for(&away_captain),
            ),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let table = common::read_data(resp).await;
        let rows = table.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        let winner = &rows[0];
        assert_eq!(winner["teamId"], json!(home.id));
        assert_eq!(winner["played"], json!(1));
        assert_eq!(winner["wins"], json!(1));
        assert_eq!(winner["goalsFor"], json!(3));
        assert_eq!(winner["goalsAgainst"], json!(1));

        let loser = &rows[1];
        assert_eq!(loser["teamId"], json!(away.id));
        assert_eq!(loser["wins"], json!(0));
        assert_eq!(loser["losses"], json!(1));
    });
}

#[test]
#[serial]
fn unplayed_fixtures_do_not_move_the_table() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let home_captain = common::seed_user(UserRole::Player).await;
        let away_captain = common::seed_user(UserRole::Player).await;
        let home = common::seed_team(&home_captain, &sport, &season).await;
        let away = common::seed_team(&away_captain, &sport, &season).await;
        common::seed_fixture(&home, &away).await;

        let resp = actix_test::call_service(
            &app,
            common::get(
                &format!("/api/v1/league/standings/{}/{}", season.id, sport.id),
                &common::token_for(&home_captain),
            ),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let table = common::read_data(resp).await;
        let rows = table.as_array().unwrap();
        assert_eq!(rows.len(), 2, "every team appears even with nothing played");
        for row in rows {
            assert_eq!(row["played"], json!(0));
            assert_eq!(row["wins"], json!(0));
        }
    });
}

#[test]
#[serial]
fn standings_for_an_unknown_scope_are_a_404() {
    common::run(async {
        let app = common::api().await;
        let user = common::seed_user(UserRole::Player).await;

        let resp = actix_test::call_service(
            &app,
            common::get(
                &format!(
                    "/api/v1/league/standings/{}/{}",
                    uuid::Uuid::new_v4(),
                    uuid::Uuid::new_v4()
                ),
                &common::token_for(&user),
            ),
        )
        .await;
        assert_eq!(resp.status(), 404);
    });
}

#[test]
#[serial]
fn a_corrected_result_replaces_the_old_one_in_the_table() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let home_captain = common::seed_user(UserRole::Player).await;
        let away_captain = common::seed_user(UserRole::Player).await;
        let home = common::seed_team(&home_captain, &sport, &season).await;
        let away = common::seed_team(&away_captain, &sport, &season).await;
        let fixture = common::seed_fixture(&home, &away).await;
        let token = common::token_for(&home_captain);
        let result_path = format!("/api/v1/fixtures/{}/result", fixture.id);

        let first = actix_test::call_service(
            &app,
            common::post(&result_path, &token, json!({ "homeTeamScore": 2, "awayTeamScore": 0 })),
        )
        .await;
        assert_eq!(first.status(), 200);

        let corrected = actix_test::call_service(
            &app,
            common::post(&result_path, &token, json!({ "homeTeamScore": 0, "awayTeamScore": 2 })),
        )
        .await;
        assert_eq!(corrected.status(), 200);

        let resp = actix_test::call_service(
            &app,
            common::get(
                &format!("/api/v1/league/standings/{}/{}", season.id, sport.id),
                &token,
            ),
        )
        .await;
        let table = common::read_data(resp).await;
        let rows = table.as_array().unwrap();

        assert_eq!(rows[0]["teamId"], json!(away.id));
        assert_eq!(rows[0]["played"], json!(1), "the correction is one match, not two");
        assert_eq!(rows[0]["wins"], json!(1));
        assert_eq!(rows[1]["teamId"], json!(home.id));
        assert_eq!(rows[1]["losses"], json!(1));
    });
}
