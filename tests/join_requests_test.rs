mod common;

use actix_web::test as actix_test;
use serde_json::json;
use serial_test::serial;

use uuid::Uuid;

use intramural_api::database::models::{JoinRequestStatus, UserRole};
use intramural_api::database::repositories::{join_request as request_repo, team as team_repo};
use intramural_api::database::transaction::DatabaseTransaction;

#[test]
#[serial]
fn a_player_can_request_to_join_but_not_twice() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain = common::seed_user(UserRole::Player).await;
        let player = common::seed_user(UserRole::Player).await;
        let team = common::seed_team(&captain, &sport, &season).await;
        let token = common::token_for(&player);
        let path = format!("/api/v1/teams/{}/join-requests", team.id);

        let first = actix_test::call_service(
            &app,
            common::post(&path, &token, json!({ "message": "Pick me" })),
        )
        .await;
        assert_eq!(first.status(), 201);
        let request = common::read_data(first).await;
        assert_eq!(request["status"], json!("pending"));

        let second = actix_test::call_service(
            &app,
            common::post(&path, &token, json!({ "message": "Pick me again" })),
        )
        .await;
        assert_eq!(second.status(), 409);
    });
}

#[test]
#[serial]
fn members_cannot_request_to_join_their_own_team() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain = common::seed_user(UserRole::Player).await;
        let team = common::seed_team(&captain, &sport, &season).await;

        let resp = actix_test::call_service(
            &app,
            common::post(
                &format!("/api/v1/teams/{}/join-requests", team.id),
                &common::token_for(&captain),
                json!({}),
            ),
        )
        .await;
        assert_eq!(resp.status(), 409);
    });
}

#[test]
#[serial]
fn approving_a_request_creates_the_membership_exactly_once() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain = common::seed_user(UserRole::Player).await;
        let player = common::seed_user(UserRole::Player).await;
        let team = common::seed_team(&captain, &sport, &season).await;
        let captain_token = common::token_for(&captain);

        let created = actix_test::call_service(
            &app,
            common::post(
                &format!("/api/v1/teams/{}/join-requests", team.id),
                &common::token_for(&player),
                json!({}),
            ),
        )
        .await;
        assert_eq!(created.status(), 201);
        let request = common::read_data(created).await;
        let request_id = request["id"].as_str().unwrap();

        let listed = actix_test::call_service(
            &app,
            common::get(
                &format!("/api/v1/teams/{}/join-requests", team.id),
                &captain_token,
            ),
        )
        .await;
        assert_eq!(listed.status(), 200);
        let pending = common::read_data(listed).await;
        assert_eq!(pending.as_array().unwrap().len(), 1);

        let approve_path = format!(
            "/api/v1/teams/{}/join-requests/{}/approve",
            team.id, request_id
        );
        let approved = actix_test::call_service(&app, common::post(&approve_path, &captain_token, json!({}))).await;
        assert_eq!(approved.status(), 200);
        assert!(team_repo::is_user_member(team.id, player.id).await.unwrap());

        // resolving twice is a conflict, not a second membership
        let again = actix_test::call_service(&app, common::post(&approve_path, &captain_token, json!({}))).await;
        assert_eq!(again.status(), 409);
    });
}

#[test]
#[serial]
fn approval_rolls_back_when_the_player_joined_elsewhere_meanwhile() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain_a = common::seed_user(UserRole::Player).await;
        let captain_b = common::seed_user(UserRole::Player).await;
        let player = common::seed_user(UserRole::Player).await;
        let team_a = common::seed_team(&captain_a, &sport, &season).await;
        let team_b = common::seed_team(&captain_b, &sport, &season).await;

        let created = actix_test::call_service(
            &app,
            common::post(
                &format!("/api/v1/teams/{}/join-requests", team_a.id),
                &common::token_for(&player),
                json!({}),
            ),
        )
        .await;
        assert_eq!(created.status(), 201);
        let request = common::read_data(created).await;
        let request_id = request["id"].as_str().unwrap().to_string();

        // the player joins team B while the request sits in team A's queue
        common::seed_member(&team_b, &player).await;

        let approved = actix_test::call_service(
            &app,
            common::post(
                &format!("/api/v1/teams/{}/join-requests/{}/approve", team_a.id, request_id),
                &common::token_for(&captain_a),
                json!({}),
            ),
        )
        .await;
        assert_eq!(approved.status(), 409);
        assert!(!team_repo::is_user_member(team_a.id, player.id).await.unwrap());

        // the failed approval must not have consumed the request
        let listed = actix_test::call_service(
            &app,
            common::get(
                &format!("/api/v1/teams/{}/join-requests", team_a.id),
                &common::token_for(&captain_a),
            ),
        )
        .await;
        let pending = common::read_data(listed).await;
        assert_eq!(pending.as_array().unwrap().len(), 1);
    });
}

#[test]
#[serial]
fn a_rejected_request_can_be_reopened() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain = common::seed_user(UserRole::Player).await;
        let player = common::seed_user(UserRole::Player).await;
        let team = common::seed_team(&captain, &sport, &season).await;
        let player_token = common::token_for(&player);
        let request_path = format!("/api/v1/teams/{}/join-requests", team.id);

        let created = actix_test::call_service(
            &app,
            common::post(&request_path, &player_token, json!({})),
        )
        .await;
        let request = common::read_data(created).await;
        let request_id = request["id"].as_str().unwrap().to_string();

        let rejected = actix_test::call_service(
            &app,
            common::post(
                &format!("{request_path}/{request_id}/reject"),
                &common::token_for(&captain),
                json!({}),
            ),
        )
        .await;
        assert_eq!(rejected.status(), 200);

        let reopened = actix_test::call_service(
            &app,
            common::post(&request_path, &player_token, json!({ "message": "Second try" })),
        )
        .await;
        assert_eq!(reopened.status(), 201);
        let request = common::read_data(reopened).await;
        assert_eq!(request["id"], json!(request_id));
        assert_eq!(request["status"], json!("pending"));
    });
}

#[test]
#[serial]
fn a_bare_post_creates_a_message_less_request() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain = common::seed_user(UserRole::Player).await;
        let player = common::seed_user(UserRole::Player).await;
        let team = common::seed_team(&captain, &sport, &season).await;

        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/teams/{}/join-requests", team.id))
            .insert_header((
                "Authorization",
                format!("Bearer {}", common::token_for(&player)),
            ))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let request = common::read_data(resp).await;
        assert_eq!(request["status"], json!("pending"));
        assert_eq!(request["message"], json!(null));
    });
}

#[test]
#[serial]
fn a_resolved_request_refuses_a_second_status_write() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain = common::seed_user(UserRole::Player).await;
        let player = common::seed_user(UserRole::Player).await;
        let team = common::seed_team(&captain, &sport, &season).await;
        let request_path = format!("/api/v1/teams/{}/join-requests", team.id);

        let created = actix_test::call_service(
            &app,
            common::post(&request_path, &common::token_for(&player), json!({})),
        )
        .await;
        let request = common::read_data(created).await;
        let request_id = Uuid::parse_str(request["id"].as_str().unwrap()).unwrap();

        let rejected = actix_test::call_service(
            &app,
            common::post(
                &format!("{request_path}/{request_id}/reject"),
                &common::token_for(&captain),
                json!({}),
            ),
        )
        .await;
        assert_eq!(rejected.status(), 200);

        // write straight through the repository, as a racing approval that
        // read the row while still pending would
        let overwritten = DatabaseTransaction::run(move |tx| {
            Box::pin(async move {
                Ok(request_repo::resolve(tx, request_id, JoinRequestStatus::Approved).await?)
            })
        })
        .await
        .unwrap();
        assert!(overwritten.is_none());

        let row = request_repo::find_by_id(request_id).await.unwrap().unwrap();
        assert_eq!(row.status, JoinRequestStatus::Rejected);
    });
}

#[test]
#[serial]
fn only_the_captain_may_review_requests() {
    common::run(async {
        let app = common::api().await;
        let (sport, season) = common::seed_scope().await;
        let captain = common::seed_user(UserRole::Player).await;
        let outsider = common::seed_user(UserRole::Player).await;
        let team = common::seed_team(&captain, &sport, &season).await;

        let resp = actix_test::call_service(
            &app,
            common::get(
                &format!("/api/v1/teams/{}/join-requests", team.id),
                &common::token_for(&outsider),
            ),
        )
        .await;
        assert_eq!(resp.status(), 403);
    });
}
