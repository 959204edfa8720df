// Not every test binary uses every helper.
#![allow(dead_code)]

use std::env;
use std::future::Future;
use std::sync::OnceLock;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use intramural_api::config::{set_config, Config};
use intramural_api::database::models::{
    Fixture, Season, SeasonInput, Sport, SportInput, Team, TeamRole, User, UserRole,
};
use intramural_api::database::repositories::{
    catalog, fixture as fixture_repo, team as team_repo, user as user_repo,
};
use intramural_api::database::transaction::DatabaseTransaction;
use intramural_api::database::{get_pool, init_database};
use intramural_api::services::auth::generate_token;

static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
static MIGRATED: OnceLock<()> = OnceLock::new();

/// Run a database-backed test. Skips (passing) when TEST_DATABASE_URL is not
/// set, so the suite stays runnable without Postgres. All tests share one
/// runtime because the connection pool is a process-wide global.
pub fn run<F>(fut: F)
where
    F: Future<Output = ()>,
{
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL is not set; skipping database test");
        return;
    };

    let rt = RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build test runtime")
    });

    rt.block_on(async {
        if MIGRATED.get().is_none() {
            set_config(Config {
                database_url: url.clone(),
                jwt_secret: "integration-test-secret-key".to_string(),
                jwt_expiration_days: 1,
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
            });
            init_database(&url).await.expect("failed to init test database");
            let _ = MIGRATED.set(());
        }

        fut.await;
    });
}

/// The API under test, mounted exactly as the server mounts it.
pub async fn api() -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>
{
    test::init_service(
        App::new().service(web::scope("/api/v1").configure(intramural_api::handlers::configure)),
    )
    .await
}

pub fn get(path: &str, token: &str) -> Request {
    test::TestRequest::get()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request()
}

pub fn post(path: &str, token: &str, body: serde_json::Value) -> Request {
    test::TestRequest::post()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request()
}

pub fn delete(path: &str, token: &str) -> Request {
    test::TestRequest::delete()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request()
}

pub fn put(path: &str, token: &str, body: serde_json::Value) -> Request {
    test::TestRequest::put()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request()
}

fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Insert a user directly, bypassing registration. Emails and student ids
/// are uniquified so tests can share one database.
pub async fn seed_user(role: UserRole) -> User {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    let tag = tag();
    let email = format!(
        "{}.{}.{}@example.edu",
        first.to_lowercase(),
        last.to_lowercase(),
        tag
    );
    let student_id = format!("S{tag}");
    let password_hash = bcrypt::hash("password123", 4).expect("hash");

    let user = user_repo::create_user(&email, &password_hash, &first, &last, &student_id)
        .await
        .expect("seed user");

    if role == UserRole::Player {
        return user;
    }

    sqlx::query_as::<_, User>("UPDATE users SET role = $1 WHERE id = $2 RETURNING *")
        .bind(role)
        .bind(user.id)
        .fetch_one(get_pool())
        .await
        .expect("set seed user role")
}

pub fn token_for(user: &User) -> String {
    generate_token(user).expect("token")
}

/// A fresh sport and season pair, so each test gets an isolated competition
/// scope inside the shared database.
pub async fn seed_scope() -> (Sport, Season) {
    let tag = tag();

    let sport = catalog::create_sport(&SportInput {
        name: format!("Futsal {tag}"),
        description: None,
        min_team_size: 1,
        max_team_size: 11,
    })
    .await
    .expect("seed sport");

    let season = catalog::create_season(&SeasonInput {
        name: format!("Season {tag}"),
        start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        end_date: chrono::NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
    })
    .await
    .expect("seed season");

    (sport, season)
}

/// Create a team the same way the handler does: team row, captain promotion
/// and captain membership in one transaction.
pub async fn seed_team(captain: &User, sport: &Sport, season: &Season) -> Team {
    let name = format!("Team {}", tag());
    let captain_id = captain.id;
    let sport_id = sport.id;
    let season_id = season.id;

    DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            let team =
                team_repo::insert_team(tx, &name, sport_id, season_id, captain_id, None).await?;
            user_repo::promote_if_player(tx, captain_id).await?;
            team_repo::insert_membership(tx, team.id, season_id, captain_id, TeamRole::Captain)
                .await?;
            Ok(team)
        })
    })
    .await
    .expect("seed team")
}

pub async fn seed_member(team: &Team, user: &User) {
    let team_id = team.id;
    let season_id = team.season_id;
    let user_id = user.id;

    DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            team_repo::insert_membership(tx, team_id, season_id, user_id, TeamRole::Player)
                .await?;
            Ok(())
        })
    })
    .await
    .expect("seed member");
}

/// Propose a fixture between two teams of the same scope.
pub async fn seed_fixture(home: &Team, away: &Team) -> Fixture {
    fixture_repo::insert(home.season_id, home.sport_id, home.id, away.id, None)
        .await
        .expect("seed fixture")
}

/// Unwrap the response envelope, asserting success, and return its data.
pub async fn read_data<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["success"], true,
        "expected a successful response, got: {body}"
    );
    body["data"].clone()
}
