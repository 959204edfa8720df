use actix_web::web;

pub mod admin;
pub mod auth;
pub mod availability;
pub mod fixtures;
pub mod join_requests;
pub mod league;
pub mod shared;
pub mod teams;
pub mod teamsheets;

/// Route table for the versioned API. Mounted under /api/v1 by the server
/// and reused as-is by the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me)),
    )
    .service(
        web::scope("/teams")
            .route("", web::post().to(teams::create_team))
            .route("/mine", web::get().to(teams::get_my_teams))
            .route("/{id}", web::get().to(teams::get_team))
            .route("/{id}", web::put().to(teams::update_team))
            .route("/{id}", web::delete().to(admin::delete_team))
            .route("/{id}/members", web::post().to(teams::add_member))
            .route(
                "/{id}/members/{user_id}",
                web::delete().to(teams::remove_member),
            )
            .route(
                "/{id}/opponents",
                web::get().to(fixtures::get_potential_opponents),
            )
            .route(
                "/{id}/join-requests",
                web::post().to(join_requests::request_to_join),
            )
            .route(
                "/{id}/join-requests",
                web::get().to(join_requests::list_pending),
            )
            .route(
                "/{id}/join-requests/{request_id}/approve",
                web::post().to(join_requests::approve),
            )
            .route(
                "/{id}/join-requests/{request_id}/reject",
                web::post().to(join_requests::reject),
            ),
    )
    .service(
        web::scope("/fixtures")
            .route("", web::post().to(fixtures::create_fixture))
            .route("", web::get().to(fixtures::get_all_fixtures))
            .route("/{id}", web::get().to(fixtures::get_fixture))
            .route("/{id}/confirm", web::post().to(fixtures::confirm_fixture))
            .route("/{id}/result", web::post().to(fixtures::submit_result))
            .route(
                "/team/{team_id}",
                web::get().to(fixtures::get_fixtures_by_team),
            )
            .route(
                "/{id}/availability",
                web::post().to(availability::mark_availability),
            )
            .route(
                "/{id}/availability",
                web::get().to(availability::get_fixture_availability),
            )
            .route(
                "/{id}/availability",
                web::put().to(availability::update_availability),
            )
            .route(
                "/{id}/teamsheets",
                web::post().to(teamsheets::submit_teamsheet),
            )
            .route(
                "/{id}/teamsheets",
                web::get().to(teamsheets::get_fixture_teamsheets),
            )
            .route(
                "/{id}/teamsheets/{team_id}",
                web::get().to(teamsheets::get_teamsheet),
            ),
    )
    .service(web::scope("/league").route(
        "/standings/{season_id}/{sport_id}",
        web::get().to(league::get_standings),
    ))
    .service(
        web::scope("/admin")
            .route("/sports", web::post().to(admin::create_sport))
            .route("/sports", web::get().to(admin::get_sports))
            .route("/seasons", web::post().to(admin::create_season))
            .route("/seasons", web::get().to(admin::get_seasons))
            .route(
                "/teams/{id}/captain",
                web::put().to(admin::change_team_captain),
            ),
    );
}
