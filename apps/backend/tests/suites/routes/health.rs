use actix_web::test;
use bingo_backend::config::game::GameSettings;
use bingo_backend::state::app_state::AppState;

use crate::common::json_body;
use crate::support::create_test_app;
use crate::support::factory::test_state;

#[actix_web::test]
async fn health_reports_database_and_migrations() {
    let (state, _clock) = test_state().await;
    let app = create_test_app(state).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());
    let body = json_body(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body.get("db_error").is_none());
    assert!(body["migrations"].as_str().is_some_and(|m| m.starts_with('m')));
    assert_eq!(body["time"], "2026-03-01T19:00:00Z");
}

#[actix_web::test]
async fn health_without_database_still_answers() {
    let app = create_test_app(AppState::without_db(GameSettings::default())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());
    let body = json_body(resp).await;
    assert_eq!(body["db"], "error");
    assert_eq!(body["migrations"], "unknown");
}
