mod common;

use axum::http::StatusCode;
use chrono::{Days, Duration, Utc};
use serde_json::{json, Value};

use common::app::{spawn_test_server, test_today, TestApp};
use common::fixtures::{seed_due, seed_new, seed_new_added};
use common::http::{assert_json_error, assert_ok, get, post};
use srs_backend::session::SessionState;
use srs_backend::srs::Direction;

fn yesterday() -> chrono::NaiveDate {
    test_today().checked_sub_days(Days::new(1)).unwrap()
}

fn seed_mixed(app: &TestApp) {
    seed_due(app.store(), "旧", "zh", Direction::Forward, yesterday());
    seed_new(app.store(), "新一", "zh");
    seed_new(app.store(), "新二", "zh");
    seed_new(app.store(), "다른", "ko");
}

fn queue(session: &Value) -> Vec<(String, String)> {
    let keys = session["cardKeys"].as_array().expect("cardKeys");
    let dirs = session["cardDirections"].as_array().expect("cardDirections");
    keys.iter()
        .zip(dirs)
        .map(|(k, d)| (k.as_str().unwrap().to_string(), d.as_str().unwrap().to_string()))
        .collect()
}

async fn start(app: &TestApp, body: Value) -> (StatusCode, Value) {
    post(&app.app, "/api/sessions/today", body).await
}

#[tokio::test]
async fn it_builds_due_first_then_alternating_new() {
    let app = spawn_test_server().await;
    seed_mixed(&app);

    let (status, body) = start(&app, json!({"langId": "zh"})).await;
    assert_ok(status, &body);
    assert_eq!(body["data"]["resumed"], false);

    let session = &body["data"]["session"];
    assert_eq!(session["date"], "2024-07-04");
    assert_eq!(session["index"], 0);
    assert_eq!(session["newCardsUsed"], 5);
    let expected: Vec<(String, String)> = [
        ("旧", "forward"),
        ("新一", "forward"),
        ("旧", "reverse"),
        ("新二", "forward"),
        ("新一", "reverse"),
        ("新二", "reverse"),
    ]
    .iter()
    .map(|(k, d)| (k.to_string(), d.to_string()))
    .collect();
    assert_eq!(queue(session), expected);

    let stored = app
        .store()
        .get_daily_session("zh", test_today())
        .unwrap()
        .expect("session persisted");
    assert_eq!(stored.len(), 6);
}

#[tokio::test]
async fn it_introduces_new_words_oldest_first() {
    let app = spawn_test_server().await;
    let now = Utc::now();
    seed_new_added(app.store(), "apple", "en", now);
    seed_new_added(app.store(), "zebra", "en", now - Duration::days(10));

    let (status, body) = start(&app, json!({"langId": "en", "newCardBudget": 1})).await;
    assert_ok(status, &body);
    assert_eq!(
        queue(&body["data"]["session"]),
        vec![("zebra".to_string(), "forward".to_string())]
    );
}

#[tokio::test]
async fn it_resumes_existing_session_unchanged() {
    let app = spawn_test_server().await;
    seed_mixed(&app);

    let (_, first) = start(&app, json!({"langId": "zh"})).await;
    // 再次请求时即便参数不同也应返回同一个会话
    seed_new(app.store(), "新三", "zh");
    let (status, second) = start(&app, json!({"langId": "zh", "newCardBudget": 0})).await;
    assert_ok(status, &second);
    assert_eq!(second["data"]["resumed"], true);
    assert_eq!(second["data"]["session"], first["data"]["session"]);
}

#[tokio::test]
async fn it_stale_session_is_rebuilt() {
    let app = spawn_test_server().await;
    seed_mixed(&app);
    app.store()
        .save_daily_session(&SessionState::empty(yesterday(), "zh"))
        .unwrap();

    let (status, body) = start(&app, json!({"langId": "zh"})).await;
    assert_ok(status, &body);
    assert_eq!(body["data"]["resumed"], false);
    assert_eq!(body["data"]["session"]["date"], "2024-07-04");
}

#[tokio::test]
async fn it_budget_and_new_only_shape_the_queue() {
    let app = spawn_test_server().await;
    seed_mixed(&app);
    let (_, body) = start(&app, json!({"langId": "zh", "newCardBudget": -3})).await;
    assert_eq!(queue(&body["data"]["session"]), vec![("旧".to_string(), "forward".to_string())]);
    assert_eq!(body["data"]["session"]["newCardsUsed"], 0);

    let app = spawn_test_server().await;
    seed_mixed(&app);
    let (_, body) = start(&app, json!({"langId": "zh", "newOnly": true, "newCardBudget": 2})).await;
    assert_eq!(
        queue(&body["data"]["session"]),
        vec![
            ("新一".to_string(), "forward".to_string()),
            ("旧".to_string(), "reverse".to_string()),
        ]
    );
}

#[tokio::test]
async fn it_get_today_is_404_before_start() {
    let app = spawn_test_server().await;
    let (status, body) = get(&app.app, "/api/sessions/today/zh").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "SESSION_NOT_FOUND");

    let (status, body) = post(&app.app, "/api/sessions/today/zh/review", json!({"judgment": "got"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn it_review_walks_the_session_to_completion() {
    let app = spawn_test_server().await;
    seed_due(app.store(), "旧", "zh", Direction::Forward, yesterday());
    start(&app, json!({"langId": "zh", "newCardBudget": 1})).await;

    let (status, body) = get(&app.app, "/api/sessions/today/zh/current").await;
    assert_ok(status, &body);
    assert_eq!(body["data"]["card"]["key"], "旧");
    assert_eq!(body["data"]["card"]["direction"], "forward");
    assert_eq!(body["data"]["position"], 0);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["record"]["forward"]["reviewCount"], 2);

    let (status, body) = post(&app.app, "/api/sessions/today/zh/review", json!({"judgment": "got"})).await;
    assert_ok(status, &body);
    assert_eq!(body["data"]["applied"], true);
    assert_eq!(body["data"]["record"]["forward"]["interval"], 8);
    assert_eq!(body["data"]["record"]["forward"]["reviewCount"], 3);
    assert_eq!(body["data"]["session"]["index"], 1);
    assert_eq!(body["data"]["session"]["results"]["got"], 1);

    let (_, body) = post(&app.app, "/api/sessions/today/zh/review", json!({"judgment": "missed"})).await;
    assert_eq!(body["data"]["card"]["direction"], "reverse");
    assert_eq!(body["data"]["record"]["reverse"]["lapses"], 1);
    assert_eq!(body["data"]["record"]["reverse"]["interval"], 0);

    let (status, body) = get(&app.app, "/api/sessions/today/zh/current").await;
    assert_ok(status, &body);
    assert!(body["data"].is_null());

    let (status, body) = get(&app.app, "/api/sessions/today/zh").await;
    assert_ok(status, &body);
    assert_eq!(body["data"]["complete"], true);
    assert_eq!(body["data"]["remaining"], 0);

    let (status, body) = post(&app.app, "/api/sessions/today/zh/review", json!({"judgment": "got"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "SESSION_COMPLETE");
}

#[tokio::test]
async fn it_unrecognized_judgment_is_a_no_op() {
    let app = spawn_test_server().await;
    seed_new(app.store(), "新一", "zh");
    start(&app, json!({"langId": "zh"})).await;

    let (status, body) = post(&app.app, "/api/sessions/today/zh/review", json!({"judgment": "skipped"})).await;
    assert_ok(status, &body);
    assert_eq!(body["data"]["applied"], false);
    assert_eq!(body["data"]["session"]["index"], 0);

    let record = app.store().get_vocabulary("新一").unwrap().unwrap();
    assert_eq!(record.forward.review_count, 0);

    let (status, body) = post(&app.app, "/api/sessions/today/zh/review", json!({"judgment": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_REQUEST_BODY");
}

#[tokio::test]
async fn it_rejects_invalid_lang_id() {
    let app = spawn_test_server().await;
    let (status, body) = start(&app, json!({"langId": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_LANG_ID");
}
