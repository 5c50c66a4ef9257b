//! End-to-end tests against a live PostgreSQL server.
//!
//! Connection settings come from the same `DB_*` variables the service reads.
//! Each test bootstraps its own freshly created `feedback_test_*` database and
//! drops it in [`TestApp::teardown`].
//!
//! ```sh
//! DB_PASSWORD=... cargo test -p feedback-server -- --ignored
//! ```

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use feedback_server::{bootstrap::bootstrap, config::AppConfig, router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use xlib::client::{DatabaseStatus, PostgresClient, PostgresClientConfig};

struct TestApp {
    router: Router,
    pg_client: Arc<PostgresClient>,
    db_config: PostgresClientConfig,
}

impl TestApp {
    async fn spawn() -> Self {
        let mut config = AppConfig::load().unwrap();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        config.db.name = format!("feedback_test_{}_{nanos}", std::process::id());
        let db_config = config.db.to_client_config();

        let pg_client = bootstrap(&db_config).await.unwrap();
        let router = router(AppState {
            pg_client: pg_client.clone(),
        });

        Self {
            router,
            pg_client,
            db_config,
        }
    }

    async fn post_feedback(&self, body: &Value) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get_feedback(&self) -> Response {
        let request = Request::builder()
            .uri("/api/feedback")
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Closes the pool and drops the test database.
    async fn teardown(self) -> PostgresClientConfig {
        let Self {
            router,
            pg_client,
            db_config,
        } = self;
        drop(router);
        pg_client.close().await;
        PostgresClient::drop_database(&db_config).await.unwrap();
        db_config
    }
}

fn submission(name: &str, rating: Value) -> Value {
    json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "feedbackType": "general",
        "rating": rating,
        "comments": format!("Feedback from {name}")
    })
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_submit_returns_created_row() {
    let app = TestApp::spawn().await;

    let response = app.post_feedback(&submission("Ada", json!(4))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Feedback submitted successfully");
    let row = &body["feedback"];
    assert!(row["id"].as_i64().is_some());
    assert!(row["created_at"].as_str().is_some());
    assert_eq!(row["name"], "Ada");
    assert_eq!(row["email"], "ada@example.com");
    assert_eq!(row["feedback_type"], "general");
    assert_eq!(row["rating"], 4);
    assert_eq!(row["comments"], "Feedback from Ada");

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_boundary_ratings_are_accepted() {
    let app = TestApp::spawn().await;

    for rating in [1, 5] {
        let response = app.post_feedback(&submission("Edge", json!(rating))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["feedback"]["rating"], rating);
    }

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_numeric_string_rating_is_cast_by_storage() {
    let app = TestApp::spawn().await;

    let response = app.post_feedback(&submission("Ada", json!("5"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["feedback"]["rating"], 5);

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_unusable_ratings_fail_in_storage() {
    let app = TestApp::spawn().await;

    for rating in [json!(0), json!(6), json!("abc"), json!(4.5)] {
        let response = app.post_feedback(&submission("Edge", rating)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Internal server error" })
        );
    }

    assert_eq!(body_json(app.get_feedback().await).await, json!([]));

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_missing_field_persists_nothing() {
    let app = TestApp::spawn().await;

    let mut body = submission("Ada", json!(3));
    body.as_object_mut().unwrap().remove("comments");
    let response = app.post_feedback(&body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "All fields are required" })
    );

    assert_eq!(body_json(app.get_feedback().await).await, json!([]));

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_empty_table_lists_as_empty_array() {
    let app = TestApp::spawn().await;

    let response = app.get_feedback().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_list_is_newest_first() {
    let app = TestApp::spawn().await;

    let first = body_json(app.post_feedback(&submission("First", json!(2))).await).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = body_json(app.post_feedback(&submission("Second", json!(3))).await).await;

    let rows = body_json(app.get_feedback().await).await;
    let ids: Vec<&Value> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| &row["id"])
        .collect();
    assert_eq!(
        ids,
        vec![&second["feedback"]["id"], &first["feedback"]["id"]]
    );

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_repeated_list_is_stable() {
    let app = TestApp::spawn().await;

    app.post_feedback(&submission("Ada", json!(5))).await;
    app.post_feedback(&submission("Grace", json!(4))).await;

    let first = body_json(app.get_feedback().await).await;
    let second = body_json(app.get_feedback().await).await;
    assert_eq!(first, second);
    assert_eq!(first.as_array().unwrap().len(), 2);

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_bootstrap_is_idempotent() {
    let app = TestApp::spawn().await;

    let again = bootstrap(&app.db_config).await.unwrap();
    again.close().await;

    app.teardown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_teardown_drops_the_database() {
    let app = TestApp::spawn().await;
    let db_config = app.teardown().await;

    // The name is free again, so creating it succeeds rather than reporting a duplicate.
    assert_eq!(
        PostgresClient::ensure_database(&db_config).await.unwrap(),
        DatabaseStatus::Created
    );
    PostgresClient::drop_database(&db_config).await.unwrap();
}
