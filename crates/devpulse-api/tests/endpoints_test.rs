/// Integration tests for the HTTP endpoints with a mocked upstream API
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
};
use devpulse_api::{
    AppState, CachePolicy, WebhookSecret, clear_activity, get_activity, get_analytics,
    handle_webhook, health,
};
use devpulse_cache::TtlCache;
use devpulse_github::GithubClient;
use hmac::{Hmac, Mac};
use octocrab::Octocrab;
use serde_json::{Value, json};
use sha2::Sha256;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type HmacSha256 = Hmac<Sha256>;

const SECRET: &str = "test-secret";

fn test_state(server: &MockServer) -> AppState {
    // Initialize rustls crypto provider for the octocrab client
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let octocrab = Octocrab::builder()
        .base_uri(server.uri())
        .expect("valid mock uri")
        .build()
        .expect("octocrab builds");
    let github = GithubClient::from_octocrab(octocrab, "octo".to_string());

    AppState::new(
        github,
        TtlCache::new(),
        WebhookSecret::new(SECRET.to_string()),
        CachePolicy::default(),
    )
}

fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analytics", get(get_analytics))
        .route("/api/activity", get(get_activity))
        .route("/api/activity/clear", post(clear_activity))
        .route("/api/webhook", post(handle_webhook))
        .with_state(state)
}

fn compute_signature(body: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn repo_json(name: &str, language: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("octo/{name}"),
        "language": language,
        "updated_at": "2026-03-10T09:00:00Z"
    })
}

fn commit_json(sha: &str, date: &str) -> Value {
    json!({
        "sha": sha,
        "commit": {
            "author": {"name": "octo", "email": "octo@example.com", "date": date},
            "message": "update"
        }
    })
}

async fn mount_rest_fixtures(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([repo_json("alpha", "Rust")])),
        )
        .mount(server)
        .await;

    let now = chrono::Utc::now();
    let commits: Vec<Value> = (0..3)
        .map(|i| {
            let ts = now - chrono::Duration::days(i);
            commit_json(
                &format!("sha{i}"),
                &ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            )
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/octo/alpha/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(commits))
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_reports_version() {
    let server = MockServer::start().await;
    let app = create_app(test_state(&server));

    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn analytics_falls_back_when_calendar_fails() {
    let server = MockServer::start().await;
    mount_rest_fixtures(&server).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let state = test_state(&server);
    let app = create_app(state.clone());

    // calendar outage still yields a complete payload
    let (status, body) = get_json(app, "/api/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    assert_eq!(body["totalCommits"], 3);
    assert_eq!(body["currentStreak"], 3);
    assert_eq!(body["contributionHeatmap"].as_array().unwrap().len(), 365);
    assert!(body["consistencyScore"].as_u64().unwrap() <= 100);
    assert_eq!(body["focusAreas"][0]["language"], "Rust");
    assert_eq!(body["focusAreas"][0]["percentage"], 100);

    // second call is served from cache
    let (status, body) = get_json(create_app(state), "/api/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], true);
}

#[tokio::test]
async fn analytics_prefers_calendar_counts() {
    let server = MockServer::start().await;
    mount_rest_fixtures(&server).await;

    // a single active day (yesterday, 7 contributions) in the calendar
    let yesterday = (chrono::Utc::now() - chrono::Duration::days(1))
        .date_naive()
        .to_string();
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": { "contributionsCollection": { "contributionCalendar": {
                "totalContributions": 999,
                "weeks": [{"contributionDays": [
                    {"date": yesterday, "contributionCount": 7}
                ]}]
            }}}}
        })))
        .mount(&server)
        .await;

    let app = create_app(test_state(&server));
    let (status, body) = get_json(app, "/api/analytics").await;
    assert_eq!(status, StatusCode::OK);

    // the calendar, not the 3 fetched commits, drives the served metrics
    assert_eq!(body["totalCommits"], 999);
    assert_eq!(body["currentStreak"], 1);
    let heatmap = body["contributionHeatmap"].as_array().unwrap();
    assert_eq!(heatmap.len(), 365);
    let cell = &heatmap[363];
    assert_eq!(cell["date"], yesterday);
    assert_eq!(cell["count"], 7);
    assert_eq!(cell["level"], 3);
}

#[tokio::test]
async fn analytics_surfaces_total_fetch_failure_without_caching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = test_state(&server);
    let (status, body) = get_json(create_app(state.clone()), "/api/analytics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "github_error");

    // failures never populate the cache
    assert!(state.cache.get("github:analytics").is_none());
}

#[tokio::test]
async fn activity_filters_and_caches_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "1",
                "type": "PushEvent",
                "actor": {"login": "octo", "avatar_url": "https://example.com/a.png"},
                "repo": {"name": "octo/alpha", "url": "https://api.github.com/repos/octo/alpha"},
                "payload": {"before": "aaa", "head": "bbb"},
                "created_at": "2026-03-10T09:00:00Z"
            },
            {
                "id": "2",
                "type": "CreateEvent",
                "actor": {"login": "octo", "avatar_url": "https://example.com/a.png"},
                "repo": {"name": "octo/alpha", "url": "https://api.github.com/repos/octo/alpha"},
                "payload": {"ref": "main", "ref_type": "branch"},
                "created_at": "2026-03-10T08:00:00Z"
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/alpha/compare/aaa...bbb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commits": [commit_json("bbb", "2026-03-10T08:55:00Z")]
        })))
        .mount(&server)
        .await;

    let state = test_state(&server);
    let (status, body) = get_json(create_app(state.clone()), "/api/activity").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);

    // the create event is filtered out; the push event is enriched
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "PushEvent");
    assert_eq!(events[0]["payload"]["commits"][0]["sha"], "bbb");

    let (_, body) = get_json(create_app(state), "/api/activity").await;
    assert_eq!(body["cached"], true);
}

#[tokio::test]
async fn clear_endpoint_busts_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let state = test_state(&server);
    let (_, body) = get_json(create_app(state.clone()), "/api/activity").await;
    assert_eq!(body["cached"], false);

    let response = create_app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/activity/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // the next read recomputes instead of hitting the cache
    let (_, body) = get_json(create_app(state), "/api/activity").await;
    assert_eq!(body["cached"], false);
}

#[tokio::test]
async fn webhook_requires_a_valid_signature() {
    let server = MockServer::start().await;
    let state = test_state(&server);

    let payload = serde_json::to_vec(&json!({"action": "push"})).unwrap();
    let bad = create_app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook")
                .header("X-Hub-Signature-256", "sha256=deadbeef")
                .header("content-type", "application/json")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let good = create_app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook")
                .header("X-Hub-Signature-256", compute_signature(&payload, SECRET))
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(good.status(), StatusCode::OK);
}

#[tokio::test]
async fn webhook_invalidates_cached_analytics() {
    let server = MockServer::start().await;
    mount_rest_fixtures(&server).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let state = test_state(&server);
    let (_, body) = get_json(create_app(state.clone()), "/api/analytics").await;
    assert_eq!(body["cached"], false);
    let (_, body) = get_json(create_app(state.clone()), "/api/analytics").await;
    assert_eq!(body["cached"], true);

    let payload = serde_json::to_vec(&json!({"ref": "refs/heads/main"})).unwrap();
    let response = create_app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook")
                .header("X-Hub-Signature-256", compute_signature(&payload, SECRET))
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = get_json(create_app(state), "/api/analytics").await;
    assert_eq!(body["cached"], false);
}
