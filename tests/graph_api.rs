//! End-to-end tests running the real reqwest transport against a mock
//! Graph API server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use comment_harvester::{
    CommentHarvester, GraphConfig, GraphError, GraphExecutor, GraphRequest, HarvestOptions,
    ReqwestTransport,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

fn executor_for(server: &MockServer, config: GraphConfig) -> GraphExecutor {
    let config = config.with_base_url(server.uri());
    let transport = ReqwestTransport::new(&config).expect("client builds");
    GraphExecutor::new(Arc::new(transport), config)
}

fn harvester_for(server: &MockServer) -> CommentHarvester {
    CommentHarvester::new(Arc::new(executor_for(server, GraphConfig::default())))
}

fn comment(id: &str, text: &str) -> serde_json::Value {
    json!({
        "id": id,
        "message": text,
        "from": {"id": "u1", "name": "Ada Example"},
        "created_time": "2024-05-01T12:00:00+0000"
    })
}

#[tokio::test]
async fn harvest_resolves_handle_and_sanitizes_comments() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/myshop"))
        .and(query_param("fields", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "777"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v19.0/777/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p1"}, {"id": "p2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v19.0/p1/comments"))
        .and(query_param("filter", "stream"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                comment("c1", "love it @shopfan https://deal.example/x"),
                comment("c2", "https://only-a-link.example"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v19.0/p2/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [comment("c1", "duplicate of the first"), comment("c3", "solid product")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = HarvestOptions::default()
        .with_max_posts(2)
        .with_max_comments(10);
    let result = harvester_for(&server)
        .harvest("myshop", "sixteen-char-tok", &options)
        .await
        .unwrap();

    assert_eq!(result.page_id, "777");
    assert_eq!(result.posts_scanned, 2);
    assert!(result.total_fetched <= 10);
    assert_eq!(result.total_fetched, result.comments.len());

    let ids: Vec<_> = result
        .comments
        .iter()
        .map(|c| c.comment_id.as_str())
        .collect();
    // c1 deduplicated to its first occurrence, c2 dropped as link-only.
    assert_eq!(ids, vec!["c1", "c3"]);
    assert_eq!(result.comments[0].text, "love it");
    assert_eq!(result.comments[0].post_id, "p1");
    for c in &result.comments {
        assert!(!c.text.contains("http"), "unsanitized text: {}", c.text);
        assert!(!c.text.contains('@'), "unsanitized text: {}", c.text);
    }
}

#[tokio::test]
async fn post_listing_follows_continuation_urls() {
    init_tracing();
    let server = MockServer::start().await;

    let next = format!("{}/v19.0/777/posts?after=cursor1&access_token=tok", server.uri());
    Mock::given(method("GET"))
        .and(path("/v19.0/777/posts"))
        .and(query_param("after", "cursor1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v19.0/777/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p1"}],
            "paging": {"next": next}
        })))
        .mount(&server)
        .await;
    for post in ["p1", "p2"] {
        Mock::given(method("GET"))
            .and(path(format!("/v19.0/{post}/comments")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [comment(&format!("c-{post}"), "fine")]
            })))
            .mount(&server)
            .await;
    }

    let result = harvester_for(&server)
        .harvest("777", "tok", &HarvestOptions::default())
        .await
        .unwrap();

    assert_eq!(result.posts_scanned, 2);
    let order: Vec<_> = result
        .comments
        .iter()
        .map(|c| c.comment_id.as_str())
        .collect();
    assert_eq!(order, vec!["c-p1", "c-p2"]);
}

#[tokio::test]
async fn invalid_token_on_post_listing_aborts_harvest() {
    init_tracing();
    let server = MockServer::start().await;

    // The API reports the error inside a 200 body.
    Mock::given(method("GET"))
        .and(path("/v19.0/777/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": 190, "type": "OAuthException", "message": "Session expired"}
        })))
        .mount(&server)
        .await;

    let err = harvester_for(&server)
        .harvest("777", "expired-tok", &HarvestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidToken(_)));
}

#[tokio::test]
async fn rate_limited_request_is_retried_then_succeeds() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/777"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 4, "message": "Application request limit reached"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v19.0/777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "777"})))
        .expect(1)
        .mount(&server)
        .await;

    let exec = executor_for(&server, GraphConfig::default());
    let body = exec
        .execute(&GraphRequest::fresh(
            "777",
            vec![("fields".to_string(), "id".to_string())],
        ))
        .await
        .unwrap();
    assert_eq!(body["id"], "777");
}

#[tokio::test]
async fn slow_response_surfaces_as_transport_failure() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/777"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"id": "777"})),
        )
        .mount(&server)
        .await;

    let config = GraphConfig::default().with_request_timeout(Duration::from_millis(50));
    let exec = executor_for(&server, config);
    let err = exec
        .execute(&GraphRequest::fresh("777", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Transport(_)));
}
