//! Workspace against a mock points server
//!
//! Checks the wire contract: paths, methods, bodies, and which calls each
//! operation makes.

use pointree::cli::graph::TextGraphRenderer;
use pointree::config::Config;
use pointree::core::editor::BufferSurface;
use pointree::core::form::EditorSession;
use pointree::core::notice::NoticeKind;
use pointree::core::tree::Phase;
use pointree::{Outcome, PointId, PointsClient, SyncError, Workspace};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type HttpWorkspace = Workspace<PointsClient, BufferSurface, TextGraphRenderer>;

fn workspace(server: &MockServer) -> HttpWorkspace {
    let client = PointsClient::new(&server.uri(), None).expect("client");
    Workspace::new(
        client,
        BufferSurface::new(),
        TextGraphRenderer::default(),
        &Config::default(),
    )
}

async fn mock_get(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_children_listed_under_mixed_ids() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/points",
        json!([{ "id": 1, "title": "Rust", "description": null }]),
    )
    .await;
    mock_get(
        &server,
        "/points/1",
        json!([
            { "id": "own", "title": "Ownership", "description": "moves", "parent_id": 1 },
            { "id": 9, "title": "", "parent_id": 1 }
        ]),
    )
    .await;

    let mut ws = workspace(&server);
    ws.start().await.unwrap();
    assert_eq!(ws.select(&PointId::Num(1)).await.unwrap(), Outcome::Expanded);

    let labels: Vec<String> = ws.render_tree().into_iter().map(|l| l.label).collect();
    assert_eq!(labels, vec!["Rust", "Ownership", "Unnamed Item"]);
    assert!(ws.find("own").is_some());
}

#[tokio::test]
async fn test_create_posts_then_reloads_expanded() {
    let server = MockServer::start().await;
    mock_get(&server, "/points", json!([{ "id": 1, "title": "Rust" }])).await;
    mock_get(&server, "/points/1", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/points"))
        .and(body_json(json!({
            "title": "Lifetimes",
            "description": "'a",
            "parent_id": 1
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut ws = workspace(&server);
    ws.start().await.unwrap();
    ws.select(&PointId::Num(1)).await.unwrap();
    ws.start_create(Some(PointId::Num(1)));
    ws.set_title("Lifetimes").unwrap();
    ws.set_description("'a").unwrap();

    assert_eq!(ws.submit().await.unwrap(), Outcome::Reloaded);
    assert_eq!(ws.session(), &EditorSession::Idle);
    assert_eq!(ws.tree().phase(&PointId::Num(1)), Phase::Expanded);

    let requests = server.received_requests().await.unwrap();
    let after_post: Vec<String> = requests
        .iter()
        .skip_while(|r| r.method.as_str() != "POST")
        .skip(1)
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(after_post, vec!["/points", "/points/1"]);
}

#[tokio::test]
async fn test_update_puts_and_patches_without_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/points"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 5, "title": "Old", "description": "D" }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    mock_get(&server, "/points/5", json!([])).await;
    Mock::given(method("PUT"))
        .and(path("/points"))
        .and(body_json(json!({ "id": 5, "title": "New", "description": "D" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut ws = workspace(&server);
    ws.start().await.unwrap();
    ws.select(&PointId::Num(5)).await.unwrap();
    ws.start_edit().unwrap();
    ws.set_title("New").unwrap();

    assert_eq!(ws.submit().await.unwrap(), Outcome::Patched);
    assert_eq!(ws.render_tree()[0].label, "New");
    assert_eq!(ws.session().name(), "viewing");
    assert_eq!(ws.notices().last().unwrap().text, "Saved successfully");
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let server = MockServer::start().await;
    mock_get(&server, "/points", json!([{ "id": 7, "title": "Doomed" }])).await;
    Mock::given(method("DELETE"))
        .and(path("/points/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut ws = workspace(&server);
    ws.start().await.unwrap();
    let mut refuse = |_: &str| false;
    assert_eq!(
        ws.delete(&PointId::Num(7), &mut refuse).await.unwrap(),
        Outcome::Declined
    );
}

#[tokio::test]
async fn test_confirmed_delete_reloads() {
    let server = MockServer::start().await;
    mock_get(&server, "/points", json!([])).await;
    Mock::given(method("DELETE"))
        .and(path("/points/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut ws = workspace(&server);
    let mut prompts = Vec::new();
    let mut accept = |prompt: &str| {
        prompts.push(prompt.to_string());
        true
    };
    assert_eq!(
        ws.delete(&PointId::Num(7), &mut accept).await.unwrap(),
        Outcome::Reloaded
    );
    assert_eq!(prompts, vec!["Are you sure you want to delete this item?"]);
}

#[tokio::test]
async fn test_graph_sizes_and_popup() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/points/graph/3",
        json!({
            "nodes": [
                { "id": 3, "title": "Ownership", "description": "**moves**", "level": 0 },
                { "id": 4, "title": "Borrowing", "description": "", "level": 1 },
                { "id": 8, "title": "Deep", "level": 3 }
            ],
            "links": [
                { "source": 3, "target": 4 },
                { "source": 4, "target": 8 },
                { "source": 4, "target": 99 }
            ]
        }),
    )
    .await;

    let mut ws = workspace(&server);
    assert_eq!(ws.show_graph(&PointId::Num(3)).await.unwrap(), Outcome::Rendered);

    let projection = ws.graph().projection().unwrap();
    let sizes: Vec<f64> = projection.nodes.iter().map(|n| n.size).collect();
    assert_eq!(sizes, vec![30.0, 24.0, 12.0]);
    assert_eq!(projection.edges.len(), 2);

    assert_eq!(
        ws.click_graph_node(&PointId::Num(3)).unwrap().body,
        "<p><strong>moves</strong></p>\n"
    );
    assert_eq!(
        ws.click_graph_node(&PointId::Num(4)).unwrap().body,
        "No description available."
    );
}

#[tokio::test]
async fn test_generate_content_appends_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_content"))
        .and(body_json(json!({ "title": "T", "description": "X" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "Y" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut ws = workspace(&server);
    ws.start_create(None);
    ws.set_title("T").unwrap();
    ws.set_description("X").unwrap();

    assert_eq!(ws.generate_content().await.unwrap(), Outcome::Appended);
    assert_eq!(ws.fields().description, "X\n\nY");
    assert_eq!(ws.session().name(), "creating");
}

#[tokio::test]
async fn test_generate_and_save_sends_existing_id() {
    let server = MockServer::start().await;
    mock_get(&server, "/points", json!([{ "id": 2, "title": "Go", "description": "gophers" }])).await;
    mock_get(&server, "/points/2", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/points/generate"))
        .and(body_json(json!({ "title": "Go", "description": "gophers", "id": 2 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut ws = workspace(&server);
    ws.start().await.unwrap();
    ws.select(&PointId::Num(2)).await.unwrap();
    ws.start_edit().unwrap();

    assert_eq!(ws.generate_and_save().await.unwrap(), Outcome::Reloaded);
    assert!(ws.generate_control().enabled);
}

#[tokio::test]
async fn test_error_status_is_a_single_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/points"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "db is down" })),
        )
        .mount(&server)
        .await;

    let mut ws = workspace(&server);
    let err = ws.start().await.unwrap_err();
    assert!(matches!(err, SyncError::Server { status } if status.as_u16() == 500));

    let notices = ws.notices().drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].text, "Failed to load knowledge");
}

#[tokio::test]
async fn test_base_path_prefix_is_kept() {
    let server = MockServer::start().await;
    mock_get(&server, "/kb/points", json!([{ "id": 1, "title": "Prefixed" }])).await;

    let client = PointsClient::new(&format!("{}/kb/", server.uri()), None).unwrap();
    let mut ws = Workspace::new(
        client,
        BufferSurface::new(),
        TextGraphRenderer::default(),
        &Config::default(),
    );
    ws.start().await.unwrap();
    assert_eq!(ws.render_tree()[0].label, "Prefixed");
}
