//! Realtime database adapter against a local fake of the REST surface

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use folio_core::{RemoteConfig, SiteContent};
use folio_sync::{RealtimeDbConnector, RealtimeDbOptions, RemoteConnector, SyncError};
use futures::StreamExt;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct FakeDb {
    node: Arc<Mutex<Value>>,
}

async fn get_node(State(db): State<FakeDb>, headers: HeaderMap) -> Response {
    let node = db.node.lock().unwrap().clone();
    let wants_events = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/event-stream"));
    if !wants_events {
        return Json(node).into_response();
    }

    let events = vec![
        Event::default()
            .event("put")
            .data(json!({"path": "/", "data": node}).to_string()),
        Event::default().event("keep-alive").data("null"),
        Event::default()
            .event("patch")
            .data(json!({"path": "/general", "data": {"phone": "999"}}).to_string()),
    ];
    let stream = futures::stream::iter(events.into_iter().map(Ok::<_, Infallible>))
        .chain(futures::stream::pending());
    Sse::new(stream).into_response()
}

async fn put_node(State(db): State<FakeDb>, Json(value): Json<Value>) -> StatusCode {
    *db.node.lock().unwrap() = value;
    StatusCode::OK
}

async fn serve(db: FakeDb) -> String {
    let app = Router::new()
        .route("/site_content.json", get(get_node).put(put_node))
        .with_state(db);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn connector() -> RealtimeDbConnector {
    RealtimeDbConnector::with_options(
        RealtimeDbOptions::default()
            .with_request_timeout(Duration::from_secs(5))
            .with_reconnect(Duration::from_millis(50), Duration::from_millis(200)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_push_replaces_node() {
    let db = FakeDb::default();
    let url = serve(db.clone()).await;

    let remote = connector().connect(&RemoteConfig::new(url)).await.unwrap();
    remote.push(&SiteContent::default()).await.unwrap();

    let stored = db.node.lock().unwrap().clone();
    assert_eq!(stored, serde_json::to_value(SiteContent::default()).unwrap());
}

#[tokio::test]
async fn test_events_are_applied_to_cached_node() {
    let db = FakeDb::default();
    *db.node.lock().unwrap() = json!({"general": {"phone": "1", "email": "e"}});
    let url = serve(db).await;

    let remote = connector().connect(&RemoteConfig::new(url)).await.unwrap();
    let mut snapshots = remote.snapshots();

    let patched = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(snapshot) = snapshots.next().await {
            if snapshot["general"]["phone"] == json!("999") {
                return snapshot;
            }
        }
        Value::Null
    })
    .await
    .unwrap();

    assert_eq!(patched, json!({"general": {"phone": "999", "email": "e"}}));
}

#[tokio::test]
async fn test_missing_node_is_a_status_error() {
    let url = serve(FakeDb::default()).await;
    let config = RemoteConfig::new(url).with_node("elsewhere");

    let err = connector().connect(&config).await.err().unwrap();
    assert!(matches!(err, SyncError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_database() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = connector()
        .connect(&RemoteConfig::new(format!("http://{addr}")))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, SyncError::Unreachable { .. }));
}
