//! End-to-end tests of the configuration API against the real actors

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use footlight_control::storage::{MemoryStore, PersistenceActor};
use footlight_control::web::{build_app, AppState, WebServerConfig};
use footlight_control::ControlHandle;
use footlight_core::{
    mailbox, spawn, Mailbox, Message, PresetBank, PresetSelector, SelectorTargets,
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct Rig {
    app: Router,
    artnet: Mailbox<Message>,
    display: Mailbox<Message>,
    _osc: Mailbox<Message>,
}

fn rig() -> Rig {
    let (artnet, artnet_rx) = mailbox("artnet_sender", 20).unwrap();
    let (osc, osc_rx) = mailbox("osc_sender", 10).unwrap();
    let (display, display_rx) = mailbox("display", 10).unwrap();

    let (selector, selector_rx) = mailbox("preset_selector", 10).unwrap();
    spawn(
        PresetSelector::new(
            PresetBank::new(),
            SelectorTargets {
                artnet,
                osc,
                display,
            },
        ),
        selector_rx,
    );

    let (persistence, persistence_rx) = mailbox("persistence", 10).unwrap();
    spawn(PersistenceActor::new(MemoryStore::new()), persistence_rx);

    let state = AppState {
        control: ControlHandle::new(selector, persistence),
    };
    let app = build_app(&WebServerConfig::default(), state).unwrap();

    Rig {
        app,
        artnet: artnet_rx,
        display: display_rx,
        _osc: osc_rx,
    }
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_status_reports_version_and_cursor() {
    let rig = rig();
    let (status, body) = call(&rig.app, get("/api/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["version"], footlight_core::VERSION);
    assert_eq!(body["data"]["numPresets"], 20);
    assert_eq!(body["data"]["currentIndex"], 0);
}

#[tokio::test]
async fn test_post_presets_replaces_and_publishes() {
    let mut rig = rig();
    let payload = json!([
        {"index": 0, "name": "Warm", "universe1": [255, 180, 40], "universe2": []},
        {"index": 1, "name": "Cold", "universe1": [40, 180, 255], "universe2": [9]}
    ]);

    let (status, body) = call(&rig.app, post("/api/presets", &payload.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], 2);

    match rig.artnet.receive().await {
        Some(Message::SendPreset(frame)) => {
            assert_eq!(frame.index, 0);
            assert_eq!(frame.name, "Warm");
            assert_eq!(frame.universe1.as_slice(), &[255, 180, 40]);
        }
        other => panic!("expected SendPreset, got {:?}", other),
    }
    assert!(matches!(
        rig.display.receive().await,
        Some(Message::ShowIndex(0))
    ));

    let (status, body) = call(&rig.app, get("/api/presets")).await;
    assert_eq!(status, StatusCode::OK);
    let presets = body.as_array().unwrap();
    assert_eq!(presets.len(), 2);
    assert_eq!(presets[1]["name"], "Cold");
    assert_eq!(presets[1]["universe1"].as_array().unwrap().len(), 512);
    assert_eq!(presets[1]["universe2"][0], 9);
    assert_eq!(presets[1]["universe2"][1], 0);
}

#[tokio::test]
async fn test_post_presets_rejects_single_preset() {
    let rig = rig();
    let payload = json!([{"index": 0, "name": "Only", "universe1": [1], "universe2": [2]}]);

    let (status, body) = call(&rig.app, post("/api/presets", &payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = call(&rig.app, get("/api/status")).await;
    assert_eq!(body["data"]["numPresets"], 20);
}

#[tokio::test]
async fn test_post_presets_rejects_malformed_json() {
    let rig = rig();
    let (status, body) = call(&rig.app, post("/api/presets", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_config_round_trip() {
    let rig = rig();

    let (status, body) = call(&rig.app, get("/api/config")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["footSwitchPolarity"], "NORMAL");

    let payload = json!({"footSwitchPolarity": "INVERSE", "footSwitchLongPressTime": 1500});
    let (status, _) = call(&rig.app, post("/api/config", &payload.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&rig.app, get("/api/config")).await;
    assert_eq!(body, payload);
}

#[tokio::test]
async fn test_config_rejects_zero_threshold() {
    let rig = rig();
    let payload = json!({"footSwitchPolarity": "NORMAL", "footSwitchLongPressTime": 0});
    let (status, body) = call(&rig.app, post("/api/config", &payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let rig = rig();
    let response = rig.app.clone().oneshot(get("/api/status")).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("X-Frame-Options")
            .and_then(|h| h.to_str().ok()),
        Some("DENY")
    );
}
