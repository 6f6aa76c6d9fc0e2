//! End-to-end flows through the HTTP router and WebSocket channel.

use docchat_core::config::VectorBackend;
use docchat_gateway::server::build_router;
use docchat_gateway::{Gateway, GatewayConfig};
use docchat_integration_tests::{config_in, get, json_body, post_json, state_for, upload_request};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_tungstenite::tungstenite::Message;
use tower::ServiceExt;

#[tokio::test]
async fn test_upload_retrieve_delete() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), VectorBackend::Memory);
    let app = build_router(state_for(&config).await, &GatewayConfig::from(&config.server));

    let docs = [
        ("rust.txt", "Rust is a systems programming language focused on memory safety."),
        ("bread.txt", "Sourdough bread needs flour, water, salt and a starter."),
        ("tides.txt", "Ocean tides follow the gravitational pull of the moon."),
    ];
    for (name, content) in docs {
        let resp = app.clone().oneshot(upload_request(name, content)).await.unwrap();
        assert_eq!(
            json_body(resp).await,
            json!({"success": true, "filename": name})
        );
    }

    let resp = app.clone().oneshot(get("/get_uploaded_files")).await.unwrap();
    assert_eq!(
        json_body(resp).await,
        json!(["bread.txt", "rust.txt", "tides.txt"])
    );

    let resp = app
        .clone()
        .oneshot(post_json("/retrieve", json!({"query": "memory safety in programming"})))
        .await
        .unwrap();
    let results = json_body(resp).await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0]["id"].as_str().unwrap().ends_with("rust.txt"));

    let resp = app
        .clone()
        .oneshot(post_json("/delete_file", json!({"filename": "rust.txt"})))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await, json!({"success": true}));

    let resp = app
        .clone()
        .oneshot(post_json("/retrieve", json!({"query": "memory safety in programming"})))
        .await
        .unwrap();
    let results = json_body(resp).await;
    assert_eq!(results.as_array().unwrap().len(), 2);
    assert!(results
        .as_array()
        .unwrap()
        .iter()
        .all(|r| !r["id"].as_str().unwrap().ends_with("rust.txt")));

    let resp = app
        .oneshot(post_json("/delete_file", json!({"filename": "rust.txt"})))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await, json!({"error": "File not found"}));
}

#[tokio::test]
async fn test_retrieve_caps_at_top_k() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), VectorBackend::Memory);
    let app = build_router(state_for(&config).await, &GatewayConfig::from(&config.server));

    for i in 0..8 {
        let name = format!("doc{}.txt", i);
        app.clone()
            .oneshot(upload_request(&name, &format!("document number {}", i)))
            .await
            .unwrap();
    }

    let resp = app
        .oneshot(post_json("/retrieve", json!({"query": "document"})))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_index_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), VectorBackend::File);

    {
        let app = build_router(state_for(&config).await, &GatewayConfig::from(&config.server));
        app.oneshot(upload_request("kept.txt", "persisted between runs"))
            .await
            .unwrap();
    }
    assert!(config.vector_store.collection_path().exists());

    let app = build_router(state_for(&config).await, &GatewayConfig::from(&config.server));
    let resp = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(json_body(resp).await, json!({"status": "ok", "documents": 1}));

    let resp = app
        .oneshot(post_json("/delete_file", json!({"filename": "kept.txt"})))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await, json!({"success": true}));

    let state = state_for(&config).await;
    assert_eq!(state.retriever().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_conversation_history() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), VectorBackend::Memory);
    let app = build_router(state_for(&config).await, &GatewayConfig::from(&config.server));

    let resp = app.clone().oneshot(get("/get_conversations")).await.unwrap();
    assert_eq!(json_body(resp).await, json!([]));

    let first = json!([{"sender": "user", "text": "hello"}]);
    let second = json!([
        {"sender": "user", "text": "what is rust?"},
        {"sender": "bot", "text": "Echo: what is rust?"}
    ]);
    for conversation in [&first, &second] {
        let resp = app
            .clone()
            .oneshot(post_json(
                "/save_conversation",
                json!({"conversation": conversation}),
            ))
            .await
            .unwrap();
        assert_eq!(json_body(resp).await, json!({"success": true}));
    }

    let resp = app.oneshot(get("/get_conversations")).await.unwrap();
    assert_eq!(json_body(resp).await, json!([first, second]));
}

#[tokio::test]
async fn test_websocket_through_gateway() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), VectorBackend::Memory);
    let gateway = Gateway::new(GatewayConfig::from(&config.server), state_for(&config).await);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        gateway
            .serve(listener, async {
                let _ = stop_rx.await;
            })
            .await
    });

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .unwrap();

    for text in ["first", "second"] {
        socket
            .send(Message::Text(
                json!({"event": "chat_message", "data": text}).to_string(),
            ))
            .await
            .unwrap();

        let reply = loop {
            match socket.next().await.unwrap().unwrap() {
                Message::Text(frame) => break frame,
                _ => continue,
            }
        };
        let reply: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["event"], "chat_response");
        assert_eq!(reply["data"]["message"], format!("Echo: {}", text));
    }

    socket.close(None).await.unwrap();
    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
