// WebSocket client helpers for integration scenarios.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// Connect to the test server and consume the identity handshake.
pub async fn connect(base_url: &str) -> (WsClient, String) {
    let ws_url = format!("{}/ws", base_url.replacen("http://", "ws://", 1));
    let (mut client, _response) = connect_async(&ws_url).await.expect("websocket connect");

    let identity = next_message(&mut client).await;
    assert_eq!(identity["type"], "Identity");
    let participant_id = identity["data"]["participant_id"]
        .as_str()
        .expect("participant id")
        .to_string();
    (client, participant_id)
}

pub async fn next_message(client: &mut WsClient) -> Value {
    loop {
        let frame = timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        match frame {
            Message::Text(text) => return serde_json::from_str(text.as_str()).expect("valid json"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

pub async fn next_snapshot(client: &mut WsClient) -> Value {
    let msg = next_message(client).await;
    assert_eq!(msg["type"], "SessionUpdate", "unexpected message: {msg}");
    msg["data"].clone()
}

pub async fn send(client: &mut WsClient, value: Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("websocket send");
}

pub async fn find_match(client: &mut WsClient) {
    send(client, json!({ "type": "FindMatch" })).await;
}

pub async fn submit_move(client: &mut WsClient, session_id: &str, row: u32, col: u32) {
    send(
        client,
        json!({
            "type": "Move",
            "data": { "session_id": session_id, "row": row, "col": col }
        }),
    )
    .await;
}
