use crate::domain::ports::{Broadcaster, ParticipantRegistry};
use crate::domain::session::{ParticipantId, SessionSnapshot};
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage, SessionSnapshotDto};
use crate::interface_adapters::state::AppState;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::SinkExt;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug)]
enum NetError {
    // Categorizes connection failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
}

const MAX_INVALID_JSON: u32 = 10;
// Per-connection outbound queue; a slow client drops snapshots rather than
// stalling the fan-out task.
const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// A session snapshot queued for delivery to that session's participants.
#[derive(Debug, Clone)]
pub struct SessionBroadcast {
    pub session_id: String,
    pub snapshot: SessionSnapshot,
}

/// Broadcaster port backed by a bounded channel into the fan-out task.
/// Publishing never blocks; a full or closed channel drops the snapshot.
#[derive(Clone)]
pub struct ChannelBroadcaster {
    tx: mpsc::Sender<SessionBroadcast>,
}

impl ChannelBroadcaster {
    pub fn new(tx: mpsc::Sender<SessionBroadcast>) -> Self {
        Self { tx }
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn publish(&self, session_id: &str, snapshot: SessionSnapshot) {
        let broadcast = SessionBroadcast {
            session_id: session_id.to_string(),
            snapshot,
        };
        match self.tx.try_send(broadcast) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(session_id, "broadcast channel full; dropping snapshot");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(session_id, "broadcast channel closed; dropping snapshot");
            }
        }
    }
}

/// Outbound delivery routes for connected clients, keyed by participant id.
#[derive(Debug, Default)]
pub struct ConnectionTable {
    senders: Mutex<HashMap<ParticipantId, mpsc::Sender<Utf8Bytes>>>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, participant_id: ParticipantId, sender: mpsc::Sender<Utf8Bytes>) {
        self.senders.lock().await.insert(participant_id, sender);
    }

    pub async fn remove(&self, participant_id: &str) {
        self.senders.lock().await.remove(participant_id);
    }

    async fn senders_for(
        &self,
        participant_ids: &[ParticipantId],
    ) -> Vec<(ParticipantId, mpsc::Sender<Utf8Bytes>)> {
        let senders = self.senders.lock().await;
        participant_ids
            .iter()
            .filter_map(|id| senders.get(id).map(|tx| (id.clone(), tx.clone())))
            .collect()
    }
}

/// Single consumer of published snapshots: serializes each one exactly once
/// and forwards the shared bytes to every participant of the session. A
/// single consumer is what preserves per-session snapshot ordering.
pub async fn snapshot_fanout(
    mut rx: mpsc::Receiver<SessionBroadcast>,
    connections: Arc<ConnectionTable>,
) {
    while let Some(broadcast) = rx.recv().await {
        let msg = ServerMessage::SessionUpdate(SessionSnapshotDto::from(&broadcast.snapshot));
        let txt = match serde_json::to_string(&msg) {
            Ok(txt) => txt,
            Err(e) => {
                error!(error = ?e, "failed to serialize session snapshot");
                continue;
            }
        };

        let bytes = Utf8Bytes::from(txt);
        let recipients: Vec<ParticipantId> = broadcast
            .snapshot
            .participants
            .iter()
            .map(|(id, _)| id.clone())
            .collect();
        for (participant_id, sender) in connections.senders_for(&recipients).await {
            // Delivery is fire-and-forget from the core's point of view.
            if sender.try_send(bytes.clone()).is_err() {
                warn!(%participant_id, "outbound queue unavailable; dropping snapshot");
            }
        }
    }
    warn!("broadcast channel closed; fanout exiting");
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Anonymous clients: the connection id is the participant id.
    let participant_id = Uuid::new_v4().to_string();
    let span = info_span!("conn", %participant_id);
    handle_connection(socket, state, participant_id)
        .instrument(span)
        .await;
}

async fn handle_connection(mut socket: WebSocket, state: Arc<AppState>, participant_id: String) {
    // Register the delivery route and identity mapping before the first
    // message so a broadcast triggered by another connection can reach us.
    let (out_tx, mut out_rx) = mpsc::channel::<Utf8Bytes>(OUTBOUND_QUEUE_CAPACITY);
    state.connections.insert(participant_id.clone(), out_tx).await;
    state.registry.set(&participant_id, None).await;

    // Tell the client who they are.
    let identity = ServerMessage::Identity {
        participant_id: participant_id.clone(),
    };
    if let Err(e) = send_message(&mut socket, &identity).await {
        error!(error = ?e, "failed to send identity");
        cleanup(&state, &participant_id).await;
        let _ = socket.close().await;
        return;
    }

    info!("client connected");
    run_client_loop(&mut socket, &mut out_rx, &state, &participant_id).await;
    cleanup(&state, &participant_id).await;
    info!("client disconnected");
}

async fn cleanup(state: &Arc<AppState>, participant_id: &str) {
    // Resolves mid-game vs pending departure and drops the registry entry.
    state.directory.notify_disconnect(participant_id).await;
    state.connections.remove(participant_id).await;
}

enum LoopControl {
    Continue,
    Disconnect,
}

async fn run_client_loop(
    socket: &mut WebSocket,
    out_rx: &mut mpsc::Receiver<Utf8Bytes>,
    state: &Arc<AppState>,
    participant_id: &str,
) {
    let mut invalid_json: u32 = 0;
    let mut close_frame: Option<CloseFrame> = None;

    loop {
        let disconnect = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming(incoming, state, participant_id, &mut invalid_json, &mut close_frame).await {
                    LoopControl::Continue => false,
                    LoopControl::Disconnect => true,
                }
            }

            outbound = out_rx.recv() => {
                match outbound {
                    Some(bytes) => {
                        if let Err(e) = socket.send(Message::Text(bytes)).await {
                            warn!(error = %e, "failed to send snapshot");
                            true
                        } else {
                            false
                        }
                    }
                    None => {
                        warn!("outbound channel closed; disconnecting");
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            let _ = socket.close().await;
            break;
        }
    }
}

async fn handle_incoming(
    incoming: Option<Result<Message, axum::Error>>,
    state: &Arc<AppState>,
    participant_id: &str,
    invalid_json: &mut u32,
    close_frame: &mut Option<CloseFrame>,
) -> LoopControl {
    match incoming {
        Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(msg) => {
                dispatch(state, participant_id, msg).await;
                LoopControl::Continue
            }
            Err(parse_err) => {
                *invalid_json += 1;
                warn!(bytes = text.len(), error = %parse_err, "failed to parse client message");
                if *invalid_json > MAX_INVALID_JSON {
                    *close_frame = Some(CloseFrame {
                        code: close_code::POLICY,
                        reason: "too many invalid messages".into(),
                    });
                    return LoopControl::Disconnect;
                }
                LoopControl::Continue
            }
        },
        Some(Ok(Message::Binary(_))) => {
            *close_frame = Some(CloseFrame {
                code: close_code::UNSUPPORTED,
                reason: "binary messages not supported".into(),
            });
            LoopControl::Disconnect
        }
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => LoopControl::Continue,
        Some(Ok(Message::Close(_))) => LoopControl::Disconnect,
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            LoopControl::Disconnect
        }
        None => {
            info!("websocket closed");
            LoopControl::Disconnect
        }
    }
}

async fn dispatch(state: &Arc<AppState>, participant_id: &str, msg: ClientMessage) {
    // Rejected operations are expected from stale UIs; log and carry on.
    match msg {
        ClientMessage::FindMatch => match state.directory.request_match(participant_id).await {
            Ok(session_id) => debug!(%session_id, "matched into session"),
            Err(err) => warn!(error = ?err, "match request rejected"),
        },
        ClientMessage::Move(payload) => {
            if let Err(err) = state
                .directory
                .submit_move(&payload.session_id, participant_id, payload.row, payload.col)
                .await
            {
                debug!(error = ?err, row = payload.row, col = payload.col, "move rejected");
            }
        }
        ClientMessage::EndGame => state.directory.clear_assignment(participant_id).await,
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), NetError> {
    // Serialize safely; report JSON errors instead of panicking.
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)
}
