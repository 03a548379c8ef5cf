// Read-only status surface: the fixed label enumerations clients use to
// interpret session snapshot fields.

use crate::interface_adapters::protocol::{
    STATUS_FINISHED, STATUS_IN_PROGRESS, STATUS_SEARCHING, WINNER_NONE, WINNER_TIE,
};
use axum::Json;
use serde_json::{Value, json};

pub async fn game_status_labels() -> Json<Value> {
    Json(json!({
        "SEARCHING": STATUS_SEARCHING,
        "IN_PROGRESS": STATUS_IN_PROGRESS,
        "FINISHED": STATUS_FINISHED,
    }))
}

pub async fn game_winner_labels() -> Json<Value> {
    Json(json!({
        "NO_WINNER": WINNER_NONE,
        "TIE": WINNER_TIE,
    }))
}
