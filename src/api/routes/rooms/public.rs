//! Public types for the rooms API
use serde::{Deserialize, Serialize};

use crate::chat::Turn;

#[derive(Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: String,
    pub title: String,
    pub turn_count: usize,
}

#[derive(Serialize, Deserialize)]
pub struct RoomListResponse {
    pub active_room_id: Option<String>,
    // Most recently created first
    pub rooms: Vec<RoomSummary>,
}

#[derive(Serialize, Deserialize)]
pub struct RoomCreatedResponse {
    pub id: String,
}

#[derive(Serialize, Deserialize)]
pub struct TurnView {
    pub role: String,
    pub content: String,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role().to_string(),
            content: turn.content().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub turns: Vec<TurnView>,
}
