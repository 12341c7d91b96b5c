//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::notion::Archival;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub room_id: String,
    pub reply: String,
    // Null when archival is disabled
    pub archival: Option<ArchivalResult>,
}

#[derive(Serialize, Deserialize)]
pub struct ArchivalResult {
    pub success: bool,
    pub message: String,
}

impl From<Archival> for ArchivalResult {
    fn from(archival: Archival) -> Self {
        Self {
            success: archival.success,
            message: archival.message,
        }
    }
}

/// Returned with a 502 when the completion request failed. The user's
/// message is still recorded in the room.
#[derive(Serialize, Deserialize)]
pub struct ChatErrorResponse {
    pub room_id: String,
    pub error: String,
}
