//! In-memory store of rooms for a single session.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::models::{Room, Turn};

pub const TITLE_MAX_CHARS: usize = 25;
pub const TITLE_ELLIPSIS: &str = "...";
pub const TITLE_PLACEHOLDER: &str = "New chat";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room {0} not found")]
    NotFound(String),
}

#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<String, Room>,
    active_room_id: Option<String>,
    // Microsecond timestamp of the last issued room ID
    last_issued: i64,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty room, make it the active room, and return its
    /// ID. IDs are the creation time with microsecond precision and
    /// never repeat even if the clock stalls or goes backwards.
    pub fn create_room(&mut self) -> String {
        let created_at = self.next_timestamp();
        let id = created_at.format("%Y%m%d%H%M%S%6f").to_string();
        self.rooms.insert(id.clone(), Room::new(&id, created_at));
        self.active_room_id = Some(id.clone());
        tracing::debug!("Created room {}", id);
        id
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let mut micros = now.timestamp_micros();
        if micros <= self.last_issued {
            micros = self.last_issued + 1;
        }
        self.last_issued = micros;
        DateTime::<Utc>::from_timestamp_micros(micros).unwrap_or(now)
    }

    pub fn append_turn(&mut self, room_id: &str, turn: Turn) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;
        room.push(turn);
        Ok(())
    }

    /// Room IDs with the most recently created first. Ties on creation
    /// time fall back to the ID so the order is stable.
    pub fn list_rooms_newest_first(&self) -> Vec<String> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        rooms.into_iter().map(|r| r.id().to_string()).collect()
    }

    /// Display title for a room taken from the first user turn.
    pub fn title_for(&self, room_id: &str) -> Result<String, RoomError> {
        let room = self.room(room_id)?;
        let title = match room.first_prompt() {
            Some(prompt) => truncate_title(prompt),
            None => TITLE_PLACEHOLDER.to_string(),
        };
        Ok(title)
    }

    pub fn room(&self, room_id: &str) -> Result<&Room, RoomError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))
    }

    pub fn turns(&self, room_id: &str) -> Result<&[Turn], RoomError> {
        Ok(self.room(room_id)?.turns())
    }

    pub fn active_room_id(&self) -> Option<&str> {
        self.active_room_id.as_deref()
    }

    pub fn set_active(&mut self, room_id: &str) -> Result<(), RoomError> {
        if !self.rooms.contains_key(room_id) {
            return Err(RoomError::NotFound(room_id.to_string()));
        }
        self.active_room_id = Some(room_id.to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

fn truncate_title(text: &str) -> String {
    if text.chars().count() <= TITLE_MAX_CHARS {
        return text.to_string();
    }
    let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
    title.push_str(TITLE_ELLIPSIS);
    title
}
