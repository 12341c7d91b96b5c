//! Per-user chat session: the room store plus the state of the
//! interaction cycle and any notices waiting to be shown.
use std::ops::{Deref, DerefMut};

use serde::Serialize;
use thiserror::Error;

use super::models::Turn;
use super::rooms::{RoomError, RoomStore};
use crate::core::Variant;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Room(#[from] RoomError),
    #[error("Rooms are not available in the single chat variant")]
    RoomsDisabled,
    #[error("Message is empty")]
    EmptyPrompt,
    #[error("A message is already being processed")]
    Busy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Processing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message shown once on the next render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }
}

/// A user turn that has been recorded and is waiting on a reply.
#[derive(Debug)]
pub struct PendingTurn {
    pub room_id: String,
    pub prompt: String,
    pub history: Vec<Turn>,
}

#[derive(Debug)]
pub struct ChatSession {
    id: String,
    variant: Variant,
    store: RoomStore,
    phase: Phase,
    notices: Vec<Notice>,
}

impl ChatSession {
    /// Start a session with one empty room already active.
    pub fn new(id: &str, variant: Variant) -> Self {
        let mut store = RoomStore::new();
        store.create_room();
        Self {
            id: id.to_string(),
            variant,
            store,
            phase: Phase::Idle,
            notices: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The active room, creating one if the store is somehow empty.
    pub fn active_room_id(&mut self) -> String {
        match self.store.active_room_id() {
            Some(id) => id.to_string(),
            None => self.store.create_room(),
        }
    }

    pub fn create_room(&mut self) -> Result<String, SessionError> {
        if !self.variant.allows_rooms() {
            return Err(SessionError::RoomsDisabled);
        }
        Ok(self.store.create_room())
    }

    pub fn switch_room(&mut self, room_id: &str) -> Result<(), SessionError> {
        if !self.variant.allows_rooms() {
            return Err(SessionError::RoomsDisabled);
        }
        self.store.set_active(room_id)?;
        Ok(())
    }

    /// Idle -> Processing. The user's turn is recorded before anything
    /// else so it stays visible even if the completion fails.
    pub fn begin_turn(&mut self, prompt: &str) -> Result<PendingTurn, SessionError> {
        if self.phase == Phase::Processing {
            return Err(SessionError::Busy);
        }
        if prompt.trim().is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        let room_id = self.active_room_id();
        self.store.append_turn(&room_id, Turn::user(prompt))?;
        let history = self.store.turns(&room_id)?.to_vec();
        self.phase = Phase::Processing;

        Ok(PendingTurn {
            room_id,
            prompt: prompt.to_string(),
            history,
        })
    }

    /// Processing -> Idle after a reply. The reply goes to the room the
    /// prompt was sent from even if the user switched rooms meanwhile.
    pub fn complete_turn(
        &mut self,
        pending: &PendingTurn,
        reply: &str,
    ) -> Result<(), SessionError> {
        self.phase = Phase::Idle;
        self.store.append_turn(&pending.room_id, Turn::assistant(reply))?;
        Ok(())
    }

    /// Processing -> Idle after the completion failed. The user's turn
    /// is kept.
    pub fn fail_turn(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice)
    }

    /// Drain notices so each is only shown once.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// Puts a session back to `Idle` if a turn is abandoned between
/// `begin_turn` and `complete_turn`/`fail_turn`, e.g. when the future
/// driving it is dropped or panics. Otherwise every later prompt would
/// be rejected as `Busy`.
pub(crate) struct TurnGuard<'a> {
    session: &'a mut ChatSession,
}

impl<'a> TurnGuard<'a> {
    pub(crate) fn new(session: &'a mut ChatSession) -> Self {
        Self { session }
    }
}

impl Deref for TurnGuard<'_> {
    type Target = ChatSession;

    fn deref(&self) -> &ChatSession {
        self.session
    }
}

impl DerefMut for TurnGuard<'_> {
    fn deref_mut(&mut self) -> &mut ChatSession {
        self.session
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.session.phase == Phase::Processing {
            tracing::warn!("Session {}: turn abandoned before a reply", self.session.id);
            self.session.phase = Phase::Idle;
        }
    }
}
