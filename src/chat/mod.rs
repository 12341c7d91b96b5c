mod models;
mod relay;
mod rooms;
mod session;

pub use models::{Role, Room, Turn};
pub use relay::{ChatRelay, TurnOutcome};
pub use rooms::{RoomError, RoomStore, TITLE_PLACEHOLDER};
pub use session::{ChatSession, Notice, NoticeLevel, PendingTurn, Phase, SessionError};
