mod chat;
mod core;

pub use chat::CompletionClient;
pub use self::core::{Message, Role, completion};
