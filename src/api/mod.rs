pub mod routes;
mod server;
pub use server::{app, serve};
pub mod public;
mod state;
pub use state::{AppState, SharedSession};
mod utils;
pub use utils::SESSION_COOKIE;
