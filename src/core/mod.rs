mod config;
mod secrets;

pub use config::{AppConfig, ArchivalPolicy, Variant};
pub use secrets::Secrets;
