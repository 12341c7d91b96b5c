mod client;

pub use client::{Archival, NOTION_VERSION, NewPage, NotionClient};
