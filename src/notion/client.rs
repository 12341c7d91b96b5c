//! Notion API client for saving a prompt and response as a new page
//! in a database.

use reqwest::Client;
use serde::Serialize;

pub const NOTION_VERSION: &str = "2022-06-28";

// Notion rejects text objects longer than this
const MAX_TEXT_LEN: usize = 2000;

#[derive(Debug, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RichText {
    pub text: TextContent,
}

#[derive(Debug, Serialize)]
pub struct TitleProperty {
    pub title: Vec<RichText>,
}

#[derive(Debug, Serialize)]
pub struct RichTextProperty {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Serialize)]
pub struct Properties {
    #[serde(rename = "Prompt")]
    pub prompt: TitleProperty,
    #[serde(rename = "Response")]
    pub response: RichTextProperty,
}

#[derive(Debug, Serialize)]
pub struct DatabaseParent {
    pub database_id: String,
}

#[derive(Debug, Serialize)]
pub struct NewPage {
    pub parent: DatabaseParent,
    pub properties: Properties,
}

impl NewPage {
    pub fn new(database_id: &str, prompt: &str, response: &str) -> Self {
        Self {
            parent: DatabaseParent {
                database_id: database_id.to_string(),
            },
            properties: Properties {
                prompt: TitleProperty {
                    title: rich_text(prompt),
                },
                response: RichTextProperty {
                    rich_text: rich_text(response),
                },
            },
        }
    }
}

/// Split text into as many text objects as needed to stay under the
/// per-object length limit. Always returns at least one object.
fn rich_text(text: &str) -> Vec<RichText> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![RichText {
            text: TextContent {
                content: String::new(),
            },
        }];
    }
    chars
        .chunks(MAX_TEXT_LEN)
        .map(|chunk| RichText {
            text: TextContent {
                content: chunk.iter().collect(),
            },
        })
        .collect()
}

/// Outcome of an archival attempt. Archival never fails the chat so
/// this is a plain value rather than a `Result`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Archival {
    pub success: bool,
    pub message: String,
}

impl Archival {
    fn saved() -> Self {
        Self {
            success: true,
            message: String::from("Saved to Notion."),
        }
    }

    fn failed(err: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            message: format!("Failed to save to Notion: {}", err),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NotionClient {
    client: Client,
    api_hostname: String,
    api_key: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(api_hostname: &str, api_key: &str, database_id: &str) -> Self {
        Self {
            client: Client::new(),
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            database_id: database_id.to_string(),
        }
    }

    /// Create a page with the prompt as its title and the response as
    /// rich text. Any error is reported in the returned `Archival`.
    pub async fn archive(&self, prompt: &str, response: &str) -> Archival {
        let page = NewPage::new(&self.database_id, prompt, response);
        let url = format!("{}/v1/pages", self.api_hostname.trim_end_matches("/"));

        let result = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("Notion-Version", NOTION_VERSION)
            .json(&page)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());

        match result {
            Ok(_) => {
                tracing::info!("Archived exchange to Notion database {}", self.database_id);
                Archival::saved()
            }
            Err(e) => {
                tracing::error!("Notion archival failed: {}", e);
                Archival::failed(e)
            }
        }
    }
}
