//! Runs one interaction cycle: record the prompt, get a completion,
//! record the reply, then archive the exchange.
use serde::Serialize;

use super::session::{ChatSession, Notice, SessionError, TurnGuard};
use crate::core::{AppConfig, ArchivalPolicy};
use crate::notion::{Archival, NotionClient};
use crate::openai::CompletionClient;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TurnOutcome {
    /// The assistant replied. `archival` is `None` when archival was
    /// skipped.
    Replied {
        room_id: String,
        reply: String,
        archival: Option<Archival>,
    },
    /// The completion failed. The user's turn is still in the room.
    Failed { room_id: String, error: String },
}

impl TurnOutcome {
    /// How the outcome is reported to surfaces that render notices.
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            TurnOutcome::Replied {
                archival: Some(archival),
                ..
            } if archival.success => vec![Notice::info(&archival.message)],
            TurnOutcome::Replied {
                archival: Some(archival),
                ..
            } => vec![Notice::error(&archival.message)],
            TurnOutcome::Replied { archival: None, .. } => Vec::new(),
            TurnOutcome::Failed { error, .. } => vec![Notice::error(error)],
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatRelay {
    completion: CompletionClient,
    archival: Option<NotionClient>,
}

impl ChatRelay {
    pub fn new(completion: CompletionClient, archival: Option<NotionClient>) -> Self {
        Self {
            completion,
            archival,
        }
    }

    /// Build the relay from config, applying the archival policy when
    /// Notion credentials are missing.
    pub fn from_config(config: &AppConfig) -> Self {
        let completion = CompletionClient::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
        )
        .system_message(config.system_message.as_deref());

        let archival = match (config.archival_policy, config.archival_configured()) {
            (_, true) | (ArchivalPolicy::Always, false) => Some(NotionClient::new(
                &config.notion_api_hostname,
                config.notion_api_key.as_deref().unwrap_or_default(),
                config.notion_database_id.as_deref().unwrap_or_default(),
            )),
            (ArchivalPolicy::SkipIfUnconfigured, false) => {
                tracing::info!("Notion credentials not configured, archival disabled");
                None
            }
        };

        Self::new(completion, archival)
    }

    pub fn archival_enabled(&self) -> bool {
        self.archival.is_some()
    }

    /// Submit a prompt to the session's active room and wait for the
    /// reply. Completion errors don't return `Err`, they become a
    /// `TurnOutcome::Failed`. Nothing is queued on the session's
    /// notices, see `submit_with_notices`.
    ///
    /// Dropping the future midway leaves the user's turn in the room
    /// and the session `Idle` again.
    pub async fn submit(
        &self,
        session: &mut ChatSession,
        prompt: &str,
    ) -> Result<TurnOutcome, SessionError> {
        let pending = session.begin_turn(prompt)?;
        let mut session = TurnGuard::new(session);
        tracing::debug!(
            "Session {} room {}: sending {} turns",
            session.id(),
            pending.room_id,
            pending.history.len()
        );

        let reply = match self.completion.complete(&pending.history).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Completion failed: {}. Root cause: {}", e, e.root_cause());
                session.fail_turn();
                return Ok(TurnOutcome::Failed {
                    room_id: pending.room_id,
                    error: format!("Something went wrong: {}", e),
                });
            }
        };

        session.complete_turn(&pending, &reply)?;

        let archival = match &self.archival {
            Some(notion) => Some(notion.archive(&pending.prompt, &reply).await),
            None => None,
        };

        Ok(TurnOutcome::Replied {
            room_id: pending.room_id,
            reply,
            archival,
        })
    }

    /// Like `submit`, then queue the outcome as notices for the next
    /// render. Used by the HTML UI and the REPL.
    pub async fn submit_with_notices(
        &self,
        session: &mut ChatSession,
        prompt: &str,
    ) -> Result<TurnOutcome, SessionError> {
        let outcome = self.submit(session, prompt).await?;
        for notice in outcome.notices() {
            session.push_notice(notice);
        }
        Ok(outcome)
    }
}
