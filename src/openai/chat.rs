use anyhow::{Error, Result, bail};

use crate::chat::{Role as TurnRole, Turn};
use crate::openai::{Message, Role, completion};

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        };
        Message::new(role, &turn.content)
    }
}

/// Client for getting the next assistant reply for a conversation.
#[derive(Clone, Debug)]
pub struct CompletionClient {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
    system_message: Option<String>,
}

impl CompletionClient {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_message: None,
        }
    }

    /// Prepend a system message to every request. It is never stored
    /// in the conversation history.
    pub fn system_message(mut self, system_message: Option<&str>) -> Self {
        self.system_message = system_message.map(str::to_string);
        self
    }

    /// Send the whole history and return the content of the newest
    /// assistant message in the reply.
    pub async fn complete(&self, history: &[Turn]) -> Result<String, Error> {
        let mut messages: Vec<Message> = Vec::with_capacity(history.len() + 1);
        if let Some(system) = &self.system_message {
            messages.push(Message::new(Role::System, system));
        }
        messages.extend(history.iter().map(Message::from));

        tracing::debug!(
            "Requesting completion from {} with {} messages",
            self.model,
            messages.len()
        );

        let resp = completion(
            &self.client,
            &messages,
            &self.api_hostname,
            &self.api_key,
            &self.model,
        )
        .await?;

        match resp["choices"][0]["message"]["content"].as_str() {
            Some(msg) => Ok(msg.to_string()),
            None => bail!("No message received. Resp:\n\n {}", resp),
        }
    }
}
