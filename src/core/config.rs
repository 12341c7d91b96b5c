use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use serde::Serialize;

use super::secrets::Secrets;

/// Which flavor of the chat UI to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// One conversation per session
    Single,
    /// Users can create and switch between conversations
    Rooms,
}

impl Variant {
    pub fn allows_rooms(&self) -> bool {
        matches!(self, Variant::Rooms)
    }
}

/// What to do about archival when the Notion credentials are missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ArchivalPolicy {
    /// Always attempt archival, missing credentials surface as a
    /// failed archival notice
    Always,
    /// Skip archival silently unless both the API key and database ID
    /// are configured
    SkipIfUnconfigured,
}

impl ArchivalPolicy {
    pub fn default_for(variant: Variant) -> Self {
        match variant {
            Variant::Single => ArchivalPolicy::Always,
            Variant::Rooms => ArchivalPolicy::SkipIfUnconfigured,
        }
    }
}

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub variant: Variant,
    pub archival_policy: ArchivalPolicy,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub system_message: Option<String>,
    pub notion_api_hostname: String,
    pub notion_api_key: Option<String>,
    pub notion_database_id: Option<String>,
    /// How long a browser session may sit idle before it is dropped
    pub session_ttl: Duration,
}

impl AppConfig {
    /// Resolve the config from the secrets file and environment. The
    /// `variant` argument (from the CLI) wins over `NOTECHAT_VARIANT`.
    pub fn load(variant: Option<Variant>) -> Result<Self> {
        let secrets_path = env::var("NOTECHAT_SECRETS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./secrets.toml"));
        let secrets = Secrets::load(&secrets_path)?;
        Self::from_sources(&secrets, |k| env::var(k).ok(), variant)
    }

    pub(crate) fn from_sources<F>(
        secrets: &Secrets,
        env_var: F,
        variant: Option<Variant>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let variant = match variant {
            Some(v) => v,
            None => match env_var("NOTECHAT_VARIANT") {
                Some(s) => Variant::from_str(&s, true)
                    .map_err(|e| anyhow!("Invalid NOTECHAT_VARIANT: {}", e))?,
                None => Variant::Rooms,
            },
        };
        let archival_policy = match env_var("NOTECHAT_ARCHIVAL_POLICY") {
            Some(s) => ArchivalPolicy::from_str(&s, true)
                .map_err(|e| anyhow!("Invalid NOTECHAT_ARCHIVAL_POLICY: {}", e))?,
            None => ArchivalPolicy::default_for(variant),
        };
        let openai_api_key = secrets
            .lookup("OPENAI_API_KEY", &env_var)
            .ok_or_else(|| anyhow!("Missing secret OPENAI_API_KEY"))?;
        let openai_api_hostname = env_var("NOTECHAT_LLM_HOST")
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let openai_model =
            env_var("NOTECHAT_LLM_MODEL").unwrap_or_else(|| "gpt-5-nano".to_string());
        let system_message = env_var("NOTECHAT_SYSTEM_MESSAGE").filter(|s| !s.trim().is_empty());
        let notion_api_hostname = env_var("NOTECHAT_NOTION_HOST")
            .unwrap_or_else(|| "https://api.notion.com".to_string());
        let session_ttl = match env_var("NOTECHAT_SESSION_TTL_SECS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| anyhow!("Invalid NOTECHAT_SESSION_TTL_SECS: {}", e))?,
            None => DEFAULT_SESSION_TTL,
        };

        Ok(Self {
            variant,
            archival_policy,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            system_message,
            notion_api_hostname,
            notion_api_key: secrets.lookup("NOTION_API_KEY", &env_var),
            notion_database_id: secrets.lookup("NOTION_DATABASE_ID", &env_var),
            session_ttl,
        })
    }

    /// True when both Notion credentials are present.
    pub fn archival_configured(&self) -> bool {
        self.notion_api_key.is_some() && self.notion_database_id.is_some()
    }
}
