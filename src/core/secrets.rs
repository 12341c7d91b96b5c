//! Secrets resolution. Values come from a TOML secrets file first and
//! fall back to another source, normally environment variables of the
//! same name.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone)]
pub struct Secrets {
    table: toml::Table,
}

impl Secrets {
    /// Load secrets from `path`. A missing file is the same as an
    /// empty one so that deployments can rely on the environment
    /// alone.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .with_context(|| format!("Invalid secrets file {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No secrets file at {}, using environment", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Unable to read {}", path.display())),
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let table = contents.parse::<toml::Table>()?;
        Ok(Self { table })
    }

    /// Look up a secret by name, preferring the secrets file over
    /// `fallback` (usually the environment). Empty values count as
    /// missing.
    pub fn lookup<F>(&self, key: &str, fallback: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.table
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .or_else(|| fallback(key).filter(|v| !v.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_with(value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |_| Some(value.to_string())
    }

    #[test]
    fn test_file_takes_precedence_over_env() {
        let secrets = Secrets::parse(r#"OPENAI_API_KEY = "from-file""#).unwrap();
        let val = secrets.lookup("OPENAI_API_KEY", env_with("from-env"));
        assert_eq!(val, Some("from-file".to_string()));
    }

    #[test]
    fn test_falls_back_to_env() {
        let secrets = Secrets::parse(r#"OTHER = "x""#).unwrap();
        let val = secrets.lookup("NOTION_API_KEY", env_with("from-env"));
        assert_eq!(val, Some("from-env".to_string()));
    }

    #[test]
    fn test_empty_values_are_missing() {
        let secrets = Secrets::parse(r#"NOTION_DATABASE_ID = "  ""#).unwrap();
        assert_eq!(secrets.lookup("NOTION_DATABASE_ID", |_| None), None);
        assert_eq!(Secrets::default().lookup("NOTION_DATABASE_ID", env_with("")), None);
    }

    #[test]
    fn test_empty_file_value_falls_back_to_env() {
        let secrets = Secrets::parse(r#"OPENAI_API_KEY = """#).unwrap();
        let val = secrets.lookup("OPENAI_API_KEY", env_with("from-env"));
        assert_eq!(val, Some("from-env".to_string()));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = Secrets::load(&dir.path().join("secrets.toml")).unwrap();
        assert_eq!(secrets.lookup("OPENAI_API_KEY", |_| None), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NOTION_API_KEY = \"secret_abc\"").unwrap();
        let secrets = Secrets::load(file.path()).unwrap();
        assert_eq!(
            secrets.lookup("NOTION_API_KEY", |_| None),
            Some("secret_abc".to_string())
        );
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml =").unwrap();
        assert!(Secrets::load(file.path()).is_err());
    }
}
