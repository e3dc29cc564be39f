//! Service configuration
//!
//! Values come from the process environment (after `.env` is loaded) with
//! defaults suited to a local Ollama install.

use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

use crate::memory::DEFAULT_MAX_SESSIONS;
use crate::response::{DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER};
use crate::services::DEFAULT_PROFANITY_URL;

pub const DEFAULT_INITIAL_MESSAGE: &str = "You are a creative storyteller collaborating with a reader. \
Begin an original short story in a few paragraphs and end at a point where the reader can choose what happens next. \
After each reader prompt, continue the story from where it left off, keeping characters, tone and plot consistent. \
Use Markdown for emphasis and keep each segment to a comfortable reading length.";

#[derive(Debug, Clone, PartialEq)]
pub struct StoryConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub model: String,
    /// System prompt that seeds every new conversation
    pub initial_message: String,
    pub model_timeout: Duration,
    pub think_open: String,
    pub think_close: String,
    pub profanity_url: String,
    pub profanity_api_key: Option<String>,
    pub profanity_timeout: Duration,
    pub max_sessions: usize,
    pub otlp_enabled: bool,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            ollama_host: "http://localhost".to_string(),
            ollama_port: 11434,
            model: "deepseek-r1:8b".to_string(),
            initial_message: DEFAULT_INITIAL_MESSAGE.to_string(),
            model_timeout: Duration::from_secs(300),
            think_open: DEFAULT_OPEN_MARKER.to_string(),
            think_close: DEFAULT_CLOSE_MARKER.to_string(),
            profanity_url: DEFAULT_PROFANITY_URL.to_string(),
            profanity_api_key: None,
            profanity_timeout: Duration::from_secs(15),
            max_sessions: DEFAULT_MAX_SESSIONS,
            otlp_enabled: false,
        }
    }
}

impl StoryConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let initial_message = match lookup("STORY_INITIAL_MESSAGE_FILE") {
            Some(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read initial message from '{}'", path))?,
            None => lookup("STORY_INITIAL_MESSAGE").unwrap_or(defaults.initial_message),
        };

        let ollama_host = lookup("OLLAMA_HOST").unwrap_or(defaults.ollama_host);
        reqwest::Url::parse(&ollama_host).with_context(|| format!("Invalid value for OLLAMA_HOST: '{}'", ollama_host))?;

        Ok(Self {
            bind_addr: lookup("STORY_BIND_ADDR").unwrap_or(defaults.bind_addr),
            ollama_host,
            ollama_port: parse_var(&lookup, "OLLAMA_PORT")?.unwrap_or(defaults.ollama_port),
            model: lookup("STORY_MODEL").unwrap_or(defaults.model),
            initial_message,
            model_timeout: parse_var(&lookup, "STORY_MODEL_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.model_timeout),
            think_open: lookup("STORY_THINK_OPEN").unwrap_or(defaults.think_open),
            think_close: lookup("STORY_THINK_CLOSE").unwrap_or(defaults.think_close),
            profanity_url: lookup("PROFANITY_API_URL").unwrap_or(defaults.profanity_url),
            profanity_api_key: lookup("PROFANITY_API_KEY").filter(|k| !k.is_empty()),
            profanity_timeout: parse_var(&lookup, "PROFANITY_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.profanity_timeout),
            max_sessions: parse_var(&lookup, "STORY_MAX_SESSIONS")?.unwrap_or(defaults.max_sessions),
            otlp_enabled: parse_var(&lookup, "STORY_OTLP_ENABLED")?.unwrap_or(defaults.otlp_enabled),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StoryConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StoryConfig::default());
        assert_eq!(config.model, "deepseek-r1:8b");
        assert_eq!(config.think_close, "</think>");
    }

    #[test]
    fn test_overrides() {
        let config = StoryConfig::from_lookup(lookup_from(&[
            ("STORY_MODEL", "qwen3:4b"),
            ("OLLAMA_PORT", "11500"),
            ("STORY_MODEL_TIMEOUT_SECS", "30"),
            ("PROFANITY_API_KEY", "secret"),
            ("STORY_OTLP_ENABLED", "true"),
            ("STORY_MAX_SESSIONS", "16"),
        ]))
        .unwrap();

        assert_eq!(config.model, "qwen3:4b");
        assert_eq!(config.ollama_port, 11500);
        assert_eq!(config.model_timeout, Duration::from_secs(30));
        assert_eq!(config.profanity_api_key.as_deref(), Some("secret"));
        assert!(config.otlp_enabled);
        assert_eq!(config.max_sessions, 16);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = StoryConfig::from_lookup(lookup_from(&[("OLLAMA_PORT", "eleven")])).unwrap_err();
        assert!(err.to_string().contains("OLLAMA_PORT"));
    }

    #[test]
    fn test_invalid_ollama_host_is_an_error() {
        let err = StoryConfig::from_lookup(lookup_from(&[("OLLAMA_HOST", "not a url")])).unwrap_err();
        assert!(err.to_string().contains("OLLAMA_HOST"));
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let config = StoryConfig::from_lookup(lookup_from(&[("PROFANITY_API_KEY", "")])).unwrap();
        assert_eq!(config.profanity_api_key, None);
    }

    #[test]
    fn test_initial_message_file_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "You narrate noir mysteries.").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = StoryConfig::from_lookup(lookup_from(&[
            ("STORY_INITIAL_MESSAGE", "ignored"),
            ("STORY_INITIAL_MESSAGE_FILE", path.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.initial_message, "You narrate noir mysteries.");
    }
}
