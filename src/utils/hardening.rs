//! Start-up Prerequisites
//!
//! Checks that the inference backend is reachable and has the configured
//! model pulled. Problems are logged as warnings; the server starts anyway
//! so it can serve once Ollama comes up.

use tracing::{info, warn};

use crate::agent::{LLMProvider, OllamaProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Ready,
    ModelMissing { available: Vec<String> },
    Unreachable(String),
}

pub struct SystemHardening;

impl SystemHardening {
    /// Run all startup checks and log the outcome
    pub async fn verify_environment(provider: &OllamaProvider) -> BackendStatus {
        info!("Hardening: verifying inference backend...");

        let status = match provider.local_models().await {
            Ok(models) => Self::check_model(provider.model(), models),
            Err(e) => BackendStatus::Unreachable(e.to_string()),
        };

        match &status {
            BackendStatus::Ready => info!("Hardening: model '{}' is available.", provider.model()),
            BackendStatus::ModelMissing { available } => warn!(
                "Hardening: model '{}' is not pulled (available: {}). Run `ollama pull {}`.",
                provider.model(),
                available.join(", "),
                provider.model()
            ),
            BackendStatus::Unreachable(reason) => {
                warn!("Hardening: Ollama is not reachable ({}). Start it with `ollama serve`.", reason)
            }
        }

        status
    }

    fn check_model(model: &str, available: Vec<String>) -> BackendStatus {
        // Ollama reports untagged pulls as "name:latest".
        let wanted = if model.contains(':') {
            model.to_string()
        } else {
            format!("{}:latest", model)
        };

        if available.iter().any(|m| *m == wanted) {
            BackendStatus::Ready
        } else {
            BackendStatus::ModelMissing { available }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tag_is_ready() {
        let status = SystemHardening::check_model("deepseek-r1:8b", vec!["llama3.2:1b".into(), "deepseek-r1:8b".into()]);
        assert_eq!(status, BackendStatus::Ready);
    }

    #[test]
    fn test_untagged_model_matches_latest() {
        let status = SystemHardening::check_model("mistral", vec!["mistral:latest".into()]);
        assert_eq!(status, BackendStatus::Ready);
    }

    #[test]
    fn test_other_tag_is_missing() {
        let status = SystemHardening::check_model("deepseek-r1:8b", vec!["deepseek-r1:14b".into()]);
        assert!(matches!(status, BackendStatus::ModelMissing { .. }));
    }
}
