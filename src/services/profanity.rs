//! Profanity Scoring Proxy
//!
//! Forwards text to a third-party profanity scoring API and hands the JSON
//! body back untouched. The front end uses it to screen prompts and replies.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_PROFANITY_URL: &str = "https://greipapi.com/scoring/profanity";

#[derive(Debug, Error)]
pub enum ProfanityError {
    #[error("Failed to fetch data from the API")]
    UpstreamStatus(StatusCode),
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

pub struct ProfanityClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl ProfanityClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, ProfanityError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }

    /// Score `text` and return the upstream JSON on a 200 response
    pub async fn score(&self, text: &str) -> Result<serde_json::Value, ProfanityError> {
        let mut request = self.client.get(&self.url).query(&[("text", text)]);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await?;
        if res.status() != StatusCode::OK {
            warn!("Profanity API returned {}", res.status());
            return Err(ProfanityError::UpstreamStatus(res.status()));
        }

        let json: serde_json::Value = res.json().await?;
        debug!("Profanity score: {}", json);
        Ok(json)
    }
}
