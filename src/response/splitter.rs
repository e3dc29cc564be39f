//! Thought Splitter
//!
//! Reasoning models such as deepseek-r1 emit their chain of thought between
//! `<think>` and `</think>` before the actual answer. This module separates
//! the two and renders each half to HTML.

use serde::Serialize;
use tracing::{debug, warn};

use super::markdown::to_html;

pub const DEFAULT_OPEN_MARKER: &str = "<think>";
pub const DEFAULT_CLOSE_MARKER: &str = "</think>";

/// Result of splitting a raw model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Exactly one closing marker was found
    Separated { thoughts: String, output: String },
    /// Closing marker missing or repeated; everything is output
    OutputOnly { output: String },
}

impl SplitOutcome {
    pub fn thoughts(&self) -> Option<&str> {
        match self {
            SplitOutcome::Separated { thoughts, .. } => Some(thoughts),
            SplitOutcome::OutputOnly { .. } => None,
        }
    }

    pub fn output(&self) -> &str {
        match self {
            SplitOutcome::Separated { output, .. } | SplitOutcome::OutputOnly { output } => output,
        }
    }
}

/// HTML-rendered reply returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReply {
    pub thoughts: Option<String>,
    pub output: String,
}

impl From<SplitOutcome> for TurnReply {
    fn from(outcome: SplitOutcome) -> Self {
        match outcome {
            SplitOutcome::Separated { thoughts, output } => Self {
                thoughts: Some(to_html(&thoughts)),
                output: to_html(&output),
            },
            SplitOutcome::OutputOnly { output } => Self {
                thoughts: None,
                output: to_html(&output),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThoughtSplitter {
    open: String,
    close: String,
}

impl ThoughtSplitter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Separate thoughts from output without rendering
    pub fn split(&self, raw: &str) -> SplitOutcome {
        let text = if self.open.is_empty() {
            raw.to_string()
        } else {
            raw.replace(&self.open, "")
        };

        if self.close.is_empty() {
            return SplitOutcome::OutputOnly { output: text };
        }

        let markers = text.matches(self.close.as_str()).count();
        if markers != 1 {
            // Missing and duplicated markers are deliberately one branch.
            warn!("Expected one '{}' marker, found {}; treating reply as output only", self.close, markers);
            return SplitOutcome::OutputOnly { output: text };
        }

        match text.split_once(self.close.as_str()) {
            Some((thoughts, output)) => {
                debug!("Split reply: {} bytes of thoughts, {} bytes of output", thoughts.len(), output.len());
                SplitOutcome::Separated {
                    thoughts: thoughts.to_string(),
                    output: output.to_string(),
                }
            }
            None => SplitOutcome::OutputOnly { output: text },
        }
    }

    /// Split and render both halves to HTML
    pub fn render(&self, raw: &str) -> TurnReply {
        self.split(raw).into()
    }
}

impl Default for ThoughtSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_MARKER, DEFAULT_CLOSE_MARKER)
    }
}
