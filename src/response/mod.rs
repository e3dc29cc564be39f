//! Response Module
//!
//! Turns raw model replies into the `{thoughts, output}` HTML pair.

pub mod markdown;
pub mod splitter;

pub use markdown::to_html;
pub use splitter::{SplitOutcome, ThoughtSplitter, TurnReply, DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER};
