//! Services Module
//!
//! Outbound integrations that are not part of the chat core.

pub mod profanity;

pub use profanity::{ProfanityClient, ProfanityError, DEFAULT_PROFANITY_URL};
