//! Canned feedback the front end offers after each story segment.
//!
//! Each option pairs the label shown to the reader with the system message
//! that is appended to the conversation when it is selected.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedbackOption {
    pub label: &'static str,
    pub message: &'static str,
}

pub const FEEDBACK_OPTIONS: &[FeedbackOption] = &[
    FeedbackOption {
        label: "The response was irrelevant",
        message: "The user felt like your response was irrelevant. Try again.",
    },
    FeedbackOption {
        label: "I don't like the direction the story is heading",
        message: "The user did not like the direction you took in your response. Try again.",
    },
    FeedbackOption {
        label: "The story is not cohesive",
        message: "The user felt that the story was not cohesive. Make sure that the story progresses fluidly and comes to a logical conclusion, try again.",
    },
    FeedbackOption {
        label: "The story is too boring",
        message: "The user thought the story was too boring, try again and make it more interesting.",
    },
    FeedbackOption {
        label: "The story is too predictable",
        message: "The user felt like the story was not surprising enough, and could already see where the story was going from an early stage. Try again and subvert expectations tastefully.",
    },
    FeedbackOption {
        label: "The story is too short",
        message: "The story is too short, try again and make it longer.",
    },
    FeedbackOption {
        label: "The content is inappropriate",
        message: "The content you generated is highly inappropriate. Please try again.",
    },
];
