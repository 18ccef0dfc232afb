//! AI query analysis: completion client, response parsing, and the
//! deterministic fallback

mod adapter;
mod client;
mod types;

pub use adapter::{analyze, fallback_analysis, SYSTEM_PROMPT};
pub use client::{AnthropicClient, CompletionClient};
pub use types::{AiAnalysis, Concept};
