//! Remote language-model agent client for the dashboard
//!
//! Wraps Groq's OpenAI-compatible chat completions behind a single
//! `summarize(ticker)` call and cleans tool-call chatter out of the reply.
//! The agent's internal behavior is opaque; a failure here never aborts
//! the rest of an analysis.

pub mod error;
pub mod provider;
pub mod sanitize;

pub use error::{AgentError, Result};
pub use provider::{GroqClient, GroqConfig};
pub use sanitize::strip_tool_chatter;
