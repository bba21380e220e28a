//! Client for the hosted text-generation provider (Anthropic Messages API)
//! and the proposal generation orchestrator built on top of it.

pub mod client;
pub mod generate;
pub mod messages;

pub use client::{LlmClient, LlmConfig, LlmError};
pub use generate::generate_proposal;
