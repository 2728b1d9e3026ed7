//! recap - Message summarization and recommendation API with an LLM backend
//!
//! Summarizes incoming messages in one clear sentence via an LLM, caches the
//! results in memory, and turns summaries into recommendation records.

pub mod cache;
pub mod cli;
pub mod config;
pub mod llm;
pub mod recommend;
pub mod server;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "recap";
