//! # VitalSync AI Integration
//!
//! This crate turns the user's knowledge base and profile into a system
//! instruction and talks to a hosted Gemini model on their behalf.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Documents +    │ --> │   Assistant     │ --> │  ChatBackend    │
//! │  Profile        │     │ (chat / tips)   │     │  (Gemini SSE)   │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//!                               │
//!                         ┌─────┴─────┐
//!                         │ on_chunk  │
//!                         └───────────┘
//! ```
//!
//! Failures never escape the [`Assistant`]: chat replies degrade to a fixed
//! apology and tips to one of two fixed sentences.
//!
//! ## Usage
//!
//! ```ignore
//! use vitalsync_ai::{AIConfig, Assistant, GeminiClient};
//!
//! let client = GeminiClient::new(AIConfig::from_env())?;
//! let assistant = Assistant::new(client);
//!
//! let reply = assistant
//!     .stream_reply(&history, &docs, &profile, |chunk| print!("{chunk}"))
//!     .await;
//! ```

mod assistant;
mod backend;
mod chat;
mod client;
mod config;
mod error;
pub mod prompt;
mod sse;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod tip;

pub use assistant::Assistant;
pub use backend::{ChatBackend, ChatRequest, FragmentStream, Turn, TurnRole};
pub use chat::{build_chat_request, CHAT_TEMPERATURE, CONNECTION_APOLOGY, HISTORY_WINDOW};
pub use client::GeminiClient;
pub use config::{AIConfig, AIConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{AIError, ClientError};
pub use tip::{TIP_EMPTY_FALLBACK, TIP_ERROR_FALLBACK};

// Re-export core types for convenience
pub use vitalsync_core::{ChatMessage, KnowledgeDoc, Role, UserProfile};
