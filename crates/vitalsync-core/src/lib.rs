//! # VitalSync Core
//!
//! Session-scoped data for the VitalSync health assistant: the user's
//! knowledge base, their profile, the chat transcript and the currently
//! selected view.
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  DocumentStore  │ --> │    Context      │ --> │   Transcript    │
//! │  + UserProfile  │     │  (vitalsync-ai) │     │ (streamed text) │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Nothing here performs I/O. All state lives in memory for the duration
//! of one session.

mod chat;
mod document;
mod error;
mod metrics;
mod profile;
pub mod seed;
mod view;

pub use chat::{ChatMessage, MessageId, Role, Transcript};
pub use document::{Category, DocumentStore, KnowledgeDoc, NewDocument};
pub use error::CoreError;
pub use metrics::{dashboard_stats, DashboardStat, HealthMetric, MetricSummary};
pub use profile::UserProfile;
pub use view::{ViewController, ViewState};
