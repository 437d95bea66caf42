//! The seam between the assistant and a remote model.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use vitalsync_core::{ChatMessage, Role};

use crate::error::ClientError;

/// Text fragments of a streamed reply, in emission order.
pub type FragmentStream = BoxStream<'static, Result<String, ClientError>>;

/// Speaker of a turn as the model sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One prior turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl From<&ChatMessage> for Turn {
    fn from(msg: &ChatMessage) -> Self {
        let role = match msg.role {
            Role::User => TurnRole::User,
            Role::Assistant => TurnRole::Model,
        };
        Self {
            role,
            text: msg.text.clone(),
        }
    }
}

/// A fully prepared streaming chat call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub system_instruction: String,
    pub temperature: f32,
    /// Turns before the new message, oldest first.
    pub history: Vec<Turn>,
    /// The newest message, answered by this call.
    pub message: String,
}

/// A remote generative model.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Start a streamed reply to `request`.
    async fn stream_chat(&self, request: ChatRequest) -> Result<FragmentStream, ClientError>;

    /// Single-shot generation. `Ok(None)` means the model answered with no text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, ClientError>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn stream_chat(&self, request: ChatRequest) -> Result<FragmentStream, ClientError> {
        (**self).stream_chat(request).await
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>, ClientError> {
        (**self).generate(prompt).await
    }
}
