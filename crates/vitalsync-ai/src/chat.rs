//! Streamed chat replies.

use futures_util::StreamExt;
use tracing::{debug, error, info};
use vitalsync_core::{ChatMessage, KnowledgeDoc, UserProfile};

use crate::assistant::Assistant;
use crate::backend::{ChatBackend, ChatRequest, Turn};
use crate::error::AIError;
use crate::prompt;

/// Most recent messages sent with each request.
pub const HISTORY_WINDOW: usize = 10;

/// Sampling temperature for chat replies.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Reply used in place of the model's when anything goes wrong.
pub const CONNECTION_APOLOGY: &str =
    "I'm having trouble connecting to the service right now. Please try again later.";

/// Prepare the remote call for `history`.
///
/// Only the last [`HISTORY_WINDOW`] messages are used. The newest of those
/// becomes the query and the rest become prior turns. Role alternation is
/// not checked.
pub fn build_chat_request(
    history: &[ChatMessage],
    docs: &[KnowledgeDoc],
    profile: &UserProfile,
) -> Result<ChatRequest, AIError> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut turns: Vec<Turn> = history[start..].iter().map(Turn::from).collect();
    let last = turns.pop().ok_or(AIError::EmptyHistory)?;

    Ok(ChatRequest {
        system_instruction: prompt::system_instruction(profile, docs),
        temperature: CHAT_TEMPERATURE,
        history: turns,
        message: last.text,
    })
}

impl<B: ChatBackend> Assistant<B> {
    /// Stream a reply to the newest message in `history`.
    ///
    /// Each fragment is passed to `on_chunk` as it arrives, in order, and
    /// the concatenated text is returned. On any failure the apology is
    /// passed to `on_chunk` and returned instead, so the caller always ends
    /// up with a non-empty reply.
    pub async fn stream_reply<F>(
        &self,
        history: &[ChatMessage],
        docs: &[KnowledgeDoc],
        profile: &UserProfile,
        mut on_chunk: F,
    ) -> String
    where
        F: FnMut(&str),
    {
        match self.try_stream_reply(history, docs, profile, &mut on_chunk).await {
            Ok(text) => text,
            Err(e) => {
                error!("Chat request failed: {}", e);
                on_chunk(CONNECTION_APOLOGY);
                CONNECTION_APOLOGY.to_string()
            }
        }
    }

    async fn try_stream_reply<F>(
        &self,
        history: &[ChatMessage],
        docs: &[KnowledgeDoc],
        profile: &UserProfile,
        on_chunk: &mut F,
    ) -> Result<String, AIError>
    where
        F: FnMut(&str),
    {
        let request = build_chat_request(history, docs, profile)?;
        info!(
            "Sending chat request ({} prior turns, {} documents)",
            request.history.len(),
            docs.len()
        );

        let mut stream = self.backend().stream_chat(request).await?;

        let mut full_text = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            if fragment.is_empty() {
                continue;
            }
            full_text.push_str(&fragment);
            on_chunk(&fragment);
        }

        debug!("Stream complete ({} bytes)", full_text.len());
        Ok(full_text)
    }
}
