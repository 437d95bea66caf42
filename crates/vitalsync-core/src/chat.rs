//! Chat messages and the session transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::UserProfile;

/// Identifier of a message within a transcript.
pub type MessageId = u64;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(id: MessageId, role: Role, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Role::User, text)
    }

    pub fn assistant(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, text)
    }

    /// Opening assistant message for a new conversation.
    pub fn greeting(id: MessageId, profile: &UserProfile, doc_count: usize) -> Self {
        Self::assistant(
            id,
            format!(
                "Hi {}! I'm your personalized health assistant. I have access to your \
                 **{} health records** to provide tailored advice. How are you feeling today?",
                profile.name, doc_count
            ),
        )
    }
}

/// Ordered conversation history.
///
/// At most one assistant message is pending at a time. Streamed text may
/// only be appended to that message; once the reply is finished it is
/// frozen like every other message.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    pending: Option<MessageId>,
    next_id: MessageId,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript with the assistant's greeting.
    pub fn with_greeting(profile: &UserProfile, doc_count: usize) -> Self {
        let mut transcript = Self::new();
        let id = transcript.allocate_id();
        transcript
            .messages
            .push(ChatMessage::greeting(id, profile, doc_count));
        transcript
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a user message and return its id.
    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage::user(id, text));
        id
    }

    /// Append an empty assistant message that will receive streamed text.
    ///
    /// A reply that is still pending is frozen first.
    pub fn begin_reply(&mut self) -> MessageId {
        if self.pending.is_some() {
            warn!("Starting a reply while another is pending; freezing the previous one");
            self.finish_reply();
        }

        let id = self.allocate_id();
        self.messages.push(ChatMessage::assistant(id, String::new()));
        self.pending = Some(id);
        id
    }

    /// Append a streamed fragment to the pending reply.
    pub fn append_chunk(&mut self, chunk: &str) {
        let Some(id) = self.pending else {
            warn!("Dropping chunk: no reply is pending");
            return;
        };

        if let Some(msg) = self.messages.iter_mut().rev().find(|m| m.id == id) {
            msg.text.push_str(chunk);
        }
    }

    /// Freeze the pending reply, returning its id.
    pub fn finish_reply(&mut self) -> Option<MessageId> {
        self.pending.take()
    }

    /// Close a reply that stopped streaming before it finished.
    ///
    /// `fallback` is appended so the reply never stays empty. Does nothing
    /// when no reply is pending.
    pub fn cancel_reply(&mut self, fallback: &str) -> Option<MessageId> {
        let id = self.pending?;
        debug!("Reply {} cancelled", id);
        self.append_chunk(fallback);
        self.finish_reply()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new("Alex", "Reduce cholesterol")
    }

    #[test]
    fn test_greeting() {
        let transcript = Transcript::with_greeting(&profile(), 2);
        assert_eq!(transcript.len(), 1);

        let greeting = &transcript.messages()[0];
        assert_eq!(greeting.role, Role::Assistant);
        assert!(greeting.text.starts_with("Hi Alex!"));
        assert!(greeting.text.contains("**2 health records**"));
    }

    #[test]
    fn test_streamed_reply() {
        let mut transcript = Transcript::with_greeting(&profile(), 0);
        transcript.push_user("How am I doing?");
        let id = transcript.begin_reply();
        assert!(transcript.is_pending());
        assert_eq!(transcript.get(id).unwrap().text, "");

        transcript.append_chunk("Pretty ");
        transcript.append_chunk("well.");
        assert_eq!(transcript.finish_reply(), Some(id));

        assert!(!transcript.is_pending());
        assert_eq!(transcript.get(id).unwrap().text, "Pretty well.");
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_frozen_reply_ignores_chunks() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_reply();
        transcript.append_chunk("done");
        transcript.finish_reply();

        transcript.append_chunk(" late");
        assert_eq!(transcript.get(id).unwrap().text, "done");
    }

    #[test]
    fn test_cancelled_reply_gets_fallback() {
        let mut transcript = Transcript::with_greeting(&profile(), 0);
        transcript.push_user("Hello?");
        let id = transcript.begin_reply();

        assert_eq!(transcript.cancel_reply("Try again later."), Some(id));
        assert!(!transcript.is_pending());
        assert_eq!(transcript.get(id).unwrap().text, "Try again later.");

        assert_eq!(transcript.cancel_reply("again"), None);
        assert_eq!(transcript.get(id).unwrap().text, "Try again later.");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut transcript = Transcript::with_greeting(&profile(), 0);
        let a = transcript.push_user("one");
        let b = transcript.begin_reply();
        transcript.finish_reply();
        let c = transcript.push_user("two");

        let mut ids: Vec<_> = transcript.messages().iter().map(|m| m.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(a < b && b < c);
    }
}
