//! Session driver for VitalSync.
//!
//! A [`Session`] owns everything one user interaction needs:
//! 1. The knowledge base (documents, newest first)
//! 2. The user profile
//! 3. The chat transcript
//! 4. The visible view
//!
//! and exposes the operations a front end calls. Only one chat reply can
//! stream at a time; a message sent while a reply is streaming is rejected
//! rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};
use vitalsync_ai::{Assistant, ChatBackend, CONNECTION_APOLOGY};
use vitalsync_core::{
    seed, ChatMessage, CoreError, DocumentStore, KnowledgeDoc, NewDocument, Transcript,
    UserProfile, ViewController, ViewState,
};

/// Errors returned at the session boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The message was blank; nothing was sent.
    #[error("message must not be empty")]
    EmptyMessage,

    /// A reply is still streaming.
    #[error("a reply is still streaming; wait for it to finish")]
    Busy,

    #[error(transparent)]
    Document(#[from] CoreError),
}

/// Holds the busy flag for as long as it lives.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Closes the pending reply if the send is abandoned mid-stream.
struct ReplyGuard<'a> {
    transcript: &'a Mutex<Transcript>,
}

impl Drop for ReplyGuard<'_> {
    fn drop(&mut self) {
        if lock(self.transcript).cancel_reply(CONNECTION_APOLOGY).is_some() {
            warn!("Reply abandoned before it finished streaming");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State of one user session.
pub struct Session<B> {
    assistant: Assistant<B>,
    profile: UserProfile,
    store: Mutex<DocumentStore>,
    transcript: Mutex<Transcript>,
    views: Mutex<ViewController>,
    busy: AtomicBool,
}

impl<B: ChatBackend> Session<B> {
    /// Start a session. The transcript opens with a greeting that mentions
    /// how many documents are on file.
    pub fn new(backend: B, profile: UserProfile, docs: Vec<KnowledgeDoc>) -> Self {
        let store = DocumentStore::with_documents(docs);
        let transcript = Transcript::with_greeting(&profile, store.len());

        Self {
            assistant: Assistant::new(backend),
            profile,
            store: Mutex::new(store),
            transcript: Mutex::new(transcript),
            views: Mutex::new(ViewController::new()),
            busy: AtomicBool::new(false),
        }
    }

    /// Start a session with the sample profile and documents.
    pub fn with_seed_data(backend: B) -> Self {
        Self::new(backend, seed::initial_profile(), seed::initial_documents())
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn assistant(&self) -> &Assistant<B> {
        &self.assistant
    }

    /// Whether a reply is currently streaming.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    // Documents

    /// Add a document to the front of the knowledge base.
    pub fn add_document(&self, new: NewDocument) -> Result<KnowledgeDoc, SessionError> {
        let mut store = lock(&self.store);
        let doc = store.add(new)?.clone();
        info!("Added document '{}' ({} total)", doc.title, store.len());
        Ok(doc)
    }

    /// Remove a document. Returns whether anything was removed.
    pub fn remove_document(&self, id: &str) -> bool {
        let removed = lock(&self.store).remove(id);
        match &removed {
            Some(doc) => info!("Removed document '{}'", doc.title),
            None => debug!("No document with id {}", id),
        }
        removed.is_some()
    }

    /// Documents in display order.
    pub fn documents(&self) -> Vec<KnowledgeDoc> {
        lock(&self.store).snapshot()
    }

    // Chat

    /// Copy of the conversation so far.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.transcript).messages().to_vec()
    }

    /// Send a user message and stream the assistant's reply into the
    /// transcript, returning the full reply.
    ///
    /// Blank messages and messages sent while another reply is streaming
    /// are rejected without touching the transcript or the backend.
    pub async fn send_message(&self, text: &str) -> Result<String, SessionError> {
        self.send_message_streaming(text, |_| {}).await
    }

    /// Like [`send_message`](Self::send_message), additionally passing each
    /// fragment to `on_chunk` after it has been applied to the transcript.
    pub async fn send_message_streaming<F>(
        &self,
        text: &str,
        mut on_chunk: F,
    ) -> Result<String, SessionError>
    where
        F: FnMut(&str),
    {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            warn!("Rejected message: a reply is still streaming");
            return Err(SessionError::Busy);
        };

        let history = {
            let mut transcript = lock(&self.transcript);
            transcript.push_user(text);
            let history = transcript.messages().to_vec();
            transcript.begin_reply();
            history
        };
        let reply_guard = ReplyGuard {
            transcript: &self.transcript,
        };
        let docs = self.documents();

        let reply = self
            .assistant
            .stream_reply(&history, &docs, &self.profile, |chunk| {
                lock(&self.transcript).append_chunk(chunk);
                on_chunk(chunk);
            })
            .await;

        lock(&self.transcript).finish_reply();
        drop(reply_guard);
        Ok(reply)
    }

    /// A personalized tip based on the current documents.
    pub async fn daily_tip(&self) -> String {
        let docs = self.documents();
        self.assistant.daily_tip(&self.profile, &docs).await
    }

    // Views

    pub fn current_view(&self) -> ViewState {
        lock(&self.views).current()
    }

    pub fn navigate(&self, view: ViewState) {
        lock(&self.views).navigate(view);
    }

    /// The dashboard's "Start Chat" action.
    pub fn start_chat(&self) {
        lock(&self.views).start_chat();
    }
}
