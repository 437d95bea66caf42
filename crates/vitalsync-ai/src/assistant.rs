//! Assistant - the main entry point for chat replies and daily tips.

use crate::backend::ChatBackend;

/// Personalized health assistant on top of a [`ChatBackend`].
///
/// Holds no conversation state of its own: history, documents and profile
/// are passed in on every call and nothing passed in is mutated.
pub struct Assistant<B> {
    backend: B,
}

impl<B: ChatBackend> Assistant<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
