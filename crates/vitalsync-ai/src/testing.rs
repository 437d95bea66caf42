//! Scripted in-memory backend for tests.
//!
//! Replies are consumed in the order they were queued. When the queue is
//! empty a chat call answers `"OK"` and a tip call answers
//! `"Eat more greens today."`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::sync::Notify;

use crate::backend::{ChatBackend, ChatRequest, FragmentStream};
use crate::error::ClientError;

/// Outcome of one scripted chat call.
#[derive(Debug, Clone)]
pub enum ChatScript {
    /// Stream these fragments, then end.
    Reply(Vec<String>),
    /// Fail before any fragment is produced.
    Fail,
    /// Stream these fragments, then fail.
    FailAfter(Vec<String>),
}

impl ChatScript {
    pub fn reply<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ChatScript::Reply(fragments.into_iter().map(Into::into).collect())
    }

    pub fn fail_after<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ChatScript::FailAfter(fragments.into_iter().map(Into::into).collect())
    }
}

/// Outcome of one scripted tip call.
#[derive(Debug, Clone)]
pub enum TipScript {
    Text(String),
    Empty,
    Fail,
}

/// A [`ChatBackend`] that plays back queued replies and records requests.
#[derive(Default)]
pub struct ScriptedBackend {
    chat: Mutex<VecDeque<ChatScript>>,
    tips: Mutex<VecDeque<TipScript>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    tip_prompts: Mutex<Vec<String>>,
    chat_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn scripted_error() -> ClientError {
    ClientError::Api {
        status: 503,
        message: "scripted failure".to_string(),
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next unscripted chat call.
    pub fn with_chat(self, script: ChatScript) -> Self {
        lock(&self.chat).push_back(script);
        self
    }

    /// Queue the outcome of the next unscripted tip call.
    pub fn with_tip(self, script: TipScript) -> Self {
        lock(&self.tips).push_back(script);
        self
    }

    /// Hold every chat call until `gate` is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of chat calls received so far, including ones still waiting
    /// on the gate.
    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        lock(&self.chat_requests).clone()
    }

    pub fn tip_prompts(&self) -> Vec<String> {
        lock(&self.tip_prompts).clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn stream_chat(&self, request: ChatRequest) -> Result<FragmentStream, ClientError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.chat_requests).push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let script = lock(&self.chat)
            .pop_front()
            .unwrap_or_else(|| ChatScript::reply(["OK"]));

        match script {
            ChatScript::Reply(fragments) => {
                Ok(stream::iter(fragments.into_iter().map(Ok::<String, ClientError>)).boxed())
            }
            ChatScript::Fail => Err(scripted_error()),
            ChatScript::FailAfter(fragments) => Ok(stream::iter(
                fragments
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(scripted_error()))),
            )
            .boxed()),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>, ClientError> {
        lock(&self.tip_prompts).push(prompt.to_string());

        let script = lock(&self.tips)
            .pop_front()
            .unwrap_or_else(|| TipScript::Text("Eat more greens today.".to_string()));

        match script {
            TipScript::Text(text) => Ok(Some(text)),
            TipScript::Empty => Ok(None),
            TipScript::Fail => Err(scripted_error()),
        }
    }
}
