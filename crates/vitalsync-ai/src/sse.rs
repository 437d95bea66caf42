//! Server-sent events decoding for streamed Gemini replies.

use std::collections::VecDeque;

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use tracing::debug;

use crate::backend::FragmentStream;
use crate::client::GenerateContentResponse;
use crate::error::ClientError;

/// Splits a byte stream into SSE event payloads.
///
/// Only `data:` fields are kept; multiple data lines of one event are
/// joined with `\n`. Bytes are buffered until a full line is available so
/// multi-byte characters split across chunks survive.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed bytes, returning every event completed by them.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.process_line(line.trim_end_matches(['\n', '\r']), &mut events);
        }
        events
    }

    /// Flush an event left open when the stream ended.
    pub(crate) fn finish(&mut self) -> Option<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            self.process_line(line.trim_end_matches('\r'), &mut events);
        }
        self.dispatch(&mut events);
        events.pop()
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            self.dispatch(events);
        } else if line.starts_with(':') {
            // comment / keep-alive
        } else if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.data.push(value.to_string());
        }
    }

    fn dispatch(&mut self, events: &mut Vec<String>) {
        if !self.data.is_empty() {
            events.push(self.data.join("\n"));
            self.data.clear();
        }
    }
}

/// Decode one event payload into a text fragment.
///
/// Returns `Ok(None)` for payloads carrying no text.
pub(crate) fn decode_event(payload: &str) -> Result<Option<String>, ClientError> {
    if payload.trim() == "[DONE]" {
        return Ok(None);
    }

    let response: GenerateContentResponse = serde_json::from_str(payload)?;
    if let Some(error) = response.error {
        return Err(ClientError::Api {
            status: error.code,
            message: error.message,
        });
    }

    let text = response.text();
    Ok((!text.is_empty()).then_some(text))
}

struct FragmentState<E> {
    inner: BoxStream<'static, Result<Vec<u8>, E>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, ClientError>>,
    finished: bool,
}

impl<E> FragmentState<E> {
    fn enqueue(&mut self, payload: &str) {
        match decode_event(payload) {
            Ok(Some(text)) => self.pending.push_back(Ok(text)),
            Ok(None) => debug!("Skipping event without text"),
            Err(e) => {
                self.pending.push_back(Err(e));
                self.finished = true;
            }
        }
    }
}

/// Turn a raw SSE byte stream into non-empty text fragments.
///
/// The first error ends the stream.
pub(crate) fn fragments<S, B, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]>,
    E: Into<ClientError> + Send + 'static,
{
    let state = FragmentState {
        inner: bytes.map(|chunk| chunk.map(|b| b.as_ref().to_vec())).boxed(),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.inner.next().await {
                Some(Ok(bytes)) => {
                    for payload in state.decoder.push(&bytes) {
                        state.enqueue(&payload);
                        if state.finished {
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    state.pending.push_back(Err(e.into()));
                    state.finished = true;
                }
                None => {
                    if let Some(payload) = state.decoder.finish() {
                        state.enqueue(&payload);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"role\":\"model\",\"parts\":[{{\"text\":{}}}]}}}}]}}\r\n\r\n",
            serde_json::to_string(text).unwrap()
        )
    }

    #[test]
    fn test_decoder_splits_events() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push(b"data: one\n\ndata: two\n\n");
        assert_eq!(events, vec!["one", "two"]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_decoder_handles_partial_lines_and_crlf() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: hel").is_empty());
        assert!(decoder.push(b"lo\r\n").is_empty());
        assert_eq!(decoder.push(b"\r\n"), vec!["hello"]);
    }

    #[test]
    fn test_decoder_joins_data_lines_and_ignores_comments() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push(b": ping\nevent: message\ndata: a\ndata: b\n\n");
        assert_eq!(events, vec!["a\nb"]);
    }

    #[test]
    fn test_decoder_keeps_split_utf8() {
        let bytes = "data: héllo\n\n".as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;

        let mut decoder = SseDecoder::default();
        assert!(decoder.push(&bytes[..split]).is_empty());
        assert_eq!(decoder.push(&bytes[split..]), vec!["héllo"]);
    }

    #[test]
    fn test_decoder_flushes_unterminated_event() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
    }

    #[test]
    fn test_decode_event() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"Hi "},{"text":"there"}]}}]}"#;
        assert_eq!(decode_event(payload).unwrap().as_deref(), Some("Hi there"));

        let empty = r#"{"candidates":[{"content":{"parts":[]}}]}"#;
        assert_eq!(decode_event(empty).unwrap(), None);

        let error = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            decode_event(error),
            Err(ClientError::Api { status: 429, .. })
        ));

        assert!(matches!(decode_event("not json"), Err(ClientError::Json(_))));
    }

    #[tokio::test]
    async fn test_fragments_in_order() {
        let body = format!("{}{}{}", event("Eat "), event(""), event("more fiber."));
        // Split at arbitrary byte offsets
        let chunks: Vec<Result<Vec<u8>, ClientError>> = body
            .as_bytes()
            .chunks(7)
            .map(|c| Ok(c.to_vec()))
            .collect();

        let out: Vec<String> = fragments(stream::iter(chunks))
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(out, vec!["Eat ", "more fiber."]);
    }

    #[tokio::test]
    async fn test_fragments_stop_at_first_error() {
        let chunks: Vec<Result<Vec<u8>, ClientError>> = vec![
            Ok(event("partial").into_bytes()),
            Err(ClientError::Api {
                status: 500,
                message: "reset".to_string(),
            }),
            Ok(event("never").into_bytes()),
        ];

        let out: Vec<Result<String, ClientError>> =
            fragments(stream::iter(chunks)).collect().await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_deref().unwrap(), "partial");
        assert!(out[1].is_err());
    }

    #[tokio::test]
    async fn test_fragments_flush_tail_without_blank_line() {
        let body = event("last").trim_end().to_string();
        let chunks: Vec<Result<Vec<u8>, ClientError>> = vec![Ok(body.into_bytes())];

        let out: Vec<String> = fragments(stream::iter(chunks))
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(out, vec!["last"]);
    }
}
