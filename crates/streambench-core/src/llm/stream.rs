//! OpenAI-compatible chat completion chunk stream
//!
//! Turns the raw SSE byte stream of a `stream: true` chat completion into
//! [`StreamChunk`] values. Payloads that cannot be understood are yielded as
//! empty chunks; only transport failures and provider error objects end the
//! stream with an error.

use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;

use super::delta::StreamChunk;
use super::sse_decoder::{SseDecoder, SseEvent};
use crate::error::{BenchError, BenchResult};

/// Stream of chunks produced by one streaming request
pub type ChunkStream = Pin<Box<dyn Stream<Item = BenchResult<StreamChunk>> + Send>>;

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    reasoning_content: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// What one SSE event means for the chunk stream
#[derive(Debug)]
enum ParsedEvent {
    Chunk(StreamChunk),
    Done,
    Failed(BenchError),
}

fn parse_event(event: &SseEvent) -> ParsedEvent {
    if event.is_done() {
        return ParsedEvent::Done;
    }

    let payload: ChatCompletionChunk = match serde_json::from_str(&event.data) {
        Ok(payload) => payload,
        Err(err) => {
            if event.is_error_event() {
                return ParsedEvent::Failed(BenchError::api(event.data.trim()));
            }
            tracing::debug!("Skipping unparseable stream payload: {}", err);
            return ParsedEvent::Chunk(StreamChunk::empty());
        }
    };

    if let Some(error) = payload.error {
        return ParsedEvent::Failed(BenchError::api(error_description(&error)));
    }
    if event.is_error_event() {
        return ParsedEvent::Failed(BenchError::api(event.data.trim()));
    }

    let delta = payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .unwrap_or_default();

    ParsedEvent::Chunk(StreamChunk {
        reasoning: delta
            .reasoning_content
            .filter(|text| !text.is_empty())
            .or(delta.reasoning),
        content: delta.content,
    })
}

/// Best human-readable text out of a provider error value
pub(crate) fn error_description(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

struct ChunkStreamState<S> {
    bytes: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<BenchResult<StreamChunk>>,
    finished: bool,
}

impl<S> ChunkStreamState<S> {
    fn enqueue(&mut self, events: impl IntoIterator<Item = SseEvent>) {
        for event in events {
            match parse_event(&event) {
                ParsedEvent::Chunk(chunk) => self.pending.push_back(Ok(chunk)),
                ParsedEvent::Done => {
                    tracing::debug!("Received end-of-stream marker");
                    self.finish();
                    return;
                }
                ParsedEvent::Failed(err) => {
                    self.pending.push_back(Err(err));
                    self.finish();
                    return;
                }
            }
        }
    }

    fn finish(&mut self) {
        if self.decoder.has_remaining() {
            tracing::debug!("Discarding buffered input after the end of the stream");
        }
        self.finished = true;
        self.decoder.clear();
    }
}

/// Decode an SSE byte stream into chat completion chunks.
///
/// Ends after `data: [DONE]`, after the body ends, or right after the first
/// error item.
pub fn sse_chunk_stream<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = ChunkStreamState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    let stream = futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(bytes)) => {
                    let events = state.decoder.feed(bytes.as_ref());
                    state.enqueue(events);
                }
                Some(Err(err)) => {
                    state
                        .pending
                        .push_back(Err(BenchError::stream(format!(
                            "Response stream interrupted: {}",
                            err
                        ))));
                    state.finish();
                }
                None => {
                    let cut = state.decoder.undecoded_len();
                    if cut > 0 {
                        tracing::warn!(bytes = cut, "Response body ended inside a UTF-8 sequence");
                    }
                    let trailing = state.decoder.finish();
                    state.enqueue(trailing);
                    state.finished = true;
                }
            }
        }
    });

    Box::pin(stream)
}
