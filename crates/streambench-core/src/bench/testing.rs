//! Scripted clients for engine tests

use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::clock::ManualClock;
use crate::config::EndpointConfig;
use crate::error::{BenchError, BenchResult};
use crate::llm::{ChatStreamClient, ChunkStream, StreamChunk};
use crate::types::EndpointId;

/// One scripted event; the clock is moved to `at` before it takes effect
pub(crate) enum Step {
    Chunk { at: u64, chunk: StreamChunk },
    Fail { at: u64, error: BenchError },
    End { at: u64 },
}

impl Step {
    pub(crate) fn chunk(at: u64, chunk: StreamChunk) -> Self {
        Self::Chunk { at, chunk }
    }
}

type Script = Result<Vec<Step>, BenchError>;

/// Replays a fixed script per endpoint against a [`ManualClock`]
pub(crate) struct ScriptedClient {
    clock: Arc<ManualClock>,
    scripts: Mutex<HashMap<EndpointId, Script>>,
}

impl ScriptedClient {
    pub(crate) fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            scripts: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn with_script(self, id: u64, steps: Vec<Step>) -> Self {
        self.scripts.lock().unwrap().insert(EndpointId(id), Ok(steps));
        self
    }

    /// Make the request for `id` fail before any chunk
    pub(crate) fn with_issue_error(self, id: u64, error: BenchError) -> Self {
        self.scripts.lock().unwrap().insert(EndpointId(id), Err(error));
        self
    }
}

fn play(clock: Arc<ManualClock>, steps: Vec<Step>) -> ChunkStream {
    let stream = futures::stream::iter(steps).filter_map(move |step| {
        let clock = clock.clone();
        async move {
            match step {
                Step::Chunk { at, chunk } => {
                    clock.set(at);
                    Some(Ok(chunk))
                }
                Step::Fail { at, error } => {
                    clock.set(at);
                    Some(Err(error))
                }
                Step::End { at } => {
                    clock.set(at);
                    None
                }
            }
        }
    });
    Box::pin(stream)
}

#[async_trait]
impl ChatStreamClient for ScriptedClient {
    async fn chat_stream(
        &self,
        endpoint: &EndpointConfig,
        _prompt: &str,
    ) -> BenchResult<ChunkStream> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .remove(&endpoint.id)
            .unwrap_or_else(|| Err(BenchError::other(format!("no script for {}", endpoint.id))));
        Ok(play(self.clock.clone(), script?))
    }
}

/// Holds the first request until [`GatedClient::release`], then answers every
/// request with a single content chunk naming the call number.
pub(crate) struct GatedClient {
    gate: Notify,
    parked: Notify,
    calls: AtomicUsize,
}

impl GatedClient {
    pub(crate) fn new() -> Self {
        Self {
            gate: Notify::new(),
            parked: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Resolves once the first request is held at the gate
    pub(crate) async fn first_call_parked(&self) {
        self.parked.notified().await;
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ChatStreamClient for GatedClient {
    async fn chat_stream(
        &self,
        _endpoint: &EndpointConfig,
        _prompt: &str,
    ) -> BenchResult<ChunkStream> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 1 {
            self.parked.notify_one();
            self.gate.notified().await;
        }
        let chunk = StreamChunk::content(format!("call {}", call));
        Ok(Box::pin(futures::stream::iter(vec![Ok(chunk)])))
    }
}
