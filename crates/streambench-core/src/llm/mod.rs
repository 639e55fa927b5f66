//! LLM transport: chunk classification, SSE decoding and the streaming client

pub mod client;
pub mod delta;
pub mod sse_decoder;
pub mod stream;

pub use client::{ChatStreamClient, OpenAiCompatClient, completions_url};
pub use delta::{Delta, StreamChunk};
pub use sse_decoder::{SseDecoder, SseEvent};
pub use stream::{ChunkStream, sse_chunk_stream};

#[cfg(test)]
pub use client::MockChatStreamClient;
