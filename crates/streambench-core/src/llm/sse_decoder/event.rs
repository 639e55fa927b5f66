//! SSE event type

/// A dispatched Server-Sent Event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    /// Value of the last `event:` field, if any
    pub event_type: Option<String>,
    /// All `data:` lines of the event joined with `\n`
    pub data: String,
    /// Value of the last `id:` field, if any
    pub id: Option<String>,
}

impl SseEvent {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_type: None,
            data: data.into(),
            id: None,
        }
    }

    /// OpenAI-style end-of-stream marker
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }

    /// Some gateways announce failures with `event: error`
    pub fn is_error_event(&self) -> bool {
        self.event_type.as_deref() == Some("error")
    }
}
