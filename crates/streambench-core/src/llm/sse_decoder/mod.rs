//! Incremental Server-Sent Events decoder
//!
//! Network reads split the stream at arbitrary byte offsets. The decoder keeps
//! partial UTF-8 sequences and partial lines between calls to [`SseDecoder::feed`]
//! and only dispatches an event once its terminating blank line has arrived.
//! Lines may end in `\n` or `\r\n`, including a `\r\n` split across two reads.

mod event;

pub use event::SseEvent;

/// Fields of the event currently being assembled
#[derive(Debug, Default)]
struct PendingEvent {
    event_type: Option<String>,
    data_lines: Vec<String>,
    id: Option<String>,
}

impl PendingEvent {
    fn take(&mut self) -> Option<SseEvent> {
        let pending = std::mem::take(self);
        if pending.data_lines.is_empty() {
            return None;
        }
        Some(SseEvent {
            event_type: pending.event_type,
            data: pending.data_lines.join("\n"),
            id: pending.id,
        })
    }
}

/// Buffered, line-oriented SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Decoded text not yet terminated by a newline
    line_buffer: String,
    /// Trailing bytes of an unfinished UTF-8 sequence
    undecoded: Vec<u8>,
    pending: PendingEvent,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.decode_utf8(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.line_buffer.find('\n') {
            let mut line: String = self.line_buffer.drain(..=newline).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush whatever is left once the byte stream has ended.
    ///
    /// A final event that was never terminated by a blank line is still
    /// dispatched.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.undecoded.is_empty() {
            let rest = std::mem::take(&mut self.undecoded);
            self.line_buffer.push_str(&String::from_utf8_lossy(&rest));
        }
        let line = std::mem::take(&mut self.line_buffer);
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            if let Some(event) = self.process_line(line) {
                return Some(event);
            }
        }
        self.pending.take()
    }

    /// Append decodable text to the line buffer, holding back an incomplete
    /// trailing sequence and replacing invalid bytes with U+FFFD.
    fn decode_utf8(&mut self, bytes: &[u8]) {
        self.undecoded.extend_from_slice(bytes);
        let mut input = std::mem::take(&mut self.undecoded);
        loop {
            match std::str::from_utf8(&input) {
                Ok(text) => {
                    self.line_buffer.push_str(text);
                    return;
                }
                Err(error) => {
                    let valid = error.valid_up_to();
                    // Already validated up to `valid`
                    self.line_buffer
                        .push_str(&String::from_utf8_lossy(&input[..valid]));
                    match error.error_len() {
                        None => {
                            self.undecoded = input.split_off(valid);
                            return;
                        }
                        Some(invalid) => {
                            tracing::warn!(
                                "Replacing {} invalid UTF-8 byte(s) in event stream",
                                invalid
                            );
                            self.line_buffer.push(char::REPLACEMENT_CHARACTER);
                            input.drain(..valid + invalid);
                        }
                    }
                }
            }
        }
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.pending.take();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.pending.data_lines.push(value.to_string()),
            "event" => self.pending.event_type = Some(value.to_string()),
            "id" => self.pending.id = Some(value.to_string()),
            // retry and unknown fields are ignored
            _ => {}
        }
        None
    }

    /// Whether undispatched input is buffered
    pub fn has_remaining(&self) -> bool {
        !self.line_buffer.is_empty()
            || !self.undecoded.is_empty()
            || !self.pending.data_lines.is_empty()
    }

    /// Number of bytes held back waiting for the rest of a UTF-8 sequence
    pub fn undecoded_len(&self) -> usize {
        self.undecoded.len()
    }

    /// Drop all buffered state
    pub fn clear(&mut self) {
        self.line_buffer.clear();
        self.undecoded.clear();
        self.pending = PendingEvent::default();
    }
}
