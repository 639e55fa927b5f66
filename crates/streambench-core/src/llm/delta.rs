//! Classification of streamed chunks into typed deltas
//!
//! Chunks arrive as loosely shaped JSON with optional fields. They are turned
//! into [`Delta`] values exactly once, here, so nothing downstream inspects raw
//! optional fields.

use serde::{Deserialize, Serialize};

/// One incremental fragment of a streamed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Delta {
    Reasoning(String),
    Content(String),
    /// Chunk carrying neither kind of text; skipped, never an error
    Empty,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Reasoning(text) | Self::Content(text) => text.is_empty(),
            Self::Empty => true,
        }
    }
}

/// The text fields of one received chunk, before classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub reasoning: Option<String>,
    pub content: Option<String>,
}

impl StreamChunk {
    pub fn reasoning(text: impl Into<String>) -> Self {
        Self {
            reasoning: Some(text.into()),
            content: None,
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self {
            reasoning: None,
            content: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Classify this chunk into deltas.
    ///
    /// A chunk with both fields set yields the reasoning delta first and the
    /// content delta second. A chunk with neither yields a single `Empty`.
    pub fn deltas(&self) -> Vec<Delta> {
        let reasoning = non_empty(self.reasoning.as_deref());
        let content = non_empty(self.content.as_deref());

        let mut deltas = Vec::with_capacity(2);
        if let Some(text) = reasoning {
            deltas.push(Delta::Reasoning(text.to_string()));
        }
        if let Some(text) = content {
            deltas.push(Delta::Content(text.to_string()));
        }
        if deltas.is_empty() {
            deltas.push(Delta::Empty);
        }
        deltas
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_only() {
        let deltas = StreamChunk::reasoning("think").deltas();
        assert_eq!(deltas, vec![Delta::Reasoning("think".into())]);
    }

    #[test]
    fn test_content_only() {
        let deltas = StreamChunk::content("answer").deltas();
        assert_eq!(deltas, vec![Delta::Content("answer".into())]);
    }

    #[test]
    fn test_both_fields_keep_reasoning_first() {
        let chunk = StreamChunk {
            reasoning: Some("r".into()),
            content: Some("c".into()),
        };
        assert_eq!(
            chunk.deltas(),
            vec![Delta::Reasoning("r".into()), Delta::Content("c".into())]
        );
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let chunk = StreamChunk {
            reasoning: Some(String::new()),
            content: Some("c".into()),
        };
        assert_eq!(chunk.deltas(), vec![Delta::Content("c".into())]);

        let chunk = StreamChunk {
            reasoning: Some(String::new()),
            content: Some(String::new()),
        };
        assert_eq!(chunk.deltas(), vec![Delta::Empty]);
        assert_eq!(StreamChunk::empty().deltas(), vec![Delta::Empty]);
    }

    #[test]
    fn test_delta_helpers() {
        assert!(Delta::Empty.is_empty());
        assert!(Delta::Content(String::new()).is_empty());
        assert!(!Delta::Reasoning("x".into()).is_empty());
    }
}
