//! Counting policies for streamed text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a text delta is turned into a unit count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCountPolicy {
    /// Count UTF-16 code units of the text
    #[default]
    Char,
    /// Count every non-empty delta as one unit
    Chunk,
}

impl TokenCountPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Chunk => "chunk",
        }
    }

    /// Short explanation for help text and reports
    pub fn description(&self) -> &'static str {
        match self {
            Self::Char => "units = characters of returned text",
            Self::Chunk => "units = streamed chunks, one per delta",
        }
    }
}

impl fmt::Display for TokenCountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenCountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "char" | "chars" | "character" => Ok(Self::Char),
            "chunk" | "chunks" => Ok(Self::Chunk),
            other => Err(format!(
                "unknown token count policy '{}', expected 'char' or 'chunk'",
                other
            )),
        }
    }
}

/// Count `text` under `policy`. Total: never fails, never negative.
pub fn count(text: &str, policy: TokenCountPolicy) -> u64 {
    match policy {
        TokenCountPolicy::Char => text.encode_utf16().count() as u64,
        TokenCountPolicy::Chunk => u64::from(!text.is_empty()),
    }
}
