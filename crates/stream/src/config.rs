use serde::{Deserialize, Serialize};

use causal_protocol::FRAME_PREFIX;

/// Read-loop settings for a [`StreamSession`](crate::StreamSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Literal tag a line must start with to count as an event frame
    pub frame_prefix: String,

    /// Bytes requested from the source per read
    pub read_chunk_size: usize,

    /// Longest line kept; longer lines are dropped whole
    pub max_line_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_prefix: FRAME_PREFIX.to_string(),
            read_chunk_size: 8 * 1024,
            max_line_bytes: 16 * 1024 * 1024,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_prefix.is_empty() {
            return Err("frame_prefix must not be empty".to_string());
        }
        if self.frame_prefix.contains('\n') {
            return Err("frame_prefix must not contain a line terminator".to_string());
        }
        if self.read_chunk_size == 0 {
            return Err("read_chunk_size must be > 0".to_string());
        }
        if self.max_line_bytes == 0 {
            return Err("max_line_bytes must be > 0".to_string());
        }
        Ok(())
    }
}
