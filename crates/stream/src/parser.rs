use causal_protocol::StreamEvent;

/// How one decoded line was interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Blank, or not carrying the frame prefix.
    Ignored,
    /// Carried the prefix but its payload did not deserialize.
    Malformed { payload: String, reason: String },
    Event(StreamEvent),
}

/// Turns prefixed lines into [`StreamEvent`]s.
#[derive(Debug, Clone)]
pub struct EventParser {
    prefix: String,
}

const LOG_PAYLOAD_CHARS: usize = 200;

impl EventParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn parse_line(&self, line: &str) -> LineOutcome {
        if line.trim().is_empty() {
            return LineOutcome::Ignored;
        }
        let Some(payload) = line.strip_prefix(self.prefix.as_str()) else {
            return LineOutcome::Ignored;
        };

        match serde_json::from_str::<StreamEvent>(payload) {
            Ok(event) => LineOutcome::Event(event),
            Err(err) => {
                let shown: String = payload.chars().take(LOG_PAYLOAD_CHARS).collect();
                log::warn!("Skipping malformed stream frame ({err}): {shown}");
                LineOutcome::Malformed {
                    payload: payload.to_string(),
                    reason: err.to_string(),
                }
            }
        }
    }
}

impl Default for EventParser {
    fn default() -> Self {
        Self::new(causal_protocol::FRAME_PREFIX)
    }
}
