use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_default;

/// Progress marker of one stream frame.
///
/// The upstream walks these in declaration order. Steps may be skipped, but a
/// well-behaved producer never goes back to an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum StreamStatus {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "step1_start")]
    Step1Start,
    #[serde(rename = "step1_complete")]
    Step1Complete,
    #[serde(rename = "step2_start")]
    Step2Start,
    #[serde(rename = "step2_complete")]
    Step2Complete,
    #[serde(rename = "step3_start")]
    Step3Start,
    #[serde(rename = "step3_complete")]
    Step3Complete,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "error")]
    Error,
}

impl StreamStatus {
    /// Position in the progression. `success` and `error` share the last slot.
    pub fn progress_rank(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::Step1Start => 1,
            Self::Step1Complete => 2,
            Self::Step2Start => 3,
            Self::Step2Complete => 4,
            Self::Step3Start => 5,
            Self::Step3Complete => 6,
            Self::Success | Self::Error => 7,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Step1Start => "step1_start",
            Self::Step1Complete => "step1_complete",
            Self::Step2Start => "step2_start",
            Self::Step2Complete => "step2_complete",
            Self::Step3Start => "step3_start",
            Self::Step3Complete => "step3_complete",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StreamEvent {
    pub status: StreamStatus,

    /// Human-readable progress text. Required for `error`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    /// Opaque until `status == success`, where it holds the analysis payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Producer clock, seconds since the unix epoch.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: f64,
}

impl StreamEvent {
    pub fn new(status: StreamStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
            timestamp: 0.0,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
