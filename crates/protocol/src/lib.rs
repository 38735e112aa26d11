//! Wire contracts shared by the stream decoder, the graph builder and the CLI.
//!
//! Two documents cross the boundary:
//!
//! - [`StreamEvent`]: one progress record per `data: ` frame of the analysis stream.
//! - [`RawAnalysis`]: the payload carried by the terminal `success` event.
//!
//! Both are deliberately loose on input (missing fields default, unknown fields are
//! ignored) so that a slightly off-schema upstream never costs the whole stream.

use anyhow::Result;
use serde::Serialize;

mod analysis;
mod event;
mod serde_helpers;

pub use analysis::{
    RawAnalysis, RawAnalysisMeta, RawEdge, RawNode, RawRealtimeState, RawSource, Reading,
};
pub use event::{StreamEvent, StreamStatus};

/// Literal tag that marks a recognised event frame on the wire.
pub const FRAME_PREFIX: &str = "data: ";

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON schema of [`StreamEvent`], for upstream producers.
pub fn stream_event_schema() -> Result<serde_json::Value> {
    let schema = schemars::schema_for!(StreamEvent);
    serde_json::to_value(schema).map_err(Into::into)
}

/// JSON schema of the analysis payload carried by `success` events.
pub fn analysis_schema() -> Result<serde_json::Value> {
    let schema = schemars::schema_for!(RawAnalysis);
    serde_json::to_value(schema).map_err(Into::into)
}
