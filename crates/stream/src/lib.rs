//! # Causal Stream
//!
//! Incremental decoding of the analysis progress stream.
//!
//! ## Pipeline
//!
//! ```text
//! AsyncRead (bytes, arbitrary chunking)
//!     │
//!     ├──> Frame Decoder
//!     │      └─> complete lines, partial tail carried over
//!     │
//!     ├──> Event Parser
//!     │      ├─> "data: " prefix → StreamEvent
//!     │      └─> malformed payload → logged, skipped
//!     │
//!     └──> Stream Session
//!            ├─> error frame   → StreamError::Upstream
//!            ├─> success frame → last event
//!            └─> cancellation  → clean end, no error
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use causal_stream::{CancellationToken, StreamSession};
//!
//! # async fn demo() -> causal_stream::Result<()> {
//! let token = CancellationToken::new();
//! let input = tokio::io::stdin();
//! let mut session = StreamSession::new(input, token.clone());
//!
//! while let Some(event) = session.next_event().await? {
//!     println!("{}: {}", event.status, event.message);
//! }
//! # Ok(())
//! # }
//! ```

mod cancel;
mod config;
mod error;
mod frame;
mod parser;
mod session;

pub use cancel::CancellationToken;
pub use config::SessionConfig;
pub use error::{Result, StreamError};
pub use frame::FrameDecoder;
pub use parser::{EventParser, LineOutcome};
pub use session::{SessionObserver, SessionOutcome, SessionState, StreamSession};
