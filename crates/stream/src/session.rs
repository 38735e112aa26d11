use std::collections::VecDeque;

use causal_protocol::{StreamEvent, StreamStatus};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::cancel::CancellationToken;
use crate::config::SessionConfig;
use crate::error::{Result, StreamError};
use crate::frame::FrameDecoder;
use crate::parser::{EventParser, LineOutcome};

/// Lifecycle of a [`StreamSession`]. Everything except `Open` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    /// A `success` frame was delivered.
    Completed,
    /// The source reached end-of-stream without a terminal frame.
    Ended,
    Cancelled,
    /// Transport failure or upstream `error` frame.
    Failed,
}

/// How [`StreamSession::run`] finished when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Terminal success; carries the event's `data`, if any.
    Completed(Option<serde_json::Value>),
    /// End-of-stream before any terminal frame.
    Ended,
    Cancelled,
}

/// Callback side of the session contract.
pub trait SessionObserver {
    /// Every delivered event, terminal success included.
    fn on_progress(&mut self, _event: &StreamEvent) {}

    /// The analysis payload of the terminal success frame.
    fn on_complete(&mut self, _data: &serde_json::Value) {}
}

/// One read loop over one byte source.
///
/// Pull events with [`next_event`](Self::next_event) or hand an observer to
/// [`run`](Self::run). The only suspension point is the wait for the next chunk.
pub struct StreamSession<R> {
    reader: R,
    decoder: FrameDecoder,
    parser: EventParser,
    cancel: CancellationToken,
    pending: VecDeque<StreamEvent>,
    buf: Vec<u8>,
    state: SessionState,
    last_rank: Option<u8>,
}

impl<R: AsyncRead + Unpin> StreamSession<R> {
    pub fn new(reader: R, cancel: CancellationToken) -> Self {
        Self::build(reader, cancel, SessionConfig::default())
    }

    pub fn with_config(
        reader: R,
        cancel: CancellationToken,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate().map_err(StreamError::InvalidConfig)?;
        Ok(Self::build(reader, cancel, config))
    }

    fn build(reader: R, cancel: CancellationToken, config: SessionConfig) -> Self {
        Self {
            reader,
            decoder: FrameDecoder::new(config.max_line_bytes),
            parser: EventParser::new(config.frame_prefix),
            cancel,
            pending: VecDeque::new(),
            buf: vec![0; config.read_chunk_size],
            state: SessionState::Open,
            last_rank: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Next event in arrival order.
    ///
    /// `Ok(None)` ends the sequence: end-of-stream, cancellation, or a previously
    /// delivered success. An upstream `error` frame ends it with
    /// [`StreamError::Upstream`].
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        loop {
            if self.state != SessionState::Open {
                return Ok(None);
            }
            if self.cancel.is_cancelled() {
                self.close(SessionState::Cancelled);
                return Ok(None);
            }
            if let Some(event) = self.pending.pop_front() {
                return self.deliver(event);
            }

            let read = tokio::select! {
                biased;
                () = self.cancel.cancelled() => None,
                res = self.reader.read(&mut self.buf) => Some(res),
            };

            match read {
                None => {
                    self.close(SessionState::Cancelled);
                    return Ok(None);
                }
                Some(Err(err)) => {
                    self.close(SessionState::Failed);
                    return Err(StreamError::Transport(err));
                }
                Some(Ok(0)) => {
                    if let Some(tail) = self.decoder.finish() {
                        log::debug!(
                            "Discarding unterminated trailing frame ({} bytes)",
                            tail.len()
                        );
                    }
                    log::debug!("Stream ended without a terminal event");
                    self.close(SessionState::Ended);
                    return Ok(None);
                }
                Some(Ok(n)) => {
                    for line in self.decoder.push(&self.buf[..n]) {
                        if let LineOutcome::Event(event) = self.parser.parse_line(&line) {
                            self.pending.push_back(event);
                        }
                    }
                }
            }
        }
    }

    /// Drive the loop to the end, reporting through `observer`.
    pub async fn run<O: SessionObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<SessionOutcome> {
        while let Some(event) = self.next_event().await? {
            observer.on_progress(&event);
            if event.status == StreamStatus::Success {
                if let Some(data) = &event.data {
                    observer.on_complete(data);
                }
                return Ok(SessionOutcome::Completed(event.data));
            }
        }
        Ok(match self.state {
            SessionState::Cancelled => SessionOutcome::Cancelled,
            _ => SessionOutcome::Ended,
        })
    }

    /// Gather every event until the sequence ends.
    pub async fn collect(mut self) -> Result<Vec<StreamEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await? {
            events.push(event);
        }
        Ok(events)
    }

    fn deliver(&mut self, event: StreamEvent) -> Result<Option<StreamEvent>> {
        let rank = event.status.progress_rank();
        match self.last_rank {
            Some(last) if rank < last => {
                log::warn!("Stream progress went back to '{}'", event.status);
            }
            _ => self.last_rank = Some(rank),
        }

        match event.status {
            StreamStatus::Error => {
                self.close(SessionState::Failed);
                Err(StreamError::upstream(event.message))
            }
            StreamStatus::Success => {
                self.close(SessionState::Completed);
                Ok(Some(event))
            }
            _ => Ok(Some(event)),
        }
    }

    fn close(&mut self, state: SessionState) {
        if !self.pending.is_empty() {
            log::debug!(
                "Session {state:?}: ignoring {} buffered frame(s)",
                self.pending.len()
            );
            self.pending.clear();
        }
        self.state = state;
    }
}
