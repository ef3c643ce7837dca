//! Match notification sinks
//!
//! A sink receives every call a scan matches. Available sinks:
//! - [`LogSink`]: emits one `info` event per match
//! - [`ChannelSink`]: forwards reports to an unbounded Tokio channel
//! - `(A, B)`: notifies both sinks in order

use tokio::sync::mpsc;
use tracing::info;

use crate::{errors::ScanError, types::MatchReport};

/// Consumer of match reports
pub trait MatchSink: Send + Sync {
    /// Delivers one report; an error is logged by the scanner and the scan continues
    fn notify(&self, report: &MatchReport) -> Result<(), ScanError>;
}

/// Reports matches as structured log events
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MatchSink for LogSink {
    fn notify(&self, report: &MatchReport) -> Result<(), ScanError> {
        info!(
            target: "safe_trace::match",
            call = %report,
            kind = %report.kind,
            from = %report.from,
            to = %report.to,
            trace_address = ?report.trace_address,
            failed = report.error.is_some(),
            "{report}"
        );
        Ok(())
    }
}

/// Forwards reports to a channel receiver
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<MatchReport>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<MatchReport>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MatchReport>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl MatchSink for ChannelSink {
    fn notify(&self, report: &MatchReport) -> Result<(), ScanError> {
        self.sender
            .send(report.clone())
            .map_err(|_| ScanError::SinkClosed)
    }
}

impl<A, B> MatchSink for (A, B)
where
    A: MatchSink,
    B: MatchSink,
{
    /// Notifies both sinks, returning the first error after trying both
    fn notify(&self, report: &MatchReport) -> Result<(), ScanError> {
        let first = self.0.notify(report);
        let second = self.1.notify(report);
        first.and(second)
    }
}
