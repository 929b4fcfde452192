//! Event synthesis: timestamped records and frame terminators.
//!
//! [`EventSynthesizer`] is the only component that creates
//! [`InputEventRecord`]s.  It stamps each record with the current time and
//! hands it to an [`EventSink`], which is whatever owns the device handle (the
//! uinput channel in production, a recorder in tests).

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;
use vinput_core::protocol::event::{EventType, InputEventRecord, SYN_REPORT};

/// A record could not be delivered to the device.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The kernel rejected the write.
    #[error("write to virtual device failed: {0}")]
    Io(#[from] std::io::Error),

    /// The kernel accepted fewer bytes than one record.
    #[error("short write to virtual device: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// The device was never activated or has already been closed.
    #[error("virtual device is not active")]
    NotActive,
}

/// Destination for encoded event records.
///
/// Implementations write each record whole, in a single call, or fail.
pub trait EventSink: Send + Sync {
    fn write_record(&self, record: &InputEventRecord) -> Result<(), EmitError>;
}

/// Builds timestamped records and writes them to a sink.
#[derive(Clone)]
pub struct EventSynthesizer {
    sink: Arc<dyn EventSink>,
}

impl EventSynthesizer {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Writes one `(type, code, value)` record stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns the sink's [`EmitError`] unchanged.
    pub fn emit(&self, event_type: EventType, code: u16, value: i32) -> Result<(), EmitError> {
        let record = InputEventRecord::now(event_type, code, value);
        trace!(?event_type, code, value, "emit");
        self.sink.write_record(&record)
    }

    /// Ends the current frame (`EV_SYN / SYN_REPORT / 0`).
    ///
    /// # Errors
    ///
    /// Returns the sink's [`EmitError`] unchanged.
    pub fn sync(&self) -> Result<(), EmitError> {
        self.emit(EventType::Syn, SYN_REPORT, 0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
