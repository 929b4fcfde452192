//! Recording uinput backend for tests.
//!
//! # Why a recording backend?
//!
//! The real backend talks to `/dev/uinput`, which:
//!
//! - Needs root (or membership of the `input` group) to open.
//! - Creates a real input device that types into whatever window has focus.
//! - Is not available in containers or CI runners.
//!
//! `RecordingBackend` records every ioctl and every written byte buffer in
//! order, so tests can assert on the exact registration sequence and on the
//! records each action produced.
//!
//! # Usage in tests
//!
//! ```ignore
//! let backend = Arc::new(RecordingBackend::new());
//! let channel = DeviceChannel::new(Arc::clone(&backend));
//! channel.register(&CapabilitySet::default(), &DeviceIdentity::default())?;
//!
//! // ... run actions ...
//!
//! assert_eq!(backend.records().last(), Some(&(0, 0, 0))); // SYN_REPORT
//! ```
//!
//! # Failure injection
//!
//! The builder methods (`failing_key_bit`, `failing_setup`, `failing_create`,
//! `failing_destroy`, `failing_writes_after`, `short_writes`) make the matching
//! call return an error so rollback and error paths can be exercised.

use std::io;
use std::sync::Mutex;

use vinput_core::protocol::event::TIME_FIELD_SIZE;

use super::UinputBackend;

/// One recorded ioctl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    SetEventBit(u16),
    SetKeyBit(u16),
    SetRelBit(u16),
    Setup(Vec<u8>),
    Create,
    Destroy,
}

/// A backend that records calls instead of issuing syscalls.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    writes: Mutex<Vec<Vec<u8>>>,
    fail_key_bit: Option<u16>,
    fail_setup: bool,
    fail_create: bool,
    fail_destroy: bool,
    /// Number of writes that succeed before every later write fails.
    fail_writes_after: Option<usize>,
    short_write: bool,
}

fn injected(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("injected {what} failure"))
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// `UI_SET_KEYBIT` fails for `code`.
    pub fn failing_key_bit(mut self, code: u16) -> Self {
        self.fail_key_bit = Some(code);
        self
    }

    pub fn failing_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_destroy(mut self) -> Self {
        self.fail_destroy = true;
        self
    }

    /// The first `n` writes succeed; every later one fails.
    pub fn failing_writes_after(mut self, n: usize) -> Self {
        self.fail_writes_after = Some(n);
        self
    }

    /// Every write reports one byte fewer than requested.
    pub fn short_writes(mut self) -> Self {
        self.short_write = true;
        self
    }

    /// Snapshot of the ioctls issued so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Snapshot of the raw buffers written so far, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Written records decoded to `(type, code, value)`, timestamps dropped.
    pub fn records(&self) -> Vec<(u16, u16, i32)> {
        let offset = 2 * TIME_FIELD_SIZE;
        self.writes()
            .iter()
            .map(|buf| {
                let ty = u16::from_ne_bytes([buf[offset], buf[offset + 1]]);
                let code = u16::from_ne_bytes([buf[offset + 2], buf[offset + 3]]);
                let value = i32::from_ne_bytes([
                    buf[offset + 4],
                    buf[offset + 5],
                    buf[offset + 6],
                    buf[offset + 7],
                ]);
                (ty, code, value)
            })
            .collect()
    }

    /// Number of completed `SYN_REPORT` records.
    pub fn sync_count(&self) -> usize {
        self.records()
            .iter()
            .filter(|(ty, code, value)| (*ty, *code, *value) == (0, 0, 0))
            .count()
    }

    fn record(&self, call: BackendCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl UinputBackend for RecordingBackend {
    fn set_event_bit(&self, event_type: u16) -> io::Result<()> {
        self.record(BackendCall::SetEventBit(event_type));
        Ok(())
    }

    fn set_key_bit(&self, code: u16) -> io::Result<()> {
        if self.fail_key_bit == Some(code) {
            return Err(injected("UI_SET_KEYBIT"));
        }
        self.record(BackendCall::SetKeyBit(code));
        Ok(())
    }

    fn set_rel_bit(&self, axis: u16) -> io::Result<()> {
        self.record(BackendCall::SetRelBit(axis));
        Ok(())
    }

    fn setup(&self, setup: &[u8]) -> io::Result<()> {
        if self.fail_setup {
            return Err(injected("UI_DEV_SETUP"));
        }
        self.record(BackendCall::Setup(setup.to_vec()));
        Ok(())
    }

    fn create(&self) -> io::Result<()> {
        if self.fail_create {
            return Err(injected("UI_DEV_CREATE"));
        }
        self.record(BackendCall::Create);
        Ok(())
    }

    fn destroy(&self) -> io::Result<()> {
        self.record(BackendCall::Destroy);
        if self.fail_destroy {
            return Err(injected("UI_DEV_DESTROY"));
        }
        Ok(())
    }

    fn write(&self, bytes: &[u8]) -> io::Result<usize> {
        let mut writes = self.writes.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(limit) = self.fail_writes_after {
            if writes.len() >= limit {
                return Err(injected("write"));
            }
        }
        if self.short_write {
            return Ok(bytes.len().saturating_sub(1));
        }
        writes.push(bytes.to_vec());
        Ok(bytes.len())
    }
}

