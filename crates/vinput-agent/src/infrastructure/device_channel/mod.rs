//! The uinput device channel: one process-wide handle to `/dev/uinput`.
//!
//! [`DeviceChannel`] drives the registration sequence (capabilities, identity,
//! activation), carries every event record to the kernel once the device is
//! active, and destroys the device on close.  The raw syscalls sit behind the
//! [`UinputBackend`] trait so the sequencing can be tested without a kernel.
//!
//! # Registration sequence (for beginners)
//!
//! ```text
//! open            O_WRONLY | O_NONBLOCK on /dev/uinput
//! UI_SET_EVBIT    EV_KEY, EV_REL, EV_SYN
//! UI_SET_KEYBIT   once per key and button code
//! UI_SET_RELBIT   REL_X, REL_Y, REL_WHEEL
//! UI_DEV_SETUP    bus/vendor/product/version + name
//! UI_DEV_CREATE   the device appears in /dev/input
//! write(...)      input_event records, as many as needed
//! UI_DEV_DESTROY  the device disappears
//! close
//! ```
//!
//! The kernel drops any event whose code was not declared before
//! `UI_DEV_CREATE`, which is why the capability set is derived from the key
//! table rather than written out by hand.
//!
//! # Failure handling
//!
//! - An ioctl failure during registration closes the channel (handle
//!   released) and returns a [`RegistrationError`].
//! - An out-of-order step (activate twice, declare after activate) is
//!   rejected with [`RegistrationError::InvalidTransition`] and the kernel is
//!   not touched.
//! - `close` never fails; teardown errors are logged and dropped.
//!
//! # Sub-modules
//!
//! - **`linux`** – `UinputFile`, the real backend (`libc::ioctl` + `write`).
//! - **`mock`** – `RecordingBackend`, an in-memory fake with failure injection.

#[cfg(target_os = "linux")]
pub mod linux;

pub mod mock;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, info, warn};
use vinput_core::domain::capabilities::CapabilitySet;
use vinput_core::domain::registration::{RegistrationState, RegistrationStep, TransitionError};
use vinput_core::protocol::event::{InputEventRecord, INPUT_EVENT_SIZE};
use vinput_core::protocol::uinput::DeviceIdentity;

use crate::application::synthesizer::{EmitError, EventSink};

// ── Backend trait ─────────────────────────────────────────────────────────────

/// Raw uinput operations on an open handle.
///
/// Each method maps to exactly one syscall.  Implementations do no sequencing
/// of their own; [`DeviceChannel`] decides what is called and when.
#[cfg_attr(test, mockall::automock)]
pub trait UinputBackend: Send + Sync {
    /// `UI_SET_EVBIT`
    fn set_event_bit(&self, event_type: u16) -> std::io::Result<()>;
    /// `UI_SET_KEYBIT`
    fn set_key_bit(&self, code: u16) -> std::io::Result<()>;
    /// `UI_SET_RELBIT`
    fn set_rel_bit(&self, axis: u16) -> std::io::Result<()>;
    /// `UI_DEV_SETUP` with an encoded `uinput_setup` record.
    fn setup(&self, setup: &[u8]) -> std::io::Result<()>;
    /// `UI_DEV_CREATE`
    fn create(&self) -> std::io::Result<()>;
    /// `UI_DEV_DESTROY`
    fn destroy(&self) -> std::io::Result<()>;
    /// One `write(2)` call; returns the number of bytes the kernel accepted.
    fn write(&self, bytes: &[u8]) -> std::io::Result<usize>;
}

impl<T: UinputBackend> UinputBackend for Arc<T> {
    fn set_event_bit(&self, event_type: u16) -> std::io::Result<()> {
        (**self).set_event_bit(event_type)
    }
    fn set_key_bit(&self, code: u16) -> std::io::Result<()> {
        (**self).set_key_bit(code)
    }
    fn set_rel_bit(&self, axis: u16) -> std::io::Result<()> {
        (**self).set_rel_bit(axis)
    }
    fn setup(&self, setup: &[u8]) -> std::io::Result<()> {
        (**self).setup(setup)
    }
    fn create(&self) -> std::io::Result<()> {
        (**self).create()
    }
    fn destroy(&self) -> std::io::Result<()> {
        (**self).destroy()
    }
    fn write(&self, bytes: &[u8]) -> std::io::Result<usize> {
        (**self).write(bytes)
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Which kind of capability declaration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    EventType,
    Key,
    RelAxis,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CapabilityKind::EventType => "event type",
            CapabilityKind::Key => "key code",
            CapabilityKind::RelAxis => "relative axis",
        };
        f.write_str(s)
    }
}

/// Error type for opening and registering the virtual device.
///
/// All of these are fatal to startup.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The uinput node could not be opened (absent, or permission denied).
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The kernel rejected one capability declaration.
    #[error("failed to declare {kind} {code}: {source}")]
    Capability {
        kind: CapabilityKind,
        code: u16,
        #[source]
        source: std::io::Error,
    },

    /// `UI_DEV_SETUP` failed.
    #[error("failed to set device identity: {0}")]
    Setup(#[source] std::io::Error),

    /// `UI_DEV_CREATE` failed.
    #[error("failed to activate device: {0}")]
    Activate(#[source] std::io::Error),

    /// A registration step was requested out of order.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

// ── Device channel ────────────────────────────────────────────────────────────

/// The single handle to the virtual device, shared behind an `Arc`.
///
/// Registration methods take `&self` so the channel can be shared before it
/// is activated; the state lock serializes them.
pub struct DeviceChannel<B: UinputBackend> {
    state: Mutex<RegistrationState>,
    /// Mirrors `state == Active` so the write path does not take the state lock.
    active: AtomicBool,
    /// `None` once closed; writers hold the read lock for one record.
    backend: RwLock<Option<B>>,
}

impl<B: UinputBackend> DeviceChannel<B> {
    /// Wraps an already-open backend handle.
    pub fn new(backend: B) -> Self {
        Self {
            state: Mutex::new(RegistrationState::Opened),
            active: AtomicBool::new(false),
            backend: RwLock::new(Some(backend)),
        }
    }

    /// Current registration state.
    pub fn state(&self) -> RegistrationState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Declares every event type, key code and relative axis in `caps`.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidTransition`] unless the channel is `Opened`.
    /// - [`RegistrationError::Capability`] naming the first rejected code; the
    ///   channel is closed.
    pub fn declare_capabilities(&self, caps: &CapabilitySet) -> Result<(), RegistrationError> {
        self.run_step(RegistrationStep::DeclareCapabilities, |backend| {
            for ty in &caps.event_types {
                let code = ty.as_u16();
                backend
                    .set_event_bit(code)
                    .map_err(|source| RegistrationError::Capability {
                        kind: CapabilityKind::EventType,
                        code,
                        source,
                    })?;
            }
            for key in &caps.key_codes {
                let code = key.as_u16();
                backend
                    .set_key_bit(code)
                    .map_err(|source| RegistrationError::Capability {
                        kind: CapabilityKind::Key,
                        code,
                        source,
                    })?;
            }
            for axis in &caps.rel_axes {
                let code = axis.as_u16();
                backend
                    .set_rel_bit(code)
                    .map_err(|source| RegistrationError::Capability {
                        kind: CapabilityKind::RelAxis,
                        code,
                        source,
                    })?;
            }
            debug!(count = caps.declaration_count(), "capabilities declared");
            Ok(())
        })
    }

    /// Writes the device identity with `UI_DEV_SETUP`.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidTransition`] unless capabilities were declared.
    /// - [`RegistrationError::Setup`] if the kernel rejects it; the channel is closed.
    pub fn set_identity(&self, identity: &DeviceIdentity) -> Result<(), RegistrationError> {
        self.run_step(RegistrationStep::SetIdentity, |backend| {
            backend
                .setup(&identity.to_setup_bytes())
                .map_err(RegistrationError::Setup)?;
            debug!(name = identity.bounded_name(), "identity set");
            Ok(())
        })
    }

    /// Creates the device with `UI_DEV_CREATE`.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidTransition`] unless the identity was set.
    /// - [`RegistrationError::Activate`] if the kernel rejects it; the channel is closed.
    pub fn activate(&self) -> Result<(), RegistrationError> {
        self.run_step(RegistrationStep::Activate, |backend| {
            backend.create().map_err(RegistrationError::Activate)
        })?;
        self.active.store(true, Ordering::Release);
        info!("virtual input device active");
        Ok(())
    }

    /// Runs the whole sequence: capabilities, identity, activation.
    ///
    /// # Errors
    ///
    /// The first step's error, unchanged.
    pub fn register(
        &self,
        caps: &CapabilitySet,
        identity: &DeviceIdentity,
    ) -> Result<(), RegistrationError> {
        self.declare_capabilities(caps)?;
        self.set_identity(identity)?;
        self.activate()
    }

    /// Destroys the device (if it was active) and releases the handle.
    ///
    /// Idempotent and infallible: later calls are no-ops, teardown errors are
    /// logged with `warn!` and dropped.  Waits for an in-flight record write to
    /// finish before releasing the handle.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == RegistrationState::Closed {
            return;
        }
        let was_active = state.accepts_events();
        self.active.store(false, Ordering::Release);

        let backend = self
            .backend
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let (true, Some(backend)) = (was_active, backend.as_ref()) {
            if let Err(e) = backend.destroy() {
                warn!("UI_DEV_DESTROY failed during close: {e}");
            }
        }
        drop(backend);

        // Close is legal from every state, so this cannot fail.
        *state = RegistrationState::Closed;
        info!(was_active, "virtual input device closed");
    }

    /// Checks the transition, runs `op` against the backend, and commits the
    /// new state.  A failing `op` closes the channel.
    fn run_step<F>(&self, step: RegistrationStep, op: F) -> Result<(), RegistrationError>
    where
        F: FnOnce(&B) -> Result<(), RegistrationError>,
    {
        let result = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let next = state.advance(step)?;
            let guard = self.backend.read().unwrap_or_else(PoisonError::into_inner);
            match guard.as_ref() {
                Some(backend) => op(backend).map(|()| *state = next),
                // The state machine guarantees a handle in every pre-Closed state.
                None => Err(TransitionError {
                    from: RegistrationState::Closed,
                    step,
                }
                .into()),
            }
        };
        if let Err(e) = &result {
            if !matches!(e, RegistrationError::InvalidTransition(_)) {
                warn!("registration step {step} failed: {e}");
                self.close();
            }
        }
        result
    }
}

impl<B: UinputBackend> EventSink for DeviceChannel<B> {
    fn write_record(&self, record: &InputEventRecord) -> Result<(), EmitError> {
        let guard = self.backend.read().unwrap_or_else(PoisonError::into_inner);
        let backend = match guard.as_ref() {
            Some(b) if self.is_active() => b,
            _ => return Err(EmitError::NotActive),
        };
        let bytes = record.to_bytes();
        let written = backend.write(&bytes)?;
        if written != INPUT_EVENT_SIZE {
            return Err(EmitError::ShortWrite {
                written,
                expected: INPUT_EVENT_SIZE,
            });
        }
        Ok(())
    }
}

impl<B: UinputBackend> Drop for DeviceChannel<B> {
    fn drop(&mut self) {
        self.close();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
