//! InputActions: the logical keyboard/mouse operations offered to callers.
//!
//! Each action resolves its symbolic names first, then emits its events through
//! the [`EventSynthesizer`] and finishes with exactly one `SYN_REPORT`, so the
//! kernel delivers the whole action as a single input frame.
//!
//! | Action              | Records written                                  |
//! |---------------------|--------------------------------------------------|
//! | `hold(a, b)`        | KEY a 1, KEY b 1, SYN                            |
//! | `release(a, b)`     | KEY a 0, KEY b 0, SYN                            |
//! | `press_and_release` | hold frame, settle delay, release frame          |
//! | `move_mouse(dx, dy)`| REL_X dx, REL_Y dy, SYN                          |
//! | `click_mouse(btn)`  | KEY btn 1, KEY btn 0, SYN                        |
//! | `scroll_mouse(n)`   | REL_WHEEL n, SYN                                 |
//!
//! # Failure behaviour
//!
//! Name resolution happens before the first write: an unknown name fails the
//! action with nothing emitted.  A write failure part-way through aborts the
//! action immediately; the records already written stay written and no SYN is
//! sent for them.  Nothing is retried, and releasing keys left down by a failed
//! `hold` is the caller's job.
//!
//! # Concurrency
//!
//! `InputActions` is shared across callers behind an `Arc`.  By default
//! concurrent actions are not serialized against each other, so two callers'
//! records may interleave at the kernel.  With `serialize_actions` enabled each
//! action holds a process-wide lock from its first record to its SYN (for
//! `press_and_release`, across the settle delay too).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use vinput_core::keymap::{KeyCode, KeySymbolTable, DEFAULT_BUTTON};
use vinput_core::protocol::event::{EventType, KeyState, RelAxis};

use super::synthesizer::{EmitError, EventSink, EventSynthesizer};

/// Settle delay between the down and up frames of `press_and_release`.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Error type for input actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A key action was given an empty list of names.
    #[error("no keys specified")]
    NoKeys,

    /// A key name is not in the symbol table.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A mouse button name is not in the symbol table.
    #[error("unknown mouse button: {0}")]
    UnknownButton(String),

    /// A record could not be written to the device.
    #[error(transparent)]
    Write(#[from] EmitError),
}

/// Which side of a request boundary an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself was wrong (unknown name, empty list).
    Client,
    /// The device failed while carrying out a valid request.
    Server,
}

impl ActionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ActionError::NoKeys | ActionError::UnknownKey(_) | ActionError::UnknownButton(_) => {
                ErrorClass::Client
            }
            ActionError::Write(_) => ErrorClass::Server,
        }
    }
}

/// Human-readable direction of a wheel movement.
///
/// Positive amounts scroll up (away from the user); zero is reported as up.
pub fn scroll_direction(amount: i32) -> &'static str {
    if amount < 0 {
        "down"
    } else {
        "up"
    }
}

/// The Action API over a single shared virtual device.
pub struct InputActions {
    table: KeySymbolTable,
    synth: EventSynthesizer,
    settle_delay: Duration,
    exclusive: Option<Mutex<()>>,
}

impl InputActions {
    /// Creates the action layer over `sink` with the default settle delay and
    /// no cross-caller serialization.
    pub fn new(sink: Arc<dyn EventSink>, table: KeySymbolTable) -> Self {
        Self {
            table,
            synth: EventSynthesizer::new(sink),
            settle_delay: DEFAULT_SETTLE_DELAY,
            exclusive: None,
        }
    }

    /// Sets the pause between the hold and release frames of `press_and_release`.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Serializes whole actions across concurrent callers.
    pub fn serialized(mut self, enabled: bool) -> Self {
        self.exclusive = enabled.then(|| Mutex::new(()));
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn is_serialized(&self) -> bool {
        self.exclusive.is_some()
    }

    /// Every key and button name the device understands, sorted.
    pub fn key_names(&self) -> Vec<&'static str> {
        self.table.names()
    }

    /// Presses every named key, in order, as one frame.
    ///
    /// # Errors
    ///
    /// - [`ActionError::NoKeys`] for an empty list.
    /// - [`ActionError::UnknownKey`] naming the first unresolvable name; nothing is emitted.
    /// - [`ActionError::Write`] if the device rejects a record.
    pub fn hold<S: AsRef<str>>(&self, names: &[S]) -> Result<(), ActionError> {
        let _guard = self.lock();
        self.key_frame(names, KeyState::Down)
    }

    /// Releases every named key, in order, as one frame.
    ///
    /// # Errors
    ///
    /// Same as [`hold`](Self::hold).
    pub fn release<S: AsRef<str>>(&self, names: &[S]) -> Result<(), ActionError> {
        let _guard = self.lock();
        self.key_frame(names, KeyState::Up)
    }

    /// Holds the keys, waits the settle delay, then releases them.
    ///
    /// If the hold fails the release is not attempted.
    ///
    /// # Errors
    ///
    /// Any error from the hold or release frame, unchanged.
    pub fn press_and_release<S: AsRef<str>>(&self, names: &[S]) -> Result<(), ActionError> {
        let _guard = self.lock();
        self.key_frame(names, KeyState::Down)?;
        std::thread::sleep(self.settle_delay);
        self.key_frame(names, KeyState::Up)
    }

    /// Moves the pointer by a relative offset.  Zero offsets still produce a frame.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Write`] if the device rejects a record.
    pub fn move_mouse(&self, dx: i32, dy: i32) -> Result<(), ActionError> {
        let _guard = self.lock();
        debug!(dx, dy, "move mouse");
        self.synth.emit(EventType::Rel, RelAxis::X.as_u16(), dx)?;
        self.synth.emit(EventType::Rel, RelAxis::Y.as_u16(), dy)?;
        self.synth.sync()?;
        Ok(())
    }

    /// Clicks a mouse button; an empty name clicks the left button.
    ///
    /// # Errors
    ///
    /// - [`ActionError::UnknownButton`] if the name is not a button.
    /// - [`ActionError::Write`] if the device rejects a record.
    pub fn click_mouse(&self, button: &str) -> Result<(), ActionError> {
        let name = if button.is_empty() { DEFAULT_BUTTON } else { button };
        let code = self
            .table
            .lookup_button(name)
            .ok_or_else(|| ActionError::UnknownButton(button.to_string()))?;

        let _guard = self.lock();
        debug!(button = name, code = code.as_u16(), "click mouse");
        self.emit_key(code, KeyState::Down)?;
        self.emit_key(code, KeyState::Up)?;
        self.synth.sync()?;
        Ok(())
    }

    /// Turns the vertical wheel; positive scrolls up, negative down.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Write`] if the device rejects a record.
    pub fn scroll_mouse(&self, amount: i32) -> Result<(), ActionError> {
        let _guard = self.lock();
        debug!(amount, direction = scroll_direction(amount), "scroll mouse");
        self.synth.emit(EventType::Rel, RelAxis::Wheel.as_u16(), amount)?;
        self.synth.sync()?;
        Ok(())
    }

    fn lock(&self) -> Option<MutexGuard<'_, ()>> {
        self.exclusive
            .as_ref()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Resolves every name before the first write.
    fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<KeyCode>, ActionError> {
        if names.is_empty() {
            return Err(ActionError::NoKeys);
        }
        names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                self.table
                    .lookup(n)
                    .ok_or_else(|| ActionError::UnknownKey(n.to_string()))
            })
            .collect()
    }

    fn key_frame<S: AsRef<str>>(&self, names: &[S], state: KeyState) -> Result<(), ActionError> {
        let codes = self.resolve(names)?;
        debug!(?codes, ?state, "key frame");
        for code in codes {
            self.emit_key(code, state)?;
        }
        self.synth.sync()?;
        Ok(())
    }

    fn emit_key(&self, code: KeyCode, state: KeyState) -> Result<(), EmitError> {
        self.synth
            .emit(EventType::Key, code.as_u16(), state.as_value())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
