//! vinput-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does vinput-agent do? (for beginners)
//!
//! The agent creates a *virtual* keyboard and mouse on Linux.  To the desktop
//! it looks exactly like a USB device was plugged in; every key press or pointer
//! movement the agent writes is delivered to whichever window has focus.
//!
//! The agent:
//!
//! 1. Opens `/dev/uinput` and registers a device: declares every key code and
//!    mouse axis it will ever send, sets the device name and USB identity, and
//!    asks the kernel to create it.
//! 2. Verifies the write path with an empty pointer move.
//! 3. Accepts logical actions (`hold(["ctrl", "c"])`, `click_mouse("right")`,
//!    ...) and turns each into a burst of input-event records ending in one
//!    `SYN_REPORT`.
//! 4. Destroys the device exactly once on shutdown (Ctrl+C or SIGTERM).

/// Application layer: synthesizer, Action API and status snapshot.
pub mod application;

/// Infrastructure layer: the uinput device channel and configuration.
pub mod infrastructure;
