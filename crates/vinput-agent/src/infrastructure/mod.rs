//! Infrastructure layer for the agent.
//!
//! Contains the OS-facing pieces: the uinput device channel and the
//! configuration file loader.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `vinput_core`, but MUST NOT be imported by `vinput_core`.
//!
//! # Sub-modules
//!
//! - **`device_channel`** – `DeviceChannel`, the registration state machine
//!   over a `UinputBackend`.  The Linux backend (`UinputFile`) is compiled only
//!   on Linux; `RecordingBackend` is always available for tests.
//!
//! - **`config`** – `AgentConfig` loaded from TOML with serde defaults.

pub mod config;
pub mod device_channel;
