//! # vinput-core
//!
//! Shared, OS-independent pieces of the vinput virtual keyboard/mouse:
//! the symbolic key table, the kernel input-event record encoding, the uinput
//! setup record, and the registration state machine.
//!
//! Nothing here opens a file or issues a syscall.  The `vinput-agent` crate
//! owns the `/dev/uinput` handle and uses these types to talk to it.
//!
//! # How a virtual keyboard works (for beginners)
//!
//! Linux lets a process create an input device out of thin air by opening
//! `/dev/uinput`.  The process first *declares* what the device can do (which
//! keys, which mouse axes), gives it a name, and *activates* it.  From then on,
//! every record the process writes to the handle is delivered to the desktop
//! exactly as if it came from a USB keyboard or mouse.
//!
//! - **`keymap`** – names like `"ctrl"` or `"f5"` → evdev key codes.
//! - **`protocol`** – byte layout of `struct input_event` and `struct
//!   uinput_setup`.
//! - **`domain`** – what must be declared (`CapabilitySet`) and in which order
//!   registration may proceed (`RegistrationState`).

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::capabilities::CapabilitySet;
pub use domain::registration::{RegistrationState, RegistrationStep, TransitionError};
pub use keymap::{KeyCode, KeySymbolTable, DEFAULT_BUTTON};
pub use protocol::event::{EventType, InputEventRecord, KeyState, RelAxis};
pub use protocol::uinput::DeviceIdentity;
