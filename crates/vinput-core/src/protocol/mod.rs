//! Kernel input ABI: event records and the uinput setup record.

pub mod event;
pub mod uinput;

pub use event::{
    EventType, InputEventRecord, KeyState, RelAxis, Timestamp, INPUT_EVENT_SIZE, SYN_REPORT,
};
pub use uinput::{DeviceIdentity, UINPUT_MAX_NAME_SIZE, UINPUT_SETUP_SIZE};
