//! Domain model of a virtual input device.
//!
//! Pure rules with no I/O: which capabilities a device must declare, and in
//! which order the registration steps may happen.  The agent crate drives a
//! real `/dev/uinput` handle through these rules, and tests drive a recording
//! fake through the very same ones.

pub mod capabilities;
pub mod registration;
