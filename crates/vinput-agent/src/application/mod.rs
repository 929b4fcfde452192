//! Application layer use cases for the agent.
//!
//! # What use cases does the agent have?
//!
//! - **`synthesizer`** – Turns `(type, code, value)` triples into timestamped
//!   input-event records and hands them to an `EventSink`.  The sink is the
//!   uinput device channel in production and a recorder in tests.
//!
//! - **`input_actions`** – The Action API: hold, release, pressAndRelease,
//!   moveMouse, clickMouse, scrollMouse.  Resolves symbolic names through the
//!   key table and frames every action with exactly one `SYN_REPORT`.
//!
//! - **`status`** – A JSON snapshot of what the agent offers (key names and
//!   operation descriptions).

pub mod input_actions;
pub mod status;
pub mod synthesizer;
