//! The kernel `struct input_event` record and its byte encoding.
//!
//! Every event written to a uinput handle is one fixed-size record:
//!
//! ```text
//! struct input_event {
//!     struct timeval time;   // tv_sec, tv_usec: native `long` each
//!     __u16 type;
//!     __u16 code;
//!     __s32 value;
//! };
//! ```
//!
//! | Target width | tv_sec | tv_usec | type | code | value | Total |
//! |--------------|--------|---------|------|------|-------|-------|
//! | 64-bit       | 0..8   | 8..16   | 16   | 18   | 20    | 24    |
//! | 32-bit       | 0..4   | 4..8    | 8    | 10   | 12    | 16    |
//!
//! All fields use native byte order.  The record is serialized field by field
//! into a byte array rather than by reinterpreting a Rust struct, so the wire
//! layout never depends on how the compiler chooses to lay out memory.
//!
//! # Frames and SYN_REPORT (for beginners)
//!
//! Consumers of an input device read events in *frames*.  A frame is every
//! event since the previous `EV_SYN / SYN_REPORT` record.  Pressing Ctrl+C as
//! one frame looks like:
//!
//! ```text
//! EV_KEY KEY_LEFTCTRL 1
//! EV_KEY KEY_C        1
//! EV_SYN SYN_REPORT   0   <- frame ends, both keys become "down" together
//! ```
//!
//! Forgetting the SYN record leaves the events buffered and invisible to
//! applications until some later frame flushes them.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::keymap::KeyCode;

/// `SYN_REPORT`: the only synchronization code the device emits.
pub const SYN_REPORT: u16 = 0;

/// Width of one `timeval` field on this target, in bytes.
#[cfg(target_pointer_width = "64")]
pub const TIME_FIELD_SIZE: usize = 8;
/// Width of one `timeval` field on this target, in bytes.
#[cfg(not(target_pointer_width = "64"))]
pub const TIME_FIELD_SIZE: usize = 4;

/// Size of one encoded `input_event` record on this target.
pub const INPUT_EVENT_SIZE: usize = 2 * TIME_FIELD_SIZE + 2 + 2 + 4;

/// Event types the device declares and emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum EventType {
    /// `EV_SYN`: frame separator.
    Syn = 0x00,
    /// `EV_KEY`: key or button state change.
    Key = 0x01,
    /// `EV_REL`: relative axis movement.
    Rel = 0x02,
}

impl EventType {
    /// Declaration order used during registration: keys, relative axes, sync.
    pub const ALL: &'static [EventType] = &[EventType::Key, EventType::Rel, EventType::Syn];

    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Relative axes the device declares (`REL_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum RelAxis {
    X = 0x00,
    Y = 0x01,
    /// Vertical wheel; positive scrolls up / away from the user.
    Wheel = 0x08,
}

impl RelAxis {
    pub const ALL: &'static [RelAxis] = &[RelAxis::X, RelAxis::Y, RelAxis::Wheel];

    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Value of an `EV_KEY` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Up,
    Down,
}

impl KeyState {
    pub fn as_value(self) -> i32 {
        match self {
            KeyState::Up => 0,
            KeyState::Down => 1,
        }
    }
}

/// Wall-clock timestamp split the way `struct timeval` stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub secs: i64,
    pub micros: i64,
}

impl Timestamp {
    /// Current wall-clock time.  A clock before the Unix epoch yields zero.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            secs: since_epoch.as_secs() as i64,
            micros: i64::from(since_epoch.subsec_micros()),
        }
    }
}

/// One input event: (timestamp, type, code, value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEventRecord {
    pub time: Timestamp,
    pub event_type: EventType,
    pub code: u16,
    pub value: i32,
}

impl InputEventRecord {
    /// Builds a record stamped with the current time.
    pub fn now(event_type: EventType, code: u16, value: i32) -> Self {
        Self {
            time: Timestamp::now(),
            event_type,
            code,
            value,
        }
    }

    /// Key or button transition.
    pub fn key(key: KeyCode, state: KeyState) -> Self {
        Self::now(EventType::Key, key.as_u16(), state.as_value())
    }

    /// Relative movement on one axis.
    pub fn rel(axis: RelAxis, delta: i32) -> Self {
        Self::now(EventType::Rel, axis.as_u16(), delta)
    }

    /// Frame terminator.
    pub fn sync() -> Self {
        Self::now(EventType::Syn, SYN_REPORT, 0)
    }

    /// Returns `true` for the `EV_SYN / SYN_REPORT` frame terminator.
    pub fn is_sync(&self) -> bool {
        self.event_type == EventType::Syn && self.code == SYN_REPORT
    }

    /// Serializes the record into the kernel layout for this target.
    pub fn to_bytes(&self) -> [u8; INPUT_EVENT_SIZE] {
        let mut buf = [0u8; INPUT_EVENT_SIZE];
        let t = TIME_FIELD_SIZE;
        write_time_field(&mut buf[0..t], self.time.secs);
        write_time_field(&mut buf[t..2 * t], self.time.micros);
        let rest = 2 * t;
        buf[rest..rest + 2].copy_from_slice(&self.event_type.as_u16().to_ne_bytes());
        buf[rest + 2..rest + 4].copy_from_slice(&self.code.to_ne_bytes());
        buf[rest + 4..rest + 8].copy_from_slice(&self.value.to_ne_bytes());
        buf
    }
}

#[cfg(target_pointer_width = "64")]
fn write_time_field(dst: &mut [u8], v: i64) {
    dst.copy_from_slice(&v.to_ne_bytes());
}

// 32-bit `long`; values past 2038 wrap exactly as the C struct would.
#[cfg(not(target_pointer_width = "64"))]
fn write_time_field(dst: &mut [u8], v: i64) {
    dst.copy_from_slice(&(v as i32).to_ne_bytes());
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(event_type: EventType, code: u16, value: i32) -> InputEventRecord {
        InputEventRecord {
            time: Timestamp {
                secs: 1_700_000_000,
                micros: 123_456,
            },
            event_type,
            code,
            value,
        }
    }

    #[test]
    fn test_event_type_values_match_kernel_header() {
        assert_eq!(EventType::Syn.as_u16(), 0x00);
        assert_eq!(EventType::Key.as_u16(), 0x01);
        assert_eq!(EventType::Rel.as_u16(), 0x02);
    }

    #[test]
    fn test_rel_axis_values_match_kernel_header() {
        assert_eq!(RelAxis::X.as_u16(), 0x00);
        assert_eq!(RelAxis::Y.as_u16(), 0x01);
        assert_eq!(RelAxis::Wheel.as_u16(), 0x08);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_record_is_24_bytes_on_64_bit_targets() {
        assert_eq!(INPUT_EVENT_SIZE, 24);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_to_bytes_places_fields_at_kernel_offsets() {
        // Arrange
        let record = fixed(EventType::Key, KeyCode::C.as_u16(), 1);

        // Act
        let bytes = record.to_bytes();

        // Assert
        assert_eq!(&bytes[0..8], &1_700_000_000i64.to_ne_bytes());
        assert_eq!(&bytes[8..16], &123_456i64.to_ne_bytes());
        assert_eq!(&bytes[16..18], &1u16.to_ne_bytes());
        assert_eq!(&bytes[18..20], &46u16.to_ne_bytes());
        assert_eq!(&bytes[20..24], &1i32.to_ne_bytes());
    }

    #[test]
    fn test_negative_relative_value_is_encoded_as_signed() {
        let record = fixed(EventType::Rel, RelAxis::Wheel.as_u16(), -5);
        let bytes = record.to_bytes();
        let off = 2 * TIME_FIELD_SIZE + 4;
        let value = i32::from_ne_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]]);
        assert_eq!(value, -5);
    }

    #[test]
    fn test_sync_record_has_zero_code_and_value() {
        let sync = InputEventRecord::sync();
        assert_eq!(sync.event_type, EventType::Syn);
        assert_eq!(sync.code, 0);
        assert_eq!(sync.value, 0);
        assert!(sync.is_sync());
    }

    #[test]
    fn test_key_record_uses_one_for_down_and_zero_for_up() {
        let down = InputEventRecord::key(KeyCode::A, KeyState::Down);
        let up = InputEventRecord::key(KeyCode::A, KeyState::Up);
        assert_eq!((down.event_type, down.code, down.value), (EventType::Key, 30, 1));
        assert_eq!((up.event_type, up.code, up.value), (EventType::Key, 30, 0));
        assert!(!down.is_sync());
    }

    #[test]
    fn test_timestamp_now_has_microseconds_below_one_second() {
        let ts = Timestamp::now();
        assert!(ts.secs > 0);
        assert!((0..1_000_000).contains(&ts.micros));
    }

    #[test]
    fn test_registration_order_of_event_types() {
        assert_eq!(
            EventType::ALL,
            &[EventType::Key, EventType::Rel, EventType::Syn]
        );
    }
}
