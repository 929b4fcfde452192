//! The `uinput_setup` record and device identity.
//!
//! Registering a virtual device is a short conversation with `/dev/uinput`
//! carried out through `ioctl(2)` calls:
//!
//! ```text
//! UI_SET_EVBIT  EV_KEY / EV_REL / EV_SYN     which event types exist
//! UI_SET_KEYBIT KEY_A, KEY_B, ... BTN_LEFT   which keys/buttons exist
//! UI_SET_RELBIT REL_X, REL_Y, REL_WHEEL      which relative axes exist
//! UI_DEV_SETUP  &uinput_setup                bus/vendor/product/version/name
//! UI_DEV_CREATE                              the device appears in /dev/input
//! ...write input_event records...
//! UI_DEV_DESTROY                             the device disappears
//! ```
//!
//! Only `UI_DEV_SETUP` carries a structured payload; this module encodes it.
//! The request numbers themselves are architecture-specific and live next to
//! the syscalls in the agent's Linux backend.

use serde::{Deserialize, Serialize};

/// `UINPUT_MAX_NAME_SIZE`: fixed size of the name buffer, NUL terminator included.
pub const UINPUT_MAX_NAME_SIZE: usize = 80;

/// `sizeof(struct uinput_setup)`: `input_id` (8) + name (80) + `ff_effects_max` (4).
pub const UINPUT_SETUP_SIZE: usize = 8 + UINPUT_MAX_NAME_SIZE + 4;

/// `BUS_USB`
pub const BUS_USB: u16 = 0x03;

/// Metadata the kernel attaches to the virtual device (`struct input_id` + name).
///
/// Written exactly once, between capability declaration and activation.
/// Missing fields deserialize to the [`Default`] identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceIdentity {
    pub bus_type: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
    pub name: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            bus_type: BUS_USB,
            vendor: 0x1234,
            product: 0x5678,
            version: 1,
            name: "Virtual Input Device".to_string(),
        }
    }
}

impl DeviceIdentity {
    /// The name as the kernel will store it.
    ///
    /// At most `UINPUT_MAX_NAME_SIZE - 1` bytes so a NUL terminator always
    /// fits, cut back to the nearest character boundary so multi-byte UTF-8
    /// sequences are never split.
    pub fn bounded_name(&self) -> &str {
        let max = UINPUT_MAX_NAME_SIZE - 1;
        if self.name.len() <= max {
            return &self.name;
        }
        let mut end = max;
        while !self.name.is_char_boundary(end) {
            end -= 1;
        }
        &self.name[..end]
    }

    /// Serializes `struct uinput_setup` in native byte order.
    ///
    /// ```text
    /// offset 0  u16 bustype
    /// offset 2  u16 vendor
    /// offset 4  u16 product
    /// offset 6  u16 version
    /// offset 8  char name[80]        (NUL padded)
    /// offset 88 u32 ff_effects_max   (always 0: no force feedback)
    /// ```
    pub fn to_setup_bytes(&self) -> [u8; UINPUT_SETUP_SIZE] {
        let mut buf = [0u8; UINPUT_SETUP_SIZE];
        buf[0..2].copy_from_slice(&self.bus_type.to_ne_bytes());
        buf[2..4].copy_from_slice(&self.vendor.to_ne_bytes());
        buf[4..6].copy_from_slice(&self.product.to_ne_bytes());
        buf[6..8].copy_from_slice(&self.version.to_ne_bytes());
        let name = self.bounded_name().as_bytes();
        buf[8..8 + name.len()].copy_from_slice(name);
        buf[8 + UINPUT_MAX_NAME_SIZE..].copy_from_slice(&0u32.to_ne_bytes());
        buf
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
