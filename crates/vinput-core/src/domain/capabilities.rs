//! The capability set a virtual device declares before activation.
//!
//! The kernel only delivers events the device announced during registration.
//! An `EV_KEY` event for a key code that was never passed to `UI_SET_KEYBIT`
//! is silently dropped, so the declared set has to be a superset of everything
//! the action layer can ever emit.  Building it from the [`KeySymbolTable`]
//! guarantees exactly that: if a name resolves, its code is declared.

use crate::keymap::{KeyCode, KeySymbolTable};
use crate::protocol::event::{EventType, InputEventRecord, RelAxis};

/// Event types, key/button codes and relative axes, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    pub event_types: Vec<EventType>,
    pub key_codes: Vec<KeyCode>,
    pub rel_axes: Vec<RelAxis>,
}

impl CapabilitySet {
    /// Keyboard + three-button wheel mouse covering every code in `table`.
    pub fn from_table(table: &KeySymbolTable) -> Self {
        Self {
            event_types: EventType::ALL.to_vec(),
            key_codes: table.codes().into_iter().collect(),
            rel_axes: RelAxis::ALL.to_vec(),
        }
    }

    /// Returns `true` if `record` is allowed on a device registered with this set.
    pub fn covers(&self, record: &InputEventRecord) -> bool {
        if !self.event_types.contains(&record.event_type) {
            return false;
        }
        match record.event_type {
            EventType::Syn => true,
            EventType::Key => self.key_codes.iter().any(|k| k.as_u16() == record.code),
            EventType::Rel => self.rel_axes.iter().any(|a| a.as_u16() == record.code),
        }
    }

    /// Total number of declaration calls registration will issue.
    pub fn declaration_count(&self) -> usize {
        self.event_types.len() + self.key_codes.len() + self.rel_axes.len()
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::from_table(&KeySymbolTable::new())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::event::KeyState;

    #[test]
    fn test_every_resolvable_name_is_declared() {
        // Arrange
        let table = KeySymbolTable::new();
        let caps = CapabilitySet::from_table(&table);

        // Assert
        for name in table.key_names() {
            let code = table.lookup(name).unwrap();
            assert!(caps.key_codes.contains(&code), "{name} -> {code:?} not declared");
        }
        for name in table.button_names() {
            let code = table.lookup_button(name).unwrap();
            assert!(caps.key_codes.contains(&code), "button {name} not declared");
        }
    }

    #[test]
    fn test_key_codes_are_declared_once_each_in_ascending_order() {
        let caps = CapabilitySet::default();
        let mut sorted = caps.key_codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(caps.key_codes, sorted);
    }

    #[test]
    fn test_covers_accepts_declared_events() {
        let caps = CapabilitySet::default();
        assert!(caps.covers(&InputEventRecord::key(KeyCode::C, KeyState::Down)));
        assert!(caps.covers(&InputEventRecord::key(KeyCode::BtnMiddle, KeyState::Up)));
        assert!(caps.covers(&InputEventRecord::rel(RelAxis::Wheel, -3)));
        assert!(caps.covers(&InputEventRecord::sync()));
    }

    #[test]
    fn test_covers_rejects_undeclared_codes() {
        let caps = CapabilitySet::default();
        // KEY_MUTE (113) is not part of the table.
        assert!(!caps.covers(&InputEventRecord::now(EventType::Key, 113, 1)));
        // REL_HWHEEL (6) is not declared.
        assert!(!caps.covers(&InputEventRecord::now(EventType::Rel, 6, 1)));
    }

    #[test]
    fn test_declaration_count() {
        let caps = CapabilitySet::default();
        assert_eq!(caps.declaration_count(), 3 + KeyCode::ALL.len() + 3);
    }
}
