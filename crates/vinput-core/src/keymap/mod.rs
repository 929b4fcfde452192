//! Symbolic key name table.
//!
//! Callers of the virtual device name keys the way a person would ("ctrl",
//! "enter", "f5").  [`KeySymbolTable`] resolves those names to the evdev
//! [`KeyCode`] the kernel expects.  Lookups are case-insensitive and several
//! names may alias one code ("super", "meta", "win", "windows" and "cmd" are all
//! the left Meta key).
//!
//! Mouse buttons have their own, smaller namespace because their natural names
//! collide with keys: `"left"` is the Left arrow when holding keys but the left
//! mouse button when clicking.  Both namespaces live in the same table.

pub mod codes;

use std::collections::{BTreeSet, HashMap};

pub use codes::KeyCode;

/// Button used by a click when the caller does not name one.
pub const DEFAULT_BUTTON: &str = "left";

/// Key names accepted by hold/release/press, lowercase.
const KEY_NAMES: &[(&str, KeyCode)] = &[
    // Letters
    ("a", KeyCode::A),
    ("b", KeyCode::B),
    ("c", KeyCode::C),
    ("d", KeyCode::D),
    ("e", KeyCode::E),
    ("f", KeyCode::F),
    ("g", KeyCode::G),
    ("h", KeyCode::H),
    ("i", KeyCode::I),
    ("j", KeyCode::J),
    ("k", KeyCode::K),
    ("l", KeyCode::L),
    ("m", KeyCode::M),
    ("n", KeyCode::N),
    ("o", KeyCode::O),
    ("p", KeyCode::P),
    ("q", KeyCode::Q),
    ("r", KeyCode::R),
    ("s", KeyCode::S),
    ("t", KeyCode::T),
    ("u", KeyCode::U),
    ("v", KeyCode::V),
    ("w", KeyCode::W),
    ("x", KeyCode::X),
    ("y", KeyCode::Y),
    ("z", KeyCode::Z),
    // Digits
    ("1", KeyCode::Digit1),
    ("2", KeyCode::Digit2),
    ("3", KeyCode::Digit3),
    ("4", KeyCode::Digit4),
    ("5", KeyCode::Digit5),
    ("6", KeyCode::Digit6),
    ("7", KeyCode::Digit7),
    ("8", KeyCode::Digit8),
    ("9", KeyCode::Digit9),
    ("0", KeyCode::Digit0),
    // Editing and whitespace
    ("space", KeyCode::Space),
    ("enter", KeyCode::Enter),
    ("tab", KeyCode::Tab),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    // Modifiers
    ("ctrl", KeyCode::LeftCtrl),
    ("leftctrl", KeyCode::LeftCtrl),
    ("rightctrl", KeyCode::RightCtrl),
    ("shift", KeyCode::LeftShift),
    ("leftshift", KeyCode::LeftShift),
    ("rightshift", KeyCode::RightShift),
    ("alt", KeyCode::LeftAlt),
    ("leftalt", KeyCode::LeftAlt),
    ("rightalt", KeyCode::RightAlt),
    ("super", KeyCode::LeftMeta),
    ("meta", KeyCode::LeftMeta),
    ("leftmeta", KeyCode::LeftMeta),
    ("rightmeta", KeyCode::RightMeta),
    ("win", KeyCode::LeftMeta),
    ("windows", KeyCode::LeftMeta),
    ("cmd", KeyCode::LeftMeta),
    // Arrows
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    // Function keys
    ("f1", KeyCode::F1),
    ("f2", KeyCode::F2),
    ("f3", KeyCode::F3),
    ("f4", KeyCode::F4),
    ("f5", KeyCode::F5),
    ("f6", KeyCode::F6),
    ("f7", KeyCode::F7),
    ("f8", KeyCode::F8),
    ("f9", KeyCode::F9),
    ("f10", KeyCode::F10),
    ("f11", KeyCode::F11),
    ("f12", KeyCode::F12),
    // Navigation and locks
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("insert", KeyCode::Insert),
    ("capslock", KeyCode::CapsLock),
    // Punctuation
    ("semicolon", KeyCode::Semicolon),
    ("apostrophe", KeyCode::Apostrophe),
    ("grave", KeyCode::Grave),
    ("minus", KeyCode::Minus),
    ("equal", KeyCode::Equal),
    ("leftbrace", KeyCode::LeftBrace),
    ("rightbrace", KeyCode::RightBrace),
    ("backslash", KeyCode::Backslash),
    ("comma", KeyCode::Comma),
    ("dot", KeyCode::Dot),
    ("slash", KeyCode::Slash),
    ("kpasterisk", KeyCode::KpAsterisk),
    // Mouse buttons, holdable like keys (drag operations)
    ("leftclick", KeyCode::BtnLeft),
    ("rightclick", KeyCode::BtnRight),
    ("middleclick", KeyCode::BtnMiddle),
];

/// Button names accepted by click, lowercase.
const BUTTON_NAMES: &[(&str, KeyCode)] = &[
    ("left", KeyCode::BtnLeft),
    ("right", KeyCode::BtnRight),
    ("middle", KeyCode::BtnMiddle),
    ("leftclick", KeyCode::BtnLeft),
    ("rightclick", KeyCode::BtnRight),
    ("middleclick", KeyCode::BtnMiddle),
];

/// Immutable, case-insensitive mapping from symbolic names to [`KeyCode`]s.
///
/// Built once at startup and shared read-only for the lifetime of the device.
///
/// # Examples
///
/// ```rust
/// use vinput_core::keymap::{KeyCode, KeySymbolTable};
///
/// let table = KeySymbolTable::new();
/// assert_eq!(table.lookup("Ctrl"), Some(KeyCode::LeftCtrl));
/// assert_eq!(table.lookup_button("left"), Some(KeyCode::BtnLeft));
/// assert_eq!(table.lookup("nosuchkey"), None);
/// ```
#[derive(Debug, Clone)]
pub struct KeySymbolTable {
    keys: HashMap<&'static str, KeyCode>,
    buttons: HashMap<&'static str, KeyCode>,
}

impl KeySymbolTable {
    /// Builds the standard table.
    pub fn new() -> Self {
        Self {
            keys: KEY_NAMES.iter().copied().collect(),
            buttons: BUTTON_NAMES.iter().copied().collect(),
        }
    }

    /// Resolves a key name, ignoring case.
    ///
    /// Returns `None` for names the table does not know.
    pub fn lookup(&self, name: &str) -> Option<KeyCode> {
        self.keys.get(name.to_lowercase().as_str()).copied()
    }

    /// Resolves a mouse button name, ignoring case.
    pub fn lookup_button(&self, name: &str) -> Option<KeyCode> {
        self.buttons.get(name.to_lowercase().as_str()).copied()
    }

    /// Sorted key names.
    pub fn key_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.keys.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Sorted button names.
    pub fn button_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.buttons.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Every recognized key or button name, sorted and deduplicated.
    ///
    /// This is the read-only enumeration offered to status surfaces.
    pub fn names(&self) -> Vec<&'static str> {
        self.keys
            .keys()
            .chain(self.buttons.keys())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every distinct code reachable through either namespace, ascending.
    pub fn codes(&self) -> BTreeSet<KeyCode> {
        self.keys
            .values()
            .chain(self.buttons.values())
            .copied()
            .collect()
    }
}

impl Default for KeySymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive_for_every_key_name() {
        let table = KeySymbolTable::new();
        for name in table.key_names() {
            let upper = name.to_uppercase();
            assert_eq!(
                table.lookup(&upper),
                table.lookup(name),
                "lookup({upper:?}) must equal lookup({name:?})"
            );
            assert!(table.lookup(name).is_some());
        }
    }

    #[test]
    fn test_lookup_mixed_case() {
        let table = KeySymbolTable::new();
        assert_eq!(table.lookup("A"), Some(KeyCode::A));
        assert_eq!(table.lookup("a"), Some(KeyCode::A));
        assert_eq!(table.lookup("PageDown"), Some(KeyCode::PageDown));
        assert_eq!(table.lookup("ESCAPE"), Some(KeyCode::Esc));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let table = KeySymbolTable::new();
        assert_eq!(table.lookup("unknownkey"), None);
        assert_eq!(table.lookup(""), None);
        assert_eq!(table.lookup_button("sideways"), None);
    }

    #[test]
    fn test_meta_aliases_share_one_code() {
        let table = KeySymbolTable::new();
        for alias in ["super", "meta", "leftmeta", "win", "windows", "cmd"] {
            assert_eq!(table.lookup(alias), Some(KeyCode::LeftMeta), "{alias}");
        }
        assert_eq!(table.lookup("rightmeta"), Some(KeyCode::RightMeta));
    }

    #[test]
    fn test_left_means_arrow_for_keys_and_button_for_clicks() {
        let table = KeySymbolTable::new();
        assert_eq!(table.lookup("left"), Some(KeyCode::Left));
        assert_eq!(table.lookup_button("left"), Some(KeyCode::BtnLeft));
        assert_eq!(table.lookup_button("RIGHT"), Some(KeyCode::BtnRight));
        assert_eq!(table.lookup_button("Middle"), Some(KeyCode::BtnMiddle));
    }

    #[test]
    fn test_default_button_resolves_to_left_mouse_button() {
        let table = KeySymbolTable::new();
        assert_eq!(table.lookup_button(DEFAULT_BUTTON), Some(KeyCode::BtnLeft));
    }

    #[test]
    fn test_click_names_are_holdable_keys() {
        let table = KeySymbolTable::new();
        assert_eq!(table.lookup("leftclick"), Some(KeyCode::BtnLeft));
        assert_eq!(table.lookup("rightclick"), Some(KeyCode::BtnRight));
        assert_eq!(table.lookup("middleclick"), Some(KeyCode::BtnMiddle));
    }

    #[test]
    fn test_codes_cover_every_known_key_code() {
        // Every code the device declares must be reachable by name, and no
        // name may resolve to a code outside the declared set.
        let table = KeySymbolTable::new();
        let codes = table.codes();
        let all: BTreeSet<KeyCode> = KeyCode::ALL.iter().copied().collect();
        assert_eq!(codes, all);
    }

    #[test]
    fn test_names_are_sorted_and_unique() {
        let table = KeySymbolTable::new();
        let names = table.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
        // "left" exists in both namespaces but is listed once.
        assert_eq!(names.iter().filter(|n| **n == "left").count(), 1);
        assert!(names.contains(&"middle"));
        assert!(names.contains(&"ctrl"));
    }

    #[test]
    fn test_table_names_are_lowercase() {
        for (name, _) in KEY_NAMES.iter().chain(BUTTON_NAMES) {
            assert_eq!(*name, name.to_lowercase());
        }
    }
}
