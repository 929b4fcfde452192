//! Status snapshot of the running agent.
//!
//! A caller that wants to know what the device can do (for a status page, a
//! health probe, or `--list-keys`) gets a [`StatusReport`]: whether the agent
//! is running, every key name it accepts, and a one-line description of each
//! operation.  The report serializes to JSON with `serde_json`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::input_actions::InputActions;
use vinput_core::keymap::KeySymbolTable;

/// Descriptions of the operations the Action API offers, keyed by name.
const OPERATIONS: &[(&str, &str)] = &[
    ("hold", "press and hold keys until released"),
    ("release", "release previously held keys"),
    ("pressAndRelease", "tap keys: hold, short delay, release"),
    ("moveMouse", "move the pointer by a relative offset"),
    ("clickMouse", "click a mouse button (left, right, middle)"),
    ("scrollMouse", "turn the wheel; positive up, negative down"),
];

/// JSON-serializable snapshot of the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub available_keys: Vec<&'static str>,
    pub operations: BTreeMap<&'static str, &'static str>,
}

impl StatusReport {
    /// Snapshot of a live agent.
    pub fn running(actions: &InputActions) -> Self {
        Self::build(actions.key_names())
    }

    /// Snapshot built straight from a table, used before any device exists.
    pub fn from_table(table: &KeySymbolTable) -> Self {
        Self::build(table.names())
    }

    fn build(available_keys: Vec<&'static str>) -> Self {
        Self {
            status: "running",
            available_keys,
            operations: OPERATIONS.iter().copied().collect(),
        }
    }

    /// Pretty-printed JSON form of the report.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_every_table_name_sorted() {
        // Arrange
        let table = KeySymbolTable::new();

        // Act
        let report = StatusReport::from_table(&table);

        // Assert
        assert_eq!(report.available_keys, table.names());
        let mut sorted = report.available_keys.clone();
        sorted.sort_unstable();
        assert_eq!(report.available_keys, sorted);
    }

    #[test]
    fn test_report_describes_all_six_operations() {
        let report = StatusReport::from_table(&KeySymbolTable::new());
        assert_eq!(report.operations.len(), 6);
        for op in [
            "hold",
            "release",
            "pressAndRelease",
            "moveMouse",
            "clickMouse",
            "scrollMouse",
        ] {
            assert!(report.operations.contains_key(op), "missing {op}");
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        // Arrange
        let report = StatusReport::from_table(&KeySymbolTable::new());

        // Act
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        // Assert
        assert_eq!(value["status"], "running");
        assert!(value["available_keys"]
            .as_array()
            .unwrap()
            .iter()
            .any(|k| k == "ctrl"));
        assert!(value["operations"]["scrollMouse"].is_string());
    }
}
