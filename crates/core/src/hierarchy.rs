//! Static department → room hierarchy.
//!
//! The hierarchy is loaded once at startup from a JSON document (an ordered
//! array of departments, each with an ordered list of rooms) and never
//! mutated afterwards. Every handler resolves departments and rooms against
//! this index; persisted room ids that no longer resolve are treated as
//! absent by callers.
//!
//! Because department keys and room ids travel inside callback payloads,
//! loading validates that none of them collides with the reserved words and
//! prefixes of the payload grammar, and that ids are unique across the whole
//! document.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;
use crate::navigation::{
    CB_BACK_PREFIX, CB_BACK_TO_DEPARTMENTS, CB_MARK_GOOD_PREFIX, CB_OPEN_COMMENTS_PREFIX,
    CB_SEND_REPORT,
};

/// A single inspectable room.
#[derive(Debug, Clone, Deserialize)]
pub struct Room {
    /// Stable identifier, also used as the callback payload for selection.
    pub id: String,
    /// Human-readable name shown on buttons and in exports.
    pub name: String,
    /// Optional guidance shown when the room is opened for commenting.
    #[serde(default)]
    pub intermediate_message: String,
}

/// A department grouping an ordered list of rooms.
#[derive(Debug, Clone, Deserialize)]
pub struct Department {
    /// Stable key, also used as the callback payload for selection.
    pub key: String,
    /// Human-readable title.
    pub title: String,
    pub rooms: Vec<Room>,
}

/// Validated, immutable department index.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    departments: Vec<Department>,
}

impl Hierarchy {
    /// Validate and index a department list.
    pub fn new(departments: Vec<Department>) -> Result<Self, CoreError> {
        if departments.is_empty() {
            return Err(CoreError::InvalidHierarchy(
                "document contains no departments".into(),
            ));
        }

        let mut department_keys = HashSet::new();
        let mut room_ids = HashSet::new();

        for department in &departments {
            validate_identifier("department key", &department.key)?;
            if !department_keys.insert(department.key.as_str()) {
                return Err(CoreError::InvalidHierarchy(format!(
                    "duplicate department key: {}",
                    department.key
                )));
            }
            for room in &department.rooms {
                validate_identifier("room id", &room.id)?;
                if !room_ids.insert(room.id.as_str()) {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "duplicate room id: {}",
                        room.id
                    )));
                }
            }
        }

        // Callback resolution checks departments before rooms, so a room id
        // shadowed by a department key would be unreachable.
        for id in &room_ids {
            if department_keys.contains(id) {
                return Err(CoreError::InvalidHierarchy(format!(
                    "room id collides with department key: {id}"
                )));
            }
        }

        Ok(Self { departments })
    }

    /// Parse a JSON array of departments and validate it.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let departments: Vec<Department> = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidHierarchy(e.to_string()))?;
        Self::new(departments)
    }

    /// Read and parse a hierarchy document from disk.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::InvalidHierarchy(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Departments in document order.
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn department(&self, key: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.key == key)
    }

    /// Resolve a room id to its department and room, in document order.
    pub fn resolve_room(&self, room_id: &str) -> Option<(&Department, &Room)> {
        self.departments.iter().find_map(|department| {
            department
                .rooms
                .iter()
                .find(|room| room.id == room_id)
                .map(|room| (department, room))
        })
    }

    pub fn room_count(&self) -> usize {
        self.departments.iter().map(|d| d.rooms.len()).sum()
    }
}

fn validate_identifier(what: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::InvalidHierarchy(format!("empty {what}")));
    }
    for word in [CB_BACK_TO_DEPARTMENTS, CB_SEND_REPORT] {
        if value == word {
            return Err(CoreError::InvalidHierarchy(format!(
                "{what} {value:?} is a reserved callback word"
            )));
        }
    }
    for prefix in [CB_BACK_PREFIX, CB_MARK_GOOD_PREFIX, CB_OPEN_COMMENTS_PREFIX] {
        if value.starts_with(prefix) {
            return Err(CoreError::InvalidHierarchy(format!(
                "{what} {value:?} starts with reserved prefix {prefix:?}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
