//! Group model
//!
//! A named collection of members plus the expenses attributed to it. Groups
//! are persisted as flat records; expenses reference them by id only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ids::GroupId;
use super::member;

/// Name given to a group document created implicitly by a membership write
pub const UNNAMED_GROUP: &str = "Unnamed group";

/// A group of people sharing expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Backend-assigned identifier
    pub id: GroupId,

    /// Group name
    #[serde(default)]
    pub name: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Members in insertion order
    #[serde(default, deserialize_with = "lenient_members")]
    pub members: Vec<String>,

    /// When the group was created
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Build a group from creation input, with no members yet
    pub fn new(id: GroupId, input: NewGroup) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Check whether `name` is a member under normalization
    pub fn has_member(&self, name: &str) -> bool {
        member::contains_member(&self.members, name)
    }

    /// Add a member unless an equal-under-normalization one exists
    ///
    /// Returns `true` if the member list changed.
    pub fn add_member(&mut self, name: &str) -> bool {
        let clean = name.trim();
        if clean.is_empty() || self.has_member(clean) {
            return false;
        }
        self.members.push(clean.to_string());
        true
    }

    /// Remove the stored entry matching `name` under normalization
    ///
    /// Returns `true` if the member list changed.
    pub fn remove_member(&mut self, name: &str) -> bool {
        let clean = name.trim();
        if clean.is_empty() {
            return false;
        }
        let Some(stored) = member::find_member(&self.members, clean).map(str::to_owned) else {
            return false;
        };
        self.members.retain(|m| *m != stored);
        true
    }
}

/// Input for creating a group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    /// Group name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

impl NewGroup {
    /// Create group input
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the input
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(GroupValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

/// Validation errors for groups and their members
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    #[error("Group name cannot be empty")]
    EmptyName,
    #[error("Group name too long ({0} chars, max 100)")]
    NameTooLong(usize),
    #[error("Member name cannot be empty")]
    EmptyMemberName,
    #[error("A group must keep at least one member")]
    LastMember,
}

/// Accept any JSON for `members`, keeping only string entries
///
/// Records written by older clients may carry `null`, an object, or nothing at
/// all here; those read as an empty member list instead of failing the whole
/// collection.
fn lenient_members<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group() -> Group {
        Group::new(GroupId::from_key("g1"), NewGroup::new("Lisbon"))
    }

    #[test]
    fn test_new_group_has_no_members() {
        let g = group();
        assert!(g.members.is_empty());
        assert_eq!(g.name, "Lisbon");
    }

    #[test]
    fn test_add_member_is_idempotent_under_normalization() {
        let mut g = group();
        assert!(g.add_member("Ana"));
        assert!(!g.add_member(" ana "));
        assert!(!g.add_member("   "));
        assert_eq!(g.members, vec!["Ana"]);
    }

    #[test]
    fn test_remove_member_targets_stored_casing() {
        let mut g = group();
        g.add_member("Ana");
        g.add_member("Luis");
        assert!(g.remove_member("  ANA"));
        assert_eq!(g.members, vec!["Luis"]);
        assert!(!g.remove_member("Marta"));
        assert!(!g.remove_member(""));
    }

    #[test]
    fn test_validate() {
        assert!(NewGroup::new("Trip").validate().is_ok());
        assert_eq!(
            NewGroup::new("  ").validate(),
            Err(GroupValidationError::EmptyName)
        );
        assert!(matches!(
            NewGroup::new("x".repeat(101)).validate(),
            Err(GroupValidationError::NameTooLong(101))
        ));
    }

    #[test]
    fn test_missing_or_malformed_members_read_as_empty() {
        let missing: Group =
            serde_json::from_value(json!({"id": "a", "name": "A", "createdAt": 1})).unwrap();
        assert!(missing.members.is_empty());

        let null: Group = serde_json::from_value(
            json!({"id": "b", "name": "B", "members": null, "createdAt": 1}),
        )
        .unwrap();
        assert!(null.members.is_empty());

        let object: Group = serde_json::from_value(
            json!({"id": "c", "name": "C", "members": {"x": 1}, "createdAt": 1}),
        )
        .unwrap();
        assert!(object.members.is_empty());

        let mixed: Group = serde_json::from_value(
            json!({"id": "d", "name": "D", "members": ["Ana", 3, "Luis"], "createdAt": 1}),
        )
        .unwrap();
        assert_eq!(mixed.members, vec!["Ana", "Luis"]);
    }

    #[test]
    fn test_serialized_shape() {
        let g = group();
        let value = serde_json::to_value(&g).unwrap();
        assert_eq!(value["id"], "g1");
        assert!(value["createdAt"].is_i64());
        assert!(value.get("description").is_none());
    }
}
