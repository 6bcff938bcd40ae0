//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Group,
    Expense,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Group => write!(f, "Group"),
            EntityType::Expense => write!(f, "Expense"),
        }
    }
}

/// A single audit log entry
///
/// Membership changes are recorded as updates of the owning group, so the
/// before/after snapshots show the member list on both sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Backend key of the affected record
    pub entity_id: String,

    /// Human-readable label (group name, expense description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Which session kind made the change ("local" or "remote")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn blank(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            session: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created record
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::blank(Operation::Create, entity_type, entity_id.into())
        }
    }

    /// Entry for a changed record
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::blank(Operation::Update, entity_type, entity_id.into())
        }
    }

    /// Entry for a deleted record
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(entity).ok(),
            ..Self::blank(Operation::Delete, entity_type, entity_id.into())
        }
    }

    /// Tag the entry with the session kind that made the change
    pub fn in_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(EntityType::Expense.to_string(), "Expense");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::Group,
            "g1",
            Some("Lisbon".to_string()),
            &json!({"name": "Lisbon", "members": []}),
        )
        .in_session("local");

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after.as_ref().unwrap()["name"], "Lisbon");
        assert_eq!(entry.session.as_deref(), Some("local"));
    }

    #[test]
    fn test_update_and_delete_entries() {
        let before = json!({"members": ["Ana"]});
        let after = json!({"members": ["Ana", "Luis"]});
        let update = AuditEntry::update(
            EntityType::Group,
            "g1",
            None,
            &before,
            &after,
            Some("members: +Luis".into()),
        );
        assert!(update.before.is_some() && update.after.is_some());

        let delete = AuditEntry::delete(EntityType::Expense, "e1", None, &json!({"amount": "10"}));
        assert!(delete.before.is_some());
        assert!(delete.after.is_none());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::create(EntityType::Expense, "e1", None, &json!({}));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(!line.contains("entity_name"));
        assert!(!line.contains("before"));

        let back: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.entity_type, EntityType::Expense);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(
            EntityType::Group,
            "g1",
            Some("Lisbon".into()),
            &json!({}),
            &json!({}),
            Some("members: +Ana".into()),
        );
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE Group g1 (Lisbon)"));
        assert!(formatted.contains("Changes: members: +Ana"));
    }
}
