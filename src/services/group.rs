//! Group service
//!
//! Group and membership management on top of the active session's store.

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Group, GroupId, GroupValidationError, NewGroup};
use crate::session::Session;
use crate::storage::LedgerStore;

use super::record;

/// Service for group management
pub struct GroupService<'a> {
    session: &'a Session,
    audit: Option<&'a AuditLogger>,
}

impl<'a> GroupService<'a> {
    /// Create a group service for `session`
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            audit: None,
        }
    }

    /// Record successful changes in `logger`
    pub fn with_audit(mut self, logger: &'a AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Create a new group
    pub async fn create(&self, mut input: NewGroup) -> LedgerResult<Group> {
        input.name = input.name.trim().to_string();
        input.description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        input
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let group = self.session.store().create_group(input).await?;
        tracing::info!(group_id = %group.id, name = %group.name, "group created");

        record(
            self.audit,
            self.session,
            AuditEntry::create(
                EntityType::Group,
                group.id.as_str(),
                Some(group.name.clone()),
                &group,
            ),
        );
        Ok(group)
    }

    /// List all groups
    pub async fn list(&self) -> LedgerResult<Vec<Group>> {
        self.session.store().list_groups().await
    }

    /// Get a group, failing if it doesn't exist
    pub async fn get(&self, id: &GroupId) -> LedgerResult<Group> {
        self.session
            .store()
            .find_group(id)
            .await?
            .ok_or_else(|| LedgerError::group_not_found(id.as_str()))
    }

    /// Delete a group
    ///
    /// Expenses recorded against it are not removed.
    pub async fn delete(&self, id: &GroupId) -> LedgerResult<()> {
        let group = self.get(id).await?;
        self.session.store().delete_group(id).await?;
        tracing::info!(group_id = %id, "group deleted");

        record(
            self.audit,
            self.session,
            AuditEntry::delete(EntityType::Group, id.as_str(), Some(group.name.clone()), &group),
        );
        Ok(())
    }

    /// Add a member to a group
    ///
    /// Adding a name that is already present (ignoring case and surrounding
    /// whitespace) leaves the group unchanged.
    pub async fn add_member(&self, id: &GroupId, name: &str) -> LedgerResult<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                GroupValidationError::EmptyMemberName.to_string(),
            ));
        }

        let before = self.get(id).await?;
        if before.has_member(name) {
            return Ok(before);
        }

        self.session.store().add_member(id, name).await?;
        let after = self.get(id).await?;
        tracing::info!(group_id = %id, member = name, "member added");

        self.record_membership(&before, &after);
        Ok(after)
    }

    /// Remove a member from a group
    ///
    /// Names that aren't members are ignored. The last remaining member
    /// cannot be removed.
    pub async fn remove_member(&self, id: &GroupId, name: &str) -> LedgerResult<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                GroupValidationError::EmptyMemberName.to_string(),
            ));
        }

        let before = self.get(id).await?;
        if !before.has_member(name) {
            return Ok(before);
        }
        if before.members.len() <= 1 {
            return Err(LedgerError::Validation(
                GroupValidationError::LastMember.to_string(),
            ));
        }

        self.session.store().remove_member(id, name).await?;
        let after = self.get(id).await?;
        tracing::info!(group_id = %id, member = name, "member removed");

        self.record_membership(&before, &after);
        Ok(after)
    }

    fn record_membership(&self, before: &Group, after: &Group) {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        record(
            self.audit,
            self.session,
            AuditEntry::update(
                EntityType::Group,
                after.id.as_str(),
                Some(after.name.clone()),
                before,
                after,
                diff,
            ),
        );
    }
}
