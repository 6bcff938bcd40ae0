//! Expense service
//!
//! Records and removes expenses, enforcing the rules that need the group:
//! it must have members, the payer must be one of them, and any explicit
//! participants must be too.

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{member, Expense, ExpenseId, ExpenseValidationError, GroupId, NewExpense};
use crate::session::Session;
use crate::storage::LedgerStore;

use super::record;

fn invalid(e: ExpenseValidationError) -> LedgerError {
    LedgerError::Validation(e.to_string())
}

/// Service for expense management
pub struct ExpenseService<'a> {
    session: &'a Session,
    audit: Option<&'a AuditLogger>,
    settings: Option<&'a Settings>,
}

impl<'a> ExpenseService<'a> {
    /// Create an expense service for `session`
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            audit: None,
            settings: None,
        }
    }

    /// Only accept the categories configured in `settings`
    pub fn with_settings(mut self, settings: &'a Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Record successful changes in `logger`
    pub fn with_audit(mut self, logger: &'a AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Record an expense
    ///
    /// Payer and participant names are stored in the group's casing, and
    /// with settings attached the category in its configured spelling.
    pub async fn add(&self, mut input: NewExpense) -> LedgerResult<Expense> {
        input.validate().map_err(invalid)?;

        if let Some(settings) = self.settings {
            let category = settings.known_category(&input.category).ok_or_else(|| {
                invalid(ExpenseValidationError::UnknownCategory(input.category.clone()))
            })?;
            input.category = category.to_string();
        }

        let group = self
            .session
            .store()
            .find_group(&input.group_id)
            .await?
            .ok_or_else(|| LedgerError::group_not_found(input.group_id.as_str()))?;

        if group.members.is_empty() {
            return Err(invalid(ExpenseValidationError::NoMembers));
        }

        input.payer = member::find_member(&group.members, &input.payer)
            .ok_or_else(|| invalid(ExpenseValidationError::UnknownPayer(input.payer.clone())))?
            .to_string();

        if let Some(participants) = input.participants.take() {
            let mut resolved: Vec<String> = Vec::with_capacity(participants.len());
            for name in &participants {
                let stored = member::find_member(&group.members, name).ok_or_else(|| {
                    invalid(ExpenseValidationError::UnknownParticipant(name.clone()))
                })?;
                if !resolved.iter().any(|r| r == stored) {
                    resolved.push(stored.to_string());
                }
            }
            input.participants = (!resolved.is_empty()).then_some(resolved);
        }

        let expense = self.session.store().add_expense(input).await?;
        tracing::info!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            amount = %expense.amount,
            "expense recorded"
        );

        record(
            self.audit,
            self.session,
            AuditEntry::create(
                EntityType::Expense,
                expense.id.as_str(),
                Some(expense.description.clone()),
                &expense,
            ),
        );
        Ok(expense)
    }

    /// Expenses of a group, newest first
    pub async fn list(&self, group_id: &GroupId) -> LedgerResult<Vec<Expense>> {
        self.session.store().list_expenses(group_id).await
    }

    /// Delete an expense of a group
    pub async fn delete(&self, group_id: &GroupId, id: &ExpenseId) -> LedgerResult<()> {
        let expense = self
            .list(group_id)
            .await?
            .into_iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| LedgerError::expense_not_found(id.as_str()))?;

        self.session.store().delete_expense(id).await?;
        tracing::info!(expense_id = %id, "expense deleted");

        record(
            self.audit,
            self.session,
            AuditEntry::delete(
                EntityType::Expense,
                id.as_str(),
                Some(expense.description.clone()),
                &expense,
            ),
        );
        Ok(())
    }
}
