//! Expense model
//!
//! A single payment by one member on behalf of the group. Expenses are
//! immutable once stored; the only later operation is deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ExpenseId, GroupId};
use super::money::Money;

/// Category labels offered by default
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Food", "Lodging", "Vehicle", "Other"];

/// A stored expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Backend-assigned identifier
    pub id: ExpenseId,

    /// Owning group
    pub group_id: GroupId,

    /// Name of the member who paid
    pub payer: String,

    /// Amount paid (non-negative)
    pub amount: Money,

    /// What the money was spent on
    #[serde(default)]
    pub description: String,

    /// Category label; blank means uncategorized
    #[serde(default)]
    pub category: String,

    /// When the expense was recorded
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    /// Members the expense is split across; `None` means everyone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,

    /// Identity that owns the record (Remote backend only)
    #[serde(
        default,
        rename = "userId",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<String>,
}

impl Expense {
    /// Stamp creation input with an id and the current time
    pub fn from_new(id: ExpenseId, input: NewExpense) -> Self {
        Self {
            id,
            group_id: input.group_id,
            payer: input.payer,
            amount: input.amount,
            description: input.description,
            category: input.category,
            created_at: Utc::now(),
            participants: input.participants,
            owner_id: None,
        }
    }

    /// Category label, if one is set
    pub fn category(&self) -> Option<&str> {
        let category = self.category.trim();
        (!category.is_empty()).then_some(category)
    }
}

/// Input for recording an expense (no id, no timestamp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub group_id: GroupId,
    pub payer: String,
    pub amount: Money,
    pub description: String,
    pub category: String,
    pub participants: Option<Vec<String>>,
}

impl NewExpense {
    /// Create expense input split across the whole group
    pub fn new(
        group_id: GroupId,
        payer: impl Into<String>,
        amount: Money,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            group_id,
            payer: payer.into(),
            amount,
            description: description.into(),
            category: category.into(),
            participants: None,
        }
    }

    /// Restrict the split to the named members
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = Some(participants.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the input
    ///
    /// Trims text fields in place so stored records never carry stray
    /// whitespace.
    pub fn validate(&mut self) -> Result<(), ExpenseValidationError> {
        self.payer = self.payer.trim().to_string();
        self.description = self.description.trim().to_string();
        self.category = self.category.trim().to_string();

        if self.payer.is_empty() {
            return Err(ExpenseValidationError::MissingPayer);
        }
        if self.description.is_empty() {
            return Err(ExpenseValidationError::MissingDescription);
        }
        if self.category.is_empty() {
            return Err(ExpenseValidationError::MissingCategory);
        }
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount(self.amount));
        }
        if let Some(participants) = &mut self.participants {
            participants.retain(|p| !p.trim().is_empty());
            for p in participants.iter_mut() {
                *p = p.trim().to_string();
            }
        }

        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpenseValidationError {
    #[error("Expense needs a payer")]
    MissingPayer,
    #[error("Expense needs a description")]
    MissingDescription,
    #[error("Expense needs a category")]
    MissingCategory,
    #[error("Expense amount cannot be negative: {0}")]
    NegativeAmount(Money),
    #[error("Add at least one member before recording expenses")]
    NoMembers,
    #[error("Payer '{0}' is not a member of the group")]
    UnknownPayer(String),
    #[error("Participant '{0}' is not a member of the group")]
    UnknownParticipant(String),
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}
