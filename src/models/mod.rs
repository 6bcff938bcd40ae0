//! Core data models for TravelSplit
//!
//! Groups, their members, the expenses recorded against them, and the money
//! and id types those records are built from.

pub mod expense;
pub mod group;
pub mod identity;
pub mod ids;
pub mod member;
pub mod money;

pub use expense::{Expense, ExpenseValidationError, NewExpense, DEFAULT_CATEGORIES};
pub use group::{Group, GroupValidationError, NewGroup, UNNAMED_GROUP};
pub use identity::{GuestProfile, Identity};
pub use ids::{ExpenseId, GroupId};
pub use money::{Money, MoneyParseError};
