//! Pure ledger computations
//!
//! Everything here is a deterministic function of a snapshot of members and
//! expenses: balances, the transfers that settle them, and per-category
//! totals. Nothing in this module touches storage.

pub mod balance;
pub mod category;
pub mod settlement;

pub use balance::{compute, Balances, MemberBalance};
pub use category::{aggregate, CategoryTotal};
pub use settlement::{apply, plan, Transfer};
