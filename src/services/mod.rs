//! Service layer for TravelSplit
//!
//! Services sit between callers and the active session's ledger store. They
//! validate input before anything is written, derive summaries from the
//! latest snapshot, and record successful changes in the audit log.

pub mod expense;
pub mod group;
pub mod staged;
pub mod summary;

pub use expense::ExpenseService;
pub use group::GroupService;
pub use staged::Staged;
pub use summary::{GroupSummary, SummaryService};

use crate::audit::{AuditEntry, AuditLogger};
use crate::session::Session;

/// Append `entry` to the audit log, if one is configured
///
/// The store write has already happened, so a failing audit write is logged
/// and swallowed rather than reported as a failed operation.
fn record(audit: Option<&AuditLogger>, session: &Session, entry: AuditEntry) {
    let Some(logger) = audit else {
        return;
    };
    let entry = entry.in_session(session.kind().to_string());
    if let Err(e) = logger.log(&entry) {
        tracing::warn!(error = %e, entity_id = %entry.entity_id, "failed to write audit entry");
    }
}
