//! Audit trail for TravelSplit
//!
//! Every successful change made through the service layer is appended to an
//! audit log as one JSON line, with the record as it looked before and after.
//!
//! - `AuditEntry`: one logged change (timestamp, operation, entity, snapshots)
//! - `AuditLogger`: append-only JSONL writer and reader
//! - `generate_diff`: short summary of what changed between two snapshots
//!
//! # Example
//!
//! ```rust,ignore
//! use travelsplit::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Group,
//!     group.id.as_str(),
//!     Some(group.name.clone()),
//!     &group,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
