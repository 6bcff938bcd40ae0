//! Sessions: which backend the caller is currently acting through
//!
//! A guest session persists to the device-local ledger; an authenticated
//! session persists to the shared document store under a stable identity.
//! The backend is chosen once, when the session is created, and every ledger
//! operation goes through `Session::store`.

pub mod manager;
pub mod migrate;

pub use manager::SessionManager;
pub use migrate::{ClearPolicy, MigrationFailure, MigrationReport, SessionMigrator};

use std::fmt;
use std::sync::Arc;

use crate::models::Identity;
use crate::storage::{LedgerStore, LocalLedger, RemoteLedger};

/// Kind of session, without its backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Local,
    Remote,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// An active session bound to its backend
#[derive(Clone)]
pub enum Session {
    /// Guest session on this device only
    Local(Arc<LocalLedger>),
    /// Authenticated session on the shared document store
    Remote(Arc<RemoteLedger>),
}

impl Session {
    /// The ledger store backing this session
    pub fn store(&self) -> &dyn LedgerStore {
        match self {
            Self::Local(ledger) => ledger.as_ref(),
            Self::Remote(ledger) => ledger.as_ref(),
        }
    }

    /// Which backend this session uses
    pub fn kind(&self) -> SessionKind {
        match self {
            Self::Local(_) => SessionKind::Local,
            Self::Remote(_) => SessionKind::Remote,
        }
    }

    /// The authenticated identity, if any
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Local(_) => None,
            Self::Remote(ledger) => Some(ledger.identity()),
        }
    }

    /// Check whether this is a guest session
    pub fn is_guest(&self) -> bool {
        self.kind() == SessionKind::Local
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identity() {
            Some(identity) => write!(f, "Session::Remote({})", identity.uid),
            None => write!(f, "Session::Local"),
        }
    }
}
