//! Session lifecycle
//!
//! `SessionManager` owns the current session and the transitions between
//! them: resuming at startup, starting as a guest, signing in (which carries
//! guest expenses over exactly once) and signing out.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{GuestProfile, Identity};
use crate::storage::{DocumentStore, LocalLedger, RemoteLedger};

use super::migrate::{ClearPolicy, MigrationReport, SessionMigrator};
use super::Session;

/// Owns the active session and switches between backends
pub struct SessionManager {
    local: Arc<LocalLedger>,
    documents: Arc<dyn DocumentStore>,
    migrator: SessionMigrator,
    current: Option<Session>,
}

impl SessionManager {
    /// Create a manager with no active session
    pub fn new(
        local: Arc<LocalLedger>,
        documents: Arc<dyn DocumentStore>,
        policy: ClearPolicy,
    ) -> Self {
        Self {
            local,
            documents,
            migrator: SessionMigrator::new(policy),
            current: None,
        }
    }

    /// Create a manager using the migration policy from `settings`
    pub fn from_settings(
        local: Arc<LocalLedger>,
        documents: Arc<dyn DocumentStore>,
        settings: &Settings,
    ) -> Self {
        Self::new(local, documents, settings.migration_policy)
    }

    /// The configured clear policy for sign-in migration
    pub fn migration_policy(&self) -> ClearPolicy {
        self.migrator.policy()
    }

    /// The active session, if any
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// The active session, or an error if nobody has started one
    pub fn require(&self) -> LedgerResult<&Session> {
        self.current
            .as_ref()
            .ok_or_else(|| LedgerError::Session("No active session".into()))
    }

    /// Resume at startup
    ///
    /// An authenticated identity wins; otherwise a remembered guest profile
    /// resumes the Local session; otherwise there is no session.
    pub fn restore(&mut self, authenticated: Option<Identity>) -> LedgerResult<Option<&Session>> {
        self.current = match authenticated {
            Some(identity) => Some(self.remote_session(identity)),
            None => self
                .local
                .guest_profile()?
                .map(|_| Session::Local(self.local.clone())),
        };

        if let Some(session) = &self.current {
            tracing::info!(kind = %session.kind(), "session restored");
        }
        Ok(self.current.as_ref())
    }

    /// Start (or continue) a guest session on this device
    pub fn start_guest(&mut self) -> LedgerResult<&Session> {
        if let Some(Session::Remote(_)) = self.current {
            return Err(LedgerError::Session(
                "Sign out before starting a guest session".into(),
            ));
        }

        if self.local.guest_profile()?.is_none() {
            let profile = GuestProfile::new();
            self.local.remember_guest(&profile)?;
            tracing::info!(guest_id = %profile.id, "guest profile created");
        }

        Ok(self.current.insert(Session::Local(self.local.clone())))
    }

    /// Switch to an authenticated session
    ///
    /// Coming from a guest session, local expenses are migrated first and the
    /// report is returned. The guest profile is then forgotten, so signing out
    /// later never resumes the guest session. Signing in again as the same
    /// identity is a no-op.
    pub async fn sign_in(&mut self, identity: Identity) -> LedgerResult<Option<MigrationReport>> {
        let report = match &self.current {
            Some(Session::Remote(ledger)) if ledger.identity().uid == identity.uid => {
                return Ok(None);
            }
            Some(Session::Local(local)) => {
                let remote = RemoteLedger::new(self.documents.clone(), identity.clone());
                let report = self.migrator.migrate(local, &remote).await?;
                local.forget_guest()?;
                Some(report)
            }
            _ => None,
        };

        self.current = Some(self.remote_session(identity));
        tracing::info!("signed in");
        Ok(report)
    }

    /// End the active session
    ///
    /// A guest's profile is forgotten; an authenticated identity is dropped.
    /// Guest data left on the device is not brought back either way.
    pub fn sign_out(&mut self) -> LedgerResult<()> {
        match self.current.take() {
            Some(Session::Local(_)) => self.local.forget_guest()?,
            Some(Session::Remote(_)) | None => {}
        }
        tracing::info!("signed out");
        Ok(())
    }

    fn remote_session(&self, identity: Identity) -> Session {
        Session::Remote(Arc::new(RemoteLedger::new(self.documents.clone(), identity)))
    }
}
