//! Optimistic updates with rollback
//!
//! A caller showing data to a user often wants to display a change before
//! the backend confirms it. `Staged` keeps the last confirmed value next to
//! the displayed one: a change is applied to the displayed value at once,
//! kept if the persisting future succeeds, and rolled back if it fails.

use std::future::Future;

use crate::error::LedgerResult;

/// A value with a tentative, not-yet-confirmed view
#[derive(Debug, Clone)]
pub struct Staged<T> {
    confirmed: T,
    shown: T,
}

impl<T: Clone> Staged<T> {
    /// Start from a confirmed value
    pub fn new(value: T) -> Self {
        Self {
            confirmed: value.clone(),
            shown: value,
        }
    }

    /// The value to display, including any change in flight
    pub fn current(&self) -> &T {
        &self.shown
    }

    /// The last value the backend confirmed
    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    /// Apply `edit` tentatively, then await `persist`
    ///
    /// On success the edited value becomes the confirmed one. On failure the
    /// displayed value is restored to what it was before `edit` and the error
    /// is returned.
    pub async fn apply<E, F, R>(&mut self, edit: E, persist: F) -> LedgerResult<R>
    where
        E: FnOnce(&mut T),
        F: Future<Output = LedgerResult<R>>,
    {
        let snapshot = self.shown.clone();
        edit(&mut self.shown);

        match persist.await {
            Ok(result) => {
                self.confirmed = self.shown.clone();
                Ok(result)
            }
            Err(e) => {
                tracing::debug!(error = %e, "staged change rolled back");
                self.shown = snapshot;
                Err(e)
            }
        }
    }

    /// Replace both views with a value freshly read from the backend
    pub fn refresh(&mut self, value: T) {
        self.confirmed = value.clone();
        self.shown = value;
    }
}

impl<T: Clone + PartialEq> Staged<T> {
    /// Check whether the displayed value differs from the confirmed one
    pub fn is_dirty(&self) -> bool {
        self.shown != self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::models::{Group, GroupId, NewGroup};

    fn group() -> Group {
        let mut group = Group::new(GroupId::from_key("g1"), NewGroup::new("Lisbon"));
        group.add_member("Ana");
        group.add_member("Luis");
        group
    }

    #[tokio::test]
    async fn test_commit_on_success() {
        let mut staged = Staged::new(group());

        staged
            .apply(|g| { g.remove_member("Luis"); }, async { Ok(()) })
            .await
            .unwrap();

        assert_eq!(staged.current().members, vec!["Ana"]);
        assert_eq!(staged.confirmed().members, vec!["Ana"]);
        assert!(!staged.is_dirty());
    }

    #[tokio::test]
    async fn test_rollback_on_failure() {
        let mut staged = Staged::new(group());

        let result: LedgerResult<()> = staged
            .apply(
                |g| {
                    g.remove_member("Luis");
                },
                async { Err(LedgerError::Remote("offline".into())) },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(staged.current().members, vec!["Ana", "Luis"]);
        assert!(!staged.is_dirty());
    }

    #[test]
    fn test_refresh_replaces_both_views() {
        let mut staged = Staged::new(1);
        staged.refresh(5);
        assert_eq!(*staged.current(), 5);
        assert_eq!(*staged.confirmed(), 5);
    }
}
