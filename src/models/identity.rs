//! Identities a session can act as
//!
//! An authenticated `Identity` is issued by whatever sign-in flow the caller
//! uses; this crate only carries its stable key. A `GuestProfile` is the
//! remembered marker of an unauthenticated, single-device session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name given to guest profiles
pub const GUEST_NAME: &str = "Guest";

/// An authenticated user with a stable key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable key issued by the authentication provider
    pub uid: String,
    /// Name to show for the user
    pub display_name: String,
}

impl Identity {
    /// Create an identity
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
        }
    }
}

/// The remembered guest marker for Local sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestProfile {
    pub id: String,
    pub name: String,
    #[serde(default = "default_is_guest")]
    pub is_guest: bool,
}

fn default_is_guest() -> bool {
    true
}

impl GuestProfile {
    /// Create a fresh guest profile with a random id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: GUEST_NAME.to_string(),
            is_guest: true,
        }
    }
}

impl Default for GuestProfile {
    fn default() -> Self {
        Self::new()
    }
}
