//! Strongly-typed ID wrappers for all entity types
//!
//! Backends disagree on key shape: the Local backend assigns random UUIDs,
//! the Remote backend hands back opaque document keys. IDs therefore wrap a
//! `String`, while newtypes still prevent mixing a group id with an expense id.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random (UUID v4) ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap a key produced by a backend
            pub fn from_key(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Get the underlying key
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(GroupId);
define_id!(ExpenseId);
