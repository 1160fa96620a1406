//! Identifier validation for domain names and event types.
//!
//! Both kinds of identifier share one character class: `[a-z0-9_]`, at
//! least one character long. Names end up as storage keys, so anything that
//! passes [`is_valid`] is also safe to use as a single path segment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NameKind, ValidationError};

/// Return `true` iff `name` is non-empty and only contains `[a-z0-9_]`.
#[must_use]
pub fn is_valid(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

fn check(kind: NameKind, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName { kind });
    }
    if !is_valid(name) {
        return Err(ValidationError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

macro_rules! define_name {
    ($(#[doc = $doc:expr])* $name:ident, $kind:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate `value` and wrap it.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError`] when `value` is empty or contains
            /// characters outside `[a-z0-9_]`.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                check($kind, &value)?;
                Ok(Self(value))
            }

            /// Borrow the validated name.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_name!(
    /// Validated name of a domain.
    DomainName,
    NameKind::Domain
);

define_name!(
    /// Validated name of an event type within a domain.
    EventType,
    NameKind::EventType
);
