//! Validated string types that enforce invariants at construction time

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation errors for string types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("connection name cannot be empty or whitespace")]
    EmptyConnectionName,

    #[error("invalid connection name {0:?}: whitespace is not allowed")]
    InvalidConnectionName(String),

    #[error("hostname cannot be empty or whitespace")]
    EmptyHostName,

    #[error("invalid metrics path {0:?}: must start with '/'")]
    InvalidMetricsPath(String),

    #[error("port cannot be 0")]
    InvalidPort,
}

/// Macro to generate validated string newtypes.
///
/// Each generated type gets a validating `new()`, `as_str()`, `AsRef<str>`,
/// `Deref`, `Display`, `TryFrom<String>`, `FromStr` and serde impls that run
/// the same validation on deserialization.
macro_rules! validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident(String) {
            validation: |$s_param:ident| $validation:expr,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        $vis struct $name(String);

        impl $name {
            #[doc = concat!("Create a new ", stringify!($name), " after validation")]
            pub fn new($s_param: String) -> Result<Self, ValidationError> {
                let validate = || $validation;
                validate()?;
                Ok(Self($s_param))
            }

            #[doc = concat!("Get the ", stringify!($name), " as a string slice")]
            #[must_use]
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from($s_param: String) -> Result<Self, Self::Error> {
                Self::new($s_param)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

validated_string! {
    /// Name of a configured IPsec connection (an ipsec.conf `conn` section)
    ///
    /// The name is passed verbatim as an argument to the status command, so
    /// it must be non-empty and free of whitespace.
    ///
    /// # Examples
    /// ```
    /// use ipsec_exporter::types::ConnectionName;
    ///
    /// let name = ConnectionName::new("site-a".to_string()).unwrap();
    /// assert_eq!(name.as_str(), "site-a");
    ///
    /// assert!(ConnectionName::new("".to_string()).is_err());
    /// assert!(ConnectionName::new("two words".to_string()).is_err());
    /// ```
    #[doc(alias = "conn")]
    #[doc(alias = "tunnel")]
    pub struct ConnectionName(String) {
        validation: |s| {
            if s.trim().is_empty() {
                Err(ValidationError::EmptyConnectionName)
            } else if s.chars().any(char::is_whitespace) {
                Err(ValidationError::InvalidConnectionName(s.clone()))
            } else {
                Ok(())
            }
        },
    }
}

validated_string! {
    /// A validated hostname that cannot be empty or whitespace-only
    pub struct HostName(String) {
        validation: |s| {
            if s.trim().is_empty() {
                Err(ValidationError::EmptyHostName)
            } else {
                Ok(())
            }
        },
    }
}

validated_string! {
    /// HTTP path the metrics are served on, e.g. `/metrics`
    pub struct MetricsPath(String) {
        validation: |s| {
            if s.starts_with('/') {
                Ok(())
            } else {
                Err(ValidationError::InvalidMetricsPath(s.clone()))
            }
        },
    }
}
