//! Target platform versions and version gating.
//!
//! Some rules only make sense once the platform a cookbook targets ships the
//! replacement feature. Such rules declare a minimum version and are skipped
//! entirely for older targets.

use crate::rule::Rule;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A `major.minor.patch` platform version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl TargetVersion {
    /// Creates a `major.minor.0` version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: 0,
        }
    }

    /// Sets the patch component.
    #[must_use]
    pub const fn with_patch(mut self, patch: u32) -> Self {
        self.patch = patch;
        self
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// Error parsing a [`TargetVersion`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid target version '{input}': expected MAJOR[.MINOR[.PATCH]]")]
pub struct VersionParseError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for TargetVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(err());
        }

        let mut parts = [0u32; 3];
        let mut count = 0;
        for segment in trimmed.split('.') {
            if count == parts.len() {
                return Err(err());
            }
            parts[count] = segment.parse().map_err(|_| err())?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1]).with_patch(parts[2]))
    }
}

impl Serialize for TargetVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TargetVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VersionVisitor;

        impl Visitor<'_> for VersionVisitor {
            type Value = TargetVersion;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a version such as \"14.3\", 14.3 or 15")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                let major = u32::try_from(v).map_err(E::custom)?;
                Ok(TargetVersion::new(major, 0))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let major = u32::try_from(v).map_err(E::custom)?;
                Ok(TargetVersion::new(major, 0))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(VersionVisitor)
    }
}

/// Returns whether `rule` runs against `target`.
///
/// Rules without a minimum version are always eligible, and every rule is
/// eligible when no target is configured.
#[must_use]
pub fn is_eligible(rule: &dyn Rule, target: Option<TargetVersion>) -> bool {
    match (rule.minimum_version(), target) {
        (Some(minimum), Some(target)) => target >= minimum,
        _ => true,
    }
}
