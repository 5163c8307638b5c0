//! Dependency coordinates.
//!
//! Berth never fetches artifacts; coordinates are validated and passed
//! through verbatim to the external dependency resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::errors::ConventionError;

/// A `group:artifact:version` dependency coordinate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    group: String,
    artifact: String,
    version: String,
}

impl Coordinate {
    /// Create a coordinate from its parts, validating each segment.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ConventionError> {
        let coord = Coordinate {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        };
        coord.validate()?;
        Ok(coord)
    }

    fn validate(&self) -> Result<(), ConventionError> {
        let malformed = |reason| ConventionError::MalformedCoordinate {
            coordinate: self.to_string(),
            reason,
        };

        for segment in [&self.group, &self.artifact, &self.version] {
            if segment.trim().is_empty() {
                return Err(malformed("segments must be non-empty"));
            }
            if segment.contains(':') {
                return Err(malformed("expected exactly three colon-separated segments"));
            }
            if segment.chars().any(char::is_whitespace) {
                return Err(malformed("segments must not contain whitespace"));
            }
        }
        Ok(())
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl FromStr for Coordinate {
    type Err = ConventionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(ConventionError::MalformedCoordinate {
                coordinate: s.to_string(),
                reason: "expected exactly three colon-separated segments",
            });
        }
        Coordinate::new(parts[0], parts[1], parts[2])
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl Serialize for Coordinate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
