//! Resource metadata
//!
//! Types shared by every layer: the [`Key`] that names a resource instance,
//! the API [`Version`] family a call goes through, and the [`Locality`] of a
//! resource type.
//!
//! # Module Structure
//!
//! - [`key`] - Global, regional and zonal resource keys
//! - [`scope`] - Compile-time locality and mutability markers used by the adapters

pub mod key;
pub mod scope;

pub use key::Key;
pub use scope::{Global, Mutability, Mutable, ReadOnly, Regional, Scope, Zonal};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compute Engine API version family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    #[default]
    Ga,
    Alpha,
    Beta,
}

impl Version {
    pub const ALL: [Version; 3] = [Version::Ga, Version::Alpha, Version::Beta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ga => "ga",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
        }
    }

    /// Path component used in REST URLs
    pub fn path_component(&self) -> &'static str {
        match self {
            Self::Ga => "v1",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
        }
    }

    /// Fully-qualified URL prefix for this version, ending in `/`
    pub fn url_prefix(&self) -> &'static str {
        match self {
            Self::Ga => "https://www.googleapis.com/compute/v1/",
            Self::Alpha => "https://www.googleapis.com/compute/alpha/",
            Self::Beta => "https://www.googleapis.com/compute/beta/",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where instances of a resource type live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locality {
    Global,
    Regional,
    Zonal,
}

impl Locality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Regional => "regional",
            Self::Zonal => "zonal",
        }
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_prefixes() {
        for version in Version::ALL {
            assert!(version.url_prefix().ends_with('/'));
            assert!(version
                .url_prefix()
                .contains(&format!("/compute/{}/", version.path_component())));
        }
    }

    #[test]
    fn test_version_serde_is_lowercase() {
        let v: Version = serde_json::from_str("\"alpha\"").unwrap();
        assert_eq!(v, Version::Alpha);
        assert_eq!(serde_json::to_string(&Version::Ga).unwrap(), "\"ga\"");
    }
}
