//! Resource keys
//!
//! A [`Key`] names exactly one resource instance. Which variant is active is
//! decided by the constructor used, never by inspecting the strings.

use super::Locality;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Key {
    Global { name: String },
    Regional { name: String, region: String },
    Zonal { name: String, zone: String },
}

impl Key {
    pub fn global(name: impl Into<String>) -> Self {
        Self::Global { name: name.into() }
    }

    pub fn regional(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self::Regional {
            name: name.into(),
            region: region.into(),
        }
    }

    pub fn zonal(name: impl Into<String>, zone: impl Into<String>) -> Self {
        Self::Zonal {
            name: name.into(),
            zone: zone.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Global { name } | Self::Regional { name, .. } | Self::Zonal { name, .. } => name,
        }
    }

    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Regional { region, .. } => Some(region),
            _ => None,
        }
    }

    pub fn zone(&self) -> Option<&str> {
        match self {
            Self::Zonal { zone, .. } => Some(zone),
            _ => None,
        }
    }

    /// Region or zone, whichever this key carries
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Global { .. } => None,
            Self::Regional { region, .. } => Some(region),
            Self::Zonal { zone, .. } => Some(zone),
        }
    }

    pub fn locality(&self) -> Locality {
        match self {
            Self::Global { .. } => Locality::Global,
            Self::Regional { .. } => Locality::Regional,
            Self::Zonal { .. } => Locality::Zonal,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global { name } => write!(f, "Key{{{:?}}}", name),
            Self::Regional { name, region } => write!(f, "Key{{{:?}, region: {:?}}}", name, region),
            Self::Zonal { name, zone } => write!(f, "Key{{{:?}, zone: {:?}}}", name, zone),
        }
    }
}
