//! Prediction targets served by the gateway

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribute a prediction request asks the gateway to estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionTarget {
    /// Device price in USD
    Price,
    /// Memory capacity in GB
    MemoryCapacity,
    /// Battery capacity in mAh
    BatteryCapacity,
    /// Device brand (classification)
    Brand,
}

impl PredictionTarget {
    /// All targets the gateway serves
    pub fn all() -> [PredictionTarget; 4] {
        [
            Self::Price,
            Self::MemoryCapacity,
            Self::BatteryCapacity,
            Self::Brand,
        ]
    }

    /// Whether this target predicts a categorical label rather than a number
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::Brand)
    }

    /// Domain range a numeric prediction must fall inside to be accepted.
    /// Classification targets have no numeric range.
    pub fn sanity_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Price => Some((10.0, 5000.0)),
            Self::MemoryCapacity => Some((1.0, 24.0)),
            Self::BatteryCapacity => Some((500.0, 10000.0)),
            Self::Brand => None,
        }
    }
}

impl fmt::Display for PredictionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => write!(f, "price"),
            Self::MemoryCapacity => write!(f, "memory_capacity"),
            Self::BatteryCapacity => write!(f, "battery_capacity"),
            Self::Brand => write!(f, "brand"),
        }
    }
}

impl FromStr for PredictionTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::Price),
            "memory_capacity" | "memory" => Ok(Self::MemoryCapacity),
            "battery_capacity" | "battery" => Ok(Self::BatteryCapacity),
            "brand" => Ok(Self::Brand),
            other => Err(format!("unknown prediction target '{}'", other)),
        }
    }
}

/// Brands the catalog documents. Used both for input validation and for
/// judging classifier output sanity.
pub const KNOWN_BRANDS: &[&str] = &[
    "apple", "samsung", "xiaomi", "google", "oneplus", "huawei", "sony", "motorola", "nokia",
    "asus",
];

/// Check a label against the documented brand set
pub fn is_known_brand(label: &str) -> bool {
    KNOWN_BRANDS.contains(&label)
}
