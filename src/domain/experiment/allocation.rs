//! Bucket-weight tables for experiment traffic allocation

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::model::ModelRole;
use crate::domain::DomainError;

/// Experiment-group label resolved from request identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(String);

impl BucketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traffic share for one bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketWeight {
    pub bucket: BucketId,
    pub role: ModelRole,
    /// Percentage of traffic, 0..=100. Zero is legal for non-primary
    /// buckets and disables a challenger without a redeploy.
    pub weight: u8,
}

impl BucketWeight {
    pub fn new(bucket: impl Into<String>, role: ModelRole, weight: u8) -> Self {
        Self {
            bucket: BucketId::new(bucket),
            role,
            weight,
        }
    }
}

/// Validated bucket-weight table for one target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<BucketWeight>", into = "Vec<BucketWeight>")]
pub struct BucketTable {
    entries: Vec<BucketWeight>,
}

impl BucketTable {
    /// Build a table, enforcing that weights sum to 100, bucket labels are
    /// unique, and exactly one bucket routes to the primary role.
    pub fn new(entries: Vec<BucketWeight>) -> Result<Self, DomainError> {
        let total: u32 = entries.iter().map(|e| e.weight as u32).sum();

        if total != 100 {
            return Err(DomainError::configuration(format!(
                "bucket weights must sum to 100, got {}",
                total
            )));
        }

        let primaries = entries
            .iter()
            .filter(|e| e.role == ModelRole::Primary)
            .count();

        if primaries != 1 {
            return Err(DomainError::configuration(format!(
                "bucket table needs exactly one primary bucket, got {}",
                primaries
            )));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(&entry.bucket) {
                return Err(DomainError::configuration(format!(
                    "duplicate bucket '{}'",
                    entry.bucket
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Standard two-way split between the primary and one challenger
    pub fn split(primary_weight: u8, challenger_weight: u8) -> Result<Self, DomainError> {
        Self::new(vec![
            BucketWeight::new("primary", ModelRole::Primary, primary_weight),
            BucketWeight::new("challenger", ModelRole::Challenger, challenger_weight),
        ])
    }

    /// Walk the cumulative weights to the bucket owning a hash value (0..=99)
    pub fn bucket_for_hash(&self, hash: u8) -> &BucketWeight {
        let mut cumulative: u16 = 0;

        for entry in &self.entries {
            cumulative += entry.weight as u16;
            if (hash as u16) < cumulative {
                return entry;
            }
        }

        // Weights sum to 100 and hash is 0..=99, so the walk always lands;
        // the last entry closes the range.
        self.entries
            .last()
            .expect("bucket table is never empty after validation")
    }

    pub fn entries(&self) -> &[BucketWeight] {
        &self.entries
    }

    /// The single bucket routing to the primary role
    pub fn primary_bucket(&self) -> &BucketWeight {
        self.entries
            .iter()
            .find(|e| e.role == ModelRole::Primary)
            .expect("bucket table always has one primary bucket after validation")
    }
}

impl Default for BucketTable {
    /// All traffic to the primary until an experiment is configured
    fn default() -> Self {
        Self {
            entries: vec![BucketWeight::new("primary", ModelRole::Primary, 100)],
        }
    }
}

impl TryFrom<Vec<BucketWeight>> for BucketTable {
    type Error = DomainError;

    fn try_from(entries: Vec<BucketWeight>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<BucketTable> for Vec<BucketWeight> {
    fn from(table: BucketTable) -> Self {
        table.entries
    }
}
