//! Request attribute validation and normalization
//!
//! Runs before experiment routing so invalid requests never consume a model
//! execution slot. All offending fields are reported together.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::schema::{schema_for, FieldDefault, FieldKind};
use crate::domain::target::PredictionTarget;
use crate::domain::DomainError;

/// One offending field in a validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub issue: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
        }
    }
}

/// A single normalized feature value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

/// Attributes after range/enum checking and default imputation. The only
/// form that reaches an estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedFeatures {
    target: PredictionTarget,
    values: BTreeMap<String, FeatureValue>,
}

impl ValidatedFeatures {
    /// Target these features were validated against
    pub fn target(&self) -> PredictionTarget {
        self.target
    }

    /// Numeric feature by name
    pub fn numeric(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FeatureValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Categorical feature by name
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FeatureValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// All normalized feature values
    pub fn values(&self) -> &BTreeMap<String, FeatureValue> {
        &self.values
    }

    /// Build features directly, bypassing schema checks. Test seams only.
    #[cfg(test)]
    pub fn from_parts(target: PredictionTarget, values: BTreeMap<String, FeatureValue>) -> Self {
        Self { target, values }
    }
}

/// Validate and normalize raw request attributes against the target's schema.
///
/// Missing optional fields are imputed from the default table; missing
/// required fields, wrong types, and out-of-domain values all produce a
/// single `Validation` error naming every offending field. Attributes not
/// declared in the schema are ignored.
pub fn validate(
    raw: &HashMap<String, serde_json::Value>,
    target: PredictionTarget,
) -> Result<ValidatedFeatures, DomainError> {
    let schema = schema_for(target);
    let mut values = BTreeMap::new();
    let mut issues = Vec::new();

    for field in &schema.fields {
        match raw.get(field.name) {
            None => {
                if field.required {
                    issues.push(FieldIssue::new(field.name, "missing required field"));
                } else if let Some(default) = field.default {
                    values.insert(field.name.to_string(), impute(default));
                }
            }
            Some(value) => match check_value(value, field.kind) {
                Ok(normalized) => {
                    values.insert(field.name.to_string(), normalized);
                }
                Err(issue) => issues.push(FieldIssue::new(field.name, issue)),
            },
        }
    }

    if issues.is_empty() {
        Ok(ValidatedFeatures { target, values })
    } else {
        Err(DomainError::validation(issues))
    }
}

fn impute(default: FieldDefault) -> FeatureValue {
    match default {
        FieldDefault::Number(n) => FeatureValue::Number(n),
        FieldDefault::Text(s) => FeatureValue::Text(s.to_string()),
    }
}

fn check_value(value: &serde_json::Value, kind: FieldKind) -> Result<FeatureValue, String> {
    match kind {
        FieldKind::Numeric { min, max } => {
            let number = value
                .as_f64()
                .ok_or_else(|| format!("expected a number, got {}", type_name(value)))?;

            if !number.is_finite() {
                return Err("value is not finite".to_string());
            }

            if number < min || number > max {
                return Err(format!("value {} outside domain [{}, {}]", number, min, max));
            }

            Ok(FeatureValue::Number(number))
        }
        FieldKind::Categorical { allowed } => {
            let text = value
                .as_str()
                .ok_or_else(|| format!("expected a string, got {}", type_name(value)))?;
            let normalized = text.trim().to_lowercase();

            if !allowed.contains(&normalized.as_str()) {
                return Err(format!("'{}' is not an allowed value", text));
            }

            Ok(FeatureValue::Text(normalized))
        }
    }
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
