//! Structured filtering over catalog item attributes

use serde::{Deserialize, Serialize};

use super::item::CatalogItem;

/// Comparison operators for structured filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Equal to
    Eq,
    /// Not equal to
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal to
    Gte,
    /// Less than
    Lt,
    /// Less than or equal to
    Lte,
    /// In list of values
    In,
    /// Substring match (strings only)
    Contains,
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
            Self::In => write!(f, "in"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

/// Filter comparison value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<FilterValue>),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// A single filter predicate over one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub key: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(key: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            key: key.into(),
            operator,
            value,
        }
    }

    pub fn eq(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Eq, value.into())
    }

    pub fn ne(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Ne, value.into())
    }

    pub fn gt(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Gt, value.into())
    }

    pub fn gte(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Gte, value.into())
    }

    pub fn lt(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Lt, value.into())
    }

    pub fn lte(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Lte, value.into())
    }

    pub fn in_list(key: impl Into<String>, values: Vec<FilterValue>) -> Self {
        Self::new(key, FilterOperator::In, FilterValue::List(values))
    }

    pub fn contains(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, FilterOperator::Contains, value.into())
    }

    /// Evaluate this predicate against an item. A missing attribute fails
    /// every operator except Ne.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let attribute = item.attributes.get(&self.key);

        match self.operator {
            FilterOperator::Eq => compare_eq(attribute, &self.value),
            FilterOperator::Ne => !compare_eq(attribute, &self.value),
            FilterOperator::Gt => compare_ord(attribute, &self.value, |a, b| a > b),
            FilterOperator::Gte => compare_ord(attribute, &self.value, |a, b| a >= b),
            FilterOperator::Lt => compare_ord(attribute, &self.value, |a, b| a < b),
            FilterOperator::Lte => compare_ord(attribute, &self.value, |a, b| a <= b),
            FilterOperator::In => match &self.value {
                FilterValue::List(values) => {
                    values.iter().any(|value| compare_eq(attribute, value))
                }
                _ => false,
            },
            FilterOperator::Contains => match (&self.value, attribute.and_then(|v| v.as_str())) {
                (FilterValue::String(needle), Some(haystack)) => haystack.contains(needle),
                _ => false,
            },
        }
    }
}

fn compare_eq(attribute: Option<&serde_json::Value>, filter_value: &FilterValue) -> bool {
    match (attribute, filter_value) {
        (Some(serde_json::Value::String(s)), FilterValue::String(fs)) => s == fs,
        (Some(serde_json::Value::Number(n)), FilterValue::Integer(fi)) => {
            n.as_i64().is_some_and(|i| i == *fi)
        }
        (Some(serde_json::Value::Number(n)), FilterValue::Float(ff)) => {
            n.as_f64().is_some_and(|f| (f - ff).abs() < f64::EPSILON)
        }
        (Some(serde_json::Value::Bool(b)), FilterValue::Boolean(fb)) => b == fb,
        _ => false,
    }
}

fn compare_ord<F>(
    attribute: Option<&serde_json::Value>,
    filter_value: &FilterValue,
    cmp: F,
) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (attribute, filter_value) {
        (Some(serde_json::Value::Number(n)), FilterValue::Integer(fi)) => {
            n.as_f64().is_some_and(|f| cmp(f, *fi as f64))
        }
        (Some(serde_json::Value::Number(n)), FilterValue::Float(ff)) => {
            n.as_f64().is_some_and(|f| cmp(f, *ff))
        }
        _ => false,
    }
}
