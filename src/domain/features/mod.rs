//! Feature validation and normalization

mod schema;
mod validation;

pub use schema::{schema_for, FeatureSchema, FieldDefault, FieldKind, FieldSpec};
pub use validation::{validate, FeatureValue, FieldIssue, ValidatedFeatures};
