//! Per-target feature schemas and the documented default table

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::target::{PredictionTarget, KNOWN_BRANDS};

/// Kind of value a feature field accepts
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Numeric field with an inclusive [min, max] domain
    Numeric { min: f64, max: f64 },
    /// Categorical field restricted to an enumerated set
    Categorical { allowed: &'static [&'static str] },
}

/// Default imputed for an optional field that is absent from the request
#[derive(Debug, Clone, Copy)]
pub enum FieldDefault {
    Number(f64),
    Text(&'static str),
}

/// Declaration of a single feature field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldDefault>,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind, default: FieldDefault) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
        }
    }
}

/// Feature schema for one prediction target
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    pub target: PredictionTarget,
    pub fields: Vec<FieldSpec>,
}

impl FeatureSchema {
    /// Look up a field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const MEMORY_GB: FieldKind = FieldKind::Numeric {
    min: 1.0,
    max: 24.0,
};
const BATTERY_MAH: FieldKind = FieldKind::Numeric {
    min: 500.0,
    max: 10000.0,
};
const PRICE_USD: FieldKind = FieldKind::Numeric {
    min: 10.0,
    max: 5000.0,
};
const STORAGE_GB: FieldKind = FieldKind::Numeric {
    min: 8.0,
    max: 2048.0,
};
const SCREEN_INCHES: FieldKind = FieldKind::Numeric { min: 3.0, max: 9.0 };
const BRAND: FieldKind = FieldKind::Categorical {
    allowed: KNOWN_BRANDS,
};

/// The documented schema and default table, one entry per target
static SCHEMAS: Lazy<HashMap<PredictionTarget, FeatureSchema>> = Lazy::new(|| {
    let mut schemas = HashMap::new();

    schemas.insert(
        PredictionTarget::Price,
        FeatureSchema {
            target: PredictionTarget::Price,
            fields: vec![
                FieldSpec::required("memory_gb", MEMORY_GB),
                FieldSpec::required("battery_mah", BATTERY_MAH),
                FieldSpec::optional("storage_gb", STORAGE_GB, FieldDefault::Number(128.0)),
                FieldSpec::optional("screen_inches", SCREEN_INCHES, FieldDefault::Number(6.1)),
                FieldSpec::optional("brand", BRAND, FieldDefault::Text("samsung")),
            ],
        },
    );

    schemas.insert(
        PredictionTarget::MemoryCapacity,
        FeatureSchema {
            target: PredictionTarget::MemoryCapacity,
            fields: vec![
                FieldSpec::required("price_usd", PRICE_USD),
                FieldSpec::optional("battery_mah", BATTERY_MAH, FieldDefault::Number(4500.0)),
                FieldSpec::optional("storage_gb", STORAGE_GB, FieldDefault::Number(128.0)),
            ],
        },
    );

    schemas.insert(
        PredictionTarget::BatteryCapacity,
        FeatureSchema {
            target: PredictionTarget::BatteryCapacity,
            fields: vec![
                FieldSpec::required("screen_inches", SCREEN_INCHES),
                FieldSpec::optional("price_usd", PRICE_USD, FieldDefault::Number(500.0)),
                FieldSpec::optional("memory_gb", MEMORY_GB, FieldDefault::Number(8.0)),
            ],
        },
    );

    schemas.insert(
        PredictionTarget::Brand,
        FeatureSchema {
            target: PredictionTarget::Brand,
            fields: vec![
                FieldSpec::required("price_usd", PRICE_USD),
                FieldSpec::required("memory_gb", MEMORY_GB),
                FieldSpec::optional("battery_mah", BATTERY_MAH, FieldDefault::Number(4500.0)),
                FieldSpec::optional("screen_inches", SCREEN_INCHES, FieldDefault::Number(6.1)),
            ],
        },
    );

    schemas
});

/// Get the feature schema for a target
pub fn schema_for(target: PredictionTarget) -> &'static FeatureSchema {
    SCHEMAS
        .get(&target)
        .expect("every prediction target has a schema entry")
}
