//! Vehicle record model and the label table that builds it.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label/value pairs pulled from a decoder page, keyed by the page's own label text.
pub type ExtractedFields = HashMap<String, String>;

/// A decoded vehicle, as stored and returned to callers.
///
/// Descriptive fields are `None` when the decoder page did not report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct VehicleRecord {
    pub vin: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_produced: Option<String>,
    pub engine_type: Option<String>,
    pub fuel_type: Option<String>,
    pub last_searched_at: DateTime<Utc>,
}

impl VehicleRecord {
    /// A record with every descriptive field unknown.
    pub fn new(vin: impl Into<String>, searched_at: DateTime<Utc>) -> Self {
        Self {
            vin: vin.into(),
            make: None,
            model: None,
            year_produced: None,
            engine_type: None,
            fuel_type: None,
            last_searched_at: searched_at,
        }
    }
}

impl fmt::Display for VehicleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("unknown")
        }

        writeln!(f, "Details for {}", self.vin)?;
        writeln!(f, "Make:   {}", field(&self.make))?;
        writeln!(f, "Model:  {}", field(&self.model))?;
        writeln!(f, "Year:   {}", field(&self.year_produced))?;
        writeln!(f, "Engine: {}", field(&self.engine_type))?;
        write!(f, "Fuel:   {}", field(&self.fuel_type))
    }
}

/// Labels the decoder page uses for each record field.
///
/// Matching is exact and case-sensitive. Defaults follow the Romanian
/// locale of freevindecoder.eu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMap {
    #[serde(default = "default_make_label")]
    pub make: String,
    #[serde(default = "default_model_label")]
    pub model: String,
    #[serde(default = "default_year_label")]
    pub year_produced: String,
    #[serde(default = "default_engine_label")]
    pub engine_type: String,
    #[serde(default = "default_fuel_label")]
    pub fuel_type: String,
}

fn default_make_label() -> String {
    "Face".into()
}

fn default_model_label() -> String {
    "Model".into()
}

fn default_year_label() -> String {
    "Modelul anului".into()
}

fn default_engine_label() -> String {
    "Tipul motorului".into()
}

fn default_fuel_label() -> String {
    "Tipul combustibilului".into()
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            make: default_make_label(),
            model: default_model_label(),
            year_produced: default_year_label(),
            engine_type: default_engine_label(),
            fuel_type: default_fuel_label(),
        }
    }
}

impl LabelMap {
    /// All labels as `(field, label)` pairs.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("make", self.make.as_str()),
            ("model", self.model.as_str()),
            ("year_produced", self.year_produced.as_str()),
            ("engine_type", self.engine_type.as_str()),
            ("fuel_type", self.fuel_type.as_str()),
        ]
    }

    /// Build a record from extracted fields.
    ///
    /// Labels absent from `fields`, and blank values, become unknown.
    pub fn build_record(&self, vin: &str, fields: &ExtractedFields, searched_at: DateTime<Utc>) -> VehicleRecord {
        let lookup = |label: &str| {
            fields
                .get(label)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        VehicleRecord {
            vin: vin.to_string(),
            make: lookup(&self.make),
            model: lookup(&self.model),
            year_produced: lookup(&self.year_produced),
            engine_type: lookup(&self.engine_type),
            fuel_type: lookup(&self.fuel_type),
            last_searched_at: searched_at,
        }
    }
}
