//! Prediction input boundary
//!
//! Raw user-supplied text is parsed here, immediately adjacent to the core:
//! empty numeric fields default to 0, unparseable text is a single
//! normalized invalid-input signal. The core predict operation is never
//! reached with unparseable numeric input.

use crate::error::{PricerError, Result};
use crate::schema::{FeatureRecord, FeatureValue, FEATURE_COLUMNS};
use serde::{Deserialize, Serialize};

/// Feature fields exactly as a form posts them, all text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInput {
    pub product_name: String,
    pub company: String,
    pub type_name: String,
    pub inches: String,
    pub cpu_company: String,
    pub cpu_frequency: String,
    pub ram: String,
    pub memory: String,
    pub weight: String,
    pub opsys: String,
}

/// A validated prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaptopInput {
    /// Display only; the model does not use it
    pub product_name: String,
    pub company: String,
    pub type_name: String,
    pub inches: f64,
    pub cpu_company: String,
    pub cpu_frequency: f64,
    pub ram: f64,
    pub memory: String,
    pub weight: f64,
    pub opsys: String,
}

impl LaptopInput {
    /// Parse raw form text into a typed input.
    pub fn from_form(raw: &RawInput) -> Result<Self> {
        Ok(Self {
            product_name: raw.product_name.trim().to_string(),
            company: raw.company.trim().to_string(),
            type_name: raw.type_name.trim().to_string(),
            inches: parse_numeric("Inches", &raw.inches)?,
            cpu_company: raw.cpu_company.trim().to_string(),
            cpu_frequency: parse_numeric("CPU_Frequency", &raw.cpu_frequency)?,
            ram: parse_numeric("RAM", &raw.ram)?,
            memory: raw.memory.trim().to_string(),
            weight: parse_numeric("Weight", &raw.weight)?,
            opsys: raw.opsys.trim().to_string(),
        })
    }

    /// The schema-ordered record the fitted pipeline consumes.
    ///
    /// Empty categorical fields become missing values, to be imputed with
    /// the fit-time mode.
    pub fn to_record(&self) -> FeatureRecord {
        let values = FEATURE_COLUMNS
            .iter()
            .map(|col| match *col {
                "Company" => FeatureValue::categorical(self.company.clone()),
                "TypeName" => FeatureValue::categorical(self.type_name.clone()),
                "Inches" => FeatureValue::numeric(self.inches),
                "CPU_Company" => FeatureValue::categorical(self.cpu_company.clone()),
                "CPU_Frequency" => FeatureValue::numeric(self.cpu_frequency),
                "RAM" => FeatureValue::numeric(self.ram),
                "Memory" => FeatureValue::categorical(self.memory.clone()),
                "Weight" => FeatureValue::numeric(self.weight),
                "OpSys" => FeatureValue::categorical(self.opsys.clone()),
                other => unreachable!("undeclared feature column {other}"),
            })
            .collect();

        FeatureRecord::new(values).expect("input covers every schema column")
    }
}

/// Empty text defaults to 0; anything else must parse as a number.
fn parse_numeric(field: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| PricerError::InvalidInput(format!("{field}: {trimmed:?} is not a number")))
}

/// Convert a price into a second display currency at a fixed rate.
///
/// Pure arithmetic; the model always predicts in the training data's
/// currency unit.
pub fn convert(amount: f64, rate: f64) -> f64 {
    amount * rate
}
