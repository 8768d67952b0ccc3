use serde::{Deserialize, Serialize};

use super::record::FeatureValue;

/// How the body-mass index column is derived from weight and height.
///
/// `Exact` keeps `weight / height²` as a float. `Ceiling` rounds it up to the next
/// integer, which is what classifiers fit on integer `imc` columns expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiPolicy {
    #[default]
    Exact,
    Ceiling,
}

impl BmiPolicy {
    /// Derive the `imc` value for the given measurements.
    ///
    /// Callers validate that `height_m` is finite and positive.
    pub fn derive(self, weight_kg: f64, height_m: f64) -> FeatureValue {
        let bmi = weight_kg / (height_m * height_m);
        match self {
            BmiPolicy::Exact => FeatureValue::Float(bmi),
            BmiPolicy::Ceiling => FeatureValue::Int(bmi.ceil() as i64),
        }
    }
}
