//! Classifier contract consumed by the assessment pipeline.
//!
//! The encoder produces a [`FeatureRecord`]; anything implementing [`Classifier`]
//! turns it into a class index and a per-class probability vector. The bundled
//! implementation is a JSON-serialized linear model.

mod linear;
mod schema;

pub use linear::{ColumnKind, ColumnSpec, LinearRiskModel};
pub use schema::{SchemaMismatch, check_schema};

use thiserror::Error;

use crate::encoding::FeatureRecord;

/// Errors raised while evaluating a record against a classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// The classifier expects a column the record does not carry.
    #[error("Record has no column '{0}'")]
    MissingColumn(String),
    /// A numeric column received a categorical token.
    #[error("Column '{column}' expects a number, got token '{token}'")]
    NotNumeric { column: String, token: String },
    /// A categorical column received a number.
    #[error("Column '{0}' expects a categorical token, got a number")]
    NotCategorical(String),
    /// A categorical token is outside the classifier's vocabulary.
    #[error("Column '{column}' has no category '{token}'")]
    UnknownToken { column: String, token: String },
}

/// A fitted classifier over encoded feature records.
pub trait Classifier: Send + Sync {
    /// Class identifiers, indexed like the probability vector.
    fn classes(&self) -> &[String];

    /// Column names the classifier was fit on, in fit order.
    fn input_columns(&self) -> Vec<&str>;

    /// Categories accepted by a categorical column; `None` for numeric columns.
    fn vocabulary(&self, column: &str) -> Option<&[String]>;

    /// Per-class probabilities for one record.
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictError>;

    /// Index of the most probable class.
    fn predict(&self, record: &FeatureRecord) -> Result<usize, PredictError> {
        Ok(argmax(&self.predict_proba(record)?))
    }
}

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, |a, b| a.max(b));
    let mut exps: Vec<f32> = raw.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    for v in &mut exps {
        *v /= sum;
    }
    exps
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let out = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(out[2] > out[1] && out[1] > out[0]);
    }

    #[test]
    fn softmax_of_empty_is_empty() {
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
    }
}
