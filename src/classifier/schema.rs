//! Agreement check between the encoder's output and a classifier's input signature.

use thiserror::Error;

use crate::encoding::{FEATURE_COLUMNS, categorical_vocabulary};

use super::Classifier;

/// The classifier's declared inputs disagree with the encoder.
///
/// Carries every problem found so the full diagnostic reaches the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Feature schema mismatch: {}", .problems.join("; "))]
pub struct SchemaMismatch {
    pub problems: Vec<String>,
}

/// Verify column set, column order, column kinds and categorical vocabularies.
pub fn check_schema(classifier: &dyn Classifier) -> Result<(), SchemaMismatch> {
    let declared = classifier.input_columns();
    let mut problems = Vec::new();

    for column in FEATURE_COLUMNS {
        if !declared.contains(&column) {
            problems.push(format!("classifier is missing column '{column}'"));
        }
    }
    for column in &declared {
        if !FEATURE_COLUMNS.contains(column) {
            problems.push(format!("classifier expects unknown column '{column}'"));
        }
    }
    if problems.is_empty() {
        if let Some((position, (expected, actual))) = FEATURE_COLUMNS
            .iter()
            .zip(&declared)
            .enumerate()
            .find(|(_, (expected, actual))| expected != actual)
        {
            problems.push(format!(
                "column order differs at position {position}: expected '{expected}', got '{actual}'"
            ));
        }
    }

    let vocabulary = categorical_vocabulary();
    for column in FEATURE_COLUMNS {
        if !declared.contains(&column) {
            continue;
        }
        let emitted = vocabulary
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, tokens)| tokens);
        match (emitted, classifier.vocabulary(column)) {
            (Some(tokens), Some(accepted)) => {
                let unknown: Vec<&str> = tokens
                    .iter()
                    .copied()
                    .filter(|token| !accepted.iter().any(|category| category == token))
                    .collect();
                if !unknown.is_empty() {
                    problems.push(format!(
                        "column '{column}' does not accept {}",
                        unknown.join(", ")
                    ));
                }
            }
            (Some(_), None) => {
                problems.push(format!(
                    "column '{column}' is categorical but classifier treats it as numeric"
                ));
            }
            (None, Some(_)) => {
                problems.push(format!(
                    "column '{column}' is numeric but classifier treats it as categorical"
                ));
            }
            (None, None) => {}
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(SchemaMismatch { problems })
    }
}
