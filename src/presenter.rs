//! Turns a classifier outcome into the verdict shown to the person filling the form.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub const HIGH_RISK_HEADLINE: &str = "ALTO RISCO DE OBESIDADE IDENTIFICADO";
pub const LOW_RISK_HEADLINE: &str = "BAIXO RISCO IMEDIATO";
const REFERRAL_RECOMMENDATION: &str =
    "Sugere-se encaminhamento para orientação médica e nutricional especializada.";
const HEALTHY_HABITS_RECOMMENDATION: &str =
    "Continue mantendo hábitos saudáveis e acompanhamento regular.";
const WEIGHT_GAIN_RECOMMENDATION: &str =
    "Sugere-se acompanhamento nutricional para recuperação de peso saudável.";

/// Class index that means "at risk" in two-class models.
pub const RISK_CLASS_INDEX: usize = 1;

/// Display names for the weight-category classes, keyed by class id.
const CATEGORY_NAMES: &[(&str, &str)] = &[
    ("Insufficient_Weight", "Peso insuficiente"),
    ("Normal_Weight", "Peso normal"),
    ("Overweight_Level_I", "Sobrepeso nível I"),
    ("Overweight_Level_II", "Sobrepeso nível II"),
    ("Obesity_Type_I", "Obesidade tipo I"),
    ("Obesity_Type_II", "Obesidade tipo II"),
    ("Obesity_Type_III", "Obesidade tipo III"),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresentError {
    #[error("Predicted class index {index} is outside the {classes} known classes")]
    ClassOutOfRange { index: usize, classes: usize },
    #[error("Got {probabilities} probabilities for {classes} classes")]
    ProbabilityCount { probabilities: usize, classes: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    HighRisk,
    LowRisk,
    Category,
}

/// Human-readable outcome of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    /// Raw id of the predicted class as declared by the classifier.
    pub class_id: String,
    pub headline: String,
    pub probability_label: &'static str,
    /// Probability backing the headline, in `0.0..=1.0`.
    pub probability: f32,
    pub recommendation: &'static str,
}

impl Verdict {
    pub fn probability_text(&self) -> String {
        format_percent(self.probability)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        writeln!(f, "{}: {}", self.probability_label, self.probability_text())?;
        write!(f, "Recomendação: {}", self.recommendation)
    }
}

/// Build the verdict for `class_index` given the classifier's class ids and probabilities.
///
/// Two-class models report the risk probability (class 1) whatever the prediction;
/// larger models report the category name and the winning probability.
pub fn present(
    classes: &[String],
    class_index: usize,
    probabilities: &[f32],
) -> Result<Verdict, PresentError> {
    if probabilities.len() != classes.len() {
        return Err(PresentError::ProbabilityCount {
            probabilities: probabilities.len(),
            classes: classes.len(),
        });
    }
    let class_id = classes
        .get(class_index)
        .ok_or(PresentError::ClassOutOfRange {
            index: class_index,
            classes: classes.len(),
        })?
        .clone();

    if classes.len() == 2 {
        let risk = probabilities[RISK_CLASS_INDEX];
        let verdict = if class_index == RISK_CLASS_INDEX {
            Verdict {
                kind: VerdictKind::HighRisk,
                class_id,
                headline: HIGH_RISK_HEADLINE.to_string(),
                probability_label: "Probabilidade de Risco",
                probability: risk,
                recommendation: REFERRAL_RECOMMENDATION,
            }
        } else {
            Verdict {
                kind: VerdictKind::LowRisk,
                class_id,
                headline: LOW_RISK_HEADLINE.to_string(),
                probability_label: "Probabilidade de Risco",
                probability: risk,
                recommendation: HEALTHY_HABITS_RECOMMENDATION,
            }
        };
        return Ok(verdict);
    }

    let recommendation = category_recommendation(&class_id);
    Ok(Verdict {
        kind: VerdictKind::Category,
        headline: category_display_name(&class_id).to_string(),
        class_id,
        probability_label: "Probabilidade",
        probability: probabilities[class_index],
        recommendation,
    })
}

/// Portuguese name for a weight-category class id, or the id itself when unknown.
pub fn category_display_name(class_id: &str) -> &str {
    CATEGORY_NAMES
        .iter()
        .find(|(id, _)| *id == class_id)
        .map(|(_, name)| *name)
        .unwrap_or(class_id)
}

fn category_recommendation(class_id: &str) -> &'static str {
    if class_id.starts_with("Overweight") || class_id.starts_with("Obesity") {
        REFERRAL_RECOMMENDATION
    } else if class_id == "Insufficient_Weight" {
        WEIGHT_GAIN_RECOMMENDATION
    } else {
        HEALTHY_HABITS_RECOMMENDATION
    }
}

/// `0.8734` -> `"87.3%"`.
pub fn format_percent(probability: f32) -> String {
    format!("{:.1}%", probability * 100.0)
}
