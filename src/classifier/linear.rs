//! Multinomial linear classifier over numeric and one-hot categorical columns.

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::encoding::{FEATURE_COLUMNS, FeatureRecord, FeatureValue, categorical_vocabulary};

use super::{Classifier, PredictError, softmax};

/// How a classifier column is fed into the linear layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Standardized scalar input.
    Numeric {
        #[serde(default)]
        mean: f32,
        #[serde(default = "default_std")]
        std: f32,
    },
    /// One-hot input over a closed vocabulary.
    Categorical { vocabulary: Vec<String> },
}

impl ColumnKind {
    fn width(&self) -> usize {
        match self {
            ColumnKind::Numeric { .. } => 1,
            ColumnKind::Categorical { vocabulary } => vocabulary.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

/// Versioned linear model loaded from JSON.
///
/// Weights are row-major `[classes][input_width]`, where the input is the
/// concatenation of every column's encoding in `columns` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRiskModel {
    #[serde(default)]
    pub model_id: Option<String>,
    pub model_version: i64,
    pub classes: Vec<String>,
    pub columns: Vec<ColumnSpec>,
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_std() -> f32 {
    1.0
}

fn default_temperature() -> f32 {
    1.0
}

impl LinearRiskModel {
    /// Construct a model over the encoder's full column layout with zero-initialized
    /// weights, so every class is equally likely until weights are set.
    pub fn zeroed(classes: Vec<String>) -> Self {
        let vocabulary = categorical_vocabulary();
        let columns: Vec<ColumnSpec> = FEATURE_COLUMNS
            .iter()
            .map(|name| {
                let kind = match vocabulary.iter().find(|(column, _)| column == name) {
                    Some((_, tokens)) => ColumnKind::Categorical {
                        vocabulary: tokens.iter().map(|token| token.to_string()).collect(),
                    },
                    None => ColumnKind::Numeric { mean: 0.0, std: 1.0 },
                };
                ColumnSpec {
                    name: name.to_string(),
                    kind,
                }
            })
            .collect();
        let mut model = Self {
            model_id: None,
            model_version: 1,
            bias: vec![0.0; classes.len()],
            classes,
            columns,
            weights: Vec::new(),
            temperature: 1.0,
        };
        model.weights = vec![0.0; model.classes.len() * model.input_width()];
        model
    }

    /// Position in `weights` of the input belonging to `column` (and `category`,
    /// for categorical columns) in the row of `class_idx`.
    pub fn weight_index(
        &self,
        class_idx: usize,
        column: &str,
        category: Option<&str>,
    ) -> Option<usize> {
        if class_idx >= self.classes.len() {
            return None;
        }
        let mut offset = 0usize;
        for spec in &self.columns {
            if spec.name == column {
                let within = match (&spec.kind, category) {
                    (ColumnKind::Numeric { .. }, None) => 0,
                    (ColumnKind::Categorical { vocabulary }, Some(category)) => {
                        vocabulary.iter().position(|entry| entry == category)?
                    }
                    _ => return None,
                };
                return Some(class_idx * self.input_width() + offset + within);
            }
            offset += spec.kind.width();
        }
        None
    }

    /// Width of the concatenated input vector.
    pub fn input_width(&self) -> usize {
        self.columns.iter().map(|column| column.kind.width()).sum()
    }

    /// Validate the model dimensions and column declarations.
    pub fn validate(&self) -> Result<(), String> {
        let classes = self.classes.len();
        if classes < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if self.columns.is_empty() {
            return Err("No columns defined".to_string());
        }
        let mut names = HashSet::new();
        for column in &self.columns {
            if !names.insert(column.name.as_str()) {
                return Err(format!("Duplicate column {}", column.name));
            }
            match &column.kind {
                ColumnKind::Numeric { mean, std } => {
                    if !mean.is_finite() || !std.is_finite() || *std <= 0.0 {
                        return Err(format!("Column {} has invalid mean/std", column.name));
                    }
                }
                ColumnKind::Categorical { vocabulary } => {
                    if vocabulary.is_empty() {
                        return Err(format!("Column {} has an empty vocabulary", column.name));
                    }
                }
            }
        }
        if self.weights.len() != classes * self.input_width() {
            return Err("weights length mismatch".to_string());
        }
        if self.bias.len() != classes {
            return Err("bias length mismatch".to_string());
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err("temperature must be > 0".to_string());
        }
        Ok(())
    }

    /// Parse and validate a model from JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, String> {
        let model: Self = serde_json::from_slice(bytes).map_err(|err| err.to_string())?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|err| err.to_string())?;
        Self::from_json_bytes(&bytes)
    }

    fn input_vector(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictError> {
        let mut input = Vec::with_capacity(self.input_width());
        for column in &self.columns {
            let value = record
                .value(&column.name)
                .ok_or_else(|| PredictError::MissingColumn(column.name.clone()))?;
            match (&column.kind, value) {
                (ColumnKind::Numeric { .. }, FeatureValue::Token(token)) => {
                    return Err(PredictError::NotNumeric {
                        column: column.name.clone(),
                        token: token.to_string(),
                    });
                }
                (ColumnKind::Numeric { mean, std }, value) => {
                    let x = value.as_f64().unwrap_or_default() as f32;
                    input.push((x - mean) / std);
                }
                (ColumnKind::Categorical { vocabulary }, FeatureValue::Token(token)) => {
                    let hot = vocabulary
                        .iter()
                        .position(|category| category == token)
                        .ok_or_else(|| PredictError::UnknownToken {
                            column: column.name.clone(),
                            token: token.to_string(),
                        })?;
                    input.extend((0..vocabulary.len()).map(|idx| if idx == hot { 1.0 } else { 0.0 }));
                }
                (ColumnKind::Categorical { .. }, _) => {
                    return Err(PredictError::NotCategorical(column.name.clone()));
                }
            }
        }
        Ok(input)
    }
}

impl Classifier for LinearRiskModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn input_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    fn vocabulary(&self, column: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|spec| spec.name == column)
            .and_then(|spec| match &spec.kind {
                ColumnKind::Categorical { vocabulary } => Some(vocabulary.as_slice()),
                ColumnKind::Numeric { .. } => None,
            })
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictError> {
        let input = self.input_vector(record)?;
        let width = input.len();
        let temp = self.temperature.max(1e-6);
        let logits: Vec<f32> = (0..self.classes.len())
            .map(|class_idx| {
                let row = &self.weights[class_idx * width..(class_idx + 1) * width];
                let dot: f32 = row.iter().zip(&input).map(|(w, x)| w * x).sum();
                (self.bias[class_idx] + dot) / temp
            })
            .collect();
        Ok(softmax(&logits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{RawSelection, encode};

    fn raw() -> RawSelection {
        serde_json::from_str(
            r#"{
                "idade": 25, "altura": 1.70, "peso": 70.0, "genero": "Feminino",
                "historico": "Sim", "fuma": "Não", "caloricos": "Sim", "monitora": "Não",
                "refeicao": "3", "vegetais": "Sempre", "agua": "1-2 Litros",
                "fora": "Às vezes", "alcool": "Não", "atividade": "Moderada",
                "internet": "Moderado (3-5h)", "transporte": "Carro"
            }"#,
        )
        .unwrap()
    }

    fn tiny_model() -> LinearRiskModel {
        LinearRiskModel {
            model_id: Some("tiny".into()),
            model_version: 1,
            classes: vec!["0".into(), "1".into()],
            columns: vec![
                ColumnSpec {
                    name: "imc".into(),
                    kind: ColumnKind::Numeric { mean: 25.0, std: 5.0 },
                },
                ColumnSpec {
                    name: "meio_de_transporte".into(),
                    kind: ColumnKind::Categorical {
                        vocabulary: vec!["Automobile".into(), "Walking".into()],
                    },
                },
            ],
            weights: vec![0.0, 0.0, 0.0, 1.0, 2.0, -1.0],
            bias: vec![0.0, 0.0],
            temperature: 1.0,
        }
    }

    #[test]
    fn tiny_model_validates_and_predicts() {
        let model = tiny_model();
        model.validate().unwrap();
        let record = encode(&raw()).unwrap();
        let proba = model.predict_proba(&record).unwrap();
        assert_eq!(proba.len(), 2);
        let sum: f32 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert_eq!(model.predict(&record).unwrap(), 1);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let mut model = tiny_model();
        model.columns[1].kind = ColumnKind::Categorical {
            vocabulary: vec!["Bike".into(), "Walking".into()],
        };
        let record = encode(&raw()).unwrap();
        let err = model.predict_proba(&record).unwrap_err();
        assert_eq!(
            err,
            PredictError::UnknownToken {
                column: "meio_de_transporte".into(),
                token: "Automobile".into(),
            }
        );
    }

    #[test]
    fn numeric_column_rejects_token() {
        let mut model = tiny_model();
        model.columns[1].kind = ColumnKind::Numeric { mean: 0.0, std: 1.0 };
        model.weights = vec![0.0, 0.0, 1.0, 1.0];
        let record = encode(&raw()).unwrap();
        assert!(matches!(
            model.predict_proba(&record),
            Err(PredictError::NotNumeric { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        let mut model = tiny_model();
        model.weights.pop();
        assert!(model.validate().unwrap_err().contains("weights"));

        let mut model = tiny_model();
        model.classes.truncate(1);
        assert!(model.validate().is_err());

        let mut model = tiny_model();
        model.columns.push(model.columns[0].clone());
        assert!(model.validate().unwrap_err().contains("Duplicate"));
    }

    #[test]
    fn zeroed_model_is_uniform_until_weighted() {
        let mut model = LinearRiskModel::zeroed(vec!["0".into(), "1".into()]);
        model.validate().unwrap();
        let record = encode(&raw()).unwrap();
        let proba = model.predict_proba(&record).unwrap();
        assert!((proba[0] - 0.5).abs() < 1e-6);

        let idx = model
            .weight_index(1, "meio_de_transporte", Some("Automobile"))
            .unwrap();
        model.weights[idx] = 3.0;
        assert_eq!(model.predict(&record).unwrap(), 1);
        assert_eq!(model.weight_index(1, "imc", Some("x")), None);
        assert_eq!(model.weight_index(2, "imc", None), None);
    }

    #[test]
    fn parses_json_with_tagged_columns() {
        let json = r#"{
            "model_version": 1,
            "classes": ["0", "1"],
            "columns": [
                {"name": "imc", "kind": "numeric", "mean": 25.0, "std": 5.0},
                {"name": "meio_de_transporte", "kind": "categorical",
                 "vocabulary": ["Automobile", "Walking"]}
            ],
            "weights": [0, 0, 0, 1, 2, -1],
            "bias": [0, 0]
        }"#;
        let model = LinearRiskModel::from_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(model.input_width(), 3);
        assert_eq!(model.temperature, 1.0);
        assert_eq!(
            model.vocabulary("meio_de_transporte").map(|v| v.len()),
            Some(2)
        );
        assert_eq!(model.vocabulary("imc"), None);
    }
}
