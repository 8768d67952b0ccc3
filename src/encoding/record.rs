use serde::ser::{Serialize, SerializeMap, Serializer};

/// Column order the classifier was fit on.
pub const FEATURE_COLUMNS: [&str; 15] = [
    "idade",
    "genero",
    "qtd_refeicao",
    "qtd_vegetais",
    "qtd_agua",
    "qtd_atv_fisicas",
    "qtd_tmp_na_internet",
    "b_fuma",
    "b_come_alimentos_caloricos",
    "b_monitora_calorias",
    "b_historico_familiar",
    "freq_come_fora_refeicao",
    "freq_alcool",
    "meio_de_transporte",
    "imc",
];

/// A single encoded cell of a feature record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Token(&'static str),
}

impl FeatureValue {
    /// Numeric view of the value; `None` for categorical tokens.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FeatureValue::Int(value) => Some(value as f64),
            FeatureValue::Float(value) => Some(value),
            FeatureValue::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&'static str> {
        match *self {
            FeatureValue::Token(token) => Some(token),
            _ => None,
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            FeatureValue::Int(value) => serializer.serialize_i64(value),
            FeatureValue::Float(value) => serializer.serialize_f64(value),
            FeatureValue::Token(token) => serializer.serialize_str(token),
        }
    }
}

/// One encoded submission, ready to hand to the classifier.
///
/// Built only by the encoder and read-only afterwards. Serializes as a JSON object
/// whose keys follow [`FEATURE_COLUMNS`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub(super) age: i64,
    pub(super) gender: u8,
    pub(super) meals: &'static str,
    pub(super) vegetables: &'static str,
    pub(super) water: &'static str,
    pub(super) activity: &'static str,
    pub(super) screen_time: &'static str,
    pub(super) smoker: u8,
    pub(super) high_calorie_food: u8,
    pub(super) monitors_calories: u8,
    pub(super) family_history: u8,
    pub(super) eats_between_meals: &'static str,
    pub(super) alcohol: &'static str,
    pub(super) transport: &'static str,
    pub(super) bmi: FeatureValue,
}

impl FeatureRecord {
    /// Look up a cell by classifier column name.
    pub fn value(&self, column: &str) -> Option<FeatureValue> {
        let value = match column {
            "idade" => FeatureValue::Int(self.age),
            "genero" => FeatureValue::Int(i64::from(self.gender)),
            "qtd_refeicao" => FeatureValue::Token(self.meals),
            "qtd_vegetais" => FeatureValue::Token(self.vegetables),
            "qtd_agua" => FeatureValue::Token(self.water),
            "qtd_atv_fisicas" => FeatureValue::Token(self.activity),
            "qtd_tmp_na_internet" => FeatureValue::Token(self.screen_time),
            "b_fuma" => FeatureValue::Int(i64::from(self.smoker)),
            "b_come_alimentos_caloricos" => FeatureValue::Int(i64::from(self.high_calorie_food)),
            "b_monitora_calorias" => FeatureValue::Int(i64::from(self.monitors_calories)),
            "b_historico_familiar" => FeatureValue::Int(i64::from(self.family_history)),
            "freq_come_fora_refeicao" => FeatureValue::Token(self.eats_between_meals),
            "freq_alcool" => FeatureValue::Token(self.alcohol),
            "meio_de_transporte" => FeatureValue::Token(self.transport),
            "imc" => self.bmi,
            _ => return None,
        };
        Some(value)
    }

    /// Cells in classifier column order.
    pub fn values(&self) -> Vec<(&'static str, FeatureValue)> {
        FEATURE_COLUMNS
            .iter()
            .filter_map(|column| self.value(column).map(|value| (*column, value)))
            .collect()
    }

    pub fn bmi(&self) -> FeatureValue {
        self.bmi
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let values = self.values();
        let mut map = serializer.serialize_map(Some(values.len()))?;
        for (column, value) in &values {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
