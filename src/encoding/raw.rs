use serde::{Deserialize, Serialize};

/// Answers collected by the form host for one submission.
///
/// Serde keys match the form's field names so a submission can be read straight
/// from its JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSelection {
    /// Age in whole years.
    #[serde(rename = "idade")]
    pub age: i64,
    /// Height in meters.
    #[serde(rename = "altura")]
    pub height_m: f64,
    /// Weight in kilograms.
    #[serde(rename = "peso")]
    pub weight_kg: f64,
    #[serde(rename = "genero")]
    pub gender: String,
    #[serde(rename = "historico")]
    pub family_history: String,
    #[serde(rename = "fuma")]
    pub smoker: String,
    #[serde(rename = "caloricos")]
    pub high_calorie_food: String,
    #[serde(rename = "monitora")]
    pub monitors_calories: String,
    #[serde(rename = "refeicao")]
    pub meals: String,
    #[serde(rename = "vegetais")]
    pub vegetables: String,
    #[serde(rename = "agua")]
    pub water: String,
    /// Eating between meals.
    #[serde(rename = "fora")]
    pub eats_between_meals: String,
    #[serde(rename = "alcool")]
    pub alcohol: String,
    #[serde(rename = "atividade")]
    pub activity: String,
    /// Daily screen-time bucket.
    #[serde(rename = "internet")]
    pub screen_time: String,
    #[serde(rename = "transporte")]
    pub transport: String,
}
