//! Translation of raw form answers into the classifier's feature record.
//!
//! Encoding is a pure function of the submission and the static label tables:
//! every label is resolved through its family's closed domain, numeric answers are
//! bounds-checked, and the result is laid out in [`FEATURE_COLUMNS`] order.

mod bmi;
mod errors;
pub mod labels;
mod raw;
mod record;

pub use bmi::BmiPolicy;
pub use errors::EncodeError;
pub use raw::RawSelection;
pub use record::{FEATURE_COLUMNS, FeatureRecord, FeatureValue};

use labels::{
    ActivityLevel, CategoricalToken, Frequency, Gender, LabelDomain, MealCount, ScreenTime,
    Transport, VegetableFrequency, WaterIntake, YesNo,
};

/// Accepted age range, in years.
pub const AGE_RANGE: (i64, i64) = (10, 100);
/// Accepted height range, in meters.
pub const HEIGHT_RANGE_M: (f64, f64) = (1.0, 2.5);
/// Accepted weight range, in kilograms.
pub const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 200.0);

/// Stateless encoder configured with a BMI derivation policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder {
    bmi_policy: BmiPolicy,
}

impl FeatureEncoder {
    pub fn new(bmi_policy: BmiPolicy) -> Self {
        Self { bmi_policy }
    }

    /// Encode one submission, failing on the first out-of-domain answer.
    pub fn encode(&self, raw: &RawSelection) -> Result<FeatureRecord, EncodeError> {
        check_range("idade", raw.age as f64, (AGE_RANGE.0 as f64, AGE_RANGE.1 as f64))?;
        check_range("altura", raw.height_m, HEIGHT_RANGE_M)?;
        check_range("peso", raw.weight_kg, WEIGHT_RANGE_KG)?;

        Ok(FeatureRecord {
            age: raw.age,
            gender: Gender::from_label(&raw.gender, "genero")?.code(),
            meals: token::<MealCount>(&raw.meals, "qtd_refeicao")?,
            vegetables: token::<VegetableFrequency>(&raw.vegetables, "qtd_vegetais")?,
            water: token::<WaterIntake>(&raw.water, "qtd_agua")?,
            activity: token::<ActivityLevel>(&raw.activity, "qtd_atv_fisicas")?,
            screen_time: token::<ScreenTime>(&raw.screen_time, "qtd_tmp_na_internet")?,
            smoker: flag(&raw.smoker, "b_fuma")?,
            high_calorie_food: flag(&raw.high_calorie_food, "b_come_alimentos_caloricos")?,
            monitors_calories: flag(&raw.monitors_calories, "b_monitora_calorias")?,
            family_history: flag(&raw.family_history, "b_historico_familiar")?,
            eats_between_meals: token::<Frequency>(
                &raw.eats_between_meals,
                "freq_come_fora_refeicao",
            )?,
            alcohol: token::<Frequency>(&raw.alcohol, "freq_alcool")?,
            transport: token::<Transport>(&raw.transport, "meio_de_transporte")?,
            bmi: self.bmi_policy.derive(raw.weight_kg, raw.height_m),
        })
    }
}

/// Encode with the default BMI policy.
pub fn encode(raw: &RawSelection) -> Result<FeatureRecord, EncodeError> {
    FeatureEncoder::default().encode(raw)
}

/// Tokens each categorical column can emit, keyed by column name.
pub fn categorical_vocabulary() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("qtd_refeicao", MealCount::vocabulary()),
        ("qtd_vegetais", VegetableFrequency::vocabulary()),
        ("qtd_agua", WaterIntake::vocabulary()),
        ("qtd_atv_fisicas", ActivityLevel::vocabulary()),
        ("qtd_tmp_na_internet", ScreenTime::vocabulary()),
        ("freq_come_fora_refeicao", Frequency::vocabulary()),
        ("freq_alcool", Frequency::vocabulary()),
        ("meio_de_transporte", Transport::vocabulary()),
    ]
}

/// Display options for every labelled form field, in form order.
pub fn form_options() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("genero", Gender::display_options()),
        ("historico", YesNo::display_options()),
        ("fuma", YesNo::display_options()),
        ("caloricos", YesNo::display_options()),
        ("monitora", YesNo::display_options()),
        ("refeicao", MealCount::display_options()),
        ("vegetais", VegetableFrequency::display_options()),
        ("agua", WaterIntake::display_options()),
        ("fora", Frequency::display_options()),
        ("alcool", Frequency::display_options()),
        ("atividade", ActivityLevel::display_options()),
        ("internet", ScreenTime::display_options()),
        ("transporte", Transport::display_options()),
    ]
}

fn token<T: CategoricalToken>(label: &str, field: &'static str) -> Result<&'static str, EncodeError> {
    T::from_label(label, field).map(T::token)
}

fn flag(label: &str, field: &'static str) -> Result<u8, EncodeError> {
    YesNo::from_label(label, field).map(YesNo::code)
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), EncodeError> {
    if value.is_finite() && value >= min && value <= max {
        return Ok(());
    }
    Err(EncodeError::InvalidMeasurement {
        field,
        value,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawSelection {
        RawSelection {
            age: 25,
            height_m: 1.70,
            weight_kg: 70.0,
            gender: "Feminino".into(),
            family_history: "Sim".into(),
            smoker: "Não".into(),
            high_calorie_food: "Sim".into(),
            monitors_calories: "Não".into(),
            meals: "3".into(),
            vegetables: "Sempre".into(),
            water: "1-2 Litros".into(),
            eats_between_meals: "Às vezes".into(),
            alcohol: "Não".into(),
            activity: "Moderada".into(),
            screen_time: "Moderado (3-5h)".into(),
            transport: "Carro".into(),
        }
    }

    #[test]
    fn encodes_reference_submission() {
        let record = encode(&sample()).unwrap();
        assert_eq!(record.value("idade"), Some(FeatureValue::Int(25)));
        assert_eq!(record.value("genero"), Some(FeatureValue::Int(1)));
        assert_eq!(record.value("b_historico_familiar"), Some(FeatureValue::Int(1)));
        assert_eq!(record.value("b_fuma"), Some(FeatureValue::Int(0)));
        assert_eq!(record.value("b_come_alimentos_caloricos"), Some(FeatureValue::Int(1)));
        assert_eq!(record.value("b_monitora_calorias"), Some(FeatureValue::Int(0)));
        assert_eq!(
            record.value("qtd_refeicao"),
            Some(FeatureValue::Token("Tres_refeicoes_principais_por_dia"))
        );
        assert_eq!(record.value("qtd_vegetais"), Some(FeatureValue::Token("Sempre")));
        assert_eq!(record.value("qtd_agua"), Some(FeatureValue::Token("Consumo_adequado")));
        assert_eq!(
            record.value("freq_come_fora_refeicao"),
            Some(FeatureValue::Token("Sometimes"))
        );
        assert_eq!(record.value("freq_alcool"), Some(FeatureValue::Token("no")));
        assert_eq!(
            record.value("qtd_atv_fisicas"),
            Some(FeatureValue::Token("Moderada_frequencia"))
        );
        assert_eq!(
            record.value("qtd_tmp_na_internet"),
            Some(FeatureValue::Token("Uso_moderado"))
        );
        assert_eq!(
            record.value("meio_de_transporte"),
            Some(FeatureValue::Token("Automobile"))
        );
        let bmi = record.bmi().as_f64().unwrap();
        assert!((24.0..24.5).contains(&bmi));
    }

    #[test]
    fn values_follow_column_order() {
        let record = encode(&sample()).unwrap();
        let columns: Vec<_> = record.values().into_iter().map(|(name, _)| name).collect();
        assert_eq!(columns, FEATURE_COLUMNS.to_vec());
        assert_eq!(record.value("unknown"), None);
    }

    #[test]
    fn repeated_encodes_serialize_identically() {
        let first = serde_json::to_vec(&encode(&sample()).unwrap()).unwrap();
        for _ in 0..5 {
            let again = serde_json::to_vec(&encode(&sample()).unwrap()).unwrap();
            assert_eq!(again, first);
        }
        let text = String::from_utf8(first).unwrap();
        let positions: Vec<usize> = FEATURE_COLUMNS
            .iter()
            .map(|column| text.find(&format!("\"{column}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn ceiling_policy_emits_integer_bmi() {
        let record = FeatureEncoder::new(BmiPolicy::Ceiling)
            .encode(&sample())
            .unwrap();
        assert_eq!(record.bmi(), FeatureValue::Int(25));
    }

    #[test]
    fn unknown_label_is_reported_with_field() {
        let mut raw = sample();
        raw.transport = "Patinete".into();
        let err = encode(&raw).unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnrecognizedOption {
                field: "meio_de_transporte",
                label: "Patinete".into(),
            }
        );
    }

    #[test]
    fn third_gender_label_is_rejected() {
        let mut raw = sample();
        raw.gender = "Não informado".into();
        assert!(matches!(
            encode(&raw),
            Err(EncodeError::UnrecognizedOption { field: "genero", .. })
        ));
    }

    #[test]
    fn earlier_form_wording_is_accepted() {
        let mut raw = sample();
        raw.meals = "Três refeições principais por dia".into();
        raw.alcohol = "Nunca".into();
        raw.transport = "Automóvel".into();
        raw.screen_time = "Uso moderado".into();
        assert_eq!(encode(&raw).unwrap(), encode(&sample()).unwrap());
    }

    #[test]
    fn rejects_measurements_outside_form_bounds() {
        let mut raw = sample();
        raw.height_m = 0.0;
        assert!(matches!(
            encode(&raw),
            Err(EncodeError::InvalidMeasurement { field: "altura", .. })
        ));

        let mut raw = sample();
        raw.weight_kg = f64::NAN;
        assert!(matches!(
            encode(&raw),
            Err(EncodeError::InvalidMeasurement { field: "peso", .. })
        ));

        let mut raw = sample();
        raw.age = 9;
        assert!(matches!(
            encode(&raw),
            Err(EncodeError::InvalidMeasurement { field: "idade", .. })
        ));
    }

    #[test]
    fn vocabulary_covers_every_categorical_column() {
        let vocabulary = categorical_vocabulary();
        for (column, tokens) in &vocabulary {
            assert!(FEATURE_COLUMNS.contains(column));
            assert!(tokens.iter().all(|token| !token.is_empty()));
        }
        let record = encode(&sample()).unwrap();
        let categorical = record
            .values()
            .into_iter()
            .filter(|(_, value)| value.as_token().is_some())
            .count();
        assert_eq!(categorical, vocabulary.len());
    }
}
