//! Closed label domains for every form field and their classifier encodings.
//!
//! Each enum is one family of the label encoding table. `label()` is the text the
//! form shows, `aliases()` lists wording used by earlier revisions of the form, and
//! `token()`/`code()` is what the classifier was fit on.

use crate::collation::sort_options;

use super::errors::EncodeError;

/// Code emitted for `Feminino`.
pub const FEMALE_CODE: u8 = 1;
/// Code emitted for `Masculino`.
pub const MALE_CODE: u8 = 0;
/// Code emitted for `Sim`.
pub const YES_CODE: u8 = 1;
/// Code emitted for `Não`.
pub const NO_CODE: u8 = 0;

/// A closed set of user-facing labels.
pub trait LabelDomain: Copy + Sized + 'static {
    /// Every member of the domain, in declaration order.
    const ALL: &'static [Self];

    /// Canonical label displayed by the form.
    fn label(self) -> &'static str;

    /// Alternative labels accepted for the same member.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Resolve a label (canonical or alias) by exact match.
    fn from_label(label: &str, field: &'static str) -> Result<Self, EncodeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| {
                member.label() == label || member.aliases().iter().any(|alias| *alias == label)
            })
            .ok_or_else(|| EncodeError::UnrecognizedOption {
                field,
                label: label.to_string(),
            })
    }

    /// Canonical labels ordered for display.
    fn display_options() -> Vec<&'static str> {
        sort_options(Self::ALL.iter().map(|member| member.label()))
    }
}

/// A label domain whose members translate to a classifier token.
pub trait CategoricalToken: LabelDomain {
    /// Token the classifier expects for this member.
    fn token(self) -> &'static str;

    /// Every token the family can emit.
    fn vocabulary() -> Vec<&'static str> {
        Self::ALL.iter().map(|member| member.token()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn code(self) -> u8 {
        match self {
            Gender::Female => FEMALE_CODE,
            Gender::Male => MALE_CODE,
        }
    }
}

impl LabelDomain for Gender {
    const ALL: &'static [Self] = &[Gender::Female, Gender::Male];

    fn label(self) -> &'static str {
        match self {
            Gender::Female => "Feminino",
            Gender::Male => "Masculino",
        }
    }
}

/// Shared yes/no table used by all four binary flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn code(self) -> u8 {
        match self {
            YesNo::Yes => YES_CODE,
            YesNo::No => NO_CODE,
        }
    }
}

impl LabelDomain for YesNo {
    const ALL: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Sim",
            YesNo::No => "Não",
        }
    }
}

/// Number of main meals per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealCount {
    One,
    Two,
    Three,
    FourOrMore,
}

impl LabelDomain for MealCount {
    const ALL: &'static [Self] = &[
        MealCount::One,
        MealCount::Two,
        MealCount::Three,
        MealCount::FourOrMore,
    ];

    fn label(self) -> &'static str {
        match self {
            MealCount::One => "1",
            MealCount::Two => "2",
            MealCount::Three => "3",
            MealCount::FourOrMore => "4+",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            MealCount::One => &["Uma refeição principal por dia"],
            MealCount::Two => &["Duas refeições principais por dia"],
            MealCount::Three => &["Três refeições principais por dia"],
            MealCount::FourOrMore => &["Quatro ou mais refeições principais"],
        }
    }
}

impl CategoricalToken for MealCount {
    fn token(self) -> &'static str {
        match self {
            MealCount::One => "Uma_refeicao_principal_por_dia",
            MealCount::Two => "Duas_refeicoes_principais_por_dia",
            MealCount::Three => "Tres_refeicoes_principais_por_dia",
            MealCount::FourOrMore => "Quatro_ou_mais_refeicoes_principais_por_dia",
        }
    }
}

/// How often vegetables are eaten with meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VegetableFrequency {
    Rarely,
    Sometimes,
    Always,
}

impl LabelDomain for VegetableFrequency {
    const ALL: &'static [Self] = &[
        VegetableFrequency::Rarely,
        VegetableFrequency::Sometimes,
        VegetableFrequency::Always,
    ];

    fn label(self) -> &'static str {
        match self {
            VegetableFrequency::Rarely => "Raramente",
            VegetableFrequency::Sometimes => "Às vezes",
            VegetableFrequency::Always => "Sempre",
        }
    }
}

impl CategoricalToken for VegetableFrequency {
    fn token(self) -> &'static str {
        match self {
            VegetableFrequency::Rarely => "Raramente",
            VegetableFrequency::Sometimes => "As_vezes",
            VegetableFrequency::Always => "Sempre",
        }
    }
}

/// Daily water intake bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterIntake {
    Low,
    Adequate,
    High,
}

impl LabelDomain for WaterIntake {
    const ALL: &'static [Self] = &[WaterIntake::Low, WaterIntake::Adequate, WaterIntake::High];

    fn label(self) -> &'static str {
        match self {
            WaterIntake::Low => "< 1 Litro",
            WaterIntake::Adequate => "1-2 Litros",
            WaterIntake::High => "> 2 Litros",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            WaterIntake::Low => &["Menos de 1 litro (Baixo)"],
            WaterIntake::Adequate => &["Entre 1 e 2 litros (Adequado)"],
            WaterIntake::High => &["Mais de 2 litros (Alto)"],
        }
    }
}

impl CategoricalToken for WaterIntake {
    fn token(self) -> &'static str {
        match self {
            WaterIntake::Low => "Baixo_consumo",
            WaterIntake::Adequate => "Consumo_adequado",
            WaterIntake::High => "Alto_consumo",
        }
    }
}

/// Generic frequency scale, shared by snacking between meals and alcohol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Never,
    Sometimes,
    Frequently,
    Always,
}

impl LabelDomain for Frequency {
    const ALL: &'static [Self] = &[
        Frequency::Never,
        Frequency::Sometimes,
        Frequency::Frequently,
        Frequency::Always,
    ];

    fn label(self) -> &'static str {
        match self {
            Frequency::Never => "Não",
            Frequency::Sometimes => "Às vezes",
            Frequency::Frequently => "Frequentemente",
            Frequency::Always => "Sempre",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Frequency::Never => &["Nunca"],
            _ => &[],
        }
    }
}

impl CategoricalToken for Frequency {
    fn token(self) -> &'static str {
        match self {
            Frequency::Never => "no",
            Frequency::Sometimes => "Sometimes",
            Frequency::Frequently => "Frequently",
            Frequency::Always => "Always",
        }
    }
}

/// Physical activity frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityLevel {
    Sedentary,
    Low,
    Moderate,
    High,
}

impl LabelDomain for ActivityLevel {
    const ALL: &'static [Self] = &[
        ActivityLevel::Sedentary,
        ActivityLevel::Low,
        ActivityLevel::Moderate,
        ActivityLevel::High,
    ];

    fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentário",
            ActivityLevel::Low => "Baixa",
            ActivityLevel::Moderate => "Moderada",
            ActivityLevel::High => "Alta",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            ActivityLevel::Sedentary => &[],
            ActivityLevel::Low => &["Baixa frequência"],
            ActivityLevel::Moderate => &["Moderada frequência"],
            ActivityLevel::High => &["Alta frequência"],
        }
    }
}

impl CategoricalToken for ActivityLevel {
    fn token(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentario",
            ActivityLevel::Low => "Baixa_frequencia",
            ActivityLevel::Moderate => "Moderada_frequencia",
            ActivityLevel::High => "Alta_frequencia",
        }
    }
}

/// Daily time spent on electronic devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenTime {
    Low,
    Moderate,
    Intense,
}

impl LabelDomain for ScreenTime {
    const ALL: &'static [Self] = &[ScreenTime::Low, ScreenTime::Moderate, ScreenTime::Intense];

    fn label(self) -> &'static str {
        match self {
            ScreenTime::Low => "Baixo (0-2h)",
            ScreenTime::Moderate => "Moderado (3-5h)",
            ScreenTime::Intense => "Intenso (>5h)",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            ScreenTime::Low => &["Pouco uso"],
            ScreenTime::Moderate => &["Uso moderado"],
            ScreenTime::Intense => &["Uso intenso"],
        }
    }
}

impl CategoricalToken for ScreenTime {
    fn token(self) -> &'static str {
        match self {
            ScreenTime::Low => "Uso_baixo",
            ScreenTime::Moderate => "Uso_moderado",
            ScreenTime::Intense => "Uso_intenso",
        }
    }
}

/// Main means of transportation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    PublicTransportation,
    Walking,
    Automobile,
    Bike,
    Motorbike,
}

impl LabelDomain for Transport {
    const ALL: &'static [Self] = &[
        Transport::PublicTransportation,
        Transport::Walking,
        Transport::Automobile,
        Transport::Bike,
        Transport::Motorbike,
    ];

    fn label(self) -> &'static str {
        match self {
            Transport::PublicTransportation => "Transporte Público",
            Transport::Walking => "Caminhada",
            Transport::Automobile => "Carro",
            Transport::Bike => "Bicicleta",
            Transport::Motorbike => "Moto",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Transport::PublicTransportation => &[],
            Transport::Walking => &["Caminhando / A pé"],
            Transport::Automobile => &["Automóvel"],
            Transport::Bike => &[],
            Transport::Motorbike => &["Motocicleta"],
        }
    }
}

impl CategoricalToken for Transport {
    fn token(self) -> &'static str {
        match self {
            Transport::PublicTransportation => "Public_Transportation",
            Transport::Walking => "Walking",
            Transport::Automobile => "Automobile",
            Transport::Bike => "Bike",
            Transport::Motorbike => "Motorbike",
        }
    }
}
