use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BmiCategory – ordinal weight classification
// ---------------------------------------------------------------------------

/// BMI category. Bins are left-inclusive, right-exclusive; the top bin is
/// open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Moderately obese")]
    ModeratelyObese,
    #[serde(rename = "Severely obese")]
    SeverelyObese,
    #[serde(rename = "Very severely obese")]
    VerySeverelyObese,
}

impl BmiCategory {
    /// All categories, lowest BMI first.
    pub const ALL: [BmiCategory; 6] = [
        BmiCategory::Underweight,
        BmiCategory::NormalWeight,
        BmiCategory::Overweight,
        BmiCategory::ModeratelyObese,
        BmiCategory::SeverelyObese,
        BmiCategory::VerySeverelyObese,
    ];

    /// Classify a BMI value. `None` for NaN, which falls in no bin.
    pub fn from_bmi(bmi: f64) -> Option<Self> {
        if bmi.is_nan() {
            return None;
        }
        let cat = if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::ModeratelyObese
        } else if bmi < 40.0 {
            BmiCategory::SeverelyObese
        } else {
            BmiCategory::VerySeverelyObese
        };
        Some(cat)
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ModeratelyObese => "Moderately obese",
            BmiCategory::SeverelyObese => "Severely obese",
            BmiCategory::VerySeverelyObese => "Very severely obese",
        }
    }

    /// The risk tier paired with this category.
    pub fn health_risk(self) -> HealthRisk {
        match self {
            BmiCategory::Underweight => HealthRisk::Malnutrition,
            BmiCategory::NormalWeight => HealthRisk::Low,
            BmiCategory::Overweight => HealthRisk::Enhanced,
            BmiCategory::ModeratelyObese => HealthRisk::Medium,
            BmiCategory::SeverelyObese => HealthRisk::High,
            BmiCategory::VerySeverelyObese => HealthRisk::VeryHigh,
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BmiCategory {
    type Err = String;

    /// Exact, case-sensitive match on the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BmiCategory::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("unknown BMI category: {s}"))
    }
}

// ---------------------------------------------------------------------------
// HealthRisk
// ---------------------------------------------------------------------------

/// Qualitative risk tier, one per [`BmiCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthRisk {
    #[serde(rename = "Malnutrition risk")]
    Malnutrition,
    #[serde(rename = "Low risk")]
    Low,
    #[serde(rename = "Enhanced risk")]
    Enhanced,
    #[serde(rename = "Medium risk")]
    Medium,
    #[serde(rename = "High risk")]
    High,
    #[serde(rename = "Very high risk")]
    VeryHigh,
}

impl HealthRisk {
    pub fn label(self) -> &'static str {
        match self {
            HealthRisk::Malnutrition => "Malnutrition risk",
            HealthRisk::Low => "Low risk",
            HealthRisk::Enhanced => "Enhanced risk",
            HealthRisk::Medium => "Medium risk",
            HealthRisk::High => "High risk",
            HealthRisk::VeryHigh => "Very high risk",
        }
    }
}

impl fmt::Display for HealthRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
