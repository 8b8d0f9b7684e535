use serde::{Deserialize, Serialize};

/// Coarse compatibility band derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompatibilityLevel {
    #[serde(rename = "wife material")]
    WifeMaterial,
    #[serde(rename = "compatibile")]
    Compatible,
    #[serde(rename = "potenziale")]
    Potential,
    #[serde(rename = "non compatibile")]
    NotCompatible,
}

impl CompatibilityLevel {
    pub const ALL: [CompatibilityLevel; 4] = [
        CompatibilityLevel::WifeMaterial,
        CompatibilityLevel::Compatible,
        CompatibilityLevel::Potential,
        CompatibilityLevel::NotCompatible,
    ];

    pub fn from_score(final_score: u8) -> Self {
        match final_score {
            80.. => CompatibilityLevel::WifeMaterial,
            60..=79 => CompatibilityLevel::Compatible,
            40..=59 => CompatibilityLevel::Potential,
            _ => CompatibilityLevel::NotCompatible,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompatibilityLevel::WifeMaterial => "wife material",
            CompatibilityLevel::Compatible => "compatibile",
            CompatibilityLevel::Potential => "potenziale",
            CompatibilityLevel::NotCompatible => "non compatibile",
        }
    }
}

// Verdict and closing message use their own five tiers, not the level bands above.
const VERDICTS: &[(u8, &str)] = &[
    (
        85,
        "Wife material. Allineamento solido, costruire insieme è possibile.",
    ),
    (
        70,
        "Compatibile sul piano mentale, ma non ancora pronta per reggere il ritmo.",
    ),
    (
        55,
        "Potenziale presente, ma serve chiarimento su alcuni punti critici.",
    ),
    (
        40,
        "Compatibilità limitata. Differenze significative su valori chiave.",
    ),
];
const VERDICT_FLOOR: &str =
    "Incompatibilità strutturale. Visioni troppo distanti per costruire insieme.";

const FINAL_MESSAGES: &[(u8, &str)] = &[
    (85, "Allineamento solido. La costruzione insieme è possibile."),
    (
        70,
        "Buona base mentale. Serve maturità e rispetto reciproco per reggere il ritmo.",
    ),
    (
        55,
        "Potenziale presente, ma le differenze richiedono chiarimento e crescita.",
    ),
    (
        40,
        "Compatibilità limitata. Le visioni divergono su punti fondamentali.",
    ),
];
const FINAL_MESSAGE_FLOOR: &str =
    "Incompatibilità strutturale. Visioni troppo distanti per costruire insieme.";

fn tiered(table: &[(u8, &'static str)], floor: &'static str, final_score: u8) -> &'static str {
    table
        .iter()
        .find(|(threshold, _)| final_score >= *threshold)
        .map(|(_, text)| *text)
        .unwrap_or(floor)
}

pub(crate) fn verdict(final_score: u8) -> &'static str {
    tiered(VERDICTS, VERDICT_FLOOR, final_score)
}

pub(crate) fn final_message(final_score: u8) -> &'static str {
    tiered(FINAL_MESSAGES, FINAL_MESSAGE_FLOOR, final_score)
}
