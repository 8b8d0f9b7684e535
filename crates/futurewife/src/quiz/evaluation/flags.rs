use super::super::answers::AnswerSet;
use super::{Category, CategoryIndices};

const STRENGTH_THRESHOLD: f64 = 8.0;
const CONCERN_THRESHOLD: f64 = 5.0;
const RED_FLAG_THRESHOLD: f64 = 3.0;

const MIN_WHY_US_CHARS: usize = 20;
const INSTRUMENTAL_KEYWORDS: &[&str] = &["soldi", "ricco", "denaro"];
const CONSTRUCTIVE_KEYWORDS: &[&str] = &["futuro", "crescita", "costruire"];
const CONTROL_KEYWORDS: &[&str] = &["gelosia", "controllo"];

pub(crate) const NO_STRENGTHS: &str = "Nessun punto di forza significativo rilevato";
pub(crate) const NO_CONCERNS: &str = "Nessuna criticità significativa rilevata";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagKind {
    Strength,
    Concern,
    RedFlag,
}

struct CategorySignals {
    category: Category,
    strength: &'static str,
    concern: &'static str,
    red_flag: Option<&'static str>,
}

const CATEGORY_SIGNALS: &[CategorySignals] = &[
    CategorySignals {
        category: Category::Trust,
        strength: "Fiducia solida nel futuro e nelle capacità",
        concern: "Fiducia limitata o assente",
        red_flag: Some("Mancanza di fiducia nel futuro"),
    },
    CategorySignals {
        category: Category::Vision,
        strength: "Visione chiara e a lungo termine",
        concern: "Visione a lungo termine poco chiara",
        red_flag: None,
    },
    CategorySignals {
        category: Category::EmotionalMaturity,
        strength: "Maturità emotiva e gestione costruttiva dei conflitti",
        concern: "Maturità emotiva da sviluppare",
        red_flag: Some("Gestione emotiva problematica"),
    },
    CategorySignals {
        category: Category::Ambition,
        strength: "Allineamento su ambizione e progetti futuri",
        concern: "Differenze significative su ambizione e progetti",
        red_flag: Some("Incompatibilità su ambizione e visione futura"),
    },
];

/// (question id, option id) pairs that carry their own qualitative signal.
const ANSWER_SIGNALS: &[(&str, &str, FlagKind, &str)] = &[
    (
        "trust_future",
        "1_2_anni",
        FlagKind::Strength,
        "Fiducia totale nel futuro: valore fondamentale",
    ),
    (
        "trust_future",
        "ci_sono_nato",
        FlagKind::RedFlag,
        "Possibile interesse strumentale: risposta 'ci sono nato/a'",
    ),
    (
        "attractive_woman",
        "intelligente_carattere",
        FlagKind::Strength,
        "Valorizza intelligenza e carattere: allineamento sui valori",
    ),
    (
        "wife_job",
        "direttrice",
        FlagKind::Strength,
        "Visione ambiziosa per la coppia: direttrice",
    ),
    (
        "money_relationship",
        "investo",
        FlagKind::Strength,
        "Approccio costruttivo al denaro: investe",
    ),
    (
        "money_relationship",
        "mignotte_cocaina",
        FlagKind::RedFlag,
        "Rapporto problematico con il denaro",
    ),
    (
        "rich_priority",
        "aumentare_livello",
        FlagKind::Strength,
        "Priorità su crescita e livello, non su apparenza",
    ),
    (
        "representative_phrase",
        "costruisco_fatica",
        FlagKind::Strength,
        "Mentalità costruttiva: 'costruisco anche se costa fatica'",
    ),
];

const WHY_US_TOO_SHORT: &str = "Risposta 'Perché funzioneremmo' troppo breve o superficiale";
const WHY_US_INSTRUMENTAL: &str =
    "Possibile interesse strumentale rilevato nelle risposte aperte";
const WHY_US_CONSTRUCTIVE: &str = "Visione costruttiva espressa nelle risposte";
const CONTROL_DYNAMICS: &str = "Possibili dinamiche di controllo";

/// Ordered qualitative tags attached to an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QualitativeFlags {
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub red_flags: Vec<String>,
}

impl QualitativeFlags {
    fn push(&mut self, kind: FlagKind, text: &str) {
        let target = match kind {
            FlagKind::Strength => &mut self.strengths,
            FlagKind::Concern => &mut self.concerns,
            FlagKind::RedFlag => &mut self.red_flags,
        };
        target.push(text.to_string());
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn why_us_signal(why_us: &str) -> Option<(FlagKind, &'static str)> {
    if why_us.is_empty() {
        return None;
    }
    if why_us.chars().count() < MIN_WHY_US_CHARS {
        return Some((FlagKind::Concern, WHY_US_TOO_SHORT));
    }

    let lowered = why_us.to_lowercase();
    if contains_any(&lowered, INSTRUMENTAL_KEYWORDS) {
        Some((FlagKind::RedFlag, WHY_US_INSTRUMENTAL))
    } else if contains_any(&lowered, CONSTRUCTIVE_KEYWORDS) {
        Some((FlagKind::Strength, WHY_US_CONSTRUCTIVE))
    } else {
        None
    }
}

fn push_category_flags(flags: &mut QualitativeFlags, indices: &CategoryIndices) {
    for signals in CATEGORY_SIGNALS {
        let index = indices.get(signals.category);
        if index >= STRENGTH_THRESHOLD {
            flags.push(FlagKind::Strength, signals.strength);
        } else if index < CONCERN_THRESHOLD {
            flags.push(FlagKind::Concern, signals.concern);
            if let Some(red_flag) = signals.red_flag.filter(|_| index < RED_FLAG_THRESHOLD) {
                flags.push(FlagKind::RedFlag, red_flag);
            }
        }
    }
}

/// Category thresholds apply once anything has been scored. An unanswered category then counts
/// as 0 and is flagged like any other weak category.
pub(crate) fn derive_flags(
    indices: &CategoryIndices,
    scored: bool,
    answers: &AnswerSet,
) -> QualitativeFlags {
    let mut flags = QualitativeFlags::default();

    if scored {
        push_category_flags(&mut flags, indices);
    }

    for (question_id, option_id, kind, text) in ANSWER_SIGNALS {
        if answers.is_selected(question_id, option_id) {
            flags.push(*kind, text);
        }
    }

    if let Some((kind, text)) = why_us_signal(answers.why_us()) {
        flags.push(kind, text);
    }

    let non_negotiables = answers.non_negotiables().to_lowercase();
    if contains_any(&non_negotiables, CONTROL_KEYWORDS) {
        flags.push(FlagKind::Concern, CONTROL_DYNAMICS);
    }

    if flags.strengths.is_empty() {
        flags.strengths.push(NO_STRENGTHS.to_string());
    }
    if flags.concerns.is_empty() {
        flags.concerns.push(NO_CONCERNS.to_string());
    }

    flags
}
