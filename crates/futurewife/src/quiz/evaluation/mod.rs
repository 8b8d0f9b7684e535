mod flags;
mod policy;
mod rules;

pub use policy::CompatibilityLevel;

use super::answers::AnswerSet;
use super::catalog::{Question, QUESTIONS};
use serde::{Deserialize, Serialize};

/// Themed subset of questions summarized by a 0-10 index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trust,
    Vision,
    EmotionalMaturity,
    Ambition,
}

const CATEGORY_MEMBERS: &[(Category, &[&str])] = &[
    (Category::Trust, &["trust_future"]),
    (
        Category::Vision,
        &["mare_montagna", "where_live", "vacation_type"],
    ),
    (
        Category::EmotionalMaturity,
        &["attractive_woman", "wife_job", "how_die"],
    ),
    (
        Category::Ambition,
        &["rich_priority", "representative_phrase", "money_relationship"],
    ),
];

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Trust,
        Category::Vision,
        Category::EmotionalMaturity,
        Category::Ambition,
    ];

    /// Category the question contributes to, if any.
    pub fn of(question_id: &str) -> Option<Category> {
        CATEGORY_MEMBERS
            .iter()
            .find(|(_, members)| members.contains(&question_id))
            .map(|(category, _)| *category)
    }

    fn slot(self) -> usize {
        match self {
            Category::Trust => 0,
            Category::Vision => 1,
            Category::EmotionalMaturity => 2,
            Category::Ambition => 3,
        }
    }
}

/// Stateless evaluator over a fixed question catalog.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    questions: &'static [Question],
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(QUESTIONS)
    }
}

impl ScoringEngine {
    pub fn new(questions: &'static [Question]) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> Evaluation {
        let tally = rules::tally_answers(self.questions, answers);
        let final_score = rules::final_score(tally.total_points, tally.max_possible_points);
        let indices = tally.category_indices();

        let compatibility_level = CompatibilityLevel::from_score(final_score);
        let flags = flags::derive_flags(&indices, tally.has_scored_answers(), answers);

        Evaluation {
            final_score,
            verdict: policy::verdict(final_score).to_string(),
            compatibility_level,
            points_breakdown: tally.breakdown,
            strengths: flags.strengths,
            concerns: flags.concerns,
            red_flags: flags.red_flags,
            trust_index: indices.get(Category::Trust),
            vision_index: indices.get(Category::Vision),
            emotional_maturity_index: indices.get(Category::EmotionalMaturity),
            ambition_alignment_index: indices.get(Category::Ambition),
            final_message: policy::final_message(final_score).to_string(),
        }
    }
}

/// Per-category normalized sub-scores, one decimal each.
///
/// A category with no answered questions reports 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct CategoryIndices([f64; 4]);

impl CategoryIndices {
    pub(crate) fn get(&self, category: Category) -> f64 {
        self.0[category.slot()]
    }
}

/// Contribution of a single answered question, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsEntry {
    pub question: String,
    pub answer: String,
    pub points: f64,
    pub reason: String,
}

/// Full scoring result for one answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub final_score: u8,
    pub verdict: String,
    pub compatibility_level: CompatibilityLevel,
    pub points_breakdown: Vec<PointsEntry>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub red_flags: Vec<String>,
    pub trust_index: f64,
    pub vision_index: f64,
    pub emotional_maturity_index: f64,
    pub ambition_alignment_index: f64,
    pub final_message: String,
}

impl Evaluation {
    pub fn index(&self, category: Category) -> f64 {
        match category {
            Category::Trust => self.trust_index,
            Category::Vision => self.vision_index,
            Category::EmotionalMaturity => self.emotional_maturity_index,
            Category::Ambition => self.ambition_alignment_index,
        }
    }
}
