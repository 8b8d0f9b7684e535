use super::super::answers::AnswerSet;
use super::super::catalog::{Question, QuestionKind};
use super::{Category, CategoryIndices, PointsEntry};

const CORRECT_ANSWER_POINTS: f64 = 8.0;
const STRONG_INCOMPATIBILITY_POINTS: f64 = -4.0;

pub(crate) const REASON_CORRECT: &str = "Risposta corretta";
pub(crate) const REASON_STRONG_INCOMPATIBILITY: &str = "Incompatibilità forte rilevata";
pub(crate) const REASON_INCORRECT: &str = "Risposta non corretta";
pub(crate) const REASON_POSITIVE: &str = "Valutazione psicologica positiva";
pub(crate) const REASON_NEGATIVE: &str = "Valutazione psicologica negativa";
pub(crate) const REASON_NEUTRAL: &str = "Valutazione neutra";

#[derive(Debug, Clone, Copy, Default)]
struct CategoryTally {
    points: f64,
    max: f64,
}

pub(crate) struct ScoreTally {
    pub breakdown: Vec<PointsEntry>,
    pub total_points: f64,
    pub max_possible_points: f64,
    categories: [CategoryTally; 4],
}

impl ScoreTally {
    /// False when nothing answered carries any achievable points, e.g. an empty answer set.
    pub fn has_scored_answers(&self) -> bool {
        self.max_possible_points > 0.0
    }

    pub fn category_indices(&self) -> CategoryIndices {
        let mut indices = [0.0; 4];
        for category in Category::ALL {
            let tally = self.categories[category.slot()];
            if tally.max > 0.0 {
                indices[category.slot()] =
                    round_tenths(tally.points / tally.max * 10.0).clamp(0.0, 10.0);
            }
        }
        CategoryIndices(indices)
    }
}

/// Base points and reason for a selected option, before the importance multiplier.
fn award(question: &Question, selected: &str) -> (f64, &'static str) {
    let raw_points = question
        .option(selected)
        .map(|option| option.points)
        .unwrap_or(0.0);

    match question.kind {
        QuestionKind::FixedAnswer { correct } if selected == correct => {
            (CORRECT_ANSWER_POINTS, REASON_CORRECT)
        }
        QuestionKind::FixedAnswer { .. } if raw_points < 0.0 => {
            (STRONG_INCOMPATIBILITY_POINTS, REASON_STRONG_INCOMPATIBILITY)
        }
        QuestionKind::FixedAnswer { .. } => (0.0, REASON_INCORRECT),
        QuestionKind::Interpretive => {
            let reason = if raw_points > 0.0 {
                REASON_POSITIVE
            } else if raw_points < 0.0 {
                REASON_NEGATIVE
            } else {
                REASON_NEUTRAL
            };
            (raw_points, reason)
        }
    }
}

pub(crate) fn tally_answers(questions: &[Question], answers: &AnswerSet) -> ScoreTally {
    let mut tally = ScoreTally {
        breakdown: Vec::new(),
        total_points: 0.0,
        max_possible_points: 0.0,
        categories: [CategoryTally::default(); 4],
    };

    for question in questions {
        let Some(selected) = answers.selection(question.id) else {
            continue;
        };

        let (question_points, reason) = award(question, selected);
        let final_points = question_points * question.importance_multiplier;
        let max_for_question = question.max_points();

        tally.total_points += final_points;
        tally.max_possible_points += max_for_question;

        if let Some(category) = Category::of(question.id) {
            let slot = &mut tally.categories[category.slot()];
            slot.points += final_points;
            slot.max += max_for_question;
        }

        let answer = question
            .option(selected)
            .map(|option| option.label.to_string())
            .unwrap_or_else(|| selected.to_string());

        tally.breakdown.push(PointsEntry {
            question: question.text.to_string(),
            answer,
            points: round_tenths(final_points),
            reason: reason.to_string(),
        });
    }

    tally
}

/// Percentage of the achievable points, truncated toward zero and clamped to 0..=100.
pub(crate) fn final_score(total_points: f64, max_possible_points: f64) -> u8 {
    if max_possible_points <= 0.0 {
        return 0;
    }

    let percentage = (total_points / max_possible_points * 100.0).trunc();
    percentage.clamp(0.0, 100.0) as u8
}

pub(crate) fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
