//! Compatibility quiz: static catalog, scoring engine, narrative enrichment, and storage seams.
//!
//! The scoring engine is a pure function of the catalog and the submitted answers. Narrative
//! generation and persistence sit behind traits so the HTTP surface can be exercised with
//! in-memory doubles.

pub mod answers;
pub mod catalog;
pub mod evaluation;
pub mod narrative;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, QuizSubmission};
pub use catalog::{Catalog, OpenQuestion, Question, QuestionKind, QuizOption};
pub use evaluation::{Category, CompatibilityLevel, Evaluation, PointsEntry, ScoringEngine};
pub use narrative::{
    narrator_from_config, DisabledNarrator, NarrativeGenerator, NarrativeKind, OpenAiNarrator,
};
pub use repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, EvaluationStatistics,
    EvaluationSummary, NewEvaluation, RepositoryError,
};
pub use router::quiz_router;
pub use service::{QuizService, QuizServiceError, ScoredEvaluation};
