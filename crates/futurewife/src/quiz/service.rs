use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::answers::QuizSubmission;
use super::evaluation::{Evaluation, ScoringEngine};
use super::narrative::{NarrativeGenerator, NarrativeKind};
use super::repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, EvaluationStatistics,
    EvaluationSummary, NewEvaluation, RepositoryError,
};

/// Service composing the scoring engine, narrative collaborator, and repository.
pub struct QuizService<R, N: ?Sized> {
    engine: ScoringEngine,
    repository: Arc<R>,
    narrator: Arc<N>,
}

/// Response payload for a scored submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEvaluation {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub interpretation: Option<String>,
    pub final_report: Option<String>,
    pub evaluation_id: EvaluationId,
}

impl<R, N> QuizService<R, N>
where
    R: EvaluationRepository + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    pub fn new(repository: Arc<R>, narrator: Arc<N>) -> Self {
        Self::with_engine(ScoringEngine::default(), repository, narrator)
    }

    pub fn with_engine(engine: ScoringEngine, repository: Arc<R>, narrator: Arc<N>) -> Self {
        Self {
            engine,
            repository,
            narrator,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score a submission, attach narrative text when available, and persist the result.
    pub async fn submit(
        &self,
        submission: QuizSubmission,
    ) -> Result<ScoredEvaluation, QuizServiceError> {
        let QuizSubmission { name, answers } = submission;
        let evaluation = self.engine.evaluate(&answers);

        let (interpretation, final_report) = tokio::join!(
            self.narrator
                .generate(NarrativeKind::Interpretation, &evaluation, &answers),
            self.narrator
                .generate(NarrativeKind::FinalReport, &evaluation, &answers),
        );

        let record = self.repository.insert(NewEvaluation {
            name: name.unwrap_or_default(),
            answers,
            evaluation,
            interpretation,
            final_report,
        })?;

        info!(
            evaluation_id = %record.id,
            final_score = record.evaluation.final_score,
            level = record.evaluation.compatibility_level.label(),
            narrative = record.interpretation.is_some(),
            "evaluation stored"
        );

        Ok(ScoredEvaluation {
            evaluation_id: record.id,
            evaluation: record.evaluation,
            interpretation: record.interpretation,
            final_report: record.final_report,
        })
    }

    pub fn get(&self, id: EvaluationId) -> Result<EvaluationRecord, QuizServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<EvaluationSummary>, QuizServiceError> {
        Ok(self.repository.recent(limit)?)
    }

    pub fn statistics(&self) -> Result<EvaluationStatistics, QuizServiceError> {
        Ok(self.repository.statistics()?)
    }
}

/// Error raised by the quiz service.
#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
