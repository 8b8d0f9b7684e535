use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::quiz::answers::AnswerSet;
use crate::quiz::catalog::{QuestionKind, QUESTIONS};
use crate::quiz::evaluation::Evaluation;
use crate::quiz::narrative::{DisabledNarrator, NarrativeGenerator, NarrativeKind};
use crate::quiz::repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, EvaluationStatistics,
    EvaluationSummary, NewEvaluation, RepositoryError,
};
use crate::quiz::service::QuizService;

/// Every question answered with its highest-scoring option.
pub(super) fn ideal_answers() -> AnswerSet {
    QUESTIONS
        .iter()
        .map(|question| {
            let best = match question.kind {
                QuestionKind::FixedAnswer { correct } => correct,
                QuestionKind::Interpretive => question
                    .options
                    .iter()
                    .max_by(|a, b| a.points.total_cmp(&b.points))
                    .map(|option| option.id)
                    .expect("question has options"),
            };
            (question.id, best)
        })
        .collect()
}

/// Every question answered with its lowest-scoring option.
pub(super) fn worst_answers() -> AnswerSet {
    QUESTIONS
        .iter()
        .map(|question| {
            let worst = question
                .options
                .iter()
                .min_by(|a, b| a.points.total_cmp(&b.points))
                .map(|option| option.id)
                .expect("question has options");
            (question.id, worst)
        })
        .collect()
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<BTreeMap<EvaluationId, EvaluationRecord>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl EvaluationRepository for MemoryRepository {
    fn insert(&self, evaluation: NewEvaluation) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let id = EvaluationId(guard.len() as u64 + 1);
        let created_at = Utc
            .with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
            + chrono::Duration::seconds(id.0 as i64);
        let record = EvaluationRecord::from_new(id, created_at, evaluation);
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<EvaluationSummary>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .rev()
            .take(limit)
            .map(EvaluationRecord::summary)
            .collect())
    }

    fn statistics(&self) -> Result<EvaluationStatistics, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(EvaluationStatistics::from_records(guard.values()))
    }
}

pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn insert(&self, _evaluation: NewEvaluation) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<EvaluationSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn statistics(&self) -> Result<EvaluationStatistics, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Narrator returning fixed text and recording what it was asked for.
#[derive(Default)]
pub(super) struct CannedNarrator {
    calls: Mutex<Vec<(NarrativeKind, u8)>>,
}

impl CannedNarrator {
    pub(super) fn calls(&self) -> Vec<(NarrativeKind, u8)> {
        self.calls.lock().expect("narrator mutex poisoned").clone()
    }
}

#[async_trait]
impl NarrativeGenerator for CannedNarrator {
    async fn generate(
        &self,
        kind: NarrativeKind,
        evaluation: &Evaluation,
        _answers: &AnswerSet,
    ) -> Option<String> {
        self.calls
            .lock()
            .expect("narrator mutex poisoned")
            .push((kind, evaluation.final_score));
        Some(match kind {
            NarrativeKind::Interpretation => "interpretazione di prova".to_string(),
            NarrativeKind::FinalReport => "resoconto di prova".to_string(),
        })
    }
}

pub(super) fn build_service() -> (
    QuizService<MemoryRepository, DisabledNarrator>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = QuizService::new(repository.clone(), Arc::new(DisabledNarrator));
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
