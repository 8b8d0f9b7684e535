use chrono::Utc;
use futurewife::quiz::{
    EvaluationId, EvaluationRecord, EvaluationRepository, EvaluationStatistics,
    EvaluationSummary, NewEvaluation, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store; evaluations are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<Vec<EvaluationRecord>>>,
}

impl InMemoryEvaluationRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<EvaluationRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, evaluation: NewEvaluation) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let id = EvaluationId(guard.len() as u64 + 1);
        let record = EvaluationRecord::from_new(id, Utc::now(), evaluation);
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<EvaluationSummary>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .iter()
            .rev()
            .take(limit)
            .map(EvaluationRecord::summary)
            .collect())
    }

    fn statistics(&self) -> Result<EvaluationStatistics, RepositoryError> {
        let guard = self.lock()?;
        Ok(EvaluationStatistics::from_records(guard.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futurewife::quiz::{AnswerSet, ScoringEngine};

    fn new_evaluation(name: &str, answers: AnswerSet) -> NewEvaluation {
        NewEvaluation {
            name: name.to_string(),
            evaluation: ScoringEngine::default().evaluate(&answers),
            answers,
            interpretation: None,
            final_report: None,
        }
    }

    #[test]
    fn assigns_sequential_ids_and_lists_newest_first() {
        let repository = InMemoryEvaluationRepository::default();
        for name in ["a", "b", "c"] {
            repository
                .insert(new_evaluation(name, AnswerSet::new()))
                .expect("insert");
        }

        let recent = repository.recent(2).expect("recent");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, EvaluationId(3));
        assert_eq!(recent[1].name, "b");

        let fetched = repository.fetch(EvaluationId(1)).expect("fetch");
        assert_eq!(fetched.map(|record| record.name), Some("a".to_string()));
        assert!(repository.fetch(EvaluationId(9)).expect("fetch").is_none());
    }

    #[test]
    fn statistics_average_scores() {
        let repository = InMemoryEvaluationRepository::default();
        repository
            .insert(new_evaluation(
                "full",
                AnswerSet::new().with("family_size", "5"),
            ))
            .expect("insert");
        repository
            .insert(new_evaluation(
                "wrong",
                AnswerSet::new().with("family_size", "3"),
            ))
            .expect("insert");

        let statistics = repository.statistics().expect("statistics");
        assert_eq!(statistics.total, 2);
        assert_eq!(statistics.avg_score, Some(50.0));
        assert_eq!(statistics.wife_material_count, 1);
        assert_eq!(statistics.incompatible_count, 1);
    }
}
