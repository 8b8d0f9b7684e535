use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use super::evaluation::{CompatibilityLevel, Evaluation};

pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Auto-increment identifier assigned by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub u64);

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything persisted for a scored submission, before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    pub name: String,
    pub answers: AnswerSet,
    pub evaluation: Evaluation,
    pub interpretation: Option<String>,
    pub final_report: Option<String>,
}

/// Stored evaluation as returned to admin consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: EvaluationId,
    pub name: String,
    pub answers: AnswerSet,
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub interpretation: Option<String>,
    pub final_report: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn from_new(id: EvaluationId, created_at: DateTime<Utc>, new: NewEvaluation) -> Self {
        Self {
            id,
            name: new.name,
            answers: new.answers,
            evaluation: new.evaluation,
            interpretation: new.interpretation,
            final_report: new.final_report,
            created_at,
        }
    }

    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            id: self.id,
            name: self.name.clone(),
            final_score: self.evaluation.final_score,
            compatibility_level: self.evaluation.compatibility_level,
            verdict: self.evaluation.verdict.clone(),
            created_at: self.created_at,
        }
    }
}

/// List view of a stored evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub id: EvaluationId,
    pub name: String,
    pub final_score: u8,
    pub compatibility_level: CompatibilityLevel,
    pub verdict: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters over every stored evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationStatistics {
    pub total: u64,
    pub avg_score: Option<f64>,
    pub wife_material_count: u64,
    pub compatible_count: u64,
    pub potential_count: u64,
    pub incompatible_count: u64,
}

impl EvaluationStatistics {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a EvaluationRecord>) -> Self {
        let mut stats = Self::default();
        let mut score_sum = 0u64;

        for record in records {
            stats.total += 1;
            score_sum += u64::from(record.evaluation.final_score);
            let counter = match record.evaluation.compatibility_level {
                CompatibilityLevel::WifeMaterial => &mut stats.wife_material_count,
                CompatibilityLevel::Compatible => &mut stats.compatible_count,
                CompatibilityLevel::Potential => &mut stats.potential_count,
                CompatibilityLevel::NotCompatible => &mut stats.incompatible_count,
            };
            *counter += 1;
        }

        if stats.total > 0 {
            stats.avg_score = Some(score_sum as f64 / stats.total as f64);
        }
        stats
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, evaluation: NewEvaluation) -> Result<EvaluationRecord, RepositoryError>;
    fn fetch(&self, id: EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    /// Most recent evaluations first.
    fn recent(&self, limit: usize) -> Result<Vec<EvaluationSummary>, RepositoryError>;
    fn statistics(&self) -> Result<EvaluationStatistics, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
