use std::sync::Arc;

use super::common::*;
use crate::quiz::answers::{AnswerSet, QuizSubmission};
use crate::quiz::evaluation::CompatibilityLevel;
use crate::quiz::narrative::NarrativeKind;
use crate::quiz::repository::{EvaluationId, RepositoryError};
use crate::quiz::service::{QuizService, QuizServiceError};

fn submission(name: Option<&str>, answers: AnswerSet) -> QuizSubmission {
    QuizSubmission {
        name: name.map(str::to_string),
        answers,
    }
}

#[tokio::test]
async fn submit_persists_evaluation_without_narrative() {
    let (service, repository) = build_service();

    let scored = service
        .submit(submission(Some("Giulia"), ideal_answers()))
        .await
        .expect("submission succeeds");

    assert_eq!(scored.evaluation_id, EvaluationId(1));
    assert_eq!(scored.evaluation.final_score, 100);
    assert!(scored.interpretation.is_none());
    assert!(scored.final_report.is_none());
    assert_eq!(repository.len(), 1);

    let stored = service.get(scored.evaluation_id).expect("stored record");
    assert_eq!(stored.name, "Giulia");
    assert_eq!(stored.answers, ideal_answers());
    assert_eq!(stored.evaluation, scored.evaluation);
}

#[tokio::test]
async fn anonymous_submission_stores_empty_name() {
    let (service, _) = build_service();

    let scored = service
        .submit(submission(None, AnswerSet::new()))
        .await
        .expect("submission succeeds");

    let stored = service.get(scored.evaluation_id).expect("stored record");
    assert_eq!(stored.name, "");
    assert_eq!(stored.evaluation.final_score, 0);
}

#[tokio::test]
async fn narrator_is_asked_for_both_texts() {
    let repository = Arc::new(MemoryRepository::default());
    let narrator = Arc::new(CannedNarrator::default());
    let service = QuizService::new(repository.clone(), narrator.clone());

    let scored = service
        .submit(submission(Some("Marta"), ideal_answers()))
        .await
        .expect("submission succeeds");

    assert_eq!(
        scored.interpretation.as_deref(),
        Some("interpretazione di prova")
    );
    assert_eq!(scored.final_report.as_deref(), Some("resoconto di prova"));

    let mut calls = narrator.calls();
    calls.sort_by_key(|(kind, _)| *kind == NarrativeKind::FinalReport);
    assert_eq!(
        calls,
        vec![
            (NarrativeKind::Interpretation, 100),
            (NarrativeKind::FinalReport, 100),
        ]
    );

    let stored = service.get(scored.evaluation_id).expect("stored record");
    assert_eq!(stored.final_report.as_deref(), Some("resoconto di prova"));
}

#[tokio::test]
async fn narrator_accepts_trait_objects() {
    use crate::quiz::narrative::NarrativeGenerator;

    let repository = Arc::new(MemoryRepository::default());
    let narrator: Arc<dyn NarrativeGenerator> = Arc::new(CannedNarrator::default());
    let service = QuizService::new(repository, narrator);

    let scored = service
        .submit(submission(None, AnswerSet::new().with("family_size", "5")))
        .await
        .expect("submission succeeds");
    assert!(scored.interpretation.is_some());
}

#[tokio::test]
async fn repository_failure_surfaces_as_error() {
    let service = QuizService::new(
        Arc::new(UnavailableRepository),
        Arc::new(CannedNarrator::default()),
    );

    let err = service
        .submit(submission(None, ideal_answers()))
        .await
        .expect_err("insert fails");
    assert!(matches!(
        err,
        QuizServiceError::Repository(RepositoryError::Unavailable(_))
    ));
    assert!(service.statistics().is_err());
    assert!(service.recent(10).is_err());
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let (service, _) = build_service();

    let err = service.get(EvaluationId(42)).expect_err("no record");
    assert!(matches!(
        err,
        QuizServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn recent_lists_newest_first_with_limit() {
    let (service, _) = build_service();
    for name in ["prima", "seconda", "terza"] {
        service
            .submit(submission(Some(name), AnswerSet::new()))
            .await
            .expect("submission succeeds");
    }

    let recent = service.recent(2).expect("recent evaluations");
    let names: Vec<_> = recent.iter().map(|summary| summary.name.as_str()).collect();
    assert_eq!(names, vec!["terza", "seconda"]);
    assert_eq!(recent[0].id, EvaluationId(3));
    assert!(recent[0].created_at > recent[1].created_at);
}

#[tokio::test]
async fn statistics_count_levels_and_average() {
    let (service, _) = build_service();

    let statistics = service.statistics().expect("statistics");
    assert_eq!(statistics.total, 0);
    assert_eq!(statistics.avg_score, None);

    service
        .submit(submission(None, ideal_answers()))
        .await
        .expect("ideal");
    service
        .submit(submission(None, worst_answers()))
        .await
        .expect("worst");
    service
        .submit(submission(
            None,
            AnswerSet::new()
                .with("rich_priority", "farlo_vedere")
                .with("representative_phrase", "costruisco_fatica"),
        ))
        .await
        .expect("half");

    let statistics = service.statistics().expect("statistics");
    assert_eq!(statistics.total, 3);
    assert_eq!(statistics.avg_score, Some(50.0));
    assert_eq!(statistics.wife_material_count, 1);
    assert_eq!(statistics.compatible_count, 0);
    assert_eq!(statistics.potential_count, 1);
    assert_eq!(statistics.incompatible_count, 1);
}

#[tokio::test]
async fn scored_payload_flattens_evaluation() {
    let (service, _) = build_service();

    let scored = service
        .submit(submission(None, ideal_answers()))
        .await
        .expect("submission succeeds");
    let value = serde_json::to_value(&scored).expect("serializes");

    assert_eq!(value["evaluation_id"], 1);
    assert_eq!(value["final_score"], 100);
    assert_eq!(value["compatibility_level"], CompatibilityLevel::WifeMaterial.label());
    assert!(value["interpretation"].is_null());
    assert!(value.get("evaluation").is_none());
}
