//! End-to-end pipeline scenarios: extraction through reporting.

use std::sync::Arc;

use approx::assert_relative_eq;

use dosim_core::types::{ModelKind, Organ, Sex};
use dosim_core::{LogEvent, ProcessingLog};
use dosim_models::ParameterSet;
use dosim_risk::{
    write_csv, AssessmentParams, Document, PipelineError, PipelineOrchestrator,
};

const MINIMAL_THYROID_DOC: &str = "\
                        HotSpot Version 3.1.2   General Plume
Source Material           : I-131
Physical Stack Height     : 20.0 m

Time After Release        : 24,00 hours
Thyroid.......................[5.00E-02]
";

const MULTI_ORGAN_DOC: &str = "\
Source Material           : Cs-137
Time After Release        : 4,00 hours
Lung..........................[1.00E-03]  Thyroid.......................[2.00E-02]
Red Marrow....................[5.00E-04]

Time After Release        : 96,00 hours
Lung..........................[3.00E-03]  Thyroid.......................[5.00E-02]
Red Marrow....................[1.50E-03]
";

fn orchestrator() -> PipelineOrchestrator {
    PipelineOrchestrator::new(Arc::new(ParameterSet::builtin()))
}

#[test]
fn test_minimal_thyroid_round_trip() {
    // The canonical scenario: 0.05 Sv thyroid, female, exposure 30,
    // assessment 60. Below the threshold, so BEIR VII applies; at the
    // reference ages both age modifiers are unity.
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();

    let report = orch
        .process_document(&Document::new("minimal.txt", MINIMAL_THYROID_DOC), &params, &mut log)
        .unwrap();

    assert_eq!(report.results.len(), 1);
    let result = report.result_for(Organ::Thyroid).unwrap();
    assert_eq!(result.model, ModelKind::BeirVii);
    assert_relative_eq!(result.dose_sv, 0.05);
    assert_relative_eq!(result.err, 1.05 * 0.05 / 1.5, epsilon = 1e-12);
    assert!(result.lar > 0.0);
    assert_relative_eq!(report.total_lar, result.lar);

    assert!(log
        .entries()
        .iter()
        .any(|e| matches!(e.event, LogEvent::ModelSelected { .. })));
}

#[test]
fn test_committed_dose_uses_latest_marker() {
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();

    let report = orch
        .process_document(&Document::new("multi.txt", MULTI_ORGAN_DOC), &params, &mut log)
        .unwrap();

    // Three organs, each assessed at the 96-hour cumulative dose.
    assert_eq!(report.results.len(), 3);
    assert_relative_eq!(report.result_for(Organ::Lung).unwrap().dose_sv, 3.0e-3);
    assert_relative_eq!(report.result_for(Organ::Thyroid).unwrap().dose_sv, 5.0e-2);
    assert_relative_eq!(
        report.result_for(Organ::RedMarrow).unwrap().dose_sv,
        1.5e-3
    );
}

#[test]
fn test_batch_isolates_malformed_document() {
    // One document malformed beyond recovery, one valid: the batch yields one
    // failure and one report, never a batch-wide abort.
    let mut orch = orchestrator();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();

    let documents = vec![
        Document::new("broken.txt", "%%%% corrupted output %%%%\nno doses at all\n"),
        Document::new("good.txt", MINIMAL_THYROID_DOC),
    ];
    let batch = orch.process_batch(&documents, &params);

    assert_eq!(batch.outcomes.len(), 2);
    assert_eq!(batch.reports().count(), 1);
    let failures: Vec<_> = batch.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "broken.txt");
    assert!(matches!(failures[0].1, PipelineError::Extraction(_)));

    assert!(batch
        .log
        .document_entries("broken.txt")
        .any(|e| matches!(e.event, LogEvent::DocumentFailed { .. })));
}

#[test]
fn test_parallel_batch_matches_sequential() {
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();
    let documents = vec![
        Document::new("a.txt", MINIMAL_THYROID_DOC),
        Document::new("b.txt", MULTI_ORGAN_DOC),
        Document::new("c.txt", "garbage\n"),
    ];

    let mut sequential = orchestrator();
    let seq = sequential.process_batch(&documents, &params);
    let mut parallel = orchestrator();
    let par = parallel.process_batch_parallel(&documents, &params);

    assert_eq!(seq.outcomes.len(), par.outcomes.len());
    for (s, p) in seq.outcomes.iter().zip(par.outcomes.iter()) {
        assert_eq!(s.document, p.document);
        match (&s.outcome, &p.outcome) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => panic!("sequential and parallel outcomes diverge for {}", s.document),
        }
    }
}

#[test]
fn test_reassessment_is_idempotent_and_skips_parsing() {
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();

    let original = orch
        .process_document(&Document::new("doc.txt", MULTI_ORGAN_DOC), &params, &mut log)
        .unwrap();

    let first = orch.reassess("doc.txt", &params, &mut log).unwrap();
    let second = orch.reassess("doc.txt", &params, &mut log).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, original);
}

#[test]
fn test_reassessment_under_different_ages() {
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();
    orch.process_document(&Document::new("doc.txt", MULTI_ORGAN_DOC), &params, &mut log)
        .unwrap();

    let younger = AssessmentParams::new(10.0, 60.0, Sex::Female).unwrap();
    let reassessed = orch.reassess("doc.txt", &younger, &mut log).unwrap();

    assert_eq!(reassessed.exposure_age, 10.0);
    // Childhood exposure raises the thyroid risk via the exposure-age term.
    let adult_err = orch
        .reassess("doc.txt", &params, &mut log)
        .unwrap()
        .result_for(Organ::Thyroid)
        .unwrap()
        .err;
    let child_err = reassessed.result_for(Organ::Thyroid).unwrap().err;
    assert!(child_err > adult_err);
}

#[test]
fn test_forced_model_override() {
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female)
        .unwrap()
        .with_model_override(ModelKind::BeirV);

    let report = orch
        .process_document(&Document::new("doc.txt", MINIMAL_THYROID_DOC), &params, &mut log)
        .unwrap();

    // 0.05 Sv would select BEIR VII; the override pins BEIR V.
    let result = report.result_for(Organ::Thyroid).unwrap();
    assert_eq!(result.model, ModelKind::BeirV);
    assert_relative_eq!(result.err, 0.5 * 0.05, epsilon = 1e-12);
}

#[test]
fn test_csv_rendering_of_batch() {
    let mut orch = orchestrator();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();
    let batch = orch.process_batch(
        &[
            Document::new("a.txt", MINIMAL_THYROID_DOC),
            Document::new("b.txt", MULTI_ORGAN_DOC),
        ],
        &params,
    );

    let reports: Vec<_> = batch.reports().cloned().collect();
    let mut buffer = Vec::new();
    write_csv(&reports, &mut buffer).unwrap();
    let rendered = String::from_utf8(buffer).unwrap();

    // Header, one row per (document, organ), one TOTAL per document.
    assert!(rendered.starts_with("document,organ,"));
    assert_eq!(rendered.matches("TOTAL").count(), 2);
    assert!(rendered.contains("a.txt,Thyroid,thyroid,F,BEIR VII,"));
    assert!(rendered.contains("b.txt,Red Marrow,leukemia,F,"));
}

#[test]
fn test_organ_omitted_when_all_cells_invalid() {
    let text = "\
Time After Release        : 4 hours
Thyroid.......................[oops]
Lung..........................[1.00E-03]
";
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();

    let report = orch
        .process_document(&Document::new("doc.txt", text), &params, &mut log)
        .unwrap();

    assert!(report.result_for(Organ::Thyroid).is_none());
    assert!(report.result_for(Organ::Lung).is_some());
    assert!(log
        .entries()
        .iter()
        .any(|e| matches!(&e.event, LogEvent::OrganOmitted { label } if label == "Thyroid")));
}

#[test]
fn test_conflicting_duplicates_fail_document() {
    let text = "\
Time After Release        : 4 hours
Thyroid.......................[1.00E-02]
Time After Release        : 4 hours
Thyroid.......................[2.00E-02]
";
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();

    let err = orch
        .process_document(&Document::new("doc.txt", text), &params, &mut log)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Reshape(_)));
}

#[test]
fn test_identical_duplicates_collapse_and_proceed() {
    let text = "\
Time After Release        : 4 hours
Thyroid.......................[1.00E-02]
Time After Release        : 4 hours
Thyroid.......................[1.00E-02]
";
    let mut orch = orchestrator();
    let mut log = ProcessingLog::new();
    let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();

    let report = orch
        .process_document(&Document::new("doc.txt", text), &params, &mut log)
        .unwrap();
    assert_eq!(report.results.len(), 1);
    assert!(log
        .entries()
        .iter()
        .any(|e| matches!(e.event, LogEvent::DuplicateCollapsed { .. })));
}
