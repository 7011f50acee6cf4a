//! Batch pipeline orchestration.
//!
//! Sequences Extractor → Transposer → RiskCalculator over one or more
//! documents. Documents are independent: one document's failure is recorded
//! in its outcome and the processing log, and the rest of the batch proceeds.
//! The orchestrator keeps the per-session dose-table cache that makes
//! reassessment under different ages possible without re-parsing.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rayon::prelude::*;

use adapter_hotspot::{ExtractionError, HotspotExtractor};
use dosim_core::types::Organ;
use dosim_core::{DoseTable, LogEvent, ProcessingLog};
use dosim_models::ParameterSet;

use crate::calculator::{AssessmentParams, RiskCalculator};
use crate::error::PipelineError;
use crate::report::RiskReport;

/// One simulation document handed to the orchestrator.
///
/// Content is already-loaded text; file I/O belongs to the calling layer.
/// A document may carry its own assessment parameters, overriding the shared
/// pair for that document only.
#[derive(Clone, Debug)]
pub struct Document {
    /// Caller-chosen identifier (typically the upload or file name).
    pub id: String,
    /// Raw report text.
    pub content: String,
    /// Optional per-document parameter override.
    pub params: Option<AssessmentParams>,
}

impl Document {
    /// Creates a document using the batch's shared parameters.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            params: None,
        }
    }

    /// Attaches a per-document parameter override.
    pub fn with_params(mut self, params: AssessmentParams) -> Self {
        self.params = Some(params);
        self
    }
}

/// The outcome of one document: a report, or a recorded failure.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Identifier of the document.
    pub document: String,
    /// Report on success, failure reason otherwise.
    pub outcome: Result<RiskReport, PipelineError>,
}

/// The result of a batch run: per-document outcomes plus the consolidated log.
#[derive(Debug)]
pub struct BatchResult {
    /// One outcome per input document, in input order.
    pub outcomes: Vec<DocumentOutcome>,
    /// The consolidated processing log of the run.
    pub log: ProcessingLog,
}

impl BatchResult {
    /// Iterates over the successful reports.
    pub fn reports(&self) -> impl Iterator<Item = &RiskReport> {
        self.outcomes
            .iter()
            .filter_map(|o| o.outcome.as_ref().ok())
    }

    /// Iterates over the failed documents with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PipelineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.outcome.as_ref().err().map(|e| (o.document.as_str(), e)))
    }
}

/// Sequences the pipeline stages over documents and caches dose tables.
///
/// All state is explicit and scoped to the instance: the shared read-only
/// parameter set and the per-session table cache. Nothing ambient.
pub struct PipelineOrchestrator {
    extractor: HotspotExtractor,
    calculator: RiskCalculator,
    cache: HashMap<String, Arc<DoseTable>>,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator over a loaded parameter set.
    pub fn new(params: Arc<ParameterSet>) -> Self {
        Self {
            extractor: HotspotExtractor::new(),
            calculator: RiskCalculator::new(params),
            cache: HashMap::new(),
        }
    }

    /// Processes one document end to end, caching its dose table.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Extraction`] when the document holds no usable dose
    /// data, [`PipelineError::Reshape`] when its observations are ambiguous.
    /// Either way the failure is also recorded in `log`.
    pub fn process_document(
        &mut self,
        document: &Document,
        shared: &AssessmentParams,
        log: &mut ProcessingLog,
    ) -> Result<RiskReport, PipelineError> {
        let (outcome, table) = self.run_pipeline(document, shared, log);
        if let Some(table) = table {
            self.cache.insert(document.id.clone(), table);
        }
        outcome
    }

    /// Processes a batch sequentially.
    pub fn process_batch(
        &mut self,
        documents: &[Document],
        shared: &AssessmentParams,
    ) -> BatchResult {
        let mut log = ProcessingLog::new();
        let mut outcomes = Vec::with_capacity(documents.len());

        for document in documents {
            let outcome = self.process_document(document, shared, &mut log);
            outcomes.push(DocumentOutcome {
                document: document.id.clone(),
                outcome,
            });
        }

        BatchResult { outcomes, log }
    }

    /// Processes a batch with one Rayon task per document.
    ///
    /// Documents are embarrassingly parallel: the only shared state is the
    /// read-only parameter set. Outcomes and log entries are merged back in
    /// input order, so the result is deterministic regardless of completion
    /// order.
    pub fn process_batch_parallel(
        &mut self,
        documents: &[Document],
        shared: &AssessmentParams,
    ) -> BatchResult {
        let per_document: Vec<_> = documents
            .par_iter()
            .map(|document| {
                let mut log = ProcessingLog::new();
                let (outcome, table) = self.run_pipeline(document, shared, &mut log);
                (document.id.clone(), outcome, table, log)
            })
            .collect();

        let mut log = ProcessingLog::new();
        let mut outcomes = Vec::with_capacity(per_document.len());
        for (id, outcome, table, document_log) in per_document {
            log.merge(document_log);
            if let Some(table) = table {
                self.cache.insert(id.clone(), table);
            }
            outcomes.push(DocumentOutcome {
                document: id,
                outcome,
            });
        }

        BatchResult { outcomes, log }
    }

    /// Recomputes a report from a cached dose table under new parameters.
    ///
    /// No re-parsing happens; reassessing with identical parameters yields an
    /// identical report.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NotCached`] when the document was never processed in
    /// this session.
    pub fn reassess(
        &self,
        document_id: &str,
        params: &AssessmentParams,
        log: &mut ProcessingLog,
    ) -> Result<RiskReport, PipelineError> {
        let table = self
            .cache
            .get(document_id)
            .ok_or_else(|| PipelineError::NotCached {
                document: document_id.to_string(),
            })?;

        let mut notes = Vec::new();
        let report = self
            .calculator
            .assess_table(document_id, table, params, &mut notes);
        log.extend_for(document_id, notes);
        Ok(report)
    }

    /// The cached dose table for a document, if any.
    pub fn cached_table(&self, document_id: &str) -> Option<&Arc<DoseTable>> {
        self.cache.get(document_id)
    }

    /// Drops all cached dose tables.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn run_pipeline(
        &self,
        document: &Document,
        shared: &AssessmentParams,
        log: &mut ProcessingLog,
    ) -> (Result<RiskReport, PipelineError>, Option<Arc<DoseTable>>) {
        let params = document.params.unwrap_or(*shared);
        tracing::info!(document = %document.id, "processing simulation document");

        let extract = match self.extractor.extract_document(&document.content) {
            Ok(extract) => extract,
            Err(err) => {
                let ExtractionError::NoUsableData { diagnostics, .. } = &err;
                log.extend_for(&document.id, diagnostics.iter().cloned());
                log.push(
                    &document.id,
                    LogEvent::DocumentFailed {
                        reason: err.to_string(),
                    },
                );
                tracing::warn!(document = %document.id, error = %err, "document failed");
                return (Err(err.into()), None);
            }
        };

        if extract.skipped_lines > 0 {
            log.push(
                &document.id,
                LogEvent::LinesSkipped {
                    count: extract.skipped_lines,
                },
            );
        }

        // Labels whose cells were all dropped may leave a declared organ with
        // no data; detect those after the table is built.
        let dropped_labels: BTreeSet<String> = extract
            .diagnostics
            .iter()
            .filter_map(|event| match event {
                LogEvent::InvalidCell { label, .. } if label != "time marker" => {
                    Some(label.clone())
                }
                _ => None,
            })
            .collect();
        log.extend_for(&document.id, extract.diagnostics);

        let (table, collapsed) = match DoseTable::from_observations(extract.observations) {
            Ok(built) => built,
            Err(err) => {
                log.push(
                    &document.id,
                    LogEvent::DocumentFailed {
                        reason: err.to_string(),
                    },
                );
                tracing::warn!(document = %document.id, error = %err, "document failed");
                return (Err(err.into()), None);
            }
        };

        for duplicate in collapsed {
            log.push(
                &document.id,
                LogEvent::DuplicateCollapsed {
                    organ: duplicate.organ,
                    time_h: duplicate.time_h,
                },
            );
        }
        for label in dropped_labels {
            let omitted = Organ::from_label(&label)
                .map(|organ| !table.contains(organ))
                .unwrap_or(false);
            if omitted {
                log.push(&document.id, LogEvent::OrganOmitted { label });
            }
        }

        let mut notes = Vec::new();
        let report = self
            .calculator
            .assess_table(&document.id, &table, &params, &mut notes);
        log.extend_for(&document.id, notes);

        tracing::info!(
            document = %document.id,
            organs = report.results.len(),
            total_lar = report.total_lar,
            "document processed"
        );
        (Ok(report), Some(Arc::new(table)))
    }
}
