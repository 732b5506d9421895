use std::sync::Arc;

use chrono::{DateTime, Utc};
use pal_core::model::Variant;
use storage::{InMemoryRecordSource, RecordSnapshot, RecordSource, Storage};

use crate::Clock;
use crate::adaptiveness::AdaptivenessAnalysis;
use crate::report::{AdaptivenessReport, ComparisonReport};
use crate::timeline::InteractionTimeline;

/// Which arm to analyze and how much of its timeline to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptivenessOptions {
    pub variant: Variant,
    /// Keep only the first N interactions; `None` keeps all.
    pub limit: Option<usize>,
}

impl Default for AdaptivenessOptions {
    fn default() -> Self {
        Self {
            variant: Variant::Enhanced,
            limit: None,
        }
    }
}

impl AdaptivenessOptions {
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// A limit of `0` means "no limit".
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }
}

/// Runs the evaluation pipeline against one snapshot of the record store.
///
/// This service owns:
/// - the time source (`Clock`) used to stamp reports
/// - record store access
///
/// Every call re-reads the store; nothing derived is cached between calls.
#[derive(Clone)]
pub struct EvaluationService {
    clock: Clock,
    records: Arc<dyn RecordSource>,
}

impl EvaluationService {
    #[must_use]
    pub fn new(clock: Clock, records: Arc<dyn RecordSource>) -> Self {
        Self { clock, records }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(clock, Arc::clone(&storage.records))
    }

    #[must_use]
    pub fn in_memory(clock: Clock, source: InMemoryRecordSource) -> Self {
        Self::new(clock, Arc::new(source))
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Reads the store, treating an unavailable store as empty.
    #[must_use]
    pub fn load_snapshot(&self) -> RecordSnapshot {
        match self.records.load() {
            Ok(snapshot) => {
                if snapshot.discarded > 0 {
                    tracing::info!(
                        discarded = snapshot.discarded,
                        "skipped malformed record lines"
                    );
                }
                snapshot
            }
            Err(err) => {
                tracing::warn!(error = %err, "record store unavailable; treating as empty");
                RecordSnapshot::default()
            }
        }
    }

    /// Per-variant summary and dashboard figures.
    #[must_use]
    pub fn compare(&self) -> ComparisonReport {
        let snapshot = self.load_snapshot();
        let report = ComparisonReport::new(self.clock.now(), &snapshot);
        tracing::debug!(
            records = report.records,
            variants = report.variants.len(),
            "built comparison report"
        );
        report
    }

    /// Timeline and behavioral metrics for one arm.
    #[must_use]
    pub fn adaptiveness(&self, options: &AdaptivenessOptions) -> AdaptivenessReport {
        let snapshot = self.load_snapshot();
        let mut timeline = InteractionTimeline::build(&snapshot.records, &options.variant);
        if let Some(limit) = options.limit {
            timeline.truncate(limit);
        }
        tracing::debug!(
            variant = %options.variant,
            sessions = timeline.sessions,
            interactions = timeline.len(),
            "built interaction timeline"
        );

        let analysis = AdaptivenessAnalysis::analyze(&timeline);
        AdaptivenessReport::new(
            self.clock.now(),
            options.variant.clone(),
            &timeline,
            &analysis,
        )
    }
}
