//! Report value types handed to a chart renderer or JSON printer.
//!
//! The core's obligation stops at these values; `write_report` only dumps
//! them as pretty JSON at the requested path.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use pal_core::model::{Difficulty, SessionRecord, Variant};
use serde::Serialize;
use storage::RecordSnapshot;

use crate::adaptiveness::{AdaptivenessAnalysis, AdaptivenessMetrics};
use crate::aggregator::SummaryStatistics;
use crate::comparison::{VariantComparison, compare_variants};
use crate::error::ReportError;
use crate::timeline::InteractionTimeline;

/// Earliest and latest session timestamps seen in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordWindow {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl RecordWindow {
    /// `None` when no record carries a timestamp.
    #[must_use]
    pub fn from_records(records: &[SessionRecord]) -> Option<Self> {
        let mut stamps = records.iter().filter_map(|r| r.timestamp);
        let first = stamps.next()?;
        let (earliest, latest) = stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some(Self { earliest, latest })
    }
}

//
// ─── COMPARISON ───────────────────────────────────────────────────────────────
//

/// Baseline-vs-enhanced dashboard input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub records: usize,
    pub discarded_lines: usize,
    pub window: Option<RecordWindow>,
    pub variants: BTreeMap<Variant, VariantComparison>,
}

impl ComparisonReport {
    #[must_use]
    pub fn new(generated_at: DateTime<Utc>, snapshot: &RecordSnapshot) -> Self {
        Self {
            generated_at,
            records: snapshot.len(),
            discarded_lines: snapshot.discarded,
            window: RecordWindow::from_records(&snapshot.records),
            variants: compare_variants(&snapshot.records),
        }
    }

    /// The variant → summary mapping printed on the console.
    #[must_use]
    pub fn summary(&self) -> BTreeMap<Variant, SummaryStatistics> {
        self.variants
            .iter()
            .map(|(variant, figures)| (variant.clone(), figures.summary))
            .collect()
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.records > 0
    }
}

//
// ─── ADAPTIVENESS ─────────────────────────────────────────────────────────────
//

/// Rolling accuracy series keyed by bucket index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentMeanSeries {
    #[serde(rename = "recent_mean_d0")]
    pub easy: Vec<f64>,
    #[serde(rename = "recent_mean_d1")]
    pub medium: Vec<f64>,
    #[serde(rename = "recent_mean_d2")]
    pub hard: Vec<f64>,
}

/// Difficulty trajectory and rolling accuracies for the adaptive arm.
///
/// `chosen_difficulty` holds bucket indices, `null` for unknown difficulty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdaptivenessReport {
    pub generated_at: DateTime<Utc>,
    pub variant: Variant,
    pub sessions: usize,
    pub chosen_difficulty: Vec<Option<usize>>,
    pub correctness: Vec<bool>,
    pub recent_mean: RecentMeanSeries,
    pub metrics: AdaptivenessMetrics,
}

impl AdaptivenessReport {
    #[must_use]
    pub fn new(
        generated_at: DateTime<Utc>,
        variant: Variant,
        timeline: &InteractionTimeline,
        analysis: &AdaptivenessAnalysis,
    ) -> Self {
        let rolling = &analysis.rolling;
        Self {
            generated_at,
            variant,
            sessions: timeline.sessions,
            chosen_difficulty: timeline.bucket_indices(),
            correctness: timeline.correctness.clone(),
            recent_mean: RecentMeanSeries {
                easy: rolling.bucket(Difficulty::Easy).to_vec(),
                medium: rolling.bucket(Difficulty::Medium).to_vec(),
                hard: rolling.bucket(Difficulty::Hard).to_vec(),
            },
            metrics: analysis.metrics,
        }
    }

    /// False when the arm has no per-question events; the figure is "no data".
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.metrics.n_interactions > 0
    }
}

//
// ─── OUTPUT ───────────────────────────────────────────────────────────────────
//

/// Writes `report` as pretty JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns `ReportError::Serialize` if the value cannot be encoded and
/// `ReportError::Io` if the directory or file cannot be written.
pub fn write_report<T: Serialize>(report: &T, path: &Path) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = serde_json::to_vec_pretty(report)?;
    bytes.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)?;

    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pal_core::model::AnsweredQuestion;
    use pal_core::time::fixed_now;

    #[test]
    fn window_spans_min_and_max_timestamps() {
        let now = fixed_now();
        let mut a = SessionRecord::new(Variant::Baseline);
        a.timestamp = Some(now);
        let mut b = SessionRecord::new(Variant::Enhanced);
        b.timestamp = Some(now - Duration::days(2));
        let c = SessionRecord::new(Variant::Enhanced);

        let window = RecordWindow::from_records(&[a, b, c]).unwrap();

        assert_eq!(window.earliest, now - Duration::days(2));
        assert_eq!(window.latest, now);
        assert!(RecordWindow::from_records(&[SessionRecord::new(Variant::Unknown)]).is_none());
    }

    #[test]
    fn adaptiveness_report_emits_null_for_unknown_difficulty() {
        let timeline = InteractionTimeline::from_events([
            AnsweredQuestion::new(Some(Difficulty::Hard), true),
            AnsweredQuestion::new(None, false),
        ]);
        let analysis = AdaptivenessAnalysis::analyze(&timeline);

        let report = AdaptivenessReport::new(fixed_now(), Variant::Enhanced, &timeline, &analysis);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["variant"], "enhanced");
        assert_eq!(json["chosen_difficulty"], serde_json::json!([2, null]));
        assert_eq!(json["recent_mean"]["recent_mean_d2"], serde_json::json!([1.0, 1.0]));
        assert_eq!(json["metrics"]["stabilization_index"], 0);
        assert!(report.has_data());
    }

    #[test]
    fn write_report_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/results/report.json");
        let report = ComparisonReport::new(fixed_now(), &RecordSnapshot::default());

        write_report(&report, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["records"], 0);
        assert!(written["window"].is_null());
    }

    #[test]
    fn write_report_surfaces_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let report = ComparisonReport::new(fixed_now(), &RecordSnapshot::default());

        let err = write_report(&report, &blocker.join("report.json")).unwrap_err();

        assert!(matches!(err, ReportError::Io { .. }));
    }
}
