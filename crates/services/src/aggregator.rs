//! Per-variant summary statistics.
//!
//! Aggregation is a fold over the record sequence: the result depends only on
//! which records belong to which arm, so two runs over the same snapshot give
//! identical values.

use std::collections::BTreeMap;

use pal_core::model::{SessionRecord, Variant};
use serde::Serialize;

/// Scalar summary of one arm of the experiment.
///
/// Field names on the wire follow the record log's camel-cased metric names so
/// downstream chart scripts can read them unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub runs: usize,
    pub mean_accuracy: f64,
    #[serde(rename = "mean_finalScore")]
    pub mean_final_score: f64,
    #[serde(rename = "mean_bestStreak")]
    pub mean_best_streak: f64,
    #[serde(rename = "mean_avgResponseTimeMs")]
    pub mean_avg_response_time_ms: f64,
}

impl SummaryStatistics {
    #[must_use]
    pub fn from_records(records: &[&SessionRecord]) -> Self {
        Self {
            runs: records.len(),
            mean_accuracy: mean_by(records, |r| r.overall_accuracy),
            mean_final_score: mean_by(records, |r| r.final_score),
            mean_best_streak: mean_by(records, |r| f64::from(r.best_streak)),
            mean_avg_response_time_ms: mean_by(records, |r| r.avg_response_time_ms),
        }
    }
}

/// Arithmetic mean; `0.0` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0.0` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub(crate) fn mean_by(records: &[&SessionRecord], field: impl Fn(&SessionRecord) -> f64) -> f64 {
    let values: Vec<f64> = records.iter().map(|r| field(r)).collect();
    mean(&values)
}

/// Groups records by their raw variant label, preserving file order inside
/// each group.
#[must_use]
pub fn partition_by_variant(records: &[SessionRecord]) -> BTreeMap<Variant, Vec<&SessionRecord>> {
    let mut groups: BTreeMap<Variant, Vec<&SessionRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.variant.clone()).or_default().push(record);
    }
    groups
}

/// Computes `SummaryStatistics` for every variant observed in `records`.
#[must_use]
pub fn summarize(records: &[SessionRecord]) -> BTreeMap<Variant, SummaryStatistics> {
    partition_by_variant(records)
        .into_iter()
        .map(|(variant, group)| (variant, SummaryStatistics::from_records(&group)))
        .collect()
}
