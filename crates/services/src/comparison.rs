//! Figures for the baseline-vs-enhanced dashboard.
//!
//! Extends `SummaryStatistics` with the spread and per-difficulty numbers a
//! chart renderer needs, so the renderer never touches raw records.

use std::collections::BTreeMap;

use pal_core::model::{Difficulty, SessionRecord, Variant};
use serde::Serialize;

use crate::aggregator::{SummaryStatistics, mean, partition_by_variant, std_dev};

/// One session plotted as (response time, accuracy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub avg_response_time_secs: f64,
    pub overall_accuracy: f64,
}

/// Everything the comparison dashboard shows for one arm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantComparison {
    pub summary: SummaryStatistics,
    pub accuracy_std_dev: f64,
    pub mean_response_time_secs: f64,
    pub response_time_secs_std_dev: f64,
    /// Mean over sessions that logged a numeric value for the bucket; `0.0`
    /// when none did. Always has all three buckets.
    pub accuracy_by_difficulty: BTreeMap<Difficulty, f64>,
    pub scatter: Vec<ScatterPoint>,
}

impl VariantComparison {
    #[must_use]
    pub fn from_records(records: &[&SessionRecord]) -> Self {
        let accuracies: Vec<f64> = records.iter().map(|r| r.overall_accuracy).collect();
        let response_secs: Vec<f64> = records
            .iter()
            .map(|r| r.avg_response_time_ms / 1000.0)
            .collect();

        let accuracy_by_difficulty = Difficulty::ALL
            .into_iter()
            .map(|d| {
                let logged: Vec<f64> = records
                    .iter()
                    .filter_map(|r| r.accuracy_by_difficulty.get(&d).copied())
                    .collect();
                (d, mean(&logged))
            })
            .collect();

        let scatter = response_secs
            .iter()
            .zip(&accuracies)
            .map(|(&secs, &acc)| ScatterPoint {
                avg_response_time_secs: secs,
                overall_accuracy: acc,
            })
            .collect();

        Self {
            summary: SummaryStatistics::from_records(records),
            accuracy_std_dev: std_dev(&accuracies),
            mean_response_time_secs: mean(&response_secs),
            response_time_secs_std_dev: std_dev(&response_secs),
            accuracy_by_difficulty,
            scatter,
        }
    }
}

/// Builds a `VariantComparison` for every variant in `records`.
#[must_use]
pub fn compare_variants(records: &[SessionRecord]) -> BTreeMap<Variant, VariantComparison> {
    partition_by_variant(records)
        .into_iter()
        .map(|(variant, group)| (variant, VariantComparison::from_records(&group)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn session(variant: Variant, accuracy: f64, rt_ms: f64) -> SessionRecord {
        let mut record = SessionRecord::new(variant).with_overall_accuracy(accuracy);
        record.avg_response_time_ms = rt_ms;
        record
    }

    #[test]
    fn per_difficulty_mean_ignores_sessions_without_the_bucket() {
        let mut a = session(Variant::Enhanced, 0.5, 1000.0);
        a.accuracy_by_difficulty.insert(Difficulty::Hard, 0.4);
        let mut b = session(Variant::Enhanced, 0.7, 3000.0);
        b.accuracy_by_difficulty.insert(Difficulty::Hard, 0.8);
        b.accuracy_by_difficulty.insert(Difficulty::Easy, 1.0);
        let c = session(Variant::Enhanced, 0.9, 2000.0);

        let figures = compare_variants(&[a, b, c]);
        let enhanced = &figures[&Variant::Enhanced];

        assert!(approx(enhanced.accuracy_by_difficulty[&Difficulty::Hard], 0.6));
        assert!(approx(enhanced.accuracy_by_difficulty[&Difficulty::Easy], 1.0));
        assert_eq!(enhanced.accuracy_by_difficulty[&Difficulty::Medium], 0.0);
        assert!(approx(enhanced.mean_response_time_secs, 2.0));
        assert_eq!(enhanced.scatter.len(), 3);
        assert!(approx(enhanced.scatter[1].avg_response_time_secs, 3.0));
        assert!(approx(enhanced.scatter[1].overall_accuracy, 0.7));
    }

    #[test]
    fn single_session_has_zero_spread() {
        let figures = compare_variants(&[session(Variant::Baseline, 0.6, 4000.0)]);
        let baseline = &figures[&Variant::Baseline];

        assert_eq!(baseline.accuracy_std_dev, 0.0);
        assert_eq!(baseline.response_time_secs_std_dev, 0.0);
        assert_eq!(baseline.summary.runs, 1);
    }

    #[test]
    fn difficulty_keys_serialize_as_labels() {
        let figures = compare_variants(&[session(Variant::Baseline, 0.6, 4000.0)]);
        let json = serde_json::to_value(&figures).unwrap();

        assert!(json["baseline"]["accuracy_by_difficulty"]["Hard"].is_number());
        assert_eq!(json["baseline"]["summary"]["runs"], 1);
    }
}
