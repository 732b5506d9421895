//! Difficulty-selection behavior of the adaptive arm.
//!
//! Works on an `InteractionTimeline` and derives a rolling per-bucket accuracy
//! estimate plus two scalar metrics: how often the chosen difficulty changes,
//! and when hard-question accuracy first looks reliably good.

use std::collections::VecDeque;

use pal_core::model::Difficulty;
use serde::{Serialize, Serializer};

use crate::timeline::InteractionTimeline;

/// Most recent same-bucket answers considered by the rolling mean.
pub const ROLLING_WINDOW: usize = 5;

/// Value reported for a bucket that has no observations yet.
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Rolling hard-bucket accuracy that counts as stabilized (strictly above).
pub const STABILIZATION_THRESHOLD: f64 = 0.6;

//
// ─── ROLLING ACCURACY ─────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct BucketWindow {
    recent: VecDeque<bool>,
}

impl BucketWindow {
    fn observe(&mut self, correct: bool) {
        if self.recent.len() == ROLLING_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(correct);
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean(&self) -> f64 {
        if self.recent.is_empty() {
            return NEUTRAL_PRIOR;
        }
        let hits = self.recent.iter().filter(|&&c| c).count();
        hits as f64 / self.recent.len() as f64
    }
}

/// Rolling accuracy per bucket, one value per timeline position.
///
/// Position `i` of a bucket's series is the mean correctness of that bucket's
/// last (up to) `ROLLING_WINDOW` events at or before `i`, or `NEUTRAL_PRIOR`
/// before the bucket's first event. All three series have the timeline's
/// length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollingAccuracy {
    series: [Vec<f64>; 3],
}

impl RollingAccuracy {
    #[must_use]
    pub fn compute(timeline: &InteractionTimeline) -> Self {
        let mut windows: [BucketWindow; 3] = Default::default();
        let mut series: [Vec<f64>; 3] = std::array::from_fn(|_| Vec::with_capacity(timeline.len()));

        for event in timeline.events() {
            if let Some(d) = event.difficulty {
                windows[d.index()].observe(event.correct);
            }
            for (out, window) in series.iter_mut().zip(&windows) {
                out.push(window.mean());
            }
        }

        Self { series }
    }

    #[must_use]
    pub fn bucket(&self, difficulty: Difficulty) -> &[f64] {
        &self.series[difficulty.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series[0].is_empty()
    }
}

//
// ─── METRICS ──────────────────────────────────────────────────────────────────
//

/// Fraction of consecutive pairs whose difficulty differs.
///
/// A pair counts as a change unless both positions carry the same known
/// bucket, so any transition into, out of, or between unknown difficulties
/// is a change. Returns `0.0` for fewer than two events.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn difficulty_switch_rate(chosen: &[Option<Difficulty>]) -> f64 {
    if chosen.len() < 2 {
        return 0.0;
    }
    let switches = chosen
        .windows(2)
        .filter(|pair| !matches!(pair, [Some(a), Some(b)] if a == b))
        .count();
    switches as f64 / (chosen.len() - 1) as f64
}

/// First position where the rolling hard-bucket accuracy exceeds
/// `STABILIZATION_THRESHOLD`.
///
/// A first-crossing detector: no debouncing. The prior never crosses on its
/// own since `NEUTRAL_PRIOR` is below the threshold.
#[must_use]
pub fn stabilization_index(hard: &[f64]) -> Option<usize> {
    hard.iter().position(|&mean| mean > STABILIZATION_THRESHOLD)
}

/// Scalar behavioral metrics for one timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AdaptivenessMetrics {
    pub n_interactions: usize,
    #[serde(serialize_with = "round_3")]
    pub difficulty_switch_rate: f64,
    /// Emitted as `-1` when the threshold is never reached.
    #[serde(serialize_with = "index_or_sentinel")]
    pub stabilization_index: Option<usize>,
}

fn round_3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}

fn index_or_sentinel<S: Serializer>(
    value: &Option<usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value.and_then(|i| i64::try_from(i).ok()) {
        Some(i) => serializer.serialize_i64(i),
        None => serializer.serialize_i64(-1),
    }
}

/// Rolling series plus metrics, computed together from one timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptivenessAnalysis {
    pub rolling: RollingAccuracy,
    pub metrics: AdaptivenessMetrics,
}

impl AdaptivenessAnalysis {
    /// Analyzes `timeline`. An empty timeline yields empty series, zero counts
    /// and no stabilization index.
    #[must_use]
    pub fn analyze(timeline: &InteractionTimeline) -> Self {
        let rolling = RollingAccuracy::compute(timeline);
        let metrics = AdaptivenessMetrics {
            n_interactions: timeline.len(),
            difficulty_switch_rate: difficulty_switch_rate(&timeline.chosen_difficulty),
            stabilization_index: stabilization_index(rolling.bucket(Difficulty::Hard)),
        };
        tracing::debug!(
            interactions = metrics.n_interactions,
            switch_rate = metrics.difficulty_switch_rate,
            stabilization_index = ?metrics.stabilization_index,
            "analyzed interaction timeline"
        );
        Self { rolling, metrics }
    }
}
