#![forbid(unsafe_code)]

pub mod adaptiveness;
pub mod aggregator;
pub mod comparison;
pub mod error;
pub mod evaluation;
pub mod report;
pub mod timeline;

pub use pal_core::Clock;

pub use adaptiveness::{AdaptivenessAnalysis, AdaptivenessMetrics, RollingAccuracy};
pub use aggregator::SummaryStatistics;
pub use comparison::{ScatterPoint, VariantComparison};
pub use error::ReportError;
pub use evaluation::{AdaptivenessOptions, EvaluationService};
pub use report::{AdaptivenessReport, ComparisonReport, RecordWindow, write_report};
pub use timeline::InteractionTimeline;
