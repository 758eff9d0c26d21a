pub mod picard;
pub mod samtools_stats;

pub use picard::{AlignmentSummary, MetricsRow, QualityYieldMetrics};
pub use samtools_stats::SamtoolsStats;
