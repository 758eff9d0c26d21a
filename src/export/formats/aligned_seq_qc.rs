use crate::metrics::{AlignmentSummary, SamtoolsStats};
use crate::types::SeqFormat;
use serde::Serialize;

/// Contents of `<seq>.aligned_seq_qc.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeqQc {
    pub name: String,
    pub size: u64,
    pub format: SeqFormat,
    /// First line of `samtools --version`.
    pub tool_version: String,
    pub samtools_stats: SamtoolsStats,
    pub alignment_summary: AlignmentSummary,
}
