use crate::error::{QcError, QcResult};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeqFormat {
    #[serde(rename = "BAM")]
    Bam,
    #[serde(rename = "CRAM")]
    Cram,
}

impl SeqFormat {
    /// Detects the alignment format from the file name's extension.
    pub fn from_path(path: &Path) -> QcResult<Self> {
        let name = file_name(path);
        if name.ends_with(".bam") {
            Ok(SeqFormat::Bam)
        } else if name.ends_with(".cram") {
            Ok(SeqFormat::Cram)
        } else {
            Err(QcError::UnknownFormat(path.to_path_buf()))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeqFormat::Bam => "BAM",
            SeqFormat::Cram => "CRAM",
        }
    }
}

/// Collectors run by CollectMultipleMetrics. `null` clears Picard's defaults first.
pub const MULTIPLE_METRICS_PROGRAMS: &[&str] = &[
    "null",
    "CollectBaseDistributionByCycle",
    "CollectAlignmentSummaryMetrics",
    "CollectInsertSizeMetrics",
    "MeanQualityByCycle",
    "QualityScoreDistribution",
    "CollectSequencingArtifactMetrics",
    "CollectQualityYieldMetrics",
];

pub const METRIC_ACCUMULATION_LEVELS: &[&str] =
    &["null", "ALL_READS", "SAMPLE", "LIBRARY", "READ_GROUP"];

/// Base name of a path as an owned string; the whole path if it has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
