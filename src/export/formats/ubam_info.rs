use crate::metrics::QualityYieldMetrics;
use serde::Serialize;

/// Contents of `<ubam>.ubam_info.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UbamInfo {
    pub read_group_id: String,
    pub name: String,
    pub size: u64,
    pub quality_yield_metrics: QualityYieldMetrics,
}
