use crate::error::{QcError, QcResult};
use serde::Serialize;
use std::path::Path;

/// One data row of a Picard metrics table, keyed by the header columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRow {
    source_name: String,
    columns: Vec<String>,
    values: Vec<String>,
}

/// First data row of a Picard metrics file.
///
/// Picard writes `#`-prefixed provenance lines, then a tab-separated header
/// line and the data rows. Any histogram section follows a blank line and a
/// second `## HISTOGRAM` marker, so it is never reached.
pub fn first_data_row(text: &str, source_name: &str) -> QcResult<MetricsRow> {
    let mut lines = text
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'));

    let header = lines
        .next()
        .ok_or_else(|| QcError::MissingDataRow(source_name.to_string()))?;
    let row = lines
        .next()
        .ok_or_else(|| QcError::MissingDataRow(source_name.to_string()))?;

    let columns: Vec<String> = header.split('\t').map(str::to_string).collect();
    let mut values: Vec<String> = row.split('\t').map(str::to_string).collect();

    if values.len() > columns.len() {
        return Err(QcError::MalformedRow {
            source_name: source_name.to_string(),
            columns: columns.len(),
            values: values.len(),
        });
    }
    // Picard drops trailing empty columns (SAMPLE, LIBRARY, READ_GROUP at ALL_READS).
    values.resize(columns.len(), String::new());

    Ok(MetricsRow {
        source_name: source_name.to_string(),
        columns,
        values,
    })
}

/// Reads a metrics file and returns its first data row.
pub fn read_first_data_row(path: &Path) -> QcResult<MetricsRow> {
    let text = std::fs::read_to_string(path)?;
    first_data_row(&text, &path.display().to_string())
}

impl MetricsRow {
    pub fn get_str(&self, field: &str) -> QcResult<&str> {
        self.columns
            .iter()
            .position(|column| column == field)
            .map(|idx| self.values[idx].as_str())
            .ok_or_else(|| QcError::MissingField {
                source_name: self.source_name.clone(),
                field: field.to_string(),
            })
    }

    pub fn get_u64(&self, field: &str) -> QcResult<u64> {
        let value = self.get_str(field)?;
        value.trim().parse().map_err(|_| self.invalid(field, value))
    }

    pub fn get_f64(&self, field: &str) -> QcResult<f64> {
        let value = self.get_str(field)?;
        value.trim().parse().map_err(|_| self.invalid(field, value))
    }

    fn invalid(&self, field: &str, value: &str) -> QcError {
        QcError::InvalidField {
            source_name: self.source_name.clone(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Fields of CollectQualityYieldMetrics kept in the ubam summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityYieldMetrics {
    pub total_reads: u64,
    pub pf_reads: u64,
    pub read_length: u64,
    pub total_bases: u64,
    pub pf_bases: u64,
    pub q20_bases: u64,
    pub pf_q20_bases: u64,
    pub q30_bases: u64,
    pub pf_q30_bases: u64,
    pub q20_equivalent_yield: u64,
    pub pf_q20_equivalent_yield: u64,
}

impl QualityYieldMetrics {
    pub fn from_row(row: &MetricsRow) -> QcResult<Self> {
        Ok(Self {
            total_reads: row.get_u64("TOTAL_READS")?,
            pf_reads: row.get_u64("PF_READS")?,
            read_length: row.get_u64("READ_LENGTH")?,
            total_bases: row.get_u64("TOTAL_BASES")?,
            pf_bases: row.get_u64("PF_BASES")?,
            q20_bases: row.get_u64("Q20_BASES")?,
            pf_q20_bases: row.get_u64("PF_Q20_BASES")?,
            q30_bases: row.get_u64("Q30_BASES")?,
            pf_q30_bases: row.get_u64("PF_Q30_BASES")?,
            q20_equivalent_yield: row.get_u64("Q20_EQUIVALENT_YIELD")?,
            pf_q20_equivalent_yield: row.get_u64("PF_Q20_EQUIVALENT_YIELD")?,
        })
    }
}

/// Leading row of CollectAlignmentSummaryMetrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub category: String,
    pub total_reads: u64,
    pub pf_reads_aligned: u64,
    pub pct_pf_reads_aligned: f64,
    pub mean_read_length: f64,
}

impl AlignmentSummary {
    pub fn from_row(row: &MetricsRow) -> QcResult<Self> {
        Ok(Self {
            category: row.get_str("CATEGORY")?.to_string(),
            total_reads: row.get_u64("TOTAL_READS")?,
            pf_reads_aligned: row.get_u64("PF_READS_ALIGNED")?,
            pct_pf_reads_aligned: row.get_f64("PCT_PF_READS_ALIGNED")?,
            mean_read_length: row.get_f64("MEAN_READ_LENGTH")?,
        })
    }
}
