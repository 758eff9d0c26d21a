use crate::error::{QcError, QcResult};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Summary numbers (the `SN` section) of `samtools stats` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamtoolsStats {
    pub raw_total_sequences: u64,
    pub filtered_sequences: u64,
    pub reads_mapped: u64,
    pub reads_unmapped: u64,
    pub reads_properly_paired: u64,
    pub reads_duplicated: u64,
    pub reads_mq0: u64,
    pub total_length: u64,
    pub bases_mapped_cigar: u64,
    pub mismatches: u64,
    pub error_rate: f64,
    pub average_length: f64,
    pub average_quality: f64,
    pub insert_size_average: f64,
    pub insert_size_standard_deviation: f64,
}

/// `SN` key/value pairs, e.g. `SN\treads mapped:\t1000` gives `reads mapped` -> `1000`.
pub fn summary_numbers(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| line.strip_prefix("SN\t"))
        .filter_map(|rest| {
            let mut fields = rest.split('\t');
            let key = fields.next()?.trim().trim_end_matches(':').trim();
            let value = fields.next()?.trim();
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

struct Lookup<'a> {
    numbers: &'a HashMap<String, String>,
    source_name: &'a str,
}

impl Lookup<'_> {
    fn get<T: FromStr>(&self, key: &str) -> QcResult<T> {
        let value = self
            .numbers
            .get(key)
            .ok_or_else(|| QcError::MissingField {
                source_name: self.source_name.to_string(),
                field: key.to_string(),
            })?;
        value.parse().map_err(|_| QcError::InvalidField {
            source_name: self.source_name.to_string(),
            field: key.to_string(),
            value: value.clone(),
        })
    }
}

impl SamtoolsStats {
    pub fn parse(text: &str, source_name: &str) -> QcResult<Self> {
        let numbers = summary_numbers(text);
        let sn = Lookup {
            numbers: &numbers,
            source_name,
        };

        Ok(Self {
            raw_total_sequences: sn.get("raw total sequences")?,
            filtered_sequences: sn.get("filtered sequences")?,
            reads_mapped: sn.get("reads mapped")?,
            reads_unmapped: sn.get("reads unmapped")?,
            reads_properly_paired: sn.get("reads properly paired")?,
            reads_duplicated: sn.get("reads duplicated")?,
            reads_mq0: sn.get("reads MQ0")?,
            total_length: sn.get("total length")?,
            bases_mapped_cigar: sn.get("bases mapped (cigar)")?,
            mismatches: sn.get("mismatches")?,
            error_rate: sn.get("error rate")?,
            average_length: sn.get("average length")?,
            average_quality: sn.get("average quality")?,
            insert_size_average: sn.get("insert size average")?,
            insert_size_standard_deviation: sn.get("insert size standard deviation")?,
        })
    }
}
