use crate::error::{QcError, QcResult};
use rust_htslib::bam::{self, Read};
use std::path::Path;

/// Reads the SAM-text header of a BAM file.
pub fn read_header_text(path: &Path) -> QcResult<String> {
    let reader = bam::Reader::from_path(path).map_err(|source| QcError::Header {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(reader.header().as_bytes()).into_owned())
}

/// `ID:` values of every `@RG` line, in header order.
pub fn read_group_ids(header_text: &str) -> Vec<String> {
    header_text
        .lines()
        .filter(|line| line.split('\t').next() == Some("@RG"))
        .filter_map(|line| {
            line.split('\t')
                .skip(1)
                .find_map(|field| field.strip_prefix("ID:"))
                .map(|id| id.trim().to_string())
        })
        .filter(|id| !id.is_empty())
        .collect()
}

/// The one read group ID a lane-level BAM must carry.
pub fn single_read_group_id(header_text: &str, bam: &Path) -> QcResult<String> {
    let mut ids = read_group_ids(header_text);
    match ids.len() {
        0 => Err(QcError::MissingReadGroup(bam.to_path_buf())),
        1 => Ok(ids.remove(0)),
        _ => Err(QcError::MultipleReadGroups(bam.to_path_buf())),
    }
}
