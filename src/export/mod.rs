pub mod formats;

use crate::error::QcResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use formats::{AlignedSeqQc, UbamInfo};

/// Writes a summary record as two-space indented JSON.
pub fn write_json<T: Serialize>(path: &Path, record: &T) -> QcResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, record).map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
}
