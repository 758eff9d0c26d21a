//! `.tgz` bundles of the metrics and info files produced by a QC run.

use crate::error::{QcError, QcResult};
use crate::types::file_name;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes a gzip-compressed tar holding each file under its base name, in order.
pub fn write_tgz(archive_path: &Path, files: &[PathBuf]) -> QcResult<()> {
    let file = File::create(archive_path)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for path in files {
        builder.append_path_with_name(path, file_name(path))?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?.into_inner().map_err(|e| e.into_error())?;
    Ok(())
}

/// Entry names of an archive, decompressing whatever compression it carries.
pub fn list_entries(archive_path: &Path) -> QcResult<Vec<String>> {
    let file = File::open(archive_path)?;
    let (reader, _format) = niffler::get_reader(Box::new(file))
        .map_err(|e| QcError::Io(std::io::Error::other(e.to_string())))?;
    let mut archive = tar::Archive::new(reader);

    let mut names = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        names.push(entry.path()?.to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Writes the archive, then re-reads it to confirm it holds exactly `files`.
pub fn write_verified_tgz(archive_path: &Path, files: &[PathBuf]) -> QcResult<()> {
    write_tgz(archive_path, files)?;

    let expected: Vec<String> = files.iter().map(|p| file_name(p)).collect();
    let found = list_entries(archive_path)?;
    if found != expected {
        return Err(QcError::ArchiveMismatch {
            archive: archive_path.to_path_buf(),
            expected,
            found,
        });
    }

    info!(
        archive = %archive_path.display(),
        entries = found.len(),
        "archive written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn stores_files_under_base_names_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let metrics = nested.join("lane.bam.quality_yield_metrics.txt");
        let info = dir.path().join("lane.bam.ubam_info.json");
        fs::write(&metrics, "TOTAL_READS\n10\n").unwrap();
        fs::write(&info, "{}").unwrap();

        let archive = dir.path().join("lane.bam.ubam_qc_metrics.tgz");
        write_verified_tgz(&archive, &[metrics, info]).unwrap();

        assert_eq!(
            list_entries(&archive).unwrap(),
            vec![
                "lane.bam.quality_yield_metrics.txt".to_string(),
                "lane.bam.ubam_info.json".to_string(),
            ]
        );
    }

    #[test]
    fn unrelated_files_in_the_directory_are_not_included() {
        let dir = tempfile::tempdir().unwrap();
        let wanted = dir.path().join("a.bamstat");
        fs::write(&wanted, "SN\tsequences:\t1\n").unwrap();
        fs::write(dir.path().join("old.quality_yield_metrics.txt"), "stale").unwrap();

        let archive = dir.path().join("a.tgz");
        write_verified_tgz(&archive, &[wanted]).unwrap();
        assert_eq!(list_entries(&archive).unwrap(), vec!["a.bamstat".to_string()]);
    }

    #[test]
    fn missing_input_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_tgz(&dir.path().join("x.tgz"), &[dir.path().join("absent.txt")])
            .unwrap_err();
        assert!(matches!(err, QcError::Io(_)));
    }
}
