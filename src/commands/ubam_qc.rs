use super::{file_size, QcContext};
use crate::export::{self, UbamInfo};
use crate::metrics::picard::{self, QualityYieldMetrics};
use crate::read_group;
use crate::types::file_name;
use crate::utils::archive;
use crate::utils::external_tools::ToolCommand;
use crate::utils::progress_bar_builder::with_spinner;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct UbamQcArgs {
    /// Lane-level unaligned BAM.
    pub ubam: PathBuf,
    /// Maximal JVM heap in megabytes.
    pub mem: Option<u32>,
}

/// Files written by a successful run.
#[derive(Debug, Clone)]
pub struct UbamQcOutputs {
    pub metrics: PathBuf,
    pub info: PathBuf,
    pub archive: PathBuf,
}

pub fn quality_yield_metrics_command(
    ctx: &QcContext,
    ubam: &Path,
    metrics: &Path,
    mem: Option<u32>,
) -> ToolCommand {
    ctx.picard(mem.map(|mb| format!("{}M", mb)), "CollectQualityYieldMetrics")
        .key_value("I", ubam)
        .key_value("O", metrics)
        .arg("ASSUME_SORTED=false")
        .arg("VALIDATION_STRINGENCY=LENIENT")
}

pub fn run(ctx: &QcContext, args: &UbamQcArgs) -> Result<UbamQcOutputs> {
    ctx.ensure_output_dir()?;
    let name = file_name(&args.ubam);
    let outputs = UbamQcOutputs {
        metrics: ctx.output_path(&name, "quality_yield_metrics.txt"),
        info: ctx.output_path(&name, "ubam_info.json"),
        archive: ctx.output_path(&name, "ubam_qc_metrics.tgz"),
    };

    let header = read_group::read_header_text(&args.ubam)?;
    let read_group_id = read_group::single_read_group_id(&header, &args.ubam)?;
    let size = file_size(&args.ubam)
        .with_context(|| format!("Failed to stat {}", args.ubam.display()))?;
    info!(%read_group_id, size, ubam = %args.ubam.display(), "lane level BAM");

    let command = quality_yield_metrics_command(ctx, &args.ubam, &outputs.metrics, args.mem);
    let output = with_spinner(format!("CollectQualityYieldMetrics on {}", name), || {
        command.run()
    })
    .context("Picard CollectQualityYieldMetrics failed")?;
    output.echo()?;

    let row = picard::read_first_data_row(&outputs.metrics)
        .with_context(|| format!("Failed to read {}", outputs.metrics.display()))?;
    let quality_yield_metrics = QualityYieldMetrics::from_row(&row)?;

    let ubam_info = UbamInfo {
        read_group_id,
        name,
        size,
        quality_yield_metrics,
    };
    export::write_json(&outputs.info, &ubam_info)
        .with_context(|| format!("Failed to write {}", outputs.info.display()))?;

    archive::write_verified_tgz(
        &outputs.archive,
        &[outputs.metrics.clone(), outputs.info.clone()],
    )
    .with_context(|| format!("Failed to archive into {}", outputs.archive.display()))?;

    Ok(outputs)
}
