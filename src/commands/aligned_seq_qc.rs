use super::{file_size, QcContext};
use crate::export::{self, AlignedSeqQc};
use crate::metrics::picard::{self, AlignmentSummary};
use crate::metrics::SamtoolsStats;
use crate::types::{file_name, SeqFormat, METRIC_ACCUMULATION_LEVELS, MULTIPLE_METRICS_PROGRAMS};
use crate::utils::archive;
use crate::utils::external_tools::{run_piped, tool_version, ToolCommand, ToolOutput};
use crate::utils::progress_bar_builder::with_spinner;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct AlignedSeqQcArgs {
    /// Aligned BAM or CRAM file.
    pub seq: PathBuf,
    /// Reference FASTA the sequence was aligned to.
    pub reference: PathBuf,
    /// JVM heap in gigabytes.
    pub memory: Option<u32>,
    pub cpus: u32,
}

/// Files written by a successful run.
#[derive(Debug, Clone)]
pub struct AlignedSeqQcOutputs {
    pub bamstat: PathBuf,
    pub summary: PathBuf,
    pub multiple_metrics: Vec<PathBuf>,
    pub archive: PathBuf,
}

/// Picard CollectMultipleMetrics reading `input` and writing `<prefix>.*`.
pub fn multiple_metrics_command(
    ctx: &QcContext,
    args: &AlignedSeqQcArgs,
    input: &Path,
    prefix: &Path,
) -> ToolCommand {
    let mut cmd = ctx
        .picard(args.memory.map(|gb| format!("{}g", gb)), "CollectMultipleMetrics")
        .key_value("I", input)
        .key_value("O", prefix)
        .key_value("R", &args.reference)
        .arg("ASSUME_SORTED=true");
    for program in MULTIPLE_METRICS_PROGRAMS {
        cmd = cmd.key_value("PROGRAM", program);
    }
    for level in METRIC_ACCUMULATION_LEVELS {
        cmd = cmd.key_value("METRIC_ACCUMULATION_LEVEL", level);
    }
    cmd
}

/// `samtools view` streaming a CRAM as BAM to stdout.
pub fn cram_to_bam_command(ctx: &QcContext, args: &AlignedSeqQcArgs) -> ToolCommand {
    ctx.samtools()
        .arg("view")
        .arg("-b")
        .arg("-T")
        .arg(&args.reference)
        .arg("-@")
        .arg(args.cpus.to_string())
        .arg(&args.seq)
        .arg("-o")
        .arg("/dev/stdout")
}

pub fn samtools_stats_command(ctx: &QcContext, args: &AlignedSeqQcArgs) -> ToolCommand {
    ctx.samtools()
        .arg("stats")
        .arg("-@")
        .arg(args.cpus.to_string())
        .arg("--reference")
        .arg(&args.reference)
        .arg(&args.seq)
}

fn collect_multiple_metrics(
    ctx: &QcContext,
    args: &AlignedSeqQcArgs,
    format: SeqFormat,
    prefix: &Path,
) -> Result<ToolOutput> {
    let message = format!("CollectMultipleMetrics on {}", file_name(&args.seq));
    let output = match format {
        SeqFormat::Bam => {
            let picard = multiple_metrics_command(ctx, args, &args.seq, prefix);
            with_spinner(message, || picard.run())
        }
        SeqFormat::Cram => {
            let samtools = cram_to_bam_command(ctx, args);
            let picard = multiple_metrics_command(ctx, args, Path::new("/dev/stdin"), prefix);
            with_spinner(message, || run_piped(&samtools, &picard))
        }
    };
    output.context("Picard CollectMultipleMetrics failed")
}

/// Files named `<prefix base>.*` in the output directory.
fn prefixed_files(dir: &Path, prefix_name: &str) -> Result<Vec<(PathBuf, SystemTime)>> {
    let wanted = format!("{}.", prefix_name);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(&wanted) {
            files.push((entry.path(), entry.metadata()?.modified()?));
        }
    }
    files.sort();
    Ok(files)
}

/// Files that are new in `after`, or whose mtime no longer matches `before`.
fn produced_since(before: &[(PathBuf, SystemTime)], after: Vec<(PathBuf, SystemTime)>) -> Vec<PathBuf> {
    let snapshot: HashMap<&PathBuf, SystemTime> =
        before.iter().map(|(path, modified)| (path, *modified)).collect();
    after
        .into_iter()
        .filter(|(path, modified)| snapshot.get(path) != Some(modified))
        .map(|(path, _)| path)
        .collect()
}

pub fn run(ctx: &QcContext, args: &AlignedSeqQcArgs) -> Result<AlignedSeqQcOutputs> {
    let format = SeqFormat::from_path(&args.seq)?;
    ctx.ensure_output_dir()?;
    let name = file_name(&args.seq);
    let prefix = ctx.output_path(&name, "multiple_metrics");
    let prefix_name = file_name(&prefix);
    let bamstat = ctx.output_path(&name, "bamstat");
    let summary = ctx.output_path(&name, "aligned_seq_qc.json");
    let archive_path = ctx.output_path(&name, "aligned_seq_qc_metrics.tgz");

    let size = file_size(&args.seq)
        .with_context(|| format!("Failed to stat {}", args.seq.display()))?;
    info!(seq = %args.seq.display(), format = format.name(), size, "aligned sequence");

    let tool_version = tool_version(&ctx.config.samtools).context("samtools not usable")?;
    debug!(%tool_version, "samtools");

    let before = prefixed_files(&ctx.output_dir, &prefix_name)?;
    collect_multiple_metrics(ctx, args, format, &prefix)?.echo()?;
    let multiple_metrics = produced_since(&before, prefixed_files(&ctx.output_dir, &prefix_name)?);

    let stats = with_spinner(format!("samtools stats on {}", name), || {
        samtools_stats_command(ctx, args).run()
    })
    .context("samtools stats failed")?;
    fs::write(&bamstat, &stats.stdout)
        .with_context(|| format!("Failed to write {}", bamstat.display()))?;
    let samtools_stats = SamtoolsStats::parse(&stats.stdout_text(), &bamstat.display().to_string())?;

    let summary_metrics = PathBuf::from(format!("{}.alignment_summary_metrics", prefix.display()));
    let row = picard::read_first_data_row(&summary_metrics)
        .with_context(|| format!("Failed to read {}", summary_metrics.display()))?;
    let alignment_summary = AlignmentSummary::from_row(&row)?;

    let record = AlignedSeqQc {
        name,
        size,
        format,
        tool_version,
        samtools_stats,
        alignment_summary,
    };
    export::write_json(&summary, &record)
        .with_context(|| format!("Failed to write {}", summary.display()))?;

    let mut bundle = vec![bamstat.clone(), summary.clone()];
    bundle.extend(multiple_metrics.iter().cloned());
    archive::write_verified_tgz(&archive_path, &bundle)
        .with_context(|| format!("Failed to archive into {}", archive_path.display()))?;

    Ok(AlignedSeqQcOutputs {
        bamstat,
        summary,
        multiple_metrics,
        archive: archive_path,
    })
}
