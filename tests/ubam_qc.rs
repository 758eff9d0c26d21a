#![cfg(unix)]

mod common;

use seq_qc_tools::commands::ubam_qc;
use seq_qc_tools::config::Config;
use seq_qc_tools::error::exit_code_for;
use seq_qc_tools::utils::archive::list_entries;
use seq_qc_tools::{QcContext, UbamQcArgs};
use std::fs;
use std::path::Path;

fn context(tools: &Path, out: &Path, java_exit: i32) -> QcContext {
    let java = common::fake_java(tools, java_exit);
    let config = Config::default().with_overrides(
        Some(java.display().to_string()),
        Some(tools.join("picard.jar")),
        None,
    );
    QcContext::new(config, out)
}

#[test]
fn lane_bam_produces_info_metrics_and_archive() {
    let _guard = common::serial();
    let tools = tempfile::tempdir().unwrap();
    let inputs = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let ubam = inputs.path().join("C0HVY.2.bam");
    common::write_ubam(&ubam, &["C0HVY.2"]);
    // Leftovers of an earlier run must not end up in the archive.
    fs::write(out.path().join("other.bam.quality_yield_metrics.txt"), "stale").unwrap();
    fs::write(out.path().join("other.bam.ubam_info.json"), "{}").unwrap();

    let ctx = context(tools.path(), out.path(), 0);
    let outputs = ubam_qc::run(
        &ctx,
        &UbamQcArgs {
            ubam: ubam.clone(),
            mem: Some(1024),
        },
    )
    .unwrap();

    let info: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outputs.info).unwrap()).unwrap();
    assert_eq!(info["read_group_id"], "C0HVY.2");
    assert_eq!(info["name"], "C0HVY.2.bam");
    assert_eq!(info["size"], fs::metadata(&ubam).unwrap().len());
    assert_eq!(info["quality_yield_metrics"]["total_reads"], 2000);
    assert_eq!(info["quality_yield_metrics"]["pf_q30_bases"], 279500);

    assert_eq!(
        outputs.archive,
        out.path().join("C0HVY.2.bam.ubam_qc_metrics.tgz")
    );
    assert_eq!(
        list_entries(&outputs.archive).unwrap(),
        vec![
            "C0HVY.2.bam.quality_yield_metrics.txt".to_string(),
            "C0HVY.2.bam.ubam_info.json".to_string(),
        ]
    );

    let java_log = common::read_log(&tools.path().join("java.log"));
    assert!(java_log.contains("-Xmx1024M -jar"));
    assert!(java_log.contains("CollectQualityYieldMetrics"));
    assert!(java_log.contains("ASSUME_SORTED=false VALIDATION_STRINGENCY=LENIENT"));
}

#[test]
fn two_read_groups_fail_before_picard_runs() {
    let _guard = common::serial();
    let tools = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let ubam = out.path().join("merged.bam");
    common::write_ubam(&ubam, &["lane1", "lane2"]);

    let ctx = context(tools.path(), out.path(), 0);
    let err = ubam_qc::run(&ctx, &UbamQcArgs { ubam, mem: None }).unwrap_err();

    assert!(err
        .to_string()
        .contains("more than one read group ID found in lane level BAM"));
    assert_eq!(exit_code_for(&err), 1);
    assert!(common::read_log(&tools.path().join("java.log")).is_empty());
    assert!(!out.path().join("merged.bam.ubam_qc_metrics.tgz").exists());
}

#[test]
fn missing_read_group_is_fatal() {
    let _guard = common::serial();
    let tools = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let ubam = out.path().join("norg.bam");
    common::write_ubam(&ubam, &[]);

    let ctx = context(tools.path(), out.path(), 0);
    let err = ubam_qc::run(&ctx, &UbamQcArgs { ubam, mem: None }).unwrap_err();
    assert!(err
        .to_string()
        .contains("unable to find read group ID in lane level BAM"));
}

#[test]
fn picard_failure_propagates_its_exit_code() {
    let _guard = common::serial();
    let tools = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let ubam = out.path().join("lane.bam");
    common::write_ubam(&ubam, &["lane"]);

    let ctx = context(tools.path(), out.path(), 3);
    let err = ubam_qc::run(&ctx, &UbamQcArgs { ubam, mem: None }).unwrap_err();

    assert_eq!(exit_code_for(&err), 3);
    assert!(format!("{:#}", err).contains("picard exploded"));
    assert!(!out.path().join("lane.bam.ubam_info.json").exists());
}

#[test]
fn missing_output_directory_is_created() {
    let _guard = common::serial();
    let tools = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let nested = out.path().join("qc/lanes");

    let ubam = out.path().join("lane.bam");
    common::write_ubam(&ubam, &["lane"]);

    let ctx = context(tools.path(), &nested, 0);
    let outputs = ubam_qc::run(&ctx, &UbamQcArgs { ubam, mem: None }).unwrap();

    assert!(outputs.metrics.starts_with(&nested));
    assert_eq!(
        list_entries(&outputs.archive).unwrap(),
        vec![
            "lane.bam.quality_yield_metrics.txt".to_string(),
            "lane.bam.ubam_info.json".to_string(),
        ]
    );
}
