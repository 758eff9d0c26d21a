#![allow(dead_code)]

use rust_htslib::bam;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

static SERIAL: Mutex<()> = Mutex::new(());

// Writing a script while another test thread forks can leave the script
// busy (ETXTBSY) when it is executed, so the tool-driving tests run one at a time.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub const QUALITY_YIELD_METRICS: &str = "\
## htsjdk.samtools.metrics.StringHeader
# CollectQualityYieldMetrics INPUT=lane.bam
## htsjdk.samtools.metrics.StringHeader
# Started on: Mon Mar 02 10:00:00 UTC 2020

## METRICS CLASS\tpicard.analysis.CollectQualityYieldMetrics$QualityYieldMetrics
TOTAL_READS\tPF_READS\tREAD_LENGTH\tTOTAL_BASES\tPF_BASES\tQ20_BASES\tPF_Q20_BASES\tQ30_BASES\tPF_Q30_BASES\tQ20_EQUIVALENT_YIELD\tPF_Q20_EQUIVALENT_YIELD
2000\t1990\t151\t302000\t300490\t290000\t289000\t280000\t279500\t310000\t309000
";

pub const ALIGNMENT_SUMMARY_METRICS: &str = "\
## htsjdk.samtools.metrics.StringHeader
# CollectMultipleMetrics INPUT=sample.bam

## METRICS CLASS\tpicard.analysis.AlignmentSummaryMetrics
CATEGORY\tTOTAL_READS\tPF_READS_ALIGNED\tPCT_PF_READS_ALIGNED\tMEAN_READ_LENGTH\tSAMPLE\tLIBRARY\tREAD_GROUP
FIRST_OF_PAIR\t1000\t975\t0.975\t151
SECOND_OF_PAIR\t1000\t975\t0.975\t151
PAIR\t2000\t1950\t0.975\t151
";

pub const BAMSTAT: &str = "\
# This file was produced by samtools stats (1.17+htslib-1.17)
SN\traw total sequences:\t2000\t# excluding supplementary and secondary reads
SN\tfiltered sequences:\t0
SN\tsequences:\t2000
SN\treads mapped:\t1950
SN\treads unmapped:\t50
SN\treads properly paired:\t1900
SN\treads duplicated:\t12
SN\treads MQ0:\t30
SN\ttotal length:\t302000
SN\tbases mapped (cigar):\t290000
SN\tmismatches:\t1450
SN\terror rate:\t5.000000e-03
SN\taverage length:\t151
SN\taverage quality:\t36.4
SN\tinsert size average:\t350.2
SN\tinsert size standard deviation:\t80.1
";

/// Writes an executable shell script into `dir`.
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A `java` stand-in that records its arguments and writes Picard-like outputs.
///
/// `exit_code` other than zero makes it fail after logging.
pub fn fake_java(dir: &Path, exit_code: i32) -> PathBuf {
    let log = dir.join("java.log");
    let qym = dir.join("qym.txt");
    let asm = dir.join("asm.txt");
    fs::write(&qym, QUALITY_YIELD_METRICS).unwrap();
    fs::write(&asm, ALIGNMENT_SUMMARY_METRICS).unwrap();
    let body = format!(
        r#"echo "$*" >> '{log}'
tool=""
out=""
input=""
for arg in "$@"; do
  case "$arg" in
    CollectQualityYieldMetrics|CollectMultipleMetrics) tool="$arg" ;;
    O=*) out="${{arg#O=}}" ;;
    I=*) input="${{arg#I=}}" ;;
  esac
done
if [ "$input" = "/dev/stdin" ]; then
  cat > /dev/null
fi
echo "picard $tool running"
echo "INFO picard log line" >&2
if [ {code} -ne 0 ]; then
  echo "picard exploded" >&2
  exit {code}
fi
if [ "$tool" = "CollectQualityYieldMetrics" ]; then
  cp '{qym}' "$out"
else
  cp '{asm}' "$out.alignment_summary_metrics"
  printf 'MEDIAN_INSERT_SIZE\n350\n' > "$out.insert_size_metrics"
  printf 'TOTAL_READS\n2000\n' > "$out.quality_yield_metrics"
fi
"#,
        log = log.display(),
        qym = qym.display(),
        asm = asm.display(),
        code = exit_code,
    );
    script(dir, "java", &body)
}

/// A `samtools` stand-in: `--version`, `stats` and `view`.
pub fn fake_samtools(dir: &Path) -> PathBuf {
    let log = dir.join("samtools.log");
    let stats = dir.join("stats.txt");
    fs::write(&stats, BAMSTAT).unwrap();
    let body = format!(
        r#"echo "$*" >> '{log}'
case "$1" in
  --version)
    echo "samtools 1.17"
    echo "Using htslib 1.17"
    ;;
  stats)
    cat '{stats}'
    ;;
  view)
    echo "BAM-BYTES"
    ;;
  *)
    exit 1
    ;;
esac
"#,
        log = log.display(),
        stats = stats.display(),
    );
    script(dir, "samtools", &body)
}

/// Unaligned BAM holding only a header with the given read group IDs.
pub fn write_ubam(path: &Path, read_group_ids: &[&str]) {
    let mut header = bam::Header::new();
    let mut hd = bam::header::HeaderRecord::new(b"HD");
    hd.push_tag(b"VN", "1.6");
    hd.push_tag(b"SO", "queryname");
    header.push_record(&hd);
    for id in read_group_ids {
        let mut rg = bam::header::HeaderRecord::new(b"RG");
        rg.push_tag(b"ID", id);
        rg.push_tag(b"SM", "sample1");
        rg.push_tag(b"PL", "ILLUMINA");
        header.push_record(&rg);
    }
    let writer = bam::Writer::from_path(path, &header, bam::Format::Bam).unwrap();
    drop(writer);
}

pub fn read_log(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
