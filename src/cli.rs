use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "QC metrics collection for sequencing pipeline files", long_about = None)]
pub struct Args {
    /// TOML config file with tool locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Java executable used to run Picard
    #[arg(long, global = true)]
    pub java: Option<String>,

    /// Path to picard.jar
    #[arg(long, global = true, env = "SEQ_QC_PICARD_JAR")]
    pub picard_jar: Option<PathBuf>,

    /// samtools executable
    #[arg(long, global = true)]
    pub samtools: Option<String>,

    /// Directory receiving metrics, JSON and the archive
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read group info and quality yield metrics of a lane level unaligned BAM
    UbamQc {
        /// Lane level unmapped BAM file
        #[arg(short = 'b', long = "ubam")]
        ubam: PathBuf,

        /// Maximal allocated memory in MB
        #[arg(short = 'm', long = "mem")]
        mem: Option<u32>,
    },

    /// samtools stats and Picard CollectMultipleMetrics of an aligned BAM/CRAM
    AlignedSeqQc {
        /// Aligned sequence file (.bam or .cram)
        #[arg(short = 's', long = "seq")]
        seq: PathBuf,

        /// Reference fasta
        #[arg(short = 'r', long = "reference")]
        reference: PathBuf,

        /// Allocated process memory in GB
        #[arg(short = 'm', long = "memory")]
        memory: Option<u32>,

        /// Threads given to samtools
        #[arg(short = 'n', long = "cpus", default_value = "1")]
        cpus: u32,
    },
}
