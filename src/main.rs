use clap::Parser;
use seq_qc_tools::cli::{Args, Commands};
use seq_qc_tools::commands::{aligned_seq_qc, ubam_qc};
use seq_qc_tools::config::Config;
use seq_qc_tools::error::exit_code_for;
use seq_qc_tools::{AlignedSeqQcArgs, QcContext, UbamQcArgs};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?.with_overrides(
        args.java,
        args.picard_jar,
        args.samtools,
    );
    let ctx = QcContext::new(config, args.output_dir);

    match args.command {
        Commands::UbamQc { ubam, mem } => {
            let outputs = ubam_qc::run(&ctx, &UbamQcArgs { ubam, mem })?;
            tracing::info!(archive = %outputs.archive.display(), "ubam QC complete");
        }
        Commands::AlignedSeqQc {
            seq,
            reference,
            memory,
            cpus,
        } => {
            let args = AlignedSeqQcArgs {
                seq,
                reference,
                memory,
                cpus,
            };
            let outputs = aligned_seq_qc::run(&ctx, &args)?;
            tracing::info!(archive = %outputs.archive.display(), "aligned sequence QC complete");
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}
