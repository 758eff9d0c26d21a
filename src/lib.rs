pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod read_group;
pub mod types;
pub mod utils;

pub use commands::aligned_seq_qc::{AlignedSeqQcArgs, AlignedSeqQcOutputs};
pub use commands::ubam_qc::{UbamQcArgs, UbamQcOutputs};
pub use commands::QcContext;
pub use error::{QcError, QcResult};
