use std::path::PathBuf;
use thiserror::Error;

pub type QcResult<T> = Result<T, QcError>;

/// Every condition that aborts a QC run.
#[derive(Debug, Error)]
pub enum QcError {
    #[error("failed to launch `{program}`: {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with {}: {stderr}", describe_code(.code))]
    ToolFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{0}` printed no version")]
    MissingVersion(String),

    #[error("unable to find read group ID in lane level BAM {0}")]
    MissingReadGroup(PathBuf),

    #[error("more than one read group ID found in lane level BAM {0}")]
    MultipleReadGroups(PathBuf),

    #[error("Unknown alignment sequence format: {0}")]
    UnknownFormat(PathBuf),

    #[error("no data row found in metrics output {0}")]
    MissingDataRow(String),

    #[error("malformed row in {source_name}: {values} values for {columns} columns")]
    MalformedRow {
        source_name: String,
        columns: usize,
        values: usize,
    },

    #[error("missing field {field} in {source_name}")]
    MissingField { source_name: String, field: String },

    #[error("invalid value {value:?} for field {field} in {source_name}")]
    InvalidField {
        source_name: String,
        field: String,
        value: String,
    },

    #[error("archive {archive} holds {found:?}, expected {expected:?}")]
    ArchiveMismatch {
        archive: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("failed to read BAM header of {path}: {source}")]
    Header {
        path: PathBuf,
        #[source]
        source: rust_htslib::errors::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl QcError {
    /// Process exit code for this failure. A failed tool passes its own code through.
    pub fn exit_code(&self) -> i32 {
        match self {
            QcError::ToolFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Exit code for an error chain built with anyhow context.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<QcError>())
        .map_or(1, QcError::exit_code)
}
