pub mod aligned_seq_qc;
pub mod ubam_qc;

use crate::config::Config;
use crate::utils::external_tools::ToolCommand;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Settings shared by every QC command.
#[derive(Debug, Clone)]
pub struct QcContext {
    pub config: Config,
    pub output_dir: PathBuf,
}

impl QcContext {
    pub fn new(config: Config, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
        }
    }

    /// Path of an artifact named `<input base name>.<suffix>` in the output directory.
    pub fn output_path(&self, input_name: &str, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", input_name, suffix))
    }

    /// Creates the output directory, and any missing parents, before artifacts are written.
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })
    }

    /// `java [-Xmx<heap>] -jar <picard.jar> <tool>`
    pub(crate) fn picard(&self, heap: Option<String>, tool: &str) -> ToolCommand {
        let java = ToolCommand::new(&self.config.java);
        let java = match heap {
            Some(heap) => java.arg(format!("-Xmx{}", heap)),
            None => java,
        };
        java.arg("-jar").arg(&self.config.picard_jar).arg(tool)
    }

    pub(crate) fn samtools(&self) -> ToolCommand {
        ToolCommand::new(&self.config.samtools)
    }
}

pub(crate) fn file_size(path: &Path) -> std::io::Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}
