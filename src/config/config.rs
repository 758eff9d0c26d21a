use crate::error::{QcError, QcResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Locations of the external tools the QC commands shell out to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_java")]
    pub java: String,
    #[serde(default = "default_picard_jar")]
    pub picard_jar: PathBuf,
    #[serde(default = "default_samtools")]
    pub samtools: String,
}

fn default_java() -> String {
    "java".to_string()
}

fn default_picard_jar() -> PathBuf {
    PathBuf::from("/tools/picard.jar")
}

fn default_samtools() -> String {
    "samtools".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            java: default_java(),
            picard_jar: default_picard_jar(),
            samtools: default_samtools(),
        }
    }
}

impl Config {
    /// Loads an explicitly named config file, or the per-user one if it exists.
    pub fn load(explicit: Option<&Path>) -> QcResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "seq-qc", "seq-qc-tools")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    fn from_file(path: &Path) -> QcResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| QcError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| QcError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        java: Option<String>,
        picard_jar: Option<PathBuf>,
        samtools: Option<String>,
    ) -> Self {
        if let Some(java) = java {
            self.java = java;
        }
        if let Some(picard_jar) = picard_jar {
            self.picard_jar = picard_jar;
        }
        if let Some(samtools) = samtools {
            self.samtools = samtools;
        }
        self
    }
}
