//! Storage layer for taskman
//!
//! Manages the flat-file artifacts inside a single data directory:
//!
//! ```text
//! <data-dir>/
//!   taskman.toml         # Optional configuration
//!   user.txt             # Credential backing artifact (name;secret per line)
//!   tasks.txt            # Task backing artifact (six ;-delimited fields per line)
//!   task_overview.txt    # Derived task-level report
//!   user_overview.txt    # Derived identity-level report
//! ```
//!
//! Backing artifacts are read fully on load and rewritten fully on every
//! mutation. Rewrites go through a temp file plus rename so a crash never
//! leaves a torn artifact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::error::Result;

/// Storage manager for taskman state
#[derive(Debug, Clone)]
pub struct Storage {
    /// Directory holding every artifact
    data_dir: PathBuf,
    /// Configured artifact file names
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager rooted at `data_dir`
    pub fn new(data_dir: PathBuf, config: StorageConfig) -> Self {
        Self { data_dir, config }
    }

    /// Path to the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the credential backing artifact
    pub fn user_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.user_file)
    }

    /// Path to the task backing artifact
    pub fn task_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.task_file)
    }

    /// Path to the task-level report artifact
    pub fn task_overview_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.task_overview_file)
    }

    /// Path to the identity-level report artifact
    pub fn user_overview_file(&self) -> PathBuf {
        self.data_dir.join(&self.config.user_overview_file)
    }

    /// Ensure the data directory exists
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Read the non-empty lines of a flat-file artifact
    pub fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let content = fs::read_to_string(path)?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect())
    }

    /// Rewrite a flat-file artifact from a full set of lines
    pub fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        let mut data = lines.join("\n");
        if !data.is_empty() {
            data.push('\n');
        }
        self.write_atomic(path, data.as_bytes())
    }

    /// Write data atomically using temp file + rename
    ///
    /// Readers never observe a partially written artifact.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Create an empty artifact if it does not exist yet
    pub fn touch(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            self.write_atomic(path, b"")?;
        }
        Ok(())
    }
}
