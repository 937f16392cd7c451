//! The glyph-subsetting capability.
//!
//! Subsetting itself is a black box behind [`SubsetTool`]; the production
//! implementation shells out to external commands so a hung or crashing
//! tool can never take the service down with it.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::SubsetConfig;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Glyph-subsetting capability.
///
/// `subset` must write its result into `dest_dir` with hinting disabled;
/// the service trades hint fidelity for minimal file size. Implementations
/// raced against a timeout may be abandoned mid-flight; they must not
/// assume they get to clean up after themselves (the owning job reclaims
/// the temp directories).
#[async_trait]
pub trait SubsetTool: Send + Sync {
    /// Whether the subsetter only accepts TrueType input, requiring an
    /// OTF-to-TTF normalization step first.
    fn requires_truetype(&self) -> bool;

    /// Convert an OTF-family font into a TrueType file at `output`.
    async fn convert_to_ttf(&self, input: &Path, output: &Path) -> Result<(), ToolError>;

    /// Subset `input` to the characters of `repertoire`, writing the result
    /// into `dest_dir`.
    async fn subset(
        &self,
        input: &Path,
        repertoire: &str,
        dest_dir: &Path,
    ) -> Result<(), ToolError>;
}

/// Runs the configured external subsetting/conversion commands.
pub struct CommandSubsetTool {
    subset_command: String,
    convert_command: String,
}

impl CommandSubsetTool {
    pub fn new(config: &SubsetConfig) -> Self {
        Self {
            subset_command: config.subset_command.clone(),
            convert_command: config.convert_command.clone(),
        }
    }
}

#[async_trait]
impl SubsetTool for CommandSubsetTool {
    fn requires_truetype(&self) -> bool {
        true
    }

    async fn convert_to_ttf(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let mut command = Command::new(&self.convert_command);
        command.arg(input).arg("--output").arg(output);
        run_command(command, &self.convert_command).await
    }

    async fn subset(
        &self,
        input: &Path,
        repertoire: &str,
        dest_dir: &Path,
    ) -> Result<(), ToolError> {
        let mut command = Command::new(&self.subset_command);
        command
            .arg(input)
            .arg("--text")
            .arg(repertoire)
            .arg("--dest")
            .arg(dest_dir)
            .arg("--no-hinting");
        run_command(command, &self.subset_command).await
    }
}

async fn run_command(mut command: Command, name: &str) -> Result<(), ToolError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        // If the engine's timeout drops us mid-run, the child must not
        // linger and keep writing into the output directory.
        .kill_on_drop(true);

    debug!(command = name, "running subsetting tool");

    let output = command.output().await.map_err(|source| ToolError::Spawn {
        command: name.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(ToolError::CommandFailed {
            command: name.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
