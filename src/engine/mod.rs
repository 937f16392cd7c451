//! Subsetting stage: format normalization, tool invocation, output
//! collection, all under a processing deadline.

mod tool;

pub use tool::{CommandSubsetTool, SubsetTool, ToolError};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::charset::Repertoire;
use crate::config::SubsetConfig;
use crate::pipeline::FontJob;

#[derive(Debug, Error)]
pub enum SubsetError {
    #[error("no characters to subset")]
    EmptyRepertoire,

    #[error("subsetting tool error")]
    Tool(#[from] ToolError),

    #[error("subsetting timed out; try fewer characters or a smaller font file")]
    Timeout,

    #[error("no subsetted font was produced in the output directory")]
    NoOutput,

    #[error("subsetting I/O error")]
    Io(#[from] std::io::Error),
}

/// The subsetted font, held in memory between subsetting and publishing.
#[derive(Debug, Clone)]
pub struct SubsetResult {
    pub bytes: Bytes,
    /// Lower-cased extension of the produced file, without the dot.
    pub extension: String,
}

impl SubsetResult {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub struct SubsetEngine {
    tool: Arc<dyn SubsetTool>,
    timeout: Duration,
    temp_dir: PathBuf,
}

impl SubsetEngine {
    pub fn new(tool: Arc<dyn SubsetTool>, config: &SubsetConfig) -> Self {
        Self {
            tool,
            timeout: Duration::from_secs(config.timeout_secs),
            temp_dir: config.temp_dir.clone().unwrap_or_else(std::env::temp_dir),
        }
    }

    /// Subset `input` down to the repertoire, normalizing OTF input to TTF
    /// first when the tool needs it. The tool phase is raced against the
    /// processing timeout; a loser left running is killed on drop, and its
    /// partial output lives in a job-owned directory either way.
    pub async fn subset(
        &self,
        input: &Path,
        repertoire: &Repertoire,
        job: &FontJob,
    ) -> Result<SubsetResult, SubsetError> {
        // The resolver rejects empty repertoires long before this point.
        if repertoire.char_count() == 0 {
            return Err(SubsetError::EmptyRepertoire);
        }

        let output_dir = tempfile::Builder::new()
            .prefix("glyphbox-output-")
            .tempdir_in(&self.temp_dir)?
            .into_path();
        job.register_dir(output_dir.clone());

        let work = async {
            let mut source = input.to_path_buf();
            if is_otf(input) && self.tool.requires_truetype() {
                let intermediate = input.with_extension("ttf");
                info!(
                    job_id = %job.id,
                    input = %input.display(),
                    "OTF input detected, normalizing to TTF before subsetting"
                );
                self.tool.convert_to_ttf(input, &intermediate).await?;
                source = intermediate;
            }
            self.tool
                .subset(&source, repertoire.as_str(), &output_dir)
                .await
        };

        match tokio::time::timeout(self.timeout, work).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => return Err(SubsetError::Tool(error)),
            Err(_) => {
                warn!(job_id = %job.id, timeout = ?self.timeout, "subsetting timed out");
                return Err(SubsetError::Timeout);
            }
        }

        let outputs = sorted_output_files(&output_dir).await?;
        let Some(primary) = outputs.first() else {
            return Err(SubsetError::NoOutput);
        };
        if outputs.len() > 1 {
            // The tool contract is one primary output; the lexicographic
            // sort above makes the pick deterministic regardless.
            warn!(
                job_id = %job.id,
                count = outputs.len(),
                picked = %primary.display(),
                "subsetting produced multiple output files"
            );
        }

        let bytes = tokio::fs::read(primary).await?;
        let extension = primary
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "ttf".to_string());

        info!(
            job_id = %job.id,
            size = bytes.len(),
            extension = %extension,
            "subsetting completed"
        );

        Ok(SubsetResult {
            bytes: Bytes::from(bytes),
            extension,
        })
    }
}

fn is_otf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("otf"))
}

async fn sorted_output_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
