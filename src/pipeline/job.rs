//! Per-request job state and temporary-resource ownership.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use reqwest::Url;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::charset::Repertoire;

#[derive(Debug)]
enum TempResource {
    File(PathBuf),
    Dir(PathBuf),
}

impl TempResource {
    fn path(&self) -> &Path {
        match self {
            TempResource::File(path) | TempResource::Dir(path) => path,
        }
    }
}

/// One font-subsetting job. Owns every temporary path created on its
/// behalf; nothing outside the job may delete them, and `cleanup` must run
/// exactly once per job, after the pipeline outcome is known.
pub struct FontJob {
    pub id: Uuid,
    pub source_url: Url,
    pub repertoire: Repertoire,
    resources: Mutex<Vec<TempResource>>,
}

impl FontJob {
    pub fn new(source_url: Url, repertoire: Repertoire) -> Self {
        Self {
            id: Uuid::now_v7(),
            source_url,
            repertoire,
            resources: Mutex::new(Vec::new()),
        }
    }

    pub fn register_file(&self, path: PathBuf) {
        self.lock().push(TempResource::File(path));
    }

    pub fn register_dir(&self, path: PathBuf) {
        self.lock().push(TempResource::Dir(path));
    }

    /// Delete every registered path, most recent first. Each deletion is
    /// attempted independently; failures are logged and never surfaced, so
    /// a stubborn file cannot mask the job's real outcome.
    pub async fn cleanup(&self) {
        let resources: Vec<TempResource> = {
            let mut guard = self.lock();
            guard.drain(..).rev().collect()
        };

        for resource in resources {
            let outcome = match &resource {
                TempResource::File(path) => tokio::fs::remove_file(path).await,
                TempResource::Dir(path) => tokio::fs::remove_dir_all(path).await,
            };

            match outcome {
                Ok(()) => {}
                // Already gone: a dir removal may have taken its file with it.
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(
                        job_id = %self.id,
                        path = %resource.path().display(),
                        error = %err,
                        "failed to remove temporary resource"
                    );
                }
            }
        }

        debug!(job_id = %self.id, "temporary resources cleaned up");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TempResource>> {
        self.resources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
