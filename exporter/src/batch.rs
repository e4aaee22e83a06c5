use std::path::{Path, PathBuf};

use futures::StreamExt;

use crate::{Config, ProcessError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Exported(PathBuf),
    AlreadyExported(PathBuf),
}

/// The export lives next to the demo, `match.dem` -> `match.json`.
pub fn output_path(demo: &Path) -> PathBuf {
    demo.with_extension("json")
}

#[tracing::instrument]
pub fn process_file(path: &Path, skip_existing: bool) -> Result<Outcome, ProcessError> {
    let output = output_path(path);
    if skip_existing && output.exists() {
        tracing::debug!(?output, "Already exported");
        return Ok(Outcome::AlreadyExported(output));
    }

    let file = std::fs::File::open(path).map_err(|source| ProcessError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mmap = unsafe { memmap2::MmapOptions::new().map(&file) }.map_err(|source| {
        ProcessError::Map {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let game = crate::demo::analyse(&mmap)?;
    tracing::info!(rounds = game.rounds.len(), map = %game.map_name, "Analysed demo");

    crate::export::write(&output, &crate::export::to_export(game))?;

    Ok(Outcome::Exported(output))
}

#[derive(Debug, Default)]
pub struct Summary {
    pub exported: usize,
    pub skipped: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.exported + self.skipped + self.failed.len()
    }
}

/// Processes all the files, with at most `config.jobs` demos being decoded at
/// the same time. A failing demo is recorded and does not stop the others.
pub async fn run(files: Vec<PathBuf>, config: &Config) -> Summary {
    run_with(files, config, process_file).await
}

/// [`run`] with a different job per file.
pub async fn run_with<F>(files: Vec<PathBuf>, config: &Config, job: F) -> Summary
where
    F: Fn(&Path, bool) -> Result<Outcome, ProcessError> + Copy + Send + 'static,
{
    let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(config.jobs.max(1)));
    let total = files.len();

    let mut pending = futures::stream::FuturesUnordered::new();
    for path in files {
        let semaphore = semaphore.clone();
        let skip_existing = config.skip_existing;

        let blocking_path = path.clone();
        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(p) => p,
                Err(e) => return Err(ProcessError::Worker(e.to_string())),
            };

            tokio::task::spawn_blocking(move || job(&blocking_path, skip_existing))
                .await
                .unwrap_or_else(|e| Err(ProcessError::Worker(e.to_string())))
        });

        pending.push(async move {
            let result = handle
                .await
                .unwrap_or_else(|e| Err(ProcessError::Worker(e.to_string())));
            (path, result)
        });
    }

    let mut summary = Summary::default();
    while let Some((path, result)) = pending.next().await {
        match result {
            Ok(Outcome::Exported(output)) => {
                tracing::debug!(?output, "Wrote export");
                summary.exported += 1;
            }
            Ok(Outcome::AlreadyExported(_)) => {
                summary.skipped += 1;
            }
            Err(e) => {
                tracing::error!(?path, "Failed: {}", e);
                summary.failed.push((path, e.to_string()));
            }
        }

        tracing::info!("Processed {}/{}", summary.total(), total);
    }

    summary
}
