use std::path::{Path, PathBuf};

use crate::DiscoverError;

pub fn is_demo(path: &Path) -> bool {
    path.extension().map(|ext| ext == "dem").unwrap_or(false)
}

/// Collects every demo under `paths`. Directories are walked recursively.
pub fn find_demos(paths: &[PathBuf]) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut demos = Vec::new();

    for path in paths {
        tracing::info!("Searching for demos in {:?}", path);

        if !path.exists() {
            return Err(DiscoverError::Missing(path.clone()));
        }

        if path.is_file() {
            if is_demo(path) {
                demos.push(path.clone());
            }
            continue;
        }

        walk(path, &mut demos)?;
    }

    demos.sort();
    demos.dedup();

    Ok(demos)
}

fn walk(dir: &Path, demos: &mut Vec<PathBuf>) -> Result<(), DiscoverError> {
    let read_err = |source| DiscoverError::Read {
        path: dir.to_owned(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();

        if path.is_dir() {
            walk(&path, demos)?;
        } else if is_demo(&path) {
            demos.push(path);
        }
    }

    Ok(())
}
