use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("opening {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("mapping {path:?}: {source}")]
    Map {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("decoding demo: {0}")]
    Decode(String),
    #[error(transparent)]
    Broken(#[from] analysis::HeaderError),
    #[error("serializing export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("writing {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("path {0:?} does not exist")]
    Missing(PathBuf),
    #[error("reading directory {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
