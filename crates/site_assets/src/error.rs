use std::io;
use std::path::PathBuf;

use site_engine::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("package directory {0:?} must be a relative path below the site root")]
    OutputDir(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk package directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

impl PackageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
