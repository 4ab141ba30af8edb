//! Fixture files on disk.

use std::path::{Path, PathBuf};

use crate::{FixtureError, FixtureSource};

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FixtureSource for FileSource {
    async fn read(&mut self) -> Result<String, FixtureError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FixtureError::Io {
                origin: self.describe(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
