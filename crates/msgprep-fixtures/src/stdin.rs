//! Fixture text piped on standard input.

use tokio::io::AsyncReadExt;

use crate::{FixtureError, FixtureSource};

#[derive(Debug, Clone, Default)]
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        Self
    }
}

impl FixtureSource for StdinSource {
    async fn read(&mut self) -> Result<String, FixtureError> {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|source| FixtureError::Io {
                origin: self.describe(),
                source,
            })?;
        Ok(text)
    }

    fn describe(&self) -> String {
        "<stdin>".to_string()
    }
}
