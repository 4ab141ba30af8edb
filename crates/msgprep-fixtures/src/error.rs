use msgprep_core::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture is not valid JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: not valid JSON: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: expected an object with \"key\" and \"packet\"")]
    Entry { line: usize },

    #[error("record {key:?}: {source}")]
    Record {
        key: String,
        #[source]
        source: PipelineError,
    },
}
