use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read site snapshot {path}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse site snapshot {path}: {source}")]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read hook input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Push forwarder task failed: {0}")]
    Forwarder(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Core(#[from] pushsource_core::CoreError),
}
