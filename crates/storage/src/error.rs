use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    #[snafu(display("storage backend '{backend}' is unavailable: {details}"))]
    Unavailable {
        stage: &'static str,
        backend: &'static str,
        details: String,
    },
    #[snafu(display("storage backend '{backend}' rejected key '{key}': {details}"))]
    Backend {
        stage: &'static str,
        backend: &'static str,
        key: String,
        details: String,
    },
    #[snafu(display("key '{key}' cannot be used as a file name"))]
    InvalidKey {
        stage: &'static str,
        key: String,
    },
    #[snafu(display("failed to create store directory at {path}"))]
    CreateStoreDirectory {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("failed to read store file {path}"))]
    ReadStore {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("failed to write store file {path}"))]
    WriteStore {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("failed to rename {from} to {to}"))]
    RenameTempFile {
        stage: &'static str,
        from: String,
        to: String,
        source: std::io::Error,
    },
    #[snafu(display("failed to remove store file {path}"))]
    RemoveStore {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("message log under '{key}' is not valid JSON"))]
    DecodeLog {
        stage: &'static str,
        key: String,
        source: serde_json::Error,
    },
    #[snafu(display("failed to encode message log"))]
    EncodeLog {
        stage: &'static str,
        source: serde_json::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
