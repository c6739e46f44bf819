use thiserror::Error;

/// Failure to derive nested components from a raw record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("record \"{0}\" has no tags to derive a theme from")]
    MissingTags(String),
    #[error("record \"{label}\" could not be shaped into a document: {message}")]
    Serialize { label: String, message: String },
}

/// Failure to persist a single document.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The CMS answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },
    #[error("request failed for {endpoint}: {message}")]
    Transport { endpoint: String, message: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure inside a direct store (documents, settings or permissions).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("role \"{0}\" not found")]
    RoleNotFound(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// The seed dataset could not be read or is structurally invalid.
#[derive(Error, Debug)]
pub enum SeedDataError {
    #[error("failed to read seed data {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {collection} record at index {index}: {reason}")]
    Invalid {
        collection: &'static str,
        index: usize,
        reason: String,
    },
}

/// Fatal failure of a whole seeding run.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("run guard: {0}")]
    Guard(#[source] StoreError),
    #[error("granting public permissions failed: {0}")]
    Permissions(#[source] StoreError),
}
