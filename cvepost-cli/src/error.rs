//! CLI-specific error types and exit code mapping

use cvepost_core::error::CvepostError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to documented exit codes so that
/// cron wrappers can tell startup failures apart.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration missing, unparseable, or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Seen-advisory store could not be initialized, loaded, or persisted.
    #[error("cache store error: {0}")]
    CacheStore(String),

    /// Feed could not be read or parsed (the whole feed is unusable).
    #[error("feed error: {0}")]
    Feed(String),

    /// Digest delivery failed; the cache was left untouched.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success (including an empty notify set)   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration missing or invalid          |
    /// | 3    | Seen-advisory store init/load/persist     |
    /// | 4    | Feed read or parse failure                |
    /// | 5    | Digest dispatch failure                   |
    /// | 10   | Other IO error                            |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::CacheStore(_) => 3,
            Self::Feed(_) => 4,
            Self::Dispatch(_) => 5,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<CvepostError> for CliError {
    fn from(e: CvepostError) -> Self {
        match e {
            CvepostError::Config(err) => Self::Config(err.to_string()),
            CvepostError::Feed(err) => Self::Feed(err.to_string()),
            CvepostError::Cache(err) => Self::CacheStore(err.to_string()),
            CvepostError::Dispatch(err) => Self::Dispatch(err.to_string()),
            CvepostError::Io(err) => Self::Io(err),
        }
    }
}

impl From<cvepost_advisory::AdvisoryError> for CliError {
    fn from(e: cvepost_advisory::AdvisoryError) -> Self {
        Self::Feed(e.to_string())
    }
}

impl From<cvepost_notify::NotifyError> for CliError {
    fn from(e: cvepost_notify::NotifyError) -> Self {
        match e {
            cvepost_notify::NotifyError::Dispatch(msg) => Self::Dispatch(msg),
            err => Self::CacheStore(err.to_string()),
        }
    }
}
