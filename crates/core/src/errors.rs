//! Error types for the rostergen core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Collation(#[from] CollationError),

    #[error(transparent)]
    AuthorsFile(#[from] AuthorsFileError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// History export errors
// ---------------------------------------------------------------------------

/// Errors from exporting author records out of revision history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// `git log` exited with a non-zero status.
    #[error("git log failed (exit {exit_code}): {stderr}")]
    CommandFailed {
        exit_code: i32,
        stderr: String,
    },

    /// The exported records were not valid UTF-8.
    #[error("git log output is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    /// The repository path does not exist or is not a git repo.
    #[error("git repository not found at '{0}'")]
    RepositoryNotFound(String),

    /// A revision (branch, tag, SHA) could not be resolved.
    #[error("git revision not found: {0}")]
    RevisionNotFound(String),

    /// A `git2` library error.
    #[error("git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Generic I/O wrapper.
    #[error("history I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Reference table errors
// ---------------------------------------------------------------------------

/// Consistency violations in the compiled-in reference tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// An identity is both blacklisted and a forced patch author.
    #[error("identity '{identity}' is listed in both the blacklist and the patch-author set")]
    Overlap { identity: String },

    /// An identity is listed twice in the same table.
    #[error("identity '{identity}' is listed more than once in the {table}")]
    Duplicate { table: String, identity: String },
}

// ---------------------------------------------------------------------------
// Collation errors
// ---------------------------------------------------------------------------

/// Errors from configuring locale-aware collation.
#[derive(Debug, Error)]
pub enum CollationError {
    /// The C library rejected the requested locale.
    #[error("unsupported locale '{0}'")]
    UnsupportedLocale(String),

    /// The locale name cannot be passed to the C library.
    #[error("invalid locale name '{0}': contains a NUL byte")]
    InvalidLocaleName(String),
}

// ---------------------------------------------------------------------------
// AUTHORS file errors
// ---------------------------------------------------------------------------

/// Errors from reading or writing the AUTHORS file.
#[derive(Debug, Error)]
pub enum AuthorsFileError {
    /// Reading or writing the file failed.
    #[error("AUTHORS file I/O error at '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Renaming the temporary file over the target failed.
    #[error("failed to replace AUTHORS file at '{path}': {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An existing file does not start with the expected header.
    #[error("AUTHORS file at '{0}' does not start with the expected header")]
    MissingHeader(String),

    /// An existing file does not end with the expected trailer.
    #[error("AUTHORS file at '{0}' does not end with the expected trailer")]
    MissingTrailer(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
