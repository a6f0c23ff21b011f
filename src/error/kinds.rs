use std::{fmt, io};

/// Crate-wide `Result` type using [`EsdumpError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, EsdumpError>;

/// Top-level error type for esdump operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum EsdumpError {
    /// Configuration errors.
    Config(ConfigError),

    /// Store-level errors (catalog listing, transport).
    Store(StoreError),

    /// Scan errors during scroll pagination of one index.
    Scan(ScanError),

    /// Artifact write errors.
    Write(WriteError),

    /// I/O errors.
    Io(io::Error),

    /// HTTP client errors.
    Http(reqwest::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
///
/// These are always fatal: the run aborts before any work is scheduled.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Store-specific errors.
///
/// A failed catalog listing is fatal to the whole run since no export
/// work can be scheduled without it.
#[derive(Debug)]
pub enum StoreError {
    /// The store cannot be reached.
    Unavailable(String),

    /// The store rejected the request or returned an unusable response.
    BadResponse { status: u16, message: String },
}

/// Scan-specific errors.
///
/// Isolated to the index being scanned; other index exports are unaffected.
#[derive(Debug)]
pub enum ScanError {
    /// The server-side scroll cursor expired or was invalidated.
    ///
    /// The scan aborts; it is not restarted from page 1.
    CursorExpired { index: String },

    /// A page request failed.
    PageFailed { index: String, message: String },

    /// The store returned a page the scanner could not interpret.
    Malformed { index: String, message: String },
}

/// Artifact write errors.
///
/// Isolated to the index being written; a failed write leaves no artifact
/// under the final name.
#[derive(Debug)]
pub enum WriteError {
    /// Serialization of the document set failed.
    Serialize(String),

    /// The output file could not be created.
    Create { path: String, message: String },

    /// Writing or flushing the output failed.
    Io { path: String, message: String },

    /// The temp file could not be renamed into place.
    Rename { path: String, message: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for EsdumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EsdumpError::Config(e) => write!(f, "Configuration error: {e}"),
            EsdumpError::Store(e) => write!(f, "Store error: {e}"),
            EsdumpError::Scan(e) => write!(f, "Scan error: {e}"),
            EsdumpError::Write(e) => write!(f, "Write error: {e}"),
            EsdumpError::Io(e) => write!(f, "I/O error: {e}"),
            EsdumpError::Http(e) => write!(f, "HTTP error: {e}"),
            EsdumpError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
            StoreError::BadResponse { status, message } => {
                write!(f, "Store returned status {status}: {message}")
            }
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::CursorExpired { index } => {
                write!(f, "Scroll cursor expired while scanning '{index}'")
            }
            ScanError::PageFailed { index, message } => {
                write!(f, "Page request failed for '{index}': {message}")
            }
            ScanError::Malformed { index, message } => {
                write!(f, "Malformed page for '{index}': {message}")
            }
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Serialize(msg) => write!(f, "Failed to serialize documents: {msg}"),
            WriteError::Create { path, message } => {
                write!(f, "Failed to create '{path}': {message}")
            }
            WriteError::Io { path, message } => {
                write!(f, "Failed to write '{path}': {message}")
            }
            WriteError::Rename { path, message } => {
                write!(f, "Failed to finalize '{path}': {message}")
            }
        }
    }
}

impl std::error::Error for EsdumpError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for StoreError {}
impl std::error::Error for ScanError {}
impl std::error::Error for WriteError {}

/* ========================= Conversions to EsdumpError ========================= */

impl From<io::Error> for EsdumpError {
    fn from(err: io::Error) -> Self {
        EsdumpError::Io(err)
    }
}

impl From<reqwest::Error> for EsdumpError {
    fn from(err: reqwest::Error) -> Self {
        EsdumpError::Http(err)
    }
}

impl From<ConfigError> for EsdumpError {
    fn from(err: ConfigError) -> Self {
        EsdumpError::Config(err)
    }
}

impl From<StoreError> for EsdumpError {
    fn from(err: StoreError) -> Self {
        EsdumpError::Store(err)
    }
}

impl From<ScanError> for EsdumpError {
    fn from(err: ScanError) -> Self {
        EsdumpError::Scan(err)
    }
}

impl From<WriteError> for EsdumpError {
    fn from(err: WriteError) -> Self {
        EsdumpError::Write(err)
    }
}

impl From<String> for EsdumpError {
    fn from(msg: String) -> Self {
        EsdumpError::Generic(msg)
    }
}

impl From<&str> for EsdumpError {
    fn from(msg: &str) -> Self {
        EsdumpError::Generic(msg.to_owned())
    }
}

impl EsdumpError {
    /// Short machine-friendly name of the failure kind, used in per-index
    /// outcome lines.
    pub fn kind(&self) -> &'static str {
        match self {
            EsdumpError::Config(_) => "config",
            EsdumpError::Store(StoreError::Unavailable(_)) => "store-unavailable",
            EsdumpError::Store(StoreError::BadResponse { .. }) => "store-bad-response",
            EsdumpError::Scan(ScanError::CursorExpired { .. }) => "cursor-expired",
            EsdumpError::Scan(_) => "scan-failure",
            EsdumpError::Write(_) => "write-failure",
            EsdumpError::Io(_) => "io",
            EsdumpError::Http(_) => "http",
            EsdumpError::Generic(_) => "error",
        }
    }
}
