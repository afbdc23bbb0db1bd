use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A single field that failed validation, shared by request parsing and config loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct InvalidValue {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl InvalidValue {
    pub fn new(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Which upstream endpoint a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueFeed {
    Static,
    Dynamic,
}

impl fmt::Display for VenueFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueFeed::Static => f.write_str("static"),
            VenueFeed::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Failure of one upstream lookup. The engine only cares that it failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{feed} request failed: {source}")]
    Http {
        feed: VenueFeed,
        #[source]
        source: reqwest::Error,
    },

    #[error("{feed} endpoint returned {status}: {body}")]
    Status {
        feed: VenueFeed,
        status: u16,
        body: String,
    },

    #[error("{feed} payload malformed: {message}")]
    Malformed { feed: VenueFeed, message: String },

    #[error("{feed} request cancelled")]
    Cancelled { feed: VenueFeed },

    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    pub fn malformed(feed: VenueFeed, message: impl Into<String>) -> Self {
        FetchError::Malformed {
            feed,
            message: message.into(),
        }
    }

    pub fn feed(&self) -> Option<VenueFeed> {
        match self {
            FetchError::Http { feed, .. }
            | FetchError::Status { feed, .. }
            | FetchError::Malformed { feed, .. }
            | FetchError::Cancelled { feed } => Some(*feed),
            FetchError::Url(_) => None,
        }
    }
}

/// Why a delivery could not be offered for the computed distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailability {
    /// No range covered the distance.
    NoMatchingRange,
    /// A cutoff range starting at `from` meters was reached.
    CutoffReached { from: u64 },
}

/// Terminal outcome of a failed price computation.
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidValue),

    #[error("failed to fetch venue info")]
    UpstreamFetchFailed(#[source] FetchError),

    #[error("upstream timeout")]
    UpstreamTimeout { deadline: Duration },

    #[error("delivery not available for this distance")]
    DeliveryUnavailable {
        distance: u64,
        reason: Unavailability,
    },
}

impl PriceError {
    /// HTTP status class the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            PriceError::InvalidInput(_)
            | PriceError::UpstreamFetchFailed(_)
            | PriceError::DeliveryUnavailable { .. } => 400,
            PriceError::UpstreamTimeout { .. } => 504,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PriceError::InvalidInput(_) => "invalid_input",
            PriceError::UpstreamFetchFailed(_) => "upstream_fetch_failed",
            PriceError::UpstreamTimeout { .. } => "upstream_timeout",
            PriceError::DeliveryUnavailable { .. } => "delivery_unavailable",
        }
    }
}

/// Startup errors: configuration, binding the listener, building the HTTP client.
#[derive(Error, Debug)]
pub enum DopcError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    ClientError(#[from] reqwest::Error),

    #[error("Invalid configuration value {0}")]
    InvalidConfigValueError(#[from] InvalidValue),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing environment variable: {name}")]
    MissingEnvVarError { name: String },
}

pub type Result<T> = std::result::Result<T, DopcError>;
