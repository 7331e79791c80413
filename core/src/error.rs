use thiserror::Error;

/// Failure of a single upstream request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("upstream answered with status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Decode(String),

    #[error("prediction for {received} returned while requesting {requested}")]
    TickerMismatch { requested: String, received: String },
}

/// Why a refresh cycle produced no new baseline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("baseline fetch failed: {0}")]
    BaselineFetchFailed(#[source] FetchError),

    #[error("a refresh cycle is already running")]
    Busy,
}

/// A ticker whose forecast could not be attached during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionFailure {
    pub ticker: String,
    pub error: FetchError,
}
