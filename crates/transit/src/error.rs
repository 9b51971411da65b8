use std::{error::Error, fmt};

use database::StoreError;
use gtfs::{bundle::BundleError, fetch::FetchError, realtime::RealtimeError};

/// Error taxonomy of the core. Background loops log and continue on
/// everything except `Fatal`; `IllegalState` marks programmer errors.
#[derive(Debug)]
pub enum CoreError {
    /// Configuration conflicts surfaced at start-up.
    ConfigInvalid(String),

    /// Network or store trouble worth retrying on the next tick.
    Transient(Box<dyn Error + Send + Sync>),

    /// The static bundle or a realtime payload did not parse. The previous
    /// data keeps being served.
    InvalidBundle(Box<dyn Error + Send + Sync>),

    /// A requested entity is absent. Query methods return empty results
    /// instead of raising this; it only travels internally.
    NotFound,

    /// A one-shot API was driven out of order.
    IllegalState(&'static str),

    /// Propagated from the caller's cancellation token.
    Cancelled,

    /// The store could not be reopened after a swap; the manager is
    /// unhealthy until an operator intervenes.
    Fatal(String),
}

impl CoreError {
    pub fn transient<E: Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Transient(Box::new(why))
    }

    /// Whether the next scheduled attempt may succeed without intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::InvalidBundle(_))
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigInvalid(why) => write!(f, "invalid configuration: {}", why),
            Self::Transient(why) => write!(f, "transient failure: {}", why),
            Self::InvalidBundle(why) => write!(f, "invalid input data: {}", why),
            Self::NotFound => write!(f, "not found"),
            Self::IllegalState(what) => write!(f, "illegal state: {}", what),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Fatal(why) => write!(f, "fatal: {}", why),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transient(why) | Self::InvalidBundle(why) => Some(why.as_ref()),
            _ => None,
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(why: StoreError) -> Self {
        match why {
            StoreError::NotFound => Self::NotFound,
            StoreError::Cancelled => Self::Cancelled,
            StoreError::Other(why) => Self::Transient(why),
        }
    }
}

impl From<FetchError> for CoreError {
    fn from(why: FetchError) -> Self {
        match why {
            FetchError::Cancelled => Self::Cancelled,
            other => Self::Transient(Box::new(other)),
        }
    }
}

impl From<BundleError> for CoreError {
    fn from(why: BundleError) -> Self {
        Self::InvalidBundle(Box::new(why))
    }
}

impl From<RealtimeError> for CoreError {
    fn from(why: RealtimeError) -> Self {
        match why {
            RealtimeError::Fetch(fetch) => fetch.into(),
            RealtimeError::InvalidFeed(decode) => {
                Self::InvalidBundle(Box::new(decode))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
