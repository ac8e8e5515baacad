use dynweather_core::NetworkError;
use thiserror::Error;

/// Why a relay request produced no response body.
///
/// The `Display` output is what ends up in an envelope's `error` field.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0} request timed out")]
    TimedOut(&'static str),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FetchError::TimedOut(_) | FetchError::Network(NetworkError::Timeout)
        )
    }
}

/// Failures that stop the notification bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to set up relay: {0}")]
    Setup(#[from] FetchError),

    #[error("Bridge I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_out_names_the_relay() {
        let err = FetchError::TimedOut("Holiday");
        assert_eq!(err.to_string(), "Holiday request timed out");
        assert!(err.is_timeout());
    }

    #[test]
    fn network_error_is_transparent() {
        let err: FetchError = NetworkError::ConnectionFailed("refused".into()).into();
        assert_eq!(err.to_string(), "Connection failed: refused");
        assert!(!err.is_timeout());
    }
}
