//! Geocoder error types.

/// Errors from the geocoding client.
///
/// These abort the current query only; the process keeps serving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// The provider resolved nothing for the place string
    #[error("no geocoding results for the given place")]
    NoResults,

    /// The provider rejected the request (missing or invalid API key)
    #[error("geocoding request denied (check the API key)")]
    AuthDenied,

    /// The request never completed (DNS, connect, timeout, 5xx)
    #[error("geocoding network error: {0}")]
    NetworkError(String),

    /// The response body was not the expected JSON shape
    #[error("geocoding response could not be parsed: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            GeocodeError::NoResults.to_string(),
            "no geocoding results for the given place"
        );
        assert_eq!(
            GeocodeError::AuthDenied.to_string(),
            "geocoding request denied (check the API key)"
        );
        assert!(GeocodeError::NetworkError("timed out".into())
            .to_string()
            .contains("timed out"));
    }
}
