//! Feed ingestion error types.

/// Errors raised while loading a GTFS feed directory.
///
/// Every variant is fatal: the planner cannot run without a valid feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A required feed file is absent
    #[error("missing required feed file: {0}")]
    Missing(&'static str),

    /// A row failed to parse or validate.
    ///
    /// Row-level parse failures carry the CSV line number; structural
    /// failures found after reading (duplicate keys, broken references)
    /// report line 0 with a descriptive reason.
    #[error("malformed {table} line {line}: {reason}")]
    Malformed {
        table: &'static str,
        line: u64,
        reason: String,
    },

    /// An I/O failure that is neither absence nor malformation
    #[error("failed to read {table}: {source}")]
    Io {
        table: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    /// Shorthand for a malformed-row error.
    pub(crate) fn malformed(table: &'static str, line: u64, reason: impl Into<String>) -> Self {
        Self::Malformed {
            table,
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeedError::Missing("stops.txt");
        assert_eq!(err.to_string(), "missing required feed file: stops.txt");

        let err = FeedError::malformed("routes.txt", 7, "unknown route_type \"9\"");
        assert_eq!(
            err.to_string(),
            "malformed routes.txt line 7: unknown route_type \"9\""
        );
    }
}
