//! Error types for arrayquery.
//!
//! All errors are deterministic and surface synchronously at the call site.
//! Predicate evaluation itself is total: missing fields and type mismatches
//! are "does not match", never an error.

use thiserror::Error;

/// Query error type
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    #[error("No record source: call from() before executing the query")]
    MissingSource,
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

impl serde::Serialize for QueryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QueryError::MalformedCondition("unknown operator 'xor'".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed condition: unknown operator 'xor'"
        );

        let err = QueryError::MissingSource;
        assert_eq!(
            err.to_string(),
            "No record source: call from() before executing the query"
        );
    }

    #[test]
    fn test_serialize_to_display_string() {
        let err = QueryError::MissingSource;
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            "\"No record source: call from() before executing the query\""
        );
    }
}
