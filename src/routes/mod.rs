//! JSON REST endpoints over the registry services.

mod clients;
mod enrollments;
mod health;
mod programs;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::Router;
use serde::de::DeserializeOwned;

use crate::db::Database;
use crate::error::{RegistryError, RegistryResult};

/// Every API route plus the liveness check, bound to `db`
pub fn router(db: Database) -> Router {
    Router::new()
        .merge(programs::routes())
        .merge(clients::routes())
        .merge(enrollments::routes())
        .with_state(db)
        .merge(health::routes())
}

/// Decode a JSON request body
///
/// A missing or blank body reads as `T::default()`, so the services report
/// their own missing-field messages. Malformed JSON is a validation error.
pub(crate) fn parse_body<T>(body: &Bytes) -> RegistryResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| RegistryError::validation(e.to_string()))
}

/// Numeric `:id` from the path; anything else names no row
pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> Option<i64> {
    match path {
        Ok(Path(id)) => Some(id),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "non-numeric id in path");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnrollmentRequest;

    #[test]
    fn test_blank_body_reads_as_default() {
        let request: EnrollmentRequest = parse_body(&Bytes::from_static(b"  \n")).unwrap();
        assert_eq!(request.client_id, None);
        assert_eq!(request.program_id, None);
    }

    #[test]
    fn test_malformed_body_is_validation_error() {
        let err = parse_body::<EnrollmentRequest>(&Bytes::from_static(b"{oops")).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
    }
}
