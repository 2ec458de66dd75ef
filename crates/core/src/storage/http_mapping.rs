//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Conflict` -> 400 (Bad Request)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `Throttled`, `Unavailable`, `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed`, `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use lapsus_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "License",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Conflict(_) => 400,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::Throttled(_) => 503,
        RepositoryError::Unavailable(_) => 503,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "License",
            id: "lic-123".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_conflict_maps_to_400() {
        let error = RepositoryError::Conflict("Email already registered".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "User",
            id: "user-456".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_transient_failures_map_to_503() {
        for error in [
            RepositoryError::Throttled("rate exceeded".to_string()),
            RepositoryError::Unavailable("internal server error".to_string()),
            RepositoryError::ConnectionFailed("timeout".to_string()),
        ] {
            assert_eq!(repository_error_to_status_code(&error), 503);
        }
    }

    #[test]
    fn test_query_failed_maps_to_500() {
        let error = RepositoryError::QueryFailed("validation exception".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_serialization_maps_to_500() {
        let error = RepositoryError::Serialization("missing field".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = RepositoryError::InvalidData("bad cursor".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }
}
