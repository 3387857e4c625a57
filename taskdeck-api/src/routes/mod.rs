/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login endpoint
/// - `companies`: Company CRUD
/// - `users`: User CRUD
/// - `tasks`: Task CRUD
///
/// Every handler follows the same shape: validate required fields, run the
/// uniqueness pre-check for creates, apply the authorization predicate,
/// perform the persistence call, and map the record to its outward
/// representation (secrets excluded).

use crate::error::{ApiError, ValidationErrorDetail};
use serde::Deserialize;
use validator::Validate;

pub mod auth;
pub mod companies;
pub mod health;
pub mod tasks;
pub mod users;

/// Pagination query parameters
///
/// Defaults: page 1, limit 10. Values below 1 are clamped.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: i64,

    /// Page size
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Pagination {
    /// Effective page size
    pub fn limit(&self) -> i64 {
        self.limit.max(1)
    }

    /// Row offset for the requested page
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Runs validator-derive checks on a request DTO
///
/// Collects every field failure into the 400 validation response.
pub(crate) fn validate_dto<T: Validate>(dto: &T) -> Result<(), ApiError> {
    dto.validate().map_err(|e| {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::Validation(errors)
    })
}

/// Drops empty string values from partial-update payloads
///
/// A field present with a non-empty value overwrites the stored field;
/// absent or empty fields are left untouched. An empty string therefore
/// cannot clear a stored field — indistinguishable from "no change", which
/// is the preserved contract of the update endpoints.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination { page: 3, limit: 20 };
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_pagination_clamps_below_one() {
        let p = Pagination { page: 0, limit: -5 };
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_non_empty_drops_empty_values() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("value".to_string())), Some("value".to_string()));
    }
}
