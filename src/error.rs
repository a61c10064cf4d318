//! Mutation results and the error type every handler returns.
//!
//! Failures are rendered as `{ "success": false, "message": ... }`, with
//! per-field messages for validation failures.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::repo::CatalogError;
use crate::storage::StoreError;

/// Field name -> validation messages.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// Body of every mutation response.
#[derive(Debug, Serialize)]
pub struct ActionResult<T: Serialize = ()> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ActionResult<()> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
            data: None,
        }
    }
}

impl<T: Serialize> ActionResult<T> {
    pub fn ok_with(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
            data: Some(data),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },

    #[error("{0}")]
    BadRequest(String),

    /// No or invalid credentials.
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated, but not the configured admin.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(errors: FieldErrors) -> Self {
        Self::Validation {
            message: "Invalid data.".into(),
            errors,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => Self::NotFound(format!("Product {id} not found.")),
            CatalogError::DuplicateName => {
                Self::Conflict("A product with this name already exists.".into())
            }
            CatalogError::UnknownCategory(_) => {
                let mut errors = FieldErrors::new();
                errors.insert("category_id", vec!["Category does not exist".into()]);
                Self::invalid(errors)
            }
            CatalogError::Database(e) => Self::Internal(anyhow::Error::new(e).context("catalog")),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        Self::Internal(anyhow::Error::new(e).context("local store"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                ("Something went wrong. Please try again.".to_string(), None)
            }
            Self::Validation { message, errors } => (message, Some(errors)),
            other => (other.to_string(), None),
        };
        let body = ActionResult::<()> {
            success: false,
            message,
            errors,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AppError::invalid(FieldErrors::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthenticated("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Unauthorized("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_name_maps_to_conflict_message() {
        let err = AppError::from(CatalogError::DuplicateName);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "A product with this name already exists.");
    }

    #[test]
    fn unknown_category_is_a_field_error() {
        match AppError::from(CatalogError::UnknownCategory(42)) {
            AppError::Validation { errors, .. } => assert!(errors.contains_key("category_id")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn internal_details_are_not_exposed() {
        let res = AppError::Internal(anyhow::anyhow!("password=hunter2")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(!body["message"].as_str().unwrap().contains("hunter2"));
    }

    #[test]
    fn ok_result_omits_empty_fields() {
        let json = serde_json::to_value(ActionResult::ok("done")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "message": "done" }));
    }
}
