//! Consistent response envelope for all API endpoints.
//!
//! Success bodies are `{ "data": T, "meta": { ... } }` via [`ApiResponse`].
//! Handler failures are [`ApiError`]s, rendered as
//! `{ "error": { "code", "message" }, "meta": { ... } }` with a status code
//! derived from the pipeline error that caused them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::ProductionError;

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: "1",
        }
    }
}

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::default(),
        };
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &'static str, message: String) -> Response {
        let body = Self {
            error: ErrorDetail { code, message },
            meta: ResponseMeta::default(),
        };
        (status, axum::Json(body)).into_response()
    }

    pub fn not_found(message: impl Into<String>) -> Response {
        Self::build(StatusCode::NOT_FOUND, "NOT_FOUND", message.into())
    }
}

/// Why a request could not be answered.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed `date` query value
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Production(#[from] ProductionError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidDate(_) => (StatusCode::BAD_REQUEST, "INVALID_DATE"),
            Self::Production(e) if !e.is_recoverable() => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATA_SOURCE")
            }
            // Unknown well, or nothing at all to show
            Self::Production(ProductionError::EmptySelection(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            Self::Production(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_DATA"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        ApiErrorResponse::build(status, code, self.to_string())
    }
}

/// Handler result: enveloped data or an enveloped error.
pub type ApiResult = Result<Response, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HiMetric;
    use chrono::NaiveDate;

    async fn body(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ok_response_shape() {
        let resp = ApiResponse::ok(serde_json::json!({"wells": 4}));
        assert_eq!(resp.status(), StatusCode::OK);

        let v = body(resp).await;
        assert_eq!(v["data"]["wells"], 4);
        assert_eq!(v["meta"]["version"], "1");
    }

    #[tokio::test]
    async fn test_unknown_well_is_not_found() {
        let err = ApiError::from(ProductionError::EmptySelection("well 'W-99'".into()));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let v = body(resp).await;
        assert_eq!(v["error"]["code"], "NOT_FOUND");
        assert!(v["error"]["message"].as_str().unwrap().contains("W-99"));
    }

    #[tokio::test]
    async fn test_invalid_date_is_bad_request() {
        let resp = ApiError::InvalidDate("14/2024".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await["error"]["code"], "INVALID_DATE");
    }

    #[test]
    fn test_data_source_is_server_error() {
        let err = ApiError::from(ProductionError::data_source("wells.csv", Some(2), "bad row"));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "DATA_SOURCE")
        );
    }

    #[test]
    fn test_zero_average_is_unprocessable() {
        let err = ApiError::from(ProductionError::DivisionByZero {
            metric: HiMetric::Oil,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        });
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
