//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{BusError, SynthesisError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
    pub const GATEWAY_TIMEOUT: i32 = 504;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    ServiceUnavailable(String),
    GatewayTimeout(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
            ApiError::GatewayTimeout(_) => errno::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let msg = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno, error = %msg, "Bad request");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno, error = %msg, "Internal server error");
                msg
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno, error = %msg, "Service unavailable");
                msg
            }
            ApiError::GatewayTimeout(msg) => {
                tracing::warn!(errno, error = %msg, "Synthesis timed out");
                msg
            }
        };

        (StatusCode::OK, Json(ErrorResponse::new(errno, msg))).into_response()
    }
}

impl From<SynthesisError> for ApiError {
    fn from(e: SynthesisError) -> Self {
        let msg = e.to_string();
        match e {
            SynthesisError::InvalidRequest(_) => ApiError::BadRequest(msg),
            SynthesisError::Timeout { .. } => ApiError::GatewayTimeout(msg),
            SynthesisError::DependencyUnavailable(_) | SynthesisError::BusClosed => {
                ApiError::ServiceUnavailable(msg)
            }
            SynthesisError::DecodeFailure { .. }
            | SynthesisError::Cancelled
            | SynthesisError::Encoding(_) => ApiError::Internal(msg),
        }
    }
}

impl From<BusError> for ApiError {
    fn from(e: BusError) -> Self {
        match e {
            BusError::Malformed(_) => ApiError::BadRequest(e.to_string()),
            BusError::Closed => ApiError::ServiceUnavailable(e.to_string()),
            BusError::AlreadySubscribed => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_synthesis_error_mapping() {
        let cases = [
            (SynthesisError::invalid("empty"), errno::BAD_REQUEST),
            (
                SynthesisError::Timeout {
                    waited: Duration::from_secs(1),
                    outstanding: 2,
                },
                errno::GATEWAY_TIMEOUT,
            ),
            (
                SynthesisError::DependencyUnavailable("down".to_string()),
                errno::SERVICE_UNAVAILABLE,
            ),
            (SynthesisError::BusClosed, errno::SERVICE_UNAVAILABLE),
            (SynthesisError::decode("c1", "bad"), errno::INTERNAL_ERROR),
            (SynthesisError::Cancelled, errno::INTERNAL_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).errno(), expected);
        }
    }

    #[test]
    fn test_envelope_keeps_http_ok() {
        let response = ApiError::BadRequest("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
