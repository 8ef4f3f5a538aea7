//! API error type
//!
//! Every failure leaving a handler goes through [`ApiError`], which logs it
//! once and renders the tagged error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use substatus_billing::{BillingError, ErrorKind, QueryResponse};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A billing query failed; `fallback` is shown when the error has no message
    #[error("{source}")]
    Billing {
        source: BillingError,
        fallback: &'static str,
    },

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn billing(source: BillingError, fallback: &'static str) -> Self {
        ApiError::Billing { source, fallback }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Billing { source, .. } => source.kind(),
            ApiError::BadRequest(_) => ErrorKind::BadRequest,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::UpstreamProvider => StatusCode::BAD_GATEWAY,
            ErrorKind::MissingData => StatusCode::NOT_FOUND,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::Billing { source, fallback } => source.user_message(fallback),
            ApiError::BadRequest(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match kind {
            ErrorKind::Unauthorized | ErrorKind::BadRequest => {
                tracing::warn!(kind = %kind, error = %self, "Query rejected");
            }
            _ => {
                tracing::error!(kind = %kind, error = %self, error_debug = ?self, "Query failed");
            }
        }

        let body: QueryResponse<()> = QueryResponse::error(kind, self.user_message());
        (self.status_code(), Json(body)).into_response()
    }
}
