//! Tagged query envelope returned to the UI

use serde::{Deserialize, Serialize};

use crate::error::{BillingError, ErrorKind};

/// Either the query's data or a typed error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum QueryResponse<T> {
    Ok { data: T },
    Error { kind: ErrorKind, message: String },
}

impl<T> QueryResponse<T> {
    pub fn ok(data: T) -> Self {
        QueryResponse::Ok { data }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        QueryResponse::Error {
            kind,
            message: message.into(),
        }
    }

    /// Build the error arm from a billing failure
    pub fn from_billing_error(err: &BillingError, fallback: &str) -> Self {
        Self::error(err.kind(), err.user_message(fallback))
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, QueryResponse::Ok { .. })
    }
}
