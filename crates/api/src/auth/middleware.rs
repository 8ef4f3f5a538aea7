//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use substatus_billing::{ErrorKind, IdentityContext, QueryResponse};

use super::jwt::JwtManager;

/// Authenticated user information extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl AuthUser {
    /// Identity context handed to the billing queries
    pub fn identity(&self) -> IdentityContext {
        IdentityContext {
            sub: self.user_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// State needed for authentication
#[derive(Clone)]
pub struct AuthState {
    pub jwt_manager: JwtManager,
}

/// Extract the bearer token from the Authorization header
pub(crate) fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
}

/// Middleware that requires authentication
///
/// Inserts the caller's [`IdentityContext`] into the request extensions. A
/// token without a `sub` claim passes here and is rejected by the billing
/// queries themselves.
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let auth_result = match extract_bearer_token(&request) {
        Some(token) => authenticate_jwt(&auth_state, &token),
        None => {
            tracing::warn!(path = %path, "require_auth: no bearer token");
            Err(AuthError::MissingAuth)
        }
    };

    match auth_result {
        Ok(auth_user) => {
            tracing::debug!(
                path = %path,
                user_id = ?auth_user.user_id,
                "require_auth: authentication successful"
            );
            request.extensions_mut().insert(auth_user.identity());
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(path = %path, error = ?err, "require_auth: authentication failed");
            err.into_response()
        }
    }
}

fn authenticate_jwt(auth_state: &AuthState, token: &str) -> Result<AuthUser, AuthError> {
    let claims = auth_state.jwt_manager.validate_access_token(token)?;
    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuth => "Authentication required",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        let body: QueryResponse<()> = QueryResponse::error(ErrorKind::Unauthorized, message);
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
