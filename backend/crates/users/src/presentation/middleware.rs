//! Auth Middleware
//!
//! API-key authentication for protected routes. The key travels in the
//! `Authorization: Bearer` header or, as a fallback, in `X-API-Key`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::UsersError;

/// Authenticated user stored in request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Arc<User>);

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

/// Middleware that requires a valid API key
pub async fn require_api_key<R>(
    axum::extract::State(state): axum::extract::State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Some(api_key) = extract_api_key(req.headers()) else {
        return Err(UsersError::InvalidCredentials.into_response());
    };

    let user = match state.repo.find_by_api_key(&api_key).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(UsersError::InvalidCredentials.into_response()),
        Err(e) => return Err(e.into_response()),
    };

    // Banned accounts keep their key but lose access until the window ends
    if user.is_banned(Utc::now()) {
        let until = user
            .banned_until
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        return Err(UsersError::AccountBanned { until }.into_response());
    }

    req.extensions_mut().insert(CurrentUser(Arc::new(user)));
    Ok(next.run(req).await)
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_api_key_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(extract_api_key(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_api_key_header_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("def456"));
        assert_eq!(extract_api_key(&headers), Some("def456".to_string()));
    }

    #[test]
    fn test_extract_api_key_missing() {
        assert_eq!(extract_api_key(&HeaderMap::new()), None);
    }
}
