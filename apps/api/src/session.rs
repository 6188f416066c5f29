//! Browser sessions. A session is just a UUID carried in the `session_id` cookie
//! (or the `x-session-id` header for API clients); history is bucketed by it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "session_id";
pub const SESSION_HEADER: &str = "x-session-id";
const SESSION_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts only well-formed UUIDs, normalised to lowercase hyphenated form.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        Uuid::parse_str(raw.trim())
            .map(|id| Self(id.to_string()))
            .map_err(|_| {
                AppError::Session(
                    "Invalid session ID. Please start a new session.".to_string(),
                )
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = cookie_value(&parts.headers, SESSION_COOKIE).or_else(|| {
            parts
                .headers
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
        });

        match raw {
            Some(value) if !value.trim().is_empty() => SessionId::parse(value),
            _ => Err(AppError::Session(
                "Session ID is required. Please start a new session.".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
}

/// POST /api/v1/sessions
///
/// Issues a fresh session id and sets it as an HttpOnly cookie.
pub async fn handle_new_session() -> impl IntoResponse {
    let session = SessionId::new();
    info!("Created session {}", session.as_str());
    let cookie = format!(
        "{SESSION_COOKIE}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECS}",
        session.as_str()
    );
    (
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse {
            session_id: session.into_inner(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<SessionId, AppError> {
        let (mut parts, _) = req.into_parts();
        SessionId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_cookie_among_others() {
        let id = Uuid::new_v4();
        let req = Request::builder()
            .header(header::COOKIE, format!("theme=dark; session_id={id}; lang=en"))
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap().as_str(), id.to_string());
    }

    #[tokio::test]
    async fn test_falls_back_to_header() {
        let id = Uuid::new_v4();
        let req = Request::builder()
            .header(SESSION_HEADER, id.to_string().to_uppercase())
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap().as_str(), id.to_string());
    }

    #[tokio::test]
    async fn test_missing_session_is_rejected() {
        let req = Request::builder().body(()).unwrap();
        assert!(matches!(extract(req).await, Err(AppError::Session(_))));
    }

    #[tokio::test]
    async fn test_non_uuid_session_is_rejected() {
        let req = Request::builder()
            .header(header::COOKIE, "session_id=../../etc")
            .body(())
            .unwrap();
        let err = extract(req).await.unwrap_err();
        assert!(err.to_string().contains("Invalid session ID"));
    }
}
