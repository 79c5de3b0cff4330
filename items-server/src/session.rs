//! The authenticated caller, passed to handlers as an explicit value.
//!
//! The host authenticates requests and inserts a `Session` into the request
//! extensions; handlers take `Session` as an extractor argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{Extension, Router};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Attach the same session to every request routed through `router`.
pub fn with_session<S>(router: Router<S>, session: Session) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(Extension(session))
}
