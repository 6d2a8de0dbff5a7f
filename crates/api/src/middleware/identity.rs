//! Caller identity.
//!
//! Authentication happens upstream. The API only asks an [`IdentityResolver`]
//! for the current user id; the default resolver trusts a header set by the
//! authenticating reverse proxy.

use axum::{
    extract::FromRequestParts,
    http::{HeaderName, request::Parts},
};

use storeboard_core::UserId;

use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Resolves the caller of a request, if any.
pub trait IdentityResolver: Send + Sync + 'static {
    /// The authenticated user id, or `None` for anonymous requests.
    fn resolve(&self, parts: &Parts) -> Option<UserId>;
}

/// Reads the user id from a header injected by a trusted proxy.
///
/// Missing, non-UTF-8 or malformed values are treated as anonymous.
#[derive(Debug, Clone)]
pub struct TrustedHeader {
    header: HeaderName,
}

impl TrustedHeader {
    #[must_use]
    pub const fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl IdentityResolver for TrustedHeader {
    fn resolve(&self, parts: &Parts) -> Option<UserId> {
        let value = parts.headers.get(&self.header)?.to_str().ok()?;
        UserId::parse(value).ok()
    }
}

/// Extractor that requires a caller identity.
///
/// Rejects with 401 before the body is read, so anonymous mutations never
/// reach validation or the ownership guard.
///
/// # Example
///
/// ```rust,ignore
/// async fn create(RequireCaller(caller): RequireCaller) -> impl IntoResponse {
///     format!("Hello, {caller}!")
/// }
/// ```
pub struct RequireCaller(pub UserId);

impl FromRequestParts<AppState> for RequireCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = state
            .identity()
            .resolve(parts)
            .ok_or(AppError::Unauthenticated)?;

        set_sentry_user(caller.as_str());
        Ok(Self(caller))
    }
}
