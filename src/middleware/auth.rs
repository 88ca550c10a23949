use axum::extract::FromRequestParts;

use crate::error::AppError;

pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_BYPASS: &str = "x-bypass-auth";
pub const BYPASS_USER: &str = "default-user";

/// Caller identity taken from `X-User-ID`, or the shared demo user when
/// `X-Bypass-Auth: true` is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl AuthUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let bypass = parts
            .headers
            .get(HEADER_BYPASS)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        if bypass {
            return Ok(AuthUser::new(BYPASS_USER));
        }

        let user_id = parts
            .headers
            .get(HEADER_USER_ID)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?
            .trim();
        if user_id.is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser::new(user_id))
    }
}
