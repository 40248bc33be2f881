use thiserror::Error;

/// Failures of the authentication flow. Every variant ends the request; the
/// caller has to register or log in again.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateIdentity,

    /// Unknown email and wrong password both land here.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token invalid")]
    TokenInvalid,

    #[error("token expired")]
    TokenExpired,

    #[error("token subject no longer exists")]
    IdentityNotFound,

    #[error("internal auth error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Stable tag used in logs, where the 401 variants stay distinguishable.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::DuplicateIdentity => "duplicate_identity",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::IdentityNotFound => "identity_not_found",
            AuthError::Internal(_) => "internal",
        }
    }
}
