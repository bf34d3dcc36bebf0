//! Normalization of wrapped-client failures into a single error shape.

use crate::client::ClientError;
use thiserror::Error;

/// Errors surfaced through auth state or returned from context methods.
///
/// Client failures are folded into two categories: login errors, from the
/// initial session setup and popup connects, and token errors, from silent
/// token fetches and redirect-callback handling. Both keep the wrapped
/// client's message and original error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Failure while establishing a session.
    #[error("login failed: {message}")]
    Login {
        message: String,
        code: Option<String>,
    },

    /// Failure while acquiring a token or finishing a redirect exchange.
    #[error("token request failed: {message}")]
    Token {
        message: String,
        code: Option<String>,
    },

    /// A context method was invoked outside of an `AuthConnectProvider`
    /// subtree.
    #[error("no AuthConnectProvider found; wrap your component tree in one")]
    MissingProvider,
}

impl AuthError {
    /// Normalize a client failure from a login surface.
    pub fn login(err: ClientError) -> Self {
        Self::Login {
            message: err.message,
            code: err.code,
        }
    }

    /// Normalize a client failure from a token surface.
    pub fn token(err: ClientError) -> Self {
        Self::Token {
            message: err.message,
            code: err.code,
        }
    }

    /// Message carried over from the wrapped client.
    pub fn message(&self) -> &str {
        match self {
            Self::Login { message, .. } | Self::Token { message, .. } => message,
            Self::MissingProvider => "no AuthConnectProvider found",
        }
    }

    /// Original error code reported by the wrapped client, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Login { code, .. } | Self::Token { code, .. } => code.as_deref(),
            Self::MissingProvider => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_normalization_keeps_code() {
        let err = AuthError::login(ClientError::with_code("popup closed", "popup_closed"));
        assert_eq!(err.message(), "popup closed");
        assert_eq!(err.code(), Some("popup_closed"));
        assert!(matches!(err, AuthError::Login { .. }));
    }

    #[test]
    fn test_token_normalization_without_code() {
        let err = AuthError::token(ClientError::new("session expired"));
        assert_eq!(err.message(), "session expired");
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "token request failed: session expired");
    }

    #[test]
    fn test_missing_provider_display_names_the_provider() {
        let err = AuthError::MissingProvider;
        assert!(err.to_string().contains("AuthConnectProvider"));
    }
}
