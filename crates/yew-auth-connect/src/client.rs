//! Boundary with the wrapped authentication client.
//!
//! Everything hard lives behind [`AuthClient`]: token acquisition, popup and
//! redirect transport, session storage, URL construction. This crate only
//! sequences calls across that boundary and folds the outcomes into
//! component state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Opaque claims record owned by the wrapped client.
///
/// The adapter never looks inside; it only threads the record through state
/// so components can read it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Value);

impl User {
    pub fn new(claims: Value) -> Self {
        Self(claims)
    }

    pub fn claims(&self) -> &Value {
        &self.0
    }
}

/// Error reported by the wrapped client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    /// Machine-readable code, e.g. `login_required` or `popup_closed`.
    pub code: Option<String>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

/// Identifies this adapter to the wrapped client for telemetry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SdkInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for SdkInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Configuration handed to the wrapped client's constructor.
///
/// `client_id` and `redirect_uri` are the recognized fields. Anything else
/// the application wants the client to see is forwarded verbatim through the
/// `extra` map.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ClientOptions {
    pub client_id: String,
    pub redirect_uri: Option<String>,
    pub sdk: SdkInfo,
    pub extra: Map<String, Value>,
}

/// Application state captured before a redirect connect and restored once
/// the callback has been handled.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Path the application should navigate back to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
    /// Arbitrary additional state round-tripped untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppState {
    /// App state that records only a path to return to.
    pub fn with_return_to(path: impl Into<String>) -> Self {
        Self {
            return_to: Some(path.into()),
            extra: Map::new(),
        }
    }
}

/// Outcome of handling a redirect callback.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RedirectResult {
    pub app_state: Option<AppState>,
}

/// Options for [`connect_with_redirect`](crate::context::AuthConnectContext::connect_with_redirect).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RedirectConnectOptions {
    /// Overrides the provider-level redirect target for this connect.
    pub redirect_uri: Option<String>,
    /// State to restore after the redirect round-trip.
    pub app_state: Option<AppState>,
    /// Fragment appended to the authorize URL before redirecting.
    pub fragment: Option<String>,
    pub extra: Map<String, Value>,
}

/// Options for [`connect_with_popup`](crate::context::AuthConnectContext::connect_with_popup).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PopupConnectOptions {
    pub extra: Map<String, Value>,
}

/// Popup window tuning.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PopupConfig {
    /// Seconds to wait for the popup to complete before giving up.
    pub timeout_secs: Option<u32>,
}

/// Options for the silent token fetch.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GetTokenOptions {
    /// Bypass the client's token cache and fetch a fresh token.
    pub ignore_cache: bool,
    pub extra: Map<String, Value>,
}

/// Options forwarded to the wrapped client's user lookup.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GetUserOptions {
    pub extra: Map<String, Value>,
}

/// Options for ending the session.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LogoutOptions {
    /// URL the end-session redirect returns to.
    pub return_to: Option<String>,
    /// Clear only the application session, without the end-session redirect.
    pub local_only: bool,
    /// Also clear the identity provider session.
    pub federated: bool,
    pub extra: Map<String, Value>,
}

/// Options for building the end-session URL without navigating.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LogoutUrlOptions {
    pub return_to: Option<String>,
    pub federated: bool,
}

/// Capabilities consumed from the wrapped authentication client.
///
/// Futures on this trait are `?Send`; everything runs on the wasm event
/// loop.
#[async_trait(?Send)]
pub trait AuthClient {
    /// Silently check for an existing session.
    async fn check_session(&self) -> Result<(), ClientError>;

    /// Claims of the current user, if one is signed in.
    async fn get_user(&self, options: Option<GetUserOptions>) -> Result<Option<User>, ClientError>;

    /// Open a popup with the authorize URL and wait for it to complete.
    async fn connect_with_popup(
        &self,
        options: Option<PopupConnectOptions>,
        config: Option<PopupConfig>,
    ) -> Result<(), ClientError>;

    /// Navigate the current page to the authorize URL.
    async fn connect_with_redirect(
        &self,
        options: Option<RedirectConnectOptions>,
    ) -> Result<(), ClientError>;

    /// Fetch a token without user interaction.
    async fn connect_silently(&self, options: Option<GetTokenOptions>)
        -> Result<String, ClientError>;

    /// Clear the session, redirecting to the end-session endpoint unless
    /// `local_only` is set.
    async fn logout(&self, options: LogoutOptions) -> Result<(), ClientError>;

    /// Exchange the code/state pair in `url` (the current location when
    /// `None`) for a session.
    async fn handle_redirect_callback(
        &self,
        url: Option<String>,
    ) -> Result<RedirectResult, ClientError>;

    /// Build the end-session URL without navigating.
    fn build_logout_url(&self, options: LogoutUrlOptions) -> String;
}

/// Constructor capability, used exactly once per provider mount.
pub trait FromClientOptions {
    fn from_options(options: ClientOptions) -> Self;
}
