//! Authentication context: reducer-driven state and the published
//! state-plus-methods tuple.

use crate::client::{
    AuthClient, GetTokenOptions, GetUserOptions, LogoutOptions, LogoutUrlOptions, PopupConfig,
    PopupConnectOptions, RedirectConnectOptions, RedirectResult, User,
};
use crate::error::AuthError;
use std::rc::Rc;
use yew::prelude::*;

/// Authentication state as seen by components.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub error: Option<AuthError>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<User>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            error: None,
            is_authenticated: false,
            is_loading: true,
            user: None,
        }
    }
}

/// State transitions dispatched by the provider.
///
/// The table is total: every action is accepted from every state, and the
/// last dispatch wins when operations overlap in flight.
#[derive(Debug)]
pub enum AuthAction {
    /// The mount-time initialization sequence finished.
    Initialised(Option<User>),
    /// A popup connect was started.
    LoginPopupStarted,
    /// A popup connect finished successfully.
    LoginPopupComplete(Option<User>),
    /// A redirect callback finished, successfully or not.
    HandleRedirectComplete(Option<User>),
    /// A silent token fetch finished, successfully or not.
    GetTokenComplete(Option<User>),
    /// The local session was cleared.
    Logout,
    /// An operation failed.
    Error(AuthError),
}

impl Reducible for AuthState {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            AuthAction::Initialised(user) => Rc::new(Self {
                is_authenticated: user.is_some(),
                is_loading: false,
                user,
                error: None,
            }),
            AuthAction::LoginPopupStarted => Rc::new(Self {
                is_loading: true,
                ..(*self).clone()
            }),
            AuthAction::LoginPopupComplete(user) => Rc::new(Self {
                is_authenticated: true,
                is_loading: false,
                user,
                error: None,
            }),
            AuthAction::HandleRedirectComplete(user) | AuthAction::GetTokenComplete(user) => {
                Rc::new(Self {
                    is_authenticated: user.is_some(),
                    is_loading: false,
                    user,
                    ..(*self).clone()
                })
            }
            AuthAction::Logout => Rc::new(Self {
                error: None,
                is_authenticated: false,
                is_loading: false,
                user: None,
            }),
            AuthAction::Error(error) => Rc::new(Self {
                is_loading: false,
                is_authenticated: false,
                error: Some(error),
                ..(*self).clone()
            }),
        }
    }
}

/// Provider internals shared with every consumer of the context.
#[derive(Clone)]
struct ProviderHandle {
    client: Rc<dyn AuthClient>,
    dispatch: UseReducerDispatcher<AuthState>,
}

impl PartialEq for ProviderHandle {
    // A provider constructs exactly one client, so pointer identity
    // identifies the provider.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

/// The state-plus-methods tuple published to the component tree.
///
/// Obtained through [`use_auth_connect`](crate::hooks::use_auth_connect).
/// Every method forwards to the single client instance owned by the nearest
/// [`AuthConnectProvider`](crate::provider::AuthConnectProvider); outside a
/// provider subtree the state reads as the initial value and every method
/// fails with [`AuthError::MissingProvider`].
#[derive(Clone, PartialEq)]
pub struct AuthConnectContext {
    state: AuthState,
    handle: Option<ProviderHandle>,
}

impl AuthConnectContext {
    pub(crate) fn connected(
        state: AuthState,
        client: Rc<dyn AuthClient>,
        dispatch: UseReducerDispatcher<AuthState>,
    ) -> Self {
        Self {
            state,
            handle: Some(ProviderHandle { client, dispatch }),
        }
    }

    /// Fallback value seen outside any provider subtree.
    pub(crate) fn disconnected() -> Self {
        Self {
            state: AuthState::default(),
            handle: None,
        }
    }

    fn provider(&self) -> Result<&ProviderHandle, AuthError> {
        self.handle.as_ref().ok_or(AuthError::MissingProvider)
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn error(&self) -> Option<&AuthError> {
        self.state.error.as_ref()
    }

    /// Start a full-page redirect connect.
    ///
    /// The navigation is expected to unload the document, so no state
    /// transition is recorded here.
    pub async fn connect_with_redirect(
        &self,
        options: Option<RedirectConnectOptions>,
    ) -> Result<(), AuthError> {
        let provider = self.provider()?;
        provider
            .client
            .connect_with_redirect(options)
            .await
            .map_err(AuthError::login)
    }

    /// Connect through a popup window.
    ///
    /// A failed popup is folded into the published error state rather than
    /// returned; callers observe it by inspecting
    /// [`error`](AuthConnectContext::error).
    pub async fn connect_with_popup(
        &self,
        options: Option<PopupConnectOptions>,
        config: Option<PopupConfig>,
    ) -> Result<(), AuthError> {
        let provider = self.provider()?;
        provider.dispatch.dispatch(AuthAction::LoginPopupStarted);
        if let Err(err) = provider.client.connect_with_popup(options, config).await {
            tracing::warn!(error = %err, "popup connect failed");
            provider
                .dispatch
                .dispatch(AuthAction::Error(AuthError::login(err)));
            return Ok(());
        }
        let user = provider
            .client
            .get_user(None)
            .await
            .map_err(AuthError::login)?;
        provider
            .dispatch
            .dispatch(AuthAction::LoginPopupComplete(user));
        Ok(())
    }

    /// Clear the session.
    ///
    /// With `local_only` set the wrapped client skips the end-session
    /// redirect and the local state is reset here once the forwarded call
    /// settles; otherwise the client is expected to navigate away.
    pub async fn logout(&self, options: LogoutOptions) -> Result<(), AuthError> {
        let provider = self.provider()?;
        let local_only = options.local_only;
        provider
            .client
            .logout(options)
            .await
            .map_err(AuthError::login)?;
        if local_only {
            provider.dispatch.dispatch(AuthAction::Logout);
        }
        Ok(())
    }

    /// Fetch a token without user interaction.
    ///
    /// Whether or not the fetch succeeds, the user is re-read and a
    /// completion action dispatched, so state always reflects the latest
    /// session.
    pub async fn get_id_token(&self, options: Option<GetTokenOptions>) -> Result<String, AuthError> {
        let provider = self.provider()?;
        let token = provider
            .client
            .connect_silently(options)
            .await
            .map_err(AuthError::token);
        let user = provider.client.get_user(None).await.ok().flatten();
        provider.dispatch.dispatch(AuthAction::GetTokenComplete(user));
        token
    }

    /// Claims of the current user, straight from the wrapped client.
    pub async fn get_user(
        &self,
        options: Option<GetUserOptions>,
    ) -> Result<Option<User>, AuthError> {
        let provider = self.provider()?;
        provider
            .client
            .get_user(options)
            .await
            .map_err(AuthError::token)
    }

    /// Exchange the code/state pair in `url` (the current location when
    /// `None`) for a session.
    ///
    /// The user is re-read and a completion action dispatched whether or not
    /// the exchange succeeds.
    pub async fn handle_redirect_callback(
        &self,
        url: Option<String>,
    ) -> Result<RedirectResult, AuthError> {
        let provider = self.provider()?;
        let result = provider
            .client
            .handle_redirect_callback(url)
            .await
            .map_err(AuthError::token);
        let user = provider.client.get_user(None).await.ok().flatten();
        provider
            .dispatch
            .dispatch(AuthAction::HandleRedirectComplete(user));
        result
    }

    /// Build the end-session URL without navigating.
    pub fn build_logout_url(&self, options: LogoutUrlOptions) -> Result<String, AuthError> {
        Ok(self.provider()?.client.build_logout_url(options))
    }
}
