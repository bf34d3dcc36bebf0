//! Hook accessors over the published auth context.

use crate::client::User;
use crate::context::AuthConnectContext;
use yew::prelude::*;

/// Read the auth state and methods published by the nearest
/// [`AuthConnectProvider`](crate::provider::AuthConnectProvider).
///
/// Outside of a provider subtree this returns the disconnected tuple: state
/// reads as the initial loading value and every method fails with
/// [`AuthError::MissingProvider`](crate::error::AuthError::MissingProvider).
#[hook]
pub fn use_auth_connect() -> AuthConnectContext {
    use_context::<AuthConnectContext>().unwrap_or_else(AuthConnectContext::disconnected)
}

/// Claims of the current user, if one is signed in.
#[hook]
pub fn use_auth_user() -> Option<User> {
    use_auth_connect().user().cloned()
}

/// Whether a user is currently authenticated.
#[hook]
pub fn use_is_authenticated() -> bool {
    use_auth_connect().is_authenticated()
}
