//! Render-prop wrapper supplying the auth tuple to arbitrary markup.

use crate::context::AuthConnectContext;
use crate::hooks::use_auth_connect;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct WithAuthProps {
    /// Called with the auth tuple to produce the wrapped markup.
    pub render: Callback<AuthConnectContext, Html>,
}

/// Supplies the auth state and methods to components that take them as
/// explicit inputs instead of reading the context themselves.
///
/// ```ignore
/// html! {
///     <WithAuth render={Callback::from(|auth: AuthConnectContext| html! {
///         <Profile user={auth.user().cloned()} />
///     })} />
/// }
/// ```
#[function_component(WithAuth)]
pub fn with_auth(props: &WithAuthProps) -> Html {
    let auth = use_auth_connect();
    props.render.emit(auth)
}
