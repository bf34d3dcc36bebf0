//! Route guard gating children on a settled authenticated session.

use crate::client::{AppState, RedirectConnectOptions};
use crate::hooks::use_auth_connect;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AuthenticationRequiredProps {
    pub children: Children,
    /// Rendered while the session is still loading or the redirect connect
    /// is in flight.
    #[prop_or_default]
    pub fallback: Html,
    /// Path restored after the redirect round-trip; the current path and
    /// query when unset.
    #[prop_or_default]
    pub return_to: Option<AttrValue>,
    /// Extra options for the redirect connect.
    #[prop_or_default]
    pub login_options: Option<RedirectConnectOptions>,
}

/// Renders its children only for authenticated users.
///
/// While the session is loading the fallback is shown. Once the state
/// settles unauthenticated, a redirect connect is started with the current
/// path recorded so the application can navigate back after login.
#[function_component(AuthenticationRequired)]
pub fn authentication_required(props: &AuthenticationRequiredProps) -> Html {
    let auth = use_auth_connect();

    {
        let auth = auth.clone();
        let return_to = props.return_to.clone();
        let login_options = props.login_options.clone();
        use_effect_with(
            (auth.is_loading(), auth.is_authenticated()),
            move |(is_loading, is_authenticated)| {
                if !*is_loading && !*is_authenticated {
                    spawn_local(async move {
                        let mut options = login_options.unwrap_or_default();
                        if options.app_state.is_none() {
                            let target = return_to
                                .map(|path| path.to_string())
                                .or_else(current_relative_path);
                            options.app_state = target.map(AppState::with_return_to);
                        }
                        if let Err(err) = auth.connect_with_redirect(Some(options)).await {
                            tracing::warn!(error = %err, "redirect connect failed");
                        }
                    });
                }
                || ()
            },
        );
    }

    if auth.is_authenticated() {
        html! { <>{ props.children.clone() }</> }
    } else {
        props.fallback.clone()
    }
}

fn current_relative_path() -> Option<String> {
    let location = web_sys::window()?.location();
    let path = location.pathname().ok()?;
    let search = location.search().unwrap_or_default();
    Some(format!("{path}{search}"))
}
