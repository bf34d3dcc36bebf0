//! Provider component owning the wrapped client and the auth state.

use crate::client::{
    AppState, AuthClient, ClientError, ClientOptions, FromClientOptions, SdkInfo, User,
};
use crate::context::{AuthAction, AuthConnectContext, AuthState};
use crate::error::AuthError;
use crate::location::{default_on_redirect_callback, has_auth_params};
use serde_json::{Map, Value};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Props for [`AuthConnectProvider`].
#[derive(Properties, PartialEq)]
pub struct AuthConnectProviderProps {
    pub children: Children,
    /// Client id issued for this application.
    pub client_id: AttrValue,
    /// Default URL the authorize redirect returns to. Can be overridden per
    /// connect.
    #[prop_or_default]
    pub redirect_uri: Option<AttrValue>,
    /// Invoked with the restored app state once a redirect callback has been
    /// handled on mount. Defaults to replacing the history entry with
    /// `return_to` (or the current pathname), scrubbing the callback
    /// parameters from the address bar.
    #[prop_or_default]
    pub on_redirect_callback: Option<Callback<Option<AppState>>>,
    /// Skip redirect-callback handling on mount even when the location
    /// carries callback parameters, e.g. when another library owns them.
    #[prop_or_default]
    pub skip_redirect_callback: bool,
    /// Extra configuration forwarded verbatim to the wrapped client's
    /// constructor.
    #[prop_or_default]
    pub options: Map<String, Value>,
}

/// Owns one wrapped-client instance and publishes [`AuthConnectContext`] to
/// its descendants.
///
/// The client is constructed exactly once per mount and survives re-renders.
/// On mount, exactly one of two initialization paths runs: handling the
/// redirect callback when the location carries callback parameters, or a
/// silent session check otherwise. Either way the state settles; no path
/// leaves it loading.
///
/// ```ignore
/// html! {
///     <AuthConnectProvider<MyClient> client_id="app_123" redirect_uri="https://example.com/">
///         <App />
///     </AuthConnectProvider<MyClient>>
/// }
/// ```
#[function_component]
pub fn AuthConnectProvider<C>(props: &AuthConnectProviderProps) -> Html
where
    C: AuthClient + FromClientOptions + 'static,
{
    let state = use_reducer(AuthState::default);

    let client: Rc<dyn AuthClient> = {
        let options = ClientOptions {
            client_id: props.client_id.to_string(),
            redirect_uri: props.redirect_uri.as_ref().map(ToString::to_string),
            sdk: SdkInfo::default(),
            extra: props.options.clone(),
        };
        use_memo((), move |_| {
            tracing::debug!(client_id = %options.client_id, "constructing auth client");
            C::from_options(options)
        })
    };

    let did_initialise = use_mut_ref(|| false);

    {
        let state = state.clone();
        let client = client.clone();
        let on_redirect_callback = props.on_redirect_callback.clone();
        let skip_redirect_callback = props.skip_redirect_callback;
        use_effect_with((), move |_| {
            if !*did_initialise.borrow() {
                *did_initialise.borrow_mut() = true;
                spawn_local(async move {
                    let settled: Result<Option<User>, ClientError> = async {
                        if has_auth_params() && !skip_redirect_callback {
                            tracing::debug!("handling redirect callback");
                            let result = client.handle_redirect_callback(None).await?;
                            match on_redirect_callback {
                                Some(callback) => callback.emit(result.app_state),
                                None => default_on_redirect_callback(result.app_state),
                            }
                        } else {
                            client.check_session().await?;
                        }
                        client.get_user(None).await
                    }
                    .await;
                    match settled {
                        Ok(user) => state.dispatch(AuthAction::Initialised(user)),
                        Err(err) => {
                            tracing::warn!(error = %err, "auth initialization failed");
                            state.dispatch(AuthAction::Error(AuthError::login(err)));
                        }
                    }
                });
            }
            || ()
        });
    }

    let context = AuthConnectContext::connected((*state).clone(), client, state.dispatcher());

    html! {
        <ContextProvider<AuthConnectContext> context={context}>
            { props.children.clone() }
        </ContextProvider<AuthConnectContext>>
    }
}
