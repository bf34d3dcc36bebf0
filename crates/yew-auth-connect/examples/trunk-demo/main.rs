//! Trunk demo wiring the provider to an in-memory client.
//!
//! Run with `trunk serve` from this directory. The demo client fakes a
//! session in memory; no real authentication happens here.

use std::cell::RefCell;

use async_trait::async_trait;
use serde_json::json;
use wasm_bindgen::prelude::*;
use yew::prelude::*;
use yew_auth_connect::{
    use_auth_connect, AuthClient, AuthConnectProvider, ClientError, ClientOptions,
    FromClientOptions, GetTokenOptions, GetUserOptions, LogoutOptions, LogoutUrlOptions,
    PopupConfig, PopupConnectOptions, RedirectConnectOptions, RedirectResult, User,
};

/// Pretend client holding its "session" in memory.
struct DemoClient {
    options: ClientOptions,
    session: RefCell<Option<User>>,
}

impl DemoClient {
    fn demo_user(&self) -> User {
        User::new(json!({
            "sub": format!("demo|{}", self.options.client_id),
            "name": "Demo User",
        }))
    }
}

impl FromClientOptions for DemoClient {
    fn from_options(options: ClientOptions) -> Self {
        Self {
            options,
            session: RefCell::new(None),
        }
    }
}

#[async_trait(?Send)]
impl AuthClient for DemoClient {
    async fn check_session(&self) -> Result<(), ClientError> {
        // Nothing persisted between reloads.
        Ok(())
    }

    async fn get_user(&self, _options: Option<GetUserOptions>) -> Result<Option<User>, ClientError> {
        Ok(self.session.borrow().clone())
    }

    async fn connect_with_popup(
        &self,
        _options: Option<PopupConnectOptions>,
        _config: Option<PopupConfig>,
    ) -> Result<(), ClientError> {
        // Stands in for the whole popup round-trip.
        *self.session.borrow_mut() = Some(self.demo_user());
        Ok(())
    }

    async fn connect_with_redirect(
        &self,
        _options: Option<RedirectConnectOptions>,
    ) -> Result<(), ClientError> {
        *self.session.borrow_mut() = Some(self.demo_user());
        Ok(())
    }

    async fn connect_silently(
        &self,
        _options: Option<GetTokenOptions>,
    ) -> Result<String, ClientError> {
        if self.session.borrow().is_some() {
            Ok("demo-token".to_string())
        } else {
            Err(ClientError::with_code("not signed in", "login_required"))
        }
    }

    async fn logout(&self, _options: LogoutOptions) -> Result<(), ClientError> {
        *self.session.borrow_mut() = None;
        Ok(())
    }

    async fn handle_redirect_callback(
        &self,
        _url: Option<String>,
    ) -> Result<RedirectResult, ClientError> {
        Ok(RedirectResult::default())
    }

    fn build_logout_url(&self, _options: LogoutUrlOptions) -> String {
        "/".to_string()
    }
}

#[function_component(Dashboard)]
fn dashboard() -> Html {
    let auth = use_auth_connect();
    let token = use_state(|| None::<String>);

    let on_login = {
        let auth = auth.clone();
        Callback::from(move |_| {
            let auth = auth.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = auth.connect_with_popup(None, None).await;
            });
        })
    };

    let on_fetch_token = {
        let auth = auth.clone();
        let token = token.clone();
        Callback::from(move |_| {
            let auth = auth.clone();
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match auth.get_id_token(None).await {
                    Ok(value) => token.set(Some(value)),
                    Err(err) => token.set(Some(err.to_string())),
                }
            });
        })
    };

    let on_logout = {
        let auth = auth.clone();
        let token = token.clone();
        Callback::from(move |_| {
            let auth = auth.clone();
            token.set(None);
            wasm_bindgen_futures::spawn_local(async move {
                let options = LogoutOptions {
                    local_only: true,
                    ..LogoutOptions::default()
                };
                let _ = auth.logout(options).await;
            });
        })
    };

    if auth.is_loading() {
        return html! { <p>{ "Checking session..." }</p> };
    }

    html! {
        <div class="p-6 max-w-lg mx-auto space-y-4">
            <h1 class="text-xl font-semibold">{ "yew-auth-connect demo" }</h1>
            if let Some(error) = auth.error() {
                <p class="text-red-600">{ error.to_string() }</p>
            }
            if auth.is_authenticated() {
                <p>{ format!("Signed in: {}", auth.user().map(|u| u.claims().to_string()).unwrap_or_default()) }</p>
                if let Some(token) = (*token).clone() {
                    <p class="font-mono text-sm">{ token }</p>
                }
                <div class="flex gap-2">
                    <button class="px-3 py-1 rounded bg-blue-600 text-white" onclick={on_fetch_token}>
                        { "Fetch token" }
                    </button>
                    <button class="px-3 py-1 rounded bg-gray-200" onclick={on_logout}>
                        { "Sign out" }
                    </button>
                </div>
            } else {
                <button class="px-3 py-1 rounded bg-blue-600 text-white" onclick={on_login}>
                    { "Sign in with popup" }
                </button>
            }
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <AuthConnectProvider<DemoClient> client_id="trunk-demo">
            <Dashboard />
        </AuthConnectProvider<DemoClient>>
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
