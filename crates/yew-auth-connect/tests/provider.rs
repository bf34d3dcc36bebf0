//! In-browser tests driving the provider against a scripted client.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen_test::*;
use yew::platform::time::sleep;
use yew::prelude::*;
use yew_auth_connect::{
    use_auth_connect, AppState, AuthClient, AuthConnectProvider, AuthError, ClientError,
    ClientOptions, FromClientOptions, GetTokenOptions, GetUserOptions, LogoutOptions,
    LogoutUrlOptions, PopupConfig, PopupConnectOptions, RedirectConnectOptions, RedirectResult,
    User,
};
use yew_auth_connect::components::AuthenticationRequired;

wasm_bindgen_test_configure!(run_in_browser);

thread_local! {
    static CALLS: RefCell<Vec<String>> = RefCell::new(Vec::new());
    static RECEIVED_APP_STATE: RefCell<Option<Option<AppState>>> = RefCell::new(None);
}

fn record(call: &str) {
    CALLS.with(|calls| calls.borrow_mut().push(call.to_string()));
}

fn calls() -> Vec<String> {
    CALLS.with(|calls| calls.borrow().clone())
}

fn reset() {
    CALLS.with(|calls| calls.borrow_mut().clear());
    RECEIVED_APP_STATE.with(|received| *received.borrow_mut() = None);
    set_location("");
}

/// Client whose behavior is scripted through the pass-through options map.
struct FakeClient {
    options: ClientOptions,
}

impl FakeClient {
    fn flag(&self, key: &str) -> bool {
        self.options
            .extra
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn scripted_user(&self) -> Option<User> {
        self.options
            .extra
            .get("user")
            .filter(|value| !value.is_null())
            .cloned()
            .map(User::new)
    }
}

impl FromClientOptions for FakeClient {
    fn from_options(options: ClientOptions) -> Self {
        Self { options }
    }
}

#[async_trait(?Send)]
impl AuthClient for FakeClient {
    async fn check_session(&self) -> Result<(), ClientError> {
        record("check_session");
        if self.flag("fail_check_session") {
            return Err(ClientError::with_code("no session", "login_required"));
        }
        Ok(())
    }

    async fn get_user(&self, _options: Option<GetUserOptions>) -> Result<Option<User>, ClientError> {
        record("get_user");
        Ok(self.scripted_user())
    }

    async fn connect_with_popup(
        &self,
        _options: Option<PopupConnectOptions>,
        _config: Option<PopupConfig>,
    ) -> Result<(), ClientError> {
        record("connect_with_popup");
        if self.flag("fail_popup") {
            return Err(ClientError::with_code("popup closed", "popup_closed"));
        }
        Ok(())
    }

    async fn connect_with_redirect(
        &self,
        _options: Option<RedirectConnectOptions>,
    ) -> Result<(), ClientError> {
        record("connect_with_redirect");
        Ok(())
    }

    async fn connect_silently(
        &self,
        _options: Option<GetTokenOptions>,
    ) -> Result<String, ClientError> {
        record("connect_silently");
        if self.flag("fail_token") {
            return Err(ClientError::with_code("consent required", "consent_required"));
        }
        Ok("test-token".to_string())
    }

    async fn logout(&self, _options: LogoutOptions) -> Result<(), ClientError> {
        record("logout");
        Ok(())
    }

    async fn handle_redirect_callback(
        &self,
        _url: Option<String>,
    ) -> Result<RedirectResult, ClientError> {
        record("handle_redirect_callback");
        if self.flag("fail_redirect_callback") {
            return Err(ClientError::new("invalid state"));
        }
        let app_state = self
            .options
            .extra
            .get("app_state")
            .map(|value| serde_json::from_value(value.clone()).unwrap());
        Ok(RedirectResult { app_state })
    }

    fn build_logout_url(&self, _options: LogoutUrlOptions) -> String {
        "https://auth.example/logout".to_string()
    }
}

#[derive(Properties, PartialEq)]
struct HostProps {
    content: Html,
}

#[function_component(Host)]
fn host(props: &HostProps) -> Html {
    props.content.clone()
}

fn mount(content: Html) {
    let document = gloo::utils::document();
    if let Some(previous) = document.get_element_by_id("test-root") {
        previous.remove();
    }
    let root = document.create_element("div").unwrap();
    root.set_id("test-root");
    gloo::utils::body().append_child(&root).unwrap();
    yew::Renderer::<Host>::with_root_and_props(root, HostProps { content }).render();
}

fn text_of(id: &str) -> String {
    gloo::utils::document()
        .get_element_by_id(id)
        .and_then(|element| element.text_content())
        .unwrap_or_default()
}

fn set_location(query: &str) {
    let window = gloo::utils::window();
    let path = window.location().pathname().unwrap();
    window
        .history()
        .unwrap()
        .replace_state_with_url(
            &wasm_bindgen::JsValue::NULL,
            "",
            Some(&format!("{path}{query}")),
        )
        .unwrap();
}

fn script(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("scripts are json objects"),
    }
}

fn provider_with(options: Map<String, Value>, children: Html) -> Html {
    html! {
        <AuthConnectProvider<FakeClient> client_id="test-client" options={options}>
            { children }
        </AuthConnectProvider<FakeClient>>
    }
}

#[function_component(StateProbe)]
fn state_probe() -> Html {
    let auth = use_auth_connect();
    let user = auth
        .user()
        .map(|user| user.claims().to_string())
        .unwrap_or_else(|| "none".to_string());
    let error = auth
        .error()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string());
    html! {
        <div>
            <span id="loading">{ auth.is_loading().to_string() }</span>
            <span id="authenticated">{ auth.is_authenticated().to_string() }</span>
            <span id="user">{ user }</span>
            <span id="error">{ error }</span>
        </div>
    }
}

#[function_component(OutsideDriver)]
fn outside_driver() -> Html {
    let auth = use_auth_connect();
    let result = use_state(String::new);
    {
        let auth = auth.clone();
        let result = result.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match auth.get_user(None).await {
                    Ok(_) => result.set("ok".to_string()),
                    Err(err) => result.set(err.to_string()),
                }
            });
            || ()
        });
    }
    html! { <span id="method-result">{ (*result).clone() }</span> }
}

#[function_component(PopupDriver)]
fn popup_driver() -> Html {
    let auth = use_auth_connect();
    let result = use_state(String::new);
    {
        let auth = auth.clone();
        let result = result.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                // Let the mount sequence settle first.
                sleep(Duration::from_millis(10)).await;
                match auth.connect_with_popup(None, None).await {
                    Ok(()) => result.set("ok".to_string()),
                    Err(err) => result.set(format!("err: {err}")),
                }
            });
            || ()
        });
    }
    html! { <span id="method-result">{ (*result).clone() }</span> }
}

#[function_component(TokenDriver)]
fn token_driver() -> Html {
    let auth = use_auth_connect();
    let result = use_state(String::new);
    {
        let auth = auth.clone();
        let result = result.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                sleep(Duration::from_millis(10)).await;
                match auth.get_id_token(None).await {
                    Ok(token) => result.set(format!("ok: {token}")),
                    Err(err) => result.set(format!("err: {err}")),
                }
            });
            || ()
        });
    }
    html! { <span id="method-result">{ (*result).clone() }</span> }
}

#[function_component(LogoutDriver)]
fn logout_driver() -> Html {
    let auth = use_auth_connect();
    let result = use_state(String::new);
    {
        let auth = auth.clone();
        let result = result.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                sleep(Duration::from_millis(10)).await;
                let logout_url = auth.build_logout_url(LogoutUrlOptions::default()).unwrap();
                let options = LogoutOptions {
                    local_only: true,
                    ..LogoutOptions::default()
                };
                match auth.logout(options).await {
                    Ok(()) => result.set(format!("ok: {logout_url}")),
                    Err(err) => result.set(format!("err: {err}")),
                }
            });
            || ()
        });
    }
    html! { <span id="method-result">{ (*result).clone() }</span> }
}

#[wasm_bindgen_test]
async fn test_accessor_outside_provider_yields_initial_state_and_failing_methods() {
    reset();
    mount(html! { <><StateProbe /><OutsideDriver /></> });
    sleep(Duration::from_millis(50)).await;

    assert_eq!(text_of("loading"), "true");
    assert_eq!(text_of("authenticated"), "false");
    assert_eq!(text_of("user"), "none");
    assert_eq!(text_of("method-result"), AuthError::MissingProvider.to_string());
    assert!(calls().is_empty());
}

#[wasm_bindgen_test]
async fn test_mount_without_callback_params_checks_session() {
    reset();
    mount(provider_with(Map::new(), html! { <StateProbe /> }));
    sleep(Duration::from_millis(50)).await;

    assert_eq!(text_of("loading"), "false");
    assert_eq!(text_of("authenticated"), "false");
    assert_eq!(text_of("user"), "none");
    assert_eq!(text_of("error"), "none");
    assert_eq!(calls(), vec!["check_session", "get_user"]);
}

#[wasm_bindgen_test]
async fn test_mount_with_callback_params_handles_redirect() {
    reset();
    set_location("?code=abc&state=xyz");
    let options = script(json!({
        "user": { "name": "A" },
        "app_state": { "returnTo": "/x" },
    }));
    let on_redirect_callback = Callback::from(|app_state: Option<AppState>| {
        RECEIVED_APP_STATE.with(|received| *received.borrow_mut() = Some(app_state));
    });
    mount(html! {
        <AuthConnectProvider<FakeClient>
            client_id="test-client"
            options={options}
            on_redirect_callback={on_redirect_callback}
        >
            <StateProbe />
        </AuthConnectProvider<FakeClient>>
    });
    sleep(Duration::from_millis(50)).await;

    assert_eq!(text_of("loading"), "false");
    assert_eq!(text_of("authenticated"), "true");
    assert!(text_of("user").contains("\"A\""));
    assert_eq!(calls(), vec!["handle_redirect_callback", "get_user"]);
    let received = RECEIVED_APP_STATE.with(|received| received.borrow().clone());
    assert_eq!(received, Some(Some(AppState::with_return_to("/x"))));
    set_location("");
}

#[wasm_bindgen_test]
async fn test_skip_redirect_callback_falls_back_to_session_check() {
    reset();
    set_location("?code=abc&state=xyz");
    mount(html! {
        <AuthConnectProvider<FakeClient>
            client_id="test-client"
            skip_redirect_callback=true
        >
            <StateProbe />
        </AuthConnectProvider<FakeClient>>
    });
    sleep(Duration::from_millis(50)).await;

    assert_eq!(calls(), vec!["check_session", "get_user"]);
    set_location("");
}

#[wasm_bindgen_test]
async fn test_failed_initialization_settles_with_error() {
    reset();
    let options = script(json!({ "fail_check_session": true }));
    mount(provider_with(options, html! { <StateProbe /> }));
    sleep(Duration::from_millis(50)).await;

    assert_eq!(text_of("loading"), "false");
    assert_eq!(text_of("authenticated"), "false");
    assert!(text_of("error").contains("no session"));
}

#[wasm_bindgen_test]
async fn test_popup_failure_is_swallowed_into_state() {
    reset();
    let options = script(json!({ "fail_popup": true }));
    mount(provider_with(options, html! { <><StateProbe /><PopupDriver /></> }));
    sleep(Duration::from_millis(80)).await;

    // The returned future resolves; failure shows up only in state.
    assert_eq!(text_of("method-result"), "ok");
    assert_eq!(text_of("loading"), "false");
    assert_eq!(text_of("authenticated"), "false");
    assert!(text_of("error").contains("popup closed"));
}

#[wasm_bindgen_test]
async fn test_popup_success_publishes_user() {
    reset();
    let options = script(json!({ "user": { "name": "A" } }));
    mount(provider_with(options, html! { <><StateProbe /><PopupDriver /></> }));
    sleep(Duration::from_millis(80)).await;

    assert_eq!(text_of("method-result"), "ok");
    assert_eq!(text_of("authenticated"), "true");
    assert!(text_of("user").contains("\"A\""));
}

#[wasm_bindgen_test]
async fn test_get_id_token_failure_rethrows_and_still_finalizes() {
    reset();
    let options = script(json!({ "fail_token": true, "user": { "name": "A" } }));
    mount(provider_with(options, html! { <><StateProbe /><TokenDriver /></> }));
    sleep(Duration::from_millis(80)).await;

    assert!(text_of("method-result").starts_with("err: token request failed"));
    // Finalization still re-read the user and dispatched the completion.
    assert_eq!(text_of("loading"), "false");
    assert_eq!(text_of("authenticated"), "true");
    assert!(text_of("user").contains("\"A\""));
    assert!(calls().contains(&"connect_silently".to_string()));
    assert_eq!(calls().last().map(String::as_str), Some("get_user"));
}

#[wasm_bindgen_test]
async fn test_get_id_token_returns_the_token() {
    reset();
    let options = script(json!({ "user": { "name": "A" } }));
    mount(provider_with(options, html! { <><StateProbe /><TokenDriver /></> }));
    sleep(Duration::from_millis(80)).await;

    assert_eq!(text_of("method-result"), "ok: test-token");
}

#[wasm_bindgen_test]
async fn test_local_logout_resets_state() {
    reset();
    let options = script(json!({ "user": { "name": "A" } }));
    mount(provider_with(options, html! { <><StateProbe /><LogoutDriver /></> }));
    sleep(Duration::from_millis(80)).await;

    assert_eq!(text_of("method-result"), "ok: https://auth.example/logout");
    assert_eq!(text_of("authenticated"), "false");
    assert_eq!(text_of("user"), "none");
    assert!(calls().contains(&"logout".to_string()));
}

#[wasm_bindgen_test]
async fn test_authentication_required_redirects_unauthenticated_users() {
    reset();
    mount(provider_with(
        Map::new(),
        html! {
            <AuthenticationRequired fallback={html! { <span id="fallback">{ "..." }</span> }}>
                <span id="secret">{ "secret" }</span>
            </AuthenticationRequired>
        },
    ));
    sleep(Duration::from_millis(80)).await;

    assert_eq!(text_of("fallback"), "...");
    assert_eq!(text_of("secret"), "");
    assert!(calls().contains(&"connect_with_redirect".to_string()));
}

#[wasm_bindgen_test]
async fn test_authentication_required_renders_children_when_authenticated() {
    reset();
    let options = script(json!({ "user": { "name": "A" } }));
    mount(provider_with(
        options,
        html! {
            <AuthenticationRequired fallback={html! { <span id="fallback">{ "..." }</span> }}>
                <span id="secret">{ "secret" }</span>
            </AuthenticationRequired>
        },
    ));
    sleep(Duration::from_millis(80)).await;

    assert_eq!(text_of("secret"), "secret");
    assert!(!calls().contains(&"connect_with_redirect".to_string()));
}
