//! Yew bindings for an external authentication client.
//!
//! This crate is a thin adapter: it owns no authentication logic of its own.
//! A wrapped [`AuthClient`] performs the actual token, session and transport
//! work; this crate publishes that client's state and operations to a Yew
//! component tree through [`AuthConnectProvider`] and reads them back
//! through [`use_auth_connect`].
//!
//! ```ignore
//! #[function_component(App)]
//! fn app() -> Html {
//!     html! {
//!         <AuthConnectProvider<MyClient> client_id="app_123">
//!             <Dashboard />
//!         </AuthConnectProvider<MyClient>>
//!     }
//! }
//!
//! #[function_component(Dashboard)]
//! fn dashboard() -> Html {
//!     let auth = use_auth_connect();
//!     if auth.is_loading() {
//!         return html! { <p>{ "Loading..." }</p> };
//!     }
//!     // ...
//! }
//! ```

pub mod client;
pub mod components;
pub mod context;
pub mod error;
pub mod hooks;
pub mod location;
pub mod provider;

pub use client::{
    AppState, AuthClient, ClientError, ClientOptions, FromClientOptions, GetTokenOptions,
    GetUserOptions, LogoutOptions, LogoutUrlOptions, PopupConfig, PopupConnectOptions,
    RedirectConnectOptions, RedirectResult, SdkInfo, User,
};
pub use components::{AuthenticationRequired, WithAuth};
pub use context::{AuthAction, AuthConnectContext, AuthState};
pub use error::AuthError;
pub use hooks::{use_auth_connect, use_auth_user, use_is_authenticated};
pub use provider::{AuthConnectProvider, AuthConnectProviderProps};
