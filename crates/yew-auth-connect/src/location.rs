//! Detection of authentication-callback parameters in the current location.

use crate::client::AppState;
use wasm_bindgen::JsValue;
use web_sys::window;

/// True when `params` carries a `code`/`state` pair or an error marker with
/// accompanying `state`. Accepts a raw query string or fragment, with or
/// without its leading `?`/`#`.
fn params_have_auth_markers(params: &str) -> bool {
    let mut has_code = false;
    let mut has_state = false;
    let mut has_error = false;
    for pair in params.trim_start_matches(['?', '#']).split('&') {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        if value.is_empty() {
            continue;
        }
        match key {
            "code" => has_code = true,
            "state" => has_state = true,
            "error" => has_error = true,
            _ => {}
        }
    }
    (has_code || has_error) && has_state
}

/// True when the current location looks like a return from the authorize
/// redirect, in either the query string or the fragment.
pub fn has_auth_params() -> bool {
    let Some(window) = window() else {
        return false;
    };
    let location = window.location();
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    params_have_auth_markers(&search) || params_have_auth_markers(&hash)
}

/// Default redirect-callback behavior: replace the current history entry
/// with `return_to` (or the bare pathname), scrubbing the code and state
/// parameters from the address bar.
pub fn default_on_redirect_callback(app_state: Option<AppState>) {
    let Some(window) = window() else {
        return;
    };
    let target = app_state
        .and_then(|state| state.return_to)
        .or_else(|| window.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&target));
    }
}
