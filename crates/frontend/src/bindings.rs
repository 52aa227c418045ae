//! Functions exported to page scripts
//!
//! Names follow the helper API the portal pages already call.

use crate::manager;
use portal_auth_core::{GuardOutcome, TokenSessionManager};
use serde::Serialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

fn current() -> Result<TokenSessionManager, JsError> {
    manager().ok_or_else(|| JsError::new("Session manager is not booted"))
}

#[wasm_bindgen(js_name = getToken)]
pub fn get_token() -> Result<Option<String>, JsError> {
    Ok(current()?.get_token())
}

#[wasm_bindgen(js_name = setToken)]
pub fn set_token(token: &str) -> Result<(), JsError> {
    Ok(current()?.set_token(token)?)
}

#[wasm_bindgen(js_name = removeToken)]
pub fn remove_token() -> Result<(), JsError> {
    Ok(current()?.remove_token()?)
}

#[wasm_bindgen(js_name = isAuthenticated)]
pub fn is_authenticated() -> Result<bool, JsError> {
    Ok(current()?.is_authenticated())
}

#[wasm_bindgen(js_name = hasToken)]
pub fn has_token() -> Result<bool, JsError> {
    Ok(current()?.has_token())
}

/// Headers object for `fetch`, empty without a token
#[wasm_bindgen(js_name = getAuthHeaders)]
pub fn auth_headers() -> Result<JsValue, JsError> {
    let headers: BTreeMap<String, String> = current()?.auth_headers().into_iter().collect();
    Ok(headers.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

#[wasm_bindgen(js_name = navigateWithAuth)]
pub fn navigate_with_auth(url: &str) -> Result<(), JsError> {
    Ok(current()?.navigate_with_auth(url)?)
}

#[wasm_bindgen(js_name = decorateUrl)]
pub fn decorate_url(url: &str) -> Result<String, JsError> {
    Ok(current()?.decorate_outbound_navigation(url))
}

#[wasm_bindgen(js_name = requireAuth)]
pub fn require_auth() -> Result<bool, JsError> {
    Ok(current()?.require_auth())
}

#[wasm_bindgen(js_name = checkAuth)]
pub fn check_auth() -> Result<bool, JsError> {
    Ok(current()?.check_stored_auth())
}

/// Run the route guard; `false` when a login redirect is pending
#[wasm_bindgen(js_name = guardProtectedRoute)]
pub fn guard_protected_route() -> Result<bool, JsError> {
    Ok(current()?.guard_protected_route() != GuardOutcome::RedirectPending)
}

#[wasm_bindgen(js_name = loginUrl)]
pub fn login_url() -> Result<String, JsError> {
    Ok(current()?.login_url())
}
