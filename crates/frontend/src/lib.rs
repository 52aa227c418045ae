//! Browser runtime for the job portal token session manager
//!
//! [`boot`] wires the `web-sys` host into a [`TokenSessionManager`] and runs
//! the page-load lifecycle. The functions in [`bindings`] expose the manager
//! to page scripts.

pub mod bindings;
pub mod host;
pub mod logging;
pub mod services;

use host::{BrowserDocument, BrowserPage, BrowserScheduler, BrowserStore};
use portal_auth_core::{Error, Host, Result, SessionConfig, TokenSessionManager};
use services::HttpProfileClient;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

thread_local! {
    static MANAGER: RefCell<Option<TokenSessionManager>> = const { RefCell::new(None) };
}

/// Build a manager over the browser window
pub fn build_manager(config: SessionConfig) -> Result<TokenSessionManager> {
    let window = web_sys::window().ok_or(Error::Unavailable("window"))?;
    let document = window.document().ok_or(Error::Unavailable("document"))?;

    let host = Host::new(
        Rc::new(BrowserStore::new(&window)),
        Rc::new(BrowserPage::new(window)),
        Rc::new(BrowserScheduler),
        Rc::new(BrowserDocument::new(document)),
        Rc::new(HttpProfileClient::new()),
    );
    Ok(TokenSessionManager::new(config, host))
}

/// The manager created by [`boot`]
pub fn manager() -> Option<TokenSessionManager> {
    MANAGER.with(|slot| slot.borrow().clone())
}

/// Start the session manager for this page load
///
/// `config_json` is layered over the defaults. Booting again is a no-op.
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> std::result::Result<(), JsError> {
    console_error_panic_hook::set_once();

    if manager().is_some() {
        return Ok(());
    }

    let config = match config_json.as_deref() {
        Some(json) => SessionConfig::from_json(json)?,
        None => SessionConfig::default(),
    };
    logging::init_logging(&config.log_level);

    let manager = build_manager(config)?;
    MANAGER.with(|slot| *slot.borrow_mut() = Some(manager.clone()));
    manager.start();

    tracing::info!("Token session manager started");
    Ok(())
}
