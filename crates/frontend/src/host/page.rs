use super::dom_error;
use portal_auth_core::{Error, Page, Result};
use url::Url;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Window};

/// The browser window's location, history and cookies
pub struct BrowserPage {
    window: Window,
}

impl BrowserPage {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Page for BrowserPage {
    fn current_url(&self) -> Result<Url> {
        let href = self
            .window
            .location()
            .href()
            .map_err(|e| dom_error("Failed to read location", e))?;
        Ok(Url::parse(&href)?)
    }

    fn replace_url(&self, url: &Url) -> Result<()> {
        let history = self
            .window
            .history()
            .map_err(|e| dom_error("History unavailable", e))?;
        let title = self
            .window
            .document()
            .map(|document| document.title())
            .unwrap_or_default();

        history
            .replace_state_with_url(&JsValue::NULL, &title, Some(url.as_str()))
            .map_err(|e| dom_error("Failed to replace history entry", e))
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.window
            .location()
            .set_href(url)
            .map_err(|e| Error::navigation(format!("{url}: {}", super::describe(&e))))
    }

    fn replace_location(&self, url: &str) -> Result<()> {
        self.window
            .location()
            .replace(url)
            .map_err(|e| Error::navigation(format!("{url}: {}", super::describe(&e))))
    }

    fn cookies(&self) -> Option<String> {
        self.window
            .document()?
            .dyn_into::<HtmlDocument>()
            .ok()?
            .cookie()
            .ok()
    }
}
