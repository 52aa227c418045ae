use super::dom_error;
use gloo::events::{EventListener, EventListenerOptions};
use portal_auth_core::{
    DocumentEvents, Error, Result,
    host::{ClickHandler, FormSubmit, LinkClick, SubmitHandler},
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlAnchorElement, HtmlFormElement, HtmlInputElement};

/// Document-level listeners
///
/// Listeners are registered on the document itself so links and forms
/// added after boot are covered. They stay attached for the page's lifetime.
pub struct BrowserDocument {
    document: Document,
}

impl BrowserDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl DocumentEvents for BrowserDocument {
    fn on_ready(&self, callback: Box<dyn FnOnce()>) {
        if self.document.ready_state() != "loading" {
            callback();
            return;
        }

        EventListener::once(&self.document, "DOMContentLoaded", move |_| callback()).forget();
    }

    fn on_click(&self, handler: ClickHandler) {
        EventListener::new_with_options(
            &self.document,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(link) = DomLink::from_event(event) {
                    handler(&link);
                }
            },
        )
        .forget();
    }

    fn on_submit(&self, handler: SubmitHandler) {
        let document = self.document.clone();
        EventListener::new(&self.document, "submit", move |event| {
            let Some(form) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlFormElement>().ok())
            else {
                return;
            };
            handler(&DomForm {
                document: document.clone(),
                form,
            });
        })
        .forget();
    }
}

/// Anchor enclosing a click target
struct DomLink<'a> {
    event: &'a Event,
    anchor: HtmlAnchorElement,
}

impl<'a> DomLink<'a> {
    fn from_event(event: &'a Event) -> Option<Self> {
        let element = event.target()?.dyn_into::<Element>().ok()?;
        let anchor = element
            .closest("a")
            .ok()
            .flatten()?
            .dyn_into::<HtmlAnchorElement>()
            .ok()?;
        Some(Self { event, anchor })
    }
}

impl LinkClick for DomLink<'_> {
    fn href(&self) -> Option<String> {
        let href = self.anchor.href();
        (!href.is_empty()).then_some(href)
    }

    fn prevent_default(&self) {
        self.event.prevent_default();
    }
}

struct DomForm {
    document: Document,
    form: HtmlFormElement,
}

impl FormSubmit for DomForm {
    fn method(&self) -> String {
        self.form.method()
    }

    fn set_hidden_field(&self, name: &str, value: &str) -> Result<()> {
        let selector = format!("input[name=\"{name}\"]");
        let existing = self
            .form
            .query_selector(&selector)
            .map_err(|e| dom_error("Invalid field selector", e))?
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());

        let input = match existing {
            Some(input) => input,
            None => {
                let input = self
                    .document
                    .create_element("input")
                    .map_err(|e| dom_error("Failed to create input", e))?
                    .dyn_into::<HtmlInputElement>()
                    .map_err(|_| Error::dom("Created element is not an input"))?;
                input.set_type("hidden");
                input.set_name(name);
                self.form
                    .append_child(&input)
                    .map_err(|e| dom_error("Failed to append input", e))?;
                input
            }
        };

        input.set_value(value);
        Ok(())
    }
}
