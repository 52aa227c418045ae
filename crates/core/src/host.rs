//! Host capabilities
//!
//! Everything the session manager needs from the browser goes through these
//! traits, so the manager runs the same against `web-sys` and against the
//! in-memory fakes used in tests. All of them assume a single-threaded host.

use crate::{Result, profile::ProfileResponse};
use async_trait::async_trait;
pub use futures::future::LocalBoxFuture;
use url::Url;

/// Storage tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Survives tab close (`localStorage`)
    Durable,
    /// Cleared when the tab closes (`sessionStorage`)
    Volatile,
}

impl Tier {
    /// Tiers in token read priority order
    pub const ALL: [Tier; 2] = [Tier::Durable, Tier::Volatile];
}

/// Two-tier key-value session storage
pub trait SessionStore {
    /// Read a value, `None` when missing
    fn get(&self, tier: Tier, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, tier: Tier, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key succeeds
    fn remove(&self, tier: Tier, key: &str) -> Result<()>;
}

/// The current page: location, history and cookies
pub trait Page {
    /// Absolute URL of the current page
    fn current_url(&self) -> Result<Url>;

    /// Replace the current history entry without navigating
    fn replace_url(&self, url: &Url) -> Result<()>;

    /// Navigate the page to `url`
    fn navigate(&self, url: &str) -> Result<()>;

    /// Load `url` in place of the current history entry
    fn replace_location(&self, url: &str) -> Result<()>;

    /// Raw `document.cookie` string
    fn cookies(&self) -> Option<String> {
        None
    }
}

/// Deferred and background work
pub trait Scheduler {
    /// Run `task` once after `delay_ms`
    fn defer(&self, delay_ms: u32, task: Box<dyn FnOnce()>);

    /// Drive `future` to completion in the background
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);
}

/// A click that resolved to a link
pub trait LinkClick {
    /// The link's `href`, possibly relative
    fn href(&self) -> Option<String>;

    /// Suppress the browser's own navigation
    fn prevent_default(&self);
}

/// A form being submitted
pub trait FormSubmit {
    /// The form's method attribute
    fn method(&self) -> String;

    /// Set a hidden field, creating it if the form has none with that name
    fn set_hidden_field(&self, name: &str, value: &str) -> Result<()>;
}

pub type ClickHandler = Box<dyn Fn(&dyn LinkClick)>;
pub type SubmitHandler = Box<dyn Fn(&dyn FormSubmit)>;

/// Page-level event source
pub trait DocumentEvents {
    /// Run `callback` once the document is ready, immediately if it already is
    fn on_ready(&self, callback: Box<dyn FnOnce()>);

    /// Observe link clicks for the lifetime of the page
    fn on_click(&self, handler: ClickHandler);

    /// Observe form submissions for the lifetime of the page
    fn on_submit(&self, handler: SubmitHandler);
}

/// Auth service profile lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait ProfileClient {
    /// Validate `token` and fetch the profile behind it
    async fn validate(&self, endpoint: &str, token: &str) -> Result<ProfileResponse>;
}

/// Wall clock
pub trait Clock {
    /// Seconds since the Unix epoch
    fn now_unix(&self) -> i64;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
