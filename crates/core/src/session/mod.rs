//! Token session manager
//!
//! Resolves the bearer token from session storage, adopts tokens arriving in
//! the URL, guards protected routes and decorates outgoing navigation and
//! form submissions. One manager is created per page load.

mod url_token;


use crate::{
    Result,
    config::{SessionConfig, StorageKeys},
    host::{
        Clock, DocumentEvents, FormSubmit, LinkClick, Page, ProfileClient, Scheduler,
        SessionStore, SystemClock, Tier,
    },
    profile,
    routes::{ProtectedRoutes, is_read_only_method},
    token,
};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};
use url::Url;

pub use url_token::{append_token, carries_token, find_token, without_token};

/// Per-page-load lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Start,
    UrlTokenCheck,
    TokenAdopted,
    NoUrlToken,
    RouteGuard,
    Allowed,
    RedirectPending,
    Redirected,
}

impl PageState {
    /// Whether the page load has reached a final state
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Allowed | Self::Redirected)
    }
}

/// Result of running the route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The path is not on the allow-list
    Public,
    /// The path is protected and a valid token is present
    Allowed,
    /// A login redirect is scheduled and will re-check before navigating
    RedirectPending,
}

/// Host capabilities the manager runs against
#[derive(Clone)]
pub struct Host {
    pub store: Rc<dyn SessionStore>,
    pub page: Rc<dyn Page>,
    pub scheduler: Rc<dyn Scheduler>,
    pub events: Rc<dyn DocumentEvents>,
    pub profiles: Rc<dyn ProfileClient>,
    pub clock: Rc<dyn Clock>,
}

impl Host {
    /// Bundle host capabilities using the system clock
    pub fn new(
        store: Rc<dyn SessionStore>,
        page: Rc<dyn Page>,
        scheduler: Rc<dyn Scheduler>,
        events: Rc<dyn DocumentEvents>,
        profiles: Rc<dyn ProfileClient>,
    ) -> Self {
        Self {
            store,
            page,
            scheduler,
            events,
            profiles,
            clock: Rc::new(SystemClock),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

struct Inner {
    config: SessionConfig,
    routes: ProtectedRoutes,
    host: Host,
    state: Cell<PageState>,
    interceptors_installed: Cell<bool>,
    redirect_armed: Cell<bool>,
}

/// Token session manager
///
/// Cloning is cheap and every clone shares the same state. Callbacks handed
/// to the host hold weak references, so dropping the last clone disarms them.
#[derive(Clone)]
pub struct TokenSessionManager {
    inner: Rc<Inner>,
}

impl TokenSessionManager {
    /// Create a manager for the current page
    pub fn new(config: SessionConfig, host: Host) -> Self {
        let routes = ProtectedRoutes::new(config.protected_paths.iter().cloned());
        Self {
            inner: Rc::new(Inner {
                config,
                routes,
                host,
                state: Cell::new(PageState::Start),
                interceptors_installed: Cell::new(false),
                redirect_armed: Cell::new(false),
            }),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> PageState {
        self.inner.state.get()
    }

    // === Token storage ===

    /// First non-empty token, in fixed slot priority order
    ///
    /// Durable primary, durable legacy, volatile primary, volatile legacy,
    /// then the `authToken` cookie when cookie fallback is enabled.
    pub fn get_token(&self) -> Option<String> {
        let store = &self.inner.host.store;
        Tier::ALL
            .into_iter()
            .flat_map(|tier| StorageKeys::TOKEN_KEYS.map(|key| (tier, key)))
            .find_map(|(tier, key)| store.get(tier, key).filter(|value| !value.is_empty()))
            .or_else(|| self.cookie_token())
    }

    /// Store a token in both durable slots
    pub fn set_token(&self, token: &str) -> Result<()> {
        let store = &self.inner.host.store;
        store.set(Tier::Durable, StorageKeys::AUTH_TOKEN, token)?;
        store.set(Tier::Durable, StorageKeys::JWT_TOKEN, token)?;
        debug!(token = %token::redact(token), "Stored auth token");
        Ok(())
    }

    /// Clear all four token slots
    ///
    /// Every slot is attempted even if an earlier removal fails.
    pub fn remove_token(&self) -> Result<()> {
        let store = &self.inner.host.store;
        let mut result = Ok(());
        for tier in Tier::ALL {
            for key in StorageKeys::TOKEN_KEYS {
                if let Err(e) = store.remove(tier, key) {
                    warn!(?tier, key, error = %e, "Failed to remove token slot");
                    result = Err(e);
                }
            }
        }
        result
    }

    // === Validation ===

    /// Strict check of a token's structure and expiry
    ///
    /// A malformed, unreadable or expired token purges the stored token.
    /// An absent or empty one does not.
    pub fn is_valid_token(&self, token: Option<&str>) -> bool {
        let Some(token) = token else {
            return false;
        };

        match token::inspect(token, self.inner.host.clock.now_unix()) {
            Ok(_) => true,
            Err(e) => {
                if e.purges() {
                    info!(reason = %e, "Discarding unusable auth token");
                    self.purge();
                }
                false
            }
        }
    }

    /// Strict authentication check on the stored token
    pub fn is_authenticated(&self) -> bool {
        self.is_valid_token(self.get_token().as_deref())
    }

    /// Loose presence check that never purges
    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    /// `Authorization` header for API calls, when a token is present
    pub fn auth_headers(&self) -> Option<(String, String)> {
        self.get_token()
            .map(|token| ("Authorization".to_string(), format!("Bearer {token}")))
    }

    // === URL token adoption ===

    /// Adopt a `token` query parameter from the current URL
    ///
    /// Clears cached profile fields, stores the token and scrubs it from the
    /// visible URL without adding a history entry, all before returning. The
    /// profile refresh runs in the background. Returns whether a token was
    /// adopted. A token that cannot be stored stays in the URL.
    pub fn extract_and_adopt_url_token(&self) -> bool {
        self.transition(PageState::UrlTokenCheck);

        let url = match self.inner.host.page.current_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Could not read the current URL");
                self.transition(PageState::NoUrlToken);
                return false;
            }
        };

        let Some(token) = find_token(&url) else {
            self.transition(PageState::NoUrlToken);
            return false;
        };

        info!(token = %token::redact(&token), "Token found in URL, adopting");
        profile::clear_profile(self.inner.host.store.as_ref());

        if let Err(e) = self.set_token(&token) {
            warn!(error = %e, "Failed to store adopted token, leaving it in the URL");
            self.transition(PageState::NoUrlToken);
            return false;
        }

        if let Err(e) = self.inner.host.page.replace_url(&without_token(&url)) {
            warn!(error = %e, "Failed to scrub token from URL");
        }

        self.spawn_profile_fetch(token, url.host_str().unwrap_or_default());
        self.transition(PageState::TokenAdopted);
        true
    }

    fn spawn_profile_fetch(&self, token: String, hostname: &str) {
        let endpoint = self.inner.config.validate_url(hostname);
        let profiles = Rc::clone(&self.inner.host.profiles);
        let store = Rc::clone(&self.inner.host.store);

        self.inner.host.scheduler.spawn_local(Box::pin(async move {
            match profiles.validate(&endpoint, &token).await {
                Ok(response) if response.valid => {
                    let written = response.apply_to(store.as_ref());
                    debug!(fields = written, "Cached user profile");
                }
                Ok(_) => debug!("Auth service rejected token, profile left unset"),
                Err(e) => warn!(error = %e, "Profile fetch failed"),
            }
        }));
    }

    // === Route guard ===

    /// Login page URL for the current host
    pub fn login_url(&self) -> String {
        let hostname = self
            .inner
            .host
            .page
            .current_url()
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default();
        self.inner.config.login_url(&hostname)
    }

    /// Redirect to login when the current route is protected and unauthenticated
    ///
    /// The redirect is deferred by `redirect_delay_ms` and skipped if a valid
    /// token has appeared by then.
    pub fn guard_protected_route(&self) -> GuardOutcome {
        if self.inner.redirect_armed.get() {
            debug!("Login redirect already scheduled");
            self.transition(PageState::RedirectPending);
            return GuardOutcome::RedirectPending;
        }
        self.transition(PageState::RouteGuard);

        let path = match self.inner.host.page.current_url() {
            Ok(url) => url.path().to_string(),
            Err(e) => {
                warn!(error = %e, "Could not read the current URL, treating route as public");
                String::new()
            }
        };

        if !self.inner.routes.is_protected(&path) {
            self.transition(PageState::Allowed);
            return GuardOutcome::Public;
        }

        if self.is_authenticated() {
            debug!(path = %path, "Authentication check passed");
            self.transition(PageState::Allowed);
            return GuardOutcome::Allowed;
        }

        info!(path = %path, "No valid token on protected route");
        self.schedule_login_redirect();
        GuardOutcome::RedirectPending
    }

    /// Arm the deferred login redirect; at most one is pending at a time
    fn schedule_login_redirect(&self) {
        self.transition(PageState::RedirectPending);
        if self.inner.redirect_armed.replace(true) {
            return;
        }
        let delay_ms = self.inner.config.redirect_delay_ms;
        info!(delay_ms, "Scheduling login redirect");

        let weak = self.downgrade();
        self.inner.host.scheduler.defer(
            delay_ms,
            Box::new(move || {
                if let Some(manager) = Self::upgrade(&weak) {
                    manager.finish_pending_redirect();
                }
            }),
        );
    }

    fn finish_pending_redirect(&self) {
        self.inner.redirect_armed.set(false);
        if self.is_authenticated() {
            info!("Token arrived before redirect, staying on page");
            self.transition(PageState::Allowed);
            return;
        }
        self.redirect_to_login();
    }

    /// Immediate check that navigates to login on failure
    pub fn require_auth(&self) -> bool {
        if self.is_authenticated() {
            return true;
        }
        self.redirect_to_login();
        false
    }

    /// Legacy page check for reloads
    ///
    /// A durable token short-circuits. Otherwise a URL token is adopted and,
    /// failing a strict check, the login redirect is deferred like the route
    /// guard's, so a token stored in the meantime cancels it.
    pub fn check_stored_auth(&self) -> bool {
        let store = &self.inner.host.store;
        let stored = StorageKeys::TOKEN_KEYS
            .into_iter()
            .any(|key| store.get(Tier::Durable, key).is_some_and(|v| !v.is_empty()));
        if stored {
            debug!("Found durable token during page reload");
            return true;
        }

        self.extract_and_adopt_url_token();
        if self.is_authenticated() {
            return true;
        }
        self.schedule_login_redirect();
        false
    }

    // === Reload re-attach ===

    /// Put the stored token back into the URL of a reloaded protected page
    ///
    /// A protected page without a `token` query parameter is replaced,
    /// without a new history entry, by the same URL carrying the stored
    /// token. A URL that already has one only gets its cached profile fields
    /// cleared. Returns whether the page is being replaced.
    pub fn reattach_token_on_reload(&self) -> bool {
        if !self.inner.config.reattach_on_reload {
            return false;
        }

        let url = match self.inner.host.page.current_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Could not read the current URL");
                return false;
            }
        };
        if !self.inner.routes.is_protected(url.path()) {
            return false;
        }

        if url.query_pairs().any(|(name, _)| name == StorageKeys::TOKEN_PARAM) {
            profile::clear_profile(self.inner.host.store.as_ref());
            return false;
        }

        let Some(token) = self.get_token() else {
            debug!("No stored token for protected page");
            return false;
        };
        if !self.is_valid_token(Some(token.as_str())) {
            return false;
        }

        let mut target = url;
        target
            .query_pairs_mut()
            .append_pair(StorageKeys::TOKEN_PARAM, &token);

        info!(token = %token::redact(&token), "Page reload detected, re-attaching stored token");
        match self.inner.host.page.replace_location(target.as_str()) {
            Ok(()) => {
                self.transition(PageState::Redirected);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to re-attach token");
                false
            }
        }
    }

    fn redirect_to_login(&self) {
        let login = self.login_url();
        info!(login = %login, "Redirecting to login");
        match self.inner.host.page.navigate(&login) {
            Ok(()) => self.transition(PageState::Redirected),
            Err(e) => warn!(error = %e, "Login redirect failed"),
        }
    }

    // === Outbound navigation ===

    /// Attach the current token to an outgoing URL
    ///
    /// URLs that already carry a token pass through. Without a valid token
    /// the login URL is returned instead.
    pub fn decorate_outbound_navigation(&self, url: &str) -> String {
        let base = self.inner.host.page.current_url().ok();
        if carries_token(url, base.as_ref()) {
            return url.to_string();
        }

        if !self.is_authenticated() {
            return self.login_url();
        }

        match self.get_token() {
            Some(token) => append_token(url, &token),
            None => self.login_url(),
        }
    }

    /// Navigate to `url` with the token attached
    pub fn navigate_with_auth(&self, url: &str) -> Result<()> {
        let destination = self.decorate_outbound_navigation(url);
        debug!(url, "Navigating with auth");
        self.inner.host.page.navigate(&destination)
    }

    // === Interceptors ===

    /// Register the click and submit observers
    ///
    /// Only the first call per manager registers anything. Returns whether
    /// this call installed them.
    pub fn install_interceptors(&self) -> bool {
        if self.inner.interceptors_installed.replace(true) {
            debug!("Interceptors already installed");
            return false;
        }

        let events = &self.inner.host.events;

        let weak = self.downgrade();
        events.on_click(Box::new(move |click| {
            if let Some(manager) = Self::upgrade(&weak) {
                manager.handle_click(click);
            }
        }));

        let weak = self.downgrade();
        events.on_submit(Box::new(move |form| {
            if let Some(manager) = Self::upgrade(&weak) {
                manager.handle_submit(form);
            }
        }));

        debug!("Installed navigation and form interceptors");
        true
    }

    fn handle_click(&self, click: &dyn LinkClick) {
        let Some(href) = click.href() else {
            return;
        };

        let base = self.inner.host.page.current_url().ok();
        let Ok(target) = Url::options().base_url(base.as_ref()).parse(&href) else {
            return;
        };

        if !matches!(target.scheme(), "http" | "https")
            || !self.inner.routes.is_protected(target.path())
        {
            return;
        }

        click.prevent_default();
        let destination = self.decorate_outbound_navigation(&href);
        if let Err(e) = self.inner.host.page.navigate(&destination) {
            warn!(error = %e, "Intercepted navigation failed");
        }
    }

    fn handle_submit(&self, form: &dyn FormSubmit) {
        if is_read_only_method(&form.method()) || !self.is_authenticated() {
            return;
        }

        let Some(token) = self.get_token() else {
            return;
        };
        if let Err(e) = form.set_hidden_field(StorageKeys::TOKEN_PARAM, &token) {
            warn!(error = %e, "Failed to attach token to form");
        }
    }

    // === Lifecycle ===

    /// Run the page-load lifecycle
    ///
    /// Reload re-attach and URL token adoption happen before this returns.
    /// When re-attach replaces the page nothing else runs. Interceptors and
    /// the optional route guard wait for the document to be ready.
    pub fn start(&self) {
        self.transition(PageState::Start);
        if self.reattach_token_on_reload() {
            return;
        }
        self.extract_and_adopt_url_token();

        let weak = self.downgrade();
        self.inner.host.events.on_ready(Box::new(move || {
            if let Some(manager) = Self::upgrade(&weak) {
                manager.on_document_ready();
            }
        }));
    }

    fn on_document_ready(&self) {
        self.install_interceptors();
        if self.inner.config.auto_guard_on_init {
            self.guard_protected_route();
        } else {
            self.transition(PageState::Allowed);
        }
    }

    // === Internals ===

    fn cookie_token(&self) -> Option<String> {
        if !self.inner.config.cookie_fallback {
            return None;
        }
        let cookies = self.inner.host.page.cookies()?;
        let token = cookies
            .split(';')
            .filter_map(|cookie| cookie.trim().split_once('='))
            .find(|(name, _)| *name == StorageKeys::TOKEN_COOKIE)
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())?;
        debug!("Found token in cookie as fallback");
        Some(token)
    }

    fn purge(&self) {
        if let Err(e) = self.remove_token() {
            warn!(error = %e, "Failed to purge auth token");
        }
    }

    fn transition(&self, next: PageState) {
        let previous = self.inner.state.replace(next);
        if previous != next {
            debug!(from = ?previous, to = ?next, "Page state changed");
        }
    }

    fn downgrade(&self) -> Weak<Inner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }
}
