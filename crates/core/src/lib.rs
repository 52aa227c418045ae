//! Bearer token session handling for the job portal frontends
//!
//! The [`TokenSessionManager`] persists a token across page loads, attaches
//! it to in-app navigation and form posts, and redirects to the login
//! service when a protected page has no usable token. Browser access goes
//! through the traits in [`host`].

pub mod config;
pub mod error;
pub mod host;
pub mod profile;
pub mod routes;
pub mod session;
pub mod store;
pub mod token;

#[cfg(any(test, feature = "tests"))]
pub mod tests;

pub use config::{SessionConfig, StorageKeys};
pub use error::{Error, Result};
pub use host::{Clock, DocumentEvents, Page, ProfileClient, Scheduler, SessionStore, Tier};
pub use profile::{ProfileResponse, UserId};
pub use routes::{ProtectedRoutes, RouteClass};
pub use session::{GuardOutcome, Host, PageState, TokenSessionManager};
pub use store::MemoryStore;
pub use token::{TokenClaims, TokenError};
