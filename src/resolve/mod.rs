//! Locale resolution subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext (path, cookie, host, Accept-Language, stored locale)
//!     + RouteLocation (matched route name, params)
//!     → resolver.rs
//!         1. domain match       (different_domains)
//!         2. route name / path  (prefixing strategies)
//!         3. locale cookie      (no_prefix)
//!         4. stored locale
//!         5. default locale
//!     → ResolvedLocale | ResolveError::NotFound
//! ```
//!
//! # Design Decisions
//! - Request-scoped inputs only; no process-wide "current locale"
//! - Browser detection is a separate step driven by the redirect engine

pub mod request;
pub mod resolver;

pub use request::{resolve_base_url, RequestContext};
pub use resolver::{LocaleResolver, LocaleSource, ResolveError, ResolvedLocale};
