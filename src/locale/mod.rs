//! Locale subsystem.
//!
//! # Data Flow
//! ```text
//! configured locale entries
//!     → registry.rs (normalize, reject duplicates)
//!     → LocaleRegistry (immutable, configuration order)
//!
//! Accept-Language header
//!     → browser.rs (parse, score, tie-break)
//!     → best matching locale code
//! ```

pub mod browser;
pub mod registry;

pub use browser::{match_browser_locale, parse_accept_language};
pub use registry::{Locale, LocaleRegistry, RegistryError};
