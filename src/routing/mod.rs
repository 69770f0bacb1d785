//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Generation (at startup):
//!     base RouteNode tree + LocaleSettings
//!     → generator.rs (per-locale copies, prefixes, name suffixes)
//!     → naming.rs (reversible `<base><sep><code>[<sep><suffix>]` names)
//!     → matcher.rs (flatten into ordered RouteTable)
//!     → router.rs (immutable LocaleRouter)
//!
//! Per navigation:
//!     full path
//!     → router.rs (RouteLocation: name, params, query)
//!     → links.rs (locale_path / switch_locale_path for the current locale)
//! ```
//!
//! # Design Decisions
//! - Routes generated at startup, immutable at runtime
//! - No regex in the path matcher; names are parsed with one compiled pattern
//! - Deterministic: same input always matches same route
//! - First match wins (children before parents, catch-all last)

pub mod generator;
pub mod links;
pub mod matcher;
pub mod naming;
pub mod route;
pub mod router;

pub use generator::{generate, GenerateError, GenerateOptions};
pub use links::LocaleLinks;
pub use naming::{LocaleRouteName, RouteNaming};
pub use route::{PageOptions, PagePath, PagesConfig, RouteNode};
pub use router::{LocaleRouter, RouteLocation, RouteTarget};
