//! Locale-aware routing for multi-locale web applications.
//!
//! Generates per-locale route tables, resolves the active locale of every
//! navigation and decides locale redirects; ships an axum service that
//! applies those decisions over HTTP.

pub mod config;
pub mod http;
pub mod locale;
pub mod observability;
pub mod redirect;
pub mod resolve;
pub mod routing;
pub mod seo;

pub use config::schema::I18nConfig;
pub use http::HttpServer;
pub use redirect::RedirectEngine;
pub use routing::LocaleRouter;
