//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / resolve / redirect / http produce:
//!     → tracing events (structured fields: locale, path, source, status)
//!     → metrics.rs counters (navigations, redirects, not found)
//!
//! Consumers:
//!     → logging.rs subscriber (pretty or JSON on stdout)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured log level
//! - Counters are recorded unconditionally; without an installed
//!   recorder they are no-ops

pub mod logging;
pub mod metrics;
