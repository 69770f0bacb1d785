//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, warnings)
//!     → I18nConfig (validated, immutable)
//!     → settings.rs (registry, naming, pages normalized once)
//!     → shared via Arc<LocaleSettings> to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Explicit structs instead of a recursive merge of option objects

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{FallbackLocaleEntry, I18nConfig, LocaleOptions, ObservabilityConfig, ServerConfig, Strategy};
pub use settings::{LocaleSettings, RootRedirect};
pub use validation::{config_warnings, log_config_warnings, ValidationError, ValidationWarning};
