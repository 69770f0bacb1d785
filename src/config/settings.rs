//! Runtime settings derived from validated configuration.
//!
//! # Responsibilities
//! - Normalize polymorphic option values into runtime types
//! - Build the locale registry, naming convention and pages map once
//!
//! # Design Decisions
//! - Built once at startup and shared via `Arc`; never mutated afterwards
//! - Request-scoped state lives in sessions, not here

use crate::config::loader::ConfigError;
use crate::config::schema::{DetectBrowserLanguageConfig, LocaleOptions, RootRedirectEntry, Strategy};
use crate::locale::registry::LocaleRegistry;
use crate::routing::naming::RouteNaming;
use crate::routing::route::PagesConfig;

/// Status used by root redirects configured as a bare path.
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// Normalized root redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootRedirect {
    /// Target without the leading slash (`en`, `en/home`).
    pub path: String,
    pub status_code: u16,
}

impl RootRedirect {
    /// Absolute redirect target.
    pub fn target(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

impl From<&RootRedirectEntry> for RootRedirect {
    fn from(entry: &RootRedirectEntry) -> Self {
        match entry {
            RootRedirectEntry::Path(path) => RootRedirect {
                path: path.clone(),
                status_code: DEFAULT_REDIRECT_STATUS,
            },
            RootRedirectEntry::Full { path, status_code } => RootRedirect {
                path: path.clone(),
                status_code: *status_code,
            },
        }
    }
}

/// Immutable locale routing settings.
#[derive(Debug, Clone)]
pub struct LocaleSettings {
    pub registry: LocaleRegistry,
    pub naming: RouteNaming,
    pub pages: PagesConfig,
    pub root_redirect: Option<RootRedirect>,
    pub options: LocaleOptions,
}

impl LocaleSettings {
    pub fn from_options(options: LocaleOptions) -> Result<Self, ConfigError> {
        let registry = LocaleRegistry::normalize(&options.locales)?;
        let naming = RouteNaming::new(
            options.routes_name_separator.clone(),
            options.default_locale_route_name_suffix.clone(),
            &registry.codes(),
        )?;
        let pages = PagesConfig::from_entries(&options.pages);
        let root_redirect = options.root_redirect.as_ref().map(RootRedirect::from);

        Ok(Self {
            registry,
            naming,
            pages,
            root_redirect,
            options,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.options.strategy
    }

    pub fn default_locale(&self) -> Option<&str> {
        self.options.default_locale.as_deref()
    }

    /// Browser detection settings, `None` when disabled.
    pub fn detect(&self) -> Option<&DetectBrowserLanguageConfig> {
        self.options.detect_browser_language.as_ref()
    }

    /// True when the locale cookie is read and written.
    pub fn uses_cookie(&self) -> bool {
        self.detect().is_some_and(|d| d.use_cookie)
    }

    /// True when the strategy serves some locale without a prefix.
    pub fn has_implicit_default(&self) -> bool {
        self.strategy() == Strategy::NoPrefix
            || (self.strategy().has_unprefixed_default() && self.default_locale().is_some())
    }
}
