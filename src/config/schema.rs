//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the locale
//! router. All types derive Serde traits for deserialization from config files.
//! Values that the configuration format allows in more than one shape (a bare
//! locale code or a full locale table, a root redirect path or a table with a
//! status code, a page path or `false`) are untagged enums here and get
//! normalized into runtime types by [`crate::config::settings`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::route::RouteNode;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct I18nConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Locale routing options.
    pub i18n: LocaleOptions,

    /// Base route tree owned by the host application.
    pub routes: Vec<RouteNode>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Routing strategy: whether and which routes get a locale path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strategy {
    /// No prefixes, one route per page.
    NoPrefix,
    /// Every locale, the default one included, is prefixed.
    Prefix,
    /// Every locale except the default one is prefixed.
    PrefixExceptDefault,
    /// Like `PrefixExceptDefault`, plus a prefixed copy for the default locale.
    PrefixAndDefault,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::NoPrefix => "no_prefix",
            Strategy::Prefix => "prefix",
            Strategy::PrefixExceptDefault => "prefix_except_default",
            Strategy::PrefixAndDefault => "prefix_and_default",
        }
    }

    /// True when locales are carried in the URL path.
    pub fn uses_prefix(&self) -> bool {
        !matches!(self, Strategy::NoPrefix)
    }

    /// True when the default locale is served without a prefix.
    pub fn has_unprefixed_default(&self) -> bool {
        matches!(self, Strategy::PrefixExceptDefault | Strategy::PrefixAndDefault)
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::PrefixExceptDefault
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Strategy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "no_prefix" => Ok(Strategy::NoPrefix),
            "prefix" => Ok(Strategy::Prefix),
            "prefix_except_default" => Ok(Strategy::PrefixExceptDefault),
            "prefix_and_default" => Ok(Strategy::PrefixAndDefault),
            other => Err(format!("Invalid \"strategy\" option \"{other}\"")),
        }
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
    Auto,
}

/// A configured locale: either a bare code or a full table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocaleEntry {
    Code(String),
    Full(LocaleObject),
}

/// Full locale descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocaleObject {
    /// Identifier used in URLs and route names.
    pub code: String,

    /// External language tag used for `hreflang` and `og:locale`.
    #[serde(default)]
    pub iso: Option<String>,

    /// Host serving this locale when `different_domains` is enabled.
    #[serde(default)]
    pub domain: Option<String>,

    /// Representative of its language group for language-only alternates.
    #[serde(default)]
    pub is_catchall_locale: bool,

    #[serde(default)]
    pub dir: Option<Direction>,

    /// Human readable name.
    #[serde(default)]
    pub name: Option<String>,

    /// Message file loaded lazily for this locale.
    #[serde(default)]
    pub file: Option<String>,
}

/// Root redirect: a bare path or a path with status code.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RootRedirectEntry {
    Path(String),
    Full { path: String, status_code: u16 },
}

/// Browser language detection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectBrowserLanguageConfig {
    /// Redirect on every visit, not only the first one.
    pub always_redirect: bool,

    /// Allow the locale cookie in cross-origin contexts.
    pub cookie_cross_origin: bool,

    pub cookie_domain: Option<String>,

    /// Name of the cookie storing the chosen locale.
    pub cookie_key: String,

    pub cookie_secure: bool,

    /// Locale used when neither cookie nor browser languages match.
    pub fallback_locale: Option<String>,

    /// Only detect on paths without a locale prefix.
    pub only_on_no_prefix: bool,

    /// Only detect on the root path.
    pub only_on_root: bool,

    /// Persist the chosen locale in a cookie.
    pub use_cookie: bool,
}

impl Default for DetectBrowserLanguageConfig {
    fn default() -> Self {
        Self {
            always_redirect: false,
            cookie_cross_origin: false,
            cookie_domain: None,
            cookie_key: "i18n_redirected".to_string(),
            cookie_secure: false,
            fallback_locale: None,
            only_on_no_prefix: false,
            only_on_root: false,
            use_cookie: true,
        }
    }
}

/// Per-page localization: `false` or a table of locale paths.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PageEntry {
    Enabled(bool),
    Paths(BTreeMap<String, PagePathEntry>),
}

/// A locale path for a page: a custom path or `false`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PagePathEntry {
    Path(String),
    Enabled(bool),
}

/// Message fallback locales: `"en"`, `["en", "fr"]` or
/// `{ de = ["en"], default = ["en"] }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FallbackLocaleEntry {
    Code(String),
    List(Vec<String>),
    PerLocale(BTreeMap<String, Vec<String>>),
}

/// Key of the per-locale fallback map applying to every locale.
pub const DEFAULT_FALLBACK_KEY: &str = "default";

impl FallbackLocaleEntry {
    /// Fallbacks to load before `locale`: its own list, then the default list.
    ///
    /// `locale` itself and repeated codes are skipped.
    pub fn for_locale(&self, locale: &str) -> Vec<&str> {
        let candidates: Vec<&str> = match self {
            FallbackLocaleEntry::Code(code) => vec![code.as_str()],
            FallbackLocaleEntry::List(codes) => codes.iter().map(String::as_str).collect(),
            FallbackLocaleEntry::PerLocale(map) => [locale, DEFAULT_FALLBACK_KEY]
                .iter()
                .filter_map(|key| map.get(*key))
                .flatten()
                .map(String::as_str)
                .collect(),
        };

        let mut fallbacks = Vec::with_capacity(candidates.len());
        for code in candidates {
            if code != locale && !fallbacks.contains(&code) {
                fallbacks.push(code);
            }
        }
        fallbacks
    }

    /// Every locale code the entry names, map keys included.
    pub fn codes(&self) -> Vec<&str> {
        match self {
            FallbackLocaleEntry::Code(code) => vec![code.as_str()],
            FallbackLocaleEntry::List(codes) => codes.iter().map(String::as_str).collect(),
            FallbackLocaleEntry::PerLocale(map) => map
                .iter()
                .flat_map(|(key, codes)| {
                    let key = (key != DEFAULT_FALLBACK_KEY).then_some(key.as_str());
                    key.into_iter().chain(codes.iter().map(String::as_str))
                })
                .collect(),
        }
    }
}

/// Locale routing options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleOptions {
    /// Supported locales.
    pub locales: Vec<LocaleEntry>,

    /// Default locale code.
    pub default_locale: Option<String>,

    pub strategy: Strategy,

    /// Separator between base route name and locale code.
    pub routes_name_separator: String,

    /// Suffix marking the prefixed copy of default locale routes.
    pub default_locale_route_name_suffix: String,

    pub root_redirect: Option<RootRedirectEntry>,

    /// Browser language detection; absent means disabled.
    pub detect_browser_language: Option<DetectBrowserLanguageConfig>,

    /// Custom paths keyed by base route name.
    pub pages: BTreeMap<String, PageEntry>,

    /// Origin prepended to SEO links.
    pub base_url: String,

    /// Resolve locales from the request host instead of the path.
    pub different_domains: bool,

    /// Load locale messages on demand.
    pub lazy: bool,

    /// Directory holding locale message files (`file` of each locale).
    pub lang_dir: Option<String>,

    /// Message fallback locales loaded before any lazily loaded locale.
    pub fallback_locale: Option<FallbackLocaleEntry>,

    /// Emit SEO head metadata.
    pub seo: bool,

    /// Store the navigated locale as pending instead of applying it.
    pub skip_setting_locale_on_navigate: bool,

    /// Pre-rendering without a live client.
    pub static_generation: bool,
}

impl Default for LocaleOptions {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            default_locale: None,
            strategy: Strategy::default(),
            routes_name_separator: "___".to_string(),
            default_locale_route_name_suffix: "default".to_string(),
            root_redirect: None,
            detect_browser_language: None,
            pages: BTreeMap::new(),
            base_url: String::new(),
            different_domains: false,
            lazy: false,
            lang_dir: None,
            fallback_locale: None,
            seo: true,
            skip_setting_locale_on_navigate: false,
            static_generation: false,
        }
    }
}

impl LocaleOptions {
    /// Codes of all configured locales in configuration order.
    pub fn locale_codes(&self) -> Vec<&str> {
        self.locales
            .iter()
            .map(|entry| match entry {
                LocaleEntry::Code(code) => code.as_str(),
                LocaleEntry::Full(locale) => locale.code.as_str(),
            })
            .collect()
    }
}
