//! Locale resolution for one navigation.
//!
//! # Responsibilities
//! - Pick the active locale from domain, route, cookie, stored state or default
//! - Report routes that carry no locale under prefix-only strategies
//! - Run browser language detection with its on/off conditions
//!
//! # Design Decisions
//! - Pure reads of request-scoped data and immutable settings
//! - Domain misses log a warning and fall through
//! - Cookie values are only trusted when they name a configured locale

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::Strategy;
use crate::config::settings::LocaleSettings;
use crate::locale::browser::match_browser_locale;
use crate::redirect::loader::LoadError;
use crate::resolve::request::RequestContext;
use crate::routing::router::{LocaleRouter, RouteLocation};

/// Where a resolved locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleSource {
    Route,
    Cookie,
    Domain,
    Browser,
    Stored,
    Default,
}

impl LocaleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocaleSource::Route => "route",
            LocaleSource::Cookie => "cookie",
            LocaleSource::Domain => "domain",
            LocaleSource::Browser => "browser",
            LocaleSource::Stored => "stored",
            LocaleSource::Default => "default",
        }
    }
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolution for one navigation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedLocale {
    pub locale: String,
    pub source: LocaleSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl ResolvedLocale {
    pub fn new(locale: impl Into<String>, source: LocaleSource) -> Self {
        Self {
            locale: locale.into(),
            source,
            redirect_to: None,
        }
    }
}

/// Errors surfaced to the host for one navigation.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no locale found for path \"{path}\"")]
    NotFound { path: String },

    #[error("failed to load messages for locale \"{locale}\"")]
    LoadFailed {
        locale: String,
        #[source]
        source: LoadError,
    },
}

/// Resolves locales against the generated routes.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    router: Arc<LocaleRouter>,
}

impl LocaleResolver {
    pub fn new(router: Arc<LocaleRouter>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &LocaleRouter {
        &self.router
    }

    fn settings(&self) -> &LocaleSettings {
        self.router.settings()
    }

    /// Locale for `route`, first applicable source wins.
    pub fn resolve(
        &self,
        route: &RouteLocation,
        request: &RequestContext,
    ) -> Result<ResolvedLocale, ResolveError> {
        let settings = self.settings();
        let strategy = settings.strategy();

        if settings.options.different_domains {
            if let Some(locale) = self.locale_from_domain(request) {
                return Ok(ResolvedLocale::new(locale, LocaleSource::Domain));
            }
            tracing::warn!(
                host = request.effective_host().unwrap_or(""),
                "No locale domain matches request host"
            );
        } else if strategy.uses_prefix() {
            if let Some(locale) = self.router.locale_from_route(route) {
                return Ok(ResolvedLocale::new(locale, LocaleSource::Route));
            }
            if !route.matched && !settings.has_implicit_default() {
                return Err(ResolveError::NotFound {
                    path: route.path.clone(),
                });
            }
        } else if let Some(locale) = self.locale_cookie(request) {
            return Ok(ResolvedLocale::new(locale, LocaleSource::Cookie));
        }

        if let Some(stored) = request
            .stored_locale
            .as_deref()
            .filter(|code| settings.registry.contains(code))
        {
            return Ok(ResolvedLocale::new(stored, LocaleSource::Stored));
        }

        match settings.default_locale() {
            Some(default) => Ok(ResolvedLocale::new(default, LocaleSource::Default)),
            None => Err(ResolveError::NotFound {
                path: route.path.clone(),
            }),
        }
    }

    /// Locale cookie value when cookies are enabled and it names a configured locale.
    pub fn locale_cookie(&self, request: &RequestContext) -> Option<String> {
        let settings = self.settings();
        if !settings.uses_cookie() {
            return None;
        }
        request
            .locale_cookie
            .as_deref()
            .filter(|code| settings.registry.contains(code))
            .map(str::to_string)
    }

    /// Locale whose domain equals the request host.
    pub fn locale_from_domain(&self, request: &RequestContext) -> Option<String> {
        let host = request.effective_host()?;
        self.settings()
            .registry
            .find_by_domain(host)
            .map(|l| l.code.clone())
    }

    /// Best configured locale for the client's language preferences.
    pub fn browser_locale(&self, request: &RequestContext) -> Option<String> {
        let preferences = request.browser_locales();
        if preferences.is_empty() {
            return None;
        }
        match_browser_locale(&self.settings().registry, &preferences)
    }

    /// Locale to switch to from browser detection, `None` when detection does not apply.
    pub fn detect_browser_language(
        &self,
        route: &RouteLocation,
        request: &RequestContext,
        current: Option<&str>,
    ) -> Option<ResolvedLocale> {
        let settings = self.settings();
        let detect = settings.detect()?;
        if settings.options.static_generation {
            return None;
        }

        if settings.strategy() != Strategy::NoPrefix {
            if detect.only_on_root {
                if route.path != "/" {
                    return None;
                }
            } else if detect.only_on_no_prefix
                && !detect.always_redirect
                && settings.naming.locale_from_path(&route.path).is_some()
            {
                return None;
            }
        }

        let cookie = self.locale_cookie(request);
        let (matched, source) = match &cookie {
            Some(code) => (Some(code.clone()), LocaleSource::Cookie),
            None => (self.browser_locale(request), LocaleSource::Browser),
        };
        let (locale, source) = match matched {
            Some(code) => (code, source),
            None => (detect.fallback_locale.clone()?, LocaleSource::Default),
        };

        if detect.use_cookie && !detect.always_redirect && cookie.is_some() {
            return None;
        }
        if current == Some(locale.as_str()) {
            return None;
        }

        tracing::debug!(locale = %locale, source = %source, path = %route.path, "Browser language detected");
        Some(ResolvedLocale::new(locale, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DetectBrowserLanguageConfig, LocaleEntry, LocaleObject, LocaleOptions};
    use crate::routing::route::RouteNode;

    fn entry(code: &str, iso: Option<&str>, domain: Option<&str>) -> LocaleEntry {
        LocaleEntry::Full(LocaleObject {
            code: code.into(),
            iso: iso.map(Into::into),
            domain: domain.map(Into::into),
            is_catchall_locale: false,
            dir: None,
            name: None,
            file: None,
        })
    }

    fn resolver(options: LocaleOptions) -> LocaleResolver {
        let settings = Arc::new(LocaleSettings::from_options(options).unwrap());
        let routes = vec![
            RouteNode::new("/").named("index"),
            RouteNode::new("/about").named("about"),
        ];
        LocaleResolver::new(Arc::new(LocaleRouter::new(settings, &routes).unwrap()))
    }

    fn options(strategy: Strategy) -> LocaleOptions {
        LocaleOptions {
            locales: vec![entry("en", Some("en-US"), None), entry("fr", Some("fr-FR"), None)],
            default_locale: Some("en".into()),
            strategy,
            ..LocaleOptions::default()
        }
    }

    fn resolve(resolver: &LocaleResolver, request: &RequestContext) -> Result<ResolvedLocale, ResolveError> {
        let route = resolver.router().resolve_location(&request.full_path);
        resolver.resolve(&route, request)
    }

    #[test]
    fn test_route_locale() {
        let resolver = resolver(options(Strategy::PrefixExceptDefault));
        let resolved = resolve(&resolver, &RequestContext::new("/fr/about")).unwrap();
        assert_eq!(resolved, ResolvedLocale::new("fr", LocaleSource::Route));

        let resolved = resolve(&resolver, &RequestContext::new("/about")).unwrap();
        assert_eq!(resolved, ResolvedLocale::new("en", LocaleSource::Route));
    }

    #[test]
    fn test_unmatched_path_defaults_with_implicit_default() {
        let resolver = resolver(options(Strategy::PrefixExceptDefault));
        let resolved = resolve(&resolver, &RequestContext::new("/nope")).unwrap();
        assert_eq!(resolved, ResolvedLocale::new("en", LocaleSource::Default));

        let request = RequestContext::new("/nope").with_stored_locale("fr");
        assert_eq!(resolve(&resolver, &request).unwrap().source, LocaleSource::Stored);
    }

    #[test]
    fn test_prefix_without_locale_is_not_found() {
        let resolver = resolver(options(Strategy::Prefix));
        let err = resolve(&resolver, &RequestContext::new("/about")).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { path } if path == "/about"));
        assert!(resolve(&resolver, &RequestContext::new("/en/about")).is_ok());
    }

    #[test]
    fn test_no_prefix_uses_cookie() {
        let mut options = options(Strategy::NoPrefix);
        options.detect_browser_language = Some(DetectBrowserLanguageConfig::default());
        let resolver = resolver(options);

        let request = RequestContext::new("/about").with_cookie("fr");
        assert_eq!(resolve(&resolver, &request).unwrap(), ResolvedLocale::new("fr", LocaleSource::Cookie));

        // Unknown cookie values are ignored.
        let request = RequestContext::new("/about").with_cookie("xx");
        assert_eq!(resolve(&resolver, &request).unwrap(), ResolvedLocale::new("en", LocaleSource::Default));
    }

    #[test]
    fn test_domain_locale() {
        let mut options = options(Strategy::PrefixExceptDefault);
        options.locales = vec![
            entry("en", None, Some("example.com")),
            entry("fr", None, Some("fr.example.com")),
        ];
        options.different_domains = true;
        let resolver = resolver(options);

        let request = RequestContext::new("/about").with_host("fr.example.com");
        assert_eq!(resolve(&resolver, &request).unwrap(), ResolvedLocale::new("fr", LocaleSource::Domain));

        let request = RequestContext::new("/about").with_host("other.org");
        assert_eq!(resolve(&resolver, &request).unwrap(), ResolvedLocale::new("en", LocaleSource::Default));
    }

    #[test]
    fn test_detect_browser_language() {
        let mut options = options(Strategy::PrefixExceptDefault);
        options.detect_browser_language = Some(DetectBrowserLanguageConfig {
            only_on_root: true,
            ..DetectBrowserLanguageConfig::default()
        });
        let resolver = resolver(options);
        let root = resolver.router().resolve_location("/");
        let about = resolver.router().resolve_location("/about");

        let request = RequestContext::new("/").with_accept_language("fr-FR,en;q=0.5");
        assert_eq!(
            resolver.detect_browser_language(&root, &request, Some("en")),
            Some(ResolvedLocale::new("fr", LocaleSource::Browser))
        );
        // Only on root.
        assert_eq!(resolver.detect_browser_language(&about, &request, Some("en")), None);
        // Already active.
        assert_eq!(resolver.detect_browser_language(&root, &request, Some("fr")), None);
        // A valid cookie stops repeated redirects.
        let with_cookie = request.clone().with_cookie("en");
        assert_eq!(resolver.detect_browser_language(&root, &with_cookie, Some("fr")), None);
    }

    #[test]
    fn test_detect_always_redirect_uses_cookie() {
        let mut options = options(Strategy::PrefixExceptDefault);
        options.detect_browser_language = Some(DetectBrowserLanguageConfig {
            always_redirect: true,
            only_on_no_prefix: true,
            ..DetectBrowserLanguageConfig::default()
        });
        let resolver = resolver(options);
        let route = resolver.router().resolve_location("/fr/about");

        let request = RequestContext::new("/fr/about")
            .with_cookie("en")
            .with_accept_language("fr");
        assert_eq!(
            resolver.detect_browser_language(&route, &request, Some("fr")),
            Some(ResolvedLocale::new("en", LocaleSource::Cookie))
        );
    }

    #[test]
    fn test_detect_fallback_and_static_mode() {
        let mut options = options(Strategy::PrefixExceptDefault);
        options.detect_browser_language = Some(DetectBrowserLanguageConfig {
            fallback_locale: Some("fr".into()),
            ..DetectBrowserLanguageConfig::default()
        });
        let resolver = resolver(options.clone());
        let route = resolver.router().resolve_location("/about");
        let request = RequestContext::new("/about").with_accept_language("de-DE");
        assert_eq!(
            resolver.detect_browser_language(&route, &request, Some("en")),
            Some(ResolvedLocale::new("fr", LocaleSource::Default))
        );

        options.static_generation = true;
        let resolver = self::resolver(options);
        assert_eq!(resolver.detect_browser_language(&route, &request, Some("en")), None);
    }
}
