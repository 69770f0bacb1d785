//! Request data consumed by locale resolution.

use crate::config::settings::LocaleSettings;
use crate::locale::browser::parse_accept_language;

/// Request-scoped inputs of one navigation.
///
/// Built by the HTTP layer or by callers driving navigations directly;
/// the resolver never reads global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Path with query string.
    pub full_path: String,
    /// Raw value of the locale cookie.
    pub locale_cookie: Option<String>,
    pub host: Option<String>,
    pub forwarded_host: Option<String>,
    pub forwarded_proto: Option<String>,
    pub accept_language: Option<String>,
    /// Locale kept from a previous navigation of the same client.
    pub stored_locale: Option<String>,
}

impl RequestContext {
    pub fn new(full_path: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
            ..Self::default()
        }
    }

    pub fn with_cookie(mut self, value: impl Into<String>) -> Self {
        self.locale_cookie = Some(value.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_accept_language(mut self, header: impl Into<String>) -> Self {
        self.accept_language = Some(header.into());
        self
    }

    pub fn with_stored_locale(mut self, code: impl Into<String>) -> Self {
        self.stored_locale = Some(code.into());
        self
    }

    /// Effective host: `X-Forwarded-Host` first, then `Host`.
    pub fn effective_host(&self) -> Option<&str> {
        self.forwarded_host
            .as_deref()
            .and_then(|h| h.split(',').next())
            .map(str::trim)
            .or(self.host.as_deref())
            .filter(|h| !h.is_empty())
    }

    /// `https` when the forwarded protocol says so, `http` otherwise.
    pub fn protocol(&self) -> &'static str {
        match self.forwarded_proto.as_deref() {
            Some(proto) if proto.trim().eq_ignore_ascii_case("https") => "https",
            _ => "http",
        }
    }

    /// Client language preferences in header order.
    pub fn browser_locales(&self) -> Vec<String> {
        self.accept_language
            .as_deref()
            .map(parse_accept_language)
            .unwrap_or_default()
    }
}

/// Origin prepended to absolute links for `locale`.
///
/// With different domains, the locale's own domain wins over `base_url`.
pub fn resolve_base_url(settings: &LocaleSettings, request: &RequestContext, locale: &str) -> String {
    if settings.options.different_domains && !locale.is_empty() {
        match settings.registry.find(locale).and_then(|l| l.domain.as_deref()) {
            Some(domain) => return format!("{}://{domain}", request.protocol()),
            None => tracing::warn!(locale, "Could not find domain name for locale"),
        }
    }
    settings.options.base_url.clone()
}
