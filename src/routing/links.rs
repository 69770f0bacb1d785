//! Link helpers bound to one navigation.

use crate::config::schema::Strategy;
use crate::config::settings::LocaleSettings;
use crate::routing::router::{LocaleRouter, RouteLocation, RouteTarget};

/// Builds locale links for the current route and locale.
#[derive(Debug, Clone, Copy)]
pub struct LocaleLinks<'a> {
    router: &'a LocaleRouter,
    route: &'a RouteLocation,
    current: &'a str,
    protocol: &'a str,
}

impl<'a> LocaleLinks<'a> {
    pub fn new(
        router: &'a LocaleRouter,
        route: &'a RouteLocation,
        current: &'a str,
        protocol: &'a str,
    ) -> Self {
        Self {
            router,
            route,
            current,
            protocol,
        }
    }

    pub fn current_locale(&self) -> &str {
        self.current
    }

    pub fn settings(&self) -> &'a LocaleSettings {
        self.router.settings()
    }

    /// Path of `target` in `code`, or in the current locale.
    pub fn locale_path(&self, target: &str, code: Option<&str>) -> Option<String> {
        let code = code.unwrap_or(self.current);
        if self.router.settings().strategy() == Strategy::NoPrefix && code != self.current {
            tracing::warn!(
                locale = code,
                current = self.current,
                "Passing non-current locale to locale_path is unsupported when using no_prefix strategy"
            );
        }
        self.router.locale_path(RouteTarget::parse(target), code)
    }

    /// Current route in `code`; absolute on the locale's domain when domains differ.
    pub fn switch_locale_path(&self, code: &str) -> Option<String> {
        let path = self.router.switch_locale_path(self.route, code)?;
        let settings = self.router.settings();
        if !settings.options.different_domains {
            return Some(path);
        }

        match settings.registry.find(code).and_then(|l| l.domain.as_deref()) {
            Some(domain) => Some(format!("{}://{domain}{path}", self.protocol)),
            None => {
                tracing::warn!(locale = code, "Could not find domain name for locale");
                Some(path)
            }
        }
    }

    pub fn route_base_name(&self) -> Option<String> {
        self.router.route_base_name(self.route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LocaleEntry, LocaleObject, LocaleOptions};
    use crate::config::settings::LocaleSettings;
    use crate::routing::route::RouteNode;
    use std::sync::Arc;

    fn domain(code: &str, domain: Option<&str>) -> LocaleEntry {
        LocaleEntry::Full(LocaleObject {
            code: code.into(),
            iso: None,
            domain: domain.map(Into::into),
            is_catchall_locale: false,
            dir: None,
            name: None,
            file: None,
        })
    }

    fn router(strategy: Strategy, different_domains: bool) -> LocaleRouter {
        let options = LocaleOptions {
            locales: vec![domain("en", Some("en.example.com")), domain("fr", None)],
            default_locale: Some("en".into()),
            strategy,
            different_domains,
            ..LocaleOptions::default()
        };
        let settings = Arc::new(LocaleSettings::from_options(options).unwrap());
        LocaleRouter::new(settings, &[RouteNode::new("/about").named("about")]).unwrap()
    }

    #[test]
    fn test_links_for_current_route() {
        let router = router(Strategy::PrefixExceptDefault, false);
        let route = router.resolve_location("/fr/about");
        let links = LocaleLinks::new(&router, &route, "fr", "http");

        assert_eq!(links.locale_path("about", None), Some("/fr/about".into()));
        assert_eq!(links.locale_path("/about", Some("en")), Some("/about".into()));
        assert_eq!(links.switch_locale_path("en"), Some("/about".into()));
        assert_eq!(links.route_base_name(), Some("about".into()));
    }

    #[test]
    fn test_switch_to_other_domain() {
        let router = router(Strategy::PrefixExceptDefault, true);
        let route = router.resolve_location("/about");
        let links = LocaleLinks::new(&router, &route, "fr", "https");

        assert_eq!(links.switch_locale_path("en"), Some("https://en.example.com/about".into()));
        // No domain configured: plain path.
        assert_eq!(links.switch_locale_path("fr"), Some("/about".into()));
    }

    #[test]
    fn test_no_prefix_other_locale_returns_plain_path() {
        let router = router(Strategy::NoPrefix, false);
        let route = router.resolve_location("/about");
        let links = LocaleLinks::new(&router, &route, "en", "http");
        assert_eq!(links.locale_path("about", Some("fr")), Some("/about".into()));
    }
}
