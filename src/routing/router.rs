//! Route lookup and locale-aware path building.
//!
//! # Responsibilities
//! - Store the generated route tree and its lookup table
//! - Resolve a request path into a `RouteLocation`
//! - Recover the locale and base name of a resolved route
//! - Build the equivalent path of a route in another locale
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Name lookups go through the same naming convention as generation
//! - Explicit `None` rather than a silent fallback path

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::schema::Strategy;
use crate::config::settings::LocaleSettings;
use crate::routing::generator::{self, GenerateError, GenerateOptions};
use crate::routing::matcher::{RouteParams, RouteTable};
use crate::routing::route::RouteNode;

/// A request path resolved against the generated routes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteLocation {
    /// Path without query string.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
    pub name: Option<String>,
    pub params: RouteParams,
    pub matched: bool,
    pub redirect: Option<String>,
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl RouteLocation {
    /// Path followed by the query string, if any.
    pub fn full_path(&self) -> String {
        with_query(&self.path, self.query.as_deref())
    }
}

/// Target of [`LocaleRouter::locale_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget<'a> {
    /// Base route name.
    Name(&'a str),
    /// Unlocalized path, optionally with a query string.
    Path(&'a str),
}

impl<'a> RouteTarget<'a> {
    /// Paths start with `/`, anything else is a route name.
    pub fn parse(target: &'a str) -> Self {
        if target.starts_with('/') {
            RouteTarget::Path(target)
        } else {
            RouteTarget::Name(target)
        }
    }
}

/// Generated routes plus the lookups built on them.
#[derive(Debug, Clone)]
pub struct LocaleRouter {
    settings: Arc<LocaleSettings>,
    routes: Vec<RouteNode>,
    table: RouteTable,
}

impl LocaleRouter {
    /// Generate the locale routes for `base_routes` and index them.
    pub fn new(settings: Arc<LocaleSettings>, base_routes: &[RouteNode]) -> Result<Self, GenerateError> {
        let options = GenerateOptions {
            naming: &settings.naming,
            pages: &settings.pages,
            root_redirect: settings.root_redirect.as_ref(),
            different_domains: settings.options.different_domains,
        };
        let routes = generator::generate(
            base_routes,
            &settings.registry,
            settings.default_locale(),
            settings.strategy(),
            &options,
        )?;
        let table = RouteTable::from_routes(&routes);

        tracing::info!(routes = table.len(), strategy = %settings.strategy(), "Route table built");

        Ok(Self {
            settings,
            routes,
            table,
        })
    }

    pub fn settings(&self) -> &LocaleSettings {
        &self.settings
    }

    pub fn shared_settings(&self) -> Arc<LocaleSettings> {
        Arc::clone(&self.settings)
    }

    /// Generated route tree.
    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve `full_path` (path, optional query, optional fragment).
    pub fn resolve_location(&self, full_path: &str) -> RouteLocation {
        let without_fragment = full_path.split('#').next().unwrap_or(full_path);
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string()).filter(|q| !q.is_empty())),
            None => (without_fragment, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        match self.table.match_path(path) {
            Some(matched) => RouteLocation {
                path: path.to_string(),
                query,
                name: matched.entry.name.clone(),
                params: matched.params,
                matched: true,
                redirect: matched.entry.redirect.clone(),
                meta: matched.entry.meta.clone(),
            },
            None => RouteLocation {
                path: path.to_string(),
                query,
                ..RouteLocation::default()
            },
        }
    }

    /// Base name of the route, without locale and default suffix.
    pub fn route_base_name(&self, route: &RouteLocation) -> Option<String> {
        route
            .name
            .as_deref()
            .map(|name| self.settings.naming.base_name(name).to_string())
    }

    /// Locale carried by the route name, or by the path for nameless routes.
    pub fn locale_from_route(&self, route: &RouteLocation) -> Option<String> {
        match &route.name {
            Some(name) => self.settings.naming.locale_from_name(name),
            None => self.settings.naming.locale_from_path(&route.path),
        }
    }

    /// Name of the route serving `base` in `code`.
    ///
    /// The default locale under `prefix_and_default` maps to its unprefixed route.
    pub fn locale_route_name(&self, base: &str, code: &str) -> String {
        if self.settings.strategy() == Strategy::NoPrefix {
            base.to_string()
        } else {
            self.settings.naming.localized(base, code)
        }
    }

    /// Path of `route` in locale `code`, keeping params and query.
    pub fn switch_locale_path(&self, route: &RouteLocation, code: &str) -> Option<String> {
        let base = self.route_base_name(route)?;
        let name = self.locale_route_name(&base, code);
        let entry = self.table.find_by_name(&name)?;
        let path = entry.pattern.build(&route.params)?;
        Some(with_query(&path, route.query.as_deref()))
    }

    /// Path of a named route or an unlocalized path in locale `code`.
    pub fn locale_path(&self, target: RouteTarget<'_>, code: &str) -> Option<String> {
        match target {
            RouteTarget::Name(base) => {
                let entry = self.table.find_by_name(&self.locale_route_name(base, code))?;
                entry.pattern.build(&RouteParams::new())
            }
            RouteTarget::Path(full_path) => {
                let mut resolved = self.resolve_location(full_path);
                if let Some(redirect) = resolved.redirect.clone() {
                    let query = resolved.query.take();
                    resolved = self.resolve_location(&redirect);
                    resolved.query = resolved.query.or(query);
                }

                if resolved.name.is_some() {
                    return self.switch_locale_path(&resolved, code);
                }
                self.prefixed_fallback(&resolved, code)
            }
        }
    }

    /// Best-effort prefixing of a path no named route serves.
    fn prefixed_fallback(&self, resolved: &RouteLocation, code: &str) -> Option<String> {
        let strategy = self.settings.strategy();
        let is_default = self.settings.default_locale() == Some(code);
        let prefixed = strategy != Strategy::NoPrefix
            && !(is_default && strategy == Strategy::PrefixExceptDefault)
            && !self.settings.options.different_domains;

        let path = if prefixed {
            if resolved.path == "/" {
                format!("/{code}")
            } else {
                format!("/{code}{}", resolved.path)
            }
        } else {
            resolved.path.clone()
        };

        self.table.match_path(&path)?;
        Some(with_query(&path, resolved.query.as_deref()))
    }
}

/// Append `?query` when present.
pub fn with_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path.to_string(),
    }
}
