//! Locale-aware route table generation.
//!
//! # Responsibilities
//! - Duplicate a base route tree once per locale according to the strategy
//! - Prefix paths and suffix names
//! - Apply per-page path overrides and exclusions
//! - Prepend the synthetic root redirect route
//!
//! # Design Decisions
//! - Pure function of its inputs; base routes are never mutated
//! - Children inherit the locale (and default-copy flag) of their parent copy
//! - Relative child paths are never prefixed, the parent already is
//! - Default locale routes keep the locale suffix in their name so every
//!   generated name can be reversed to its locale

use thiserror::Error;

use crate::config::schema::Strategy;
use crate::config::settings::RootRedirect;
use crate::locale::registry::LocaleRegistry;
use crate::routing::naming::RouteNaming;
use crate::routing::route::{PagePath, PagesConfig, RouteNode};

/// Meta key holding the status code of a generated redirect route.
pub const REDIRECT_STATUS_META: &str = "redirect_status";

/// Errors raised while generating routes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("route name \"{name}\" contains the route name separator \"{separator}\"")]
    AmbiguousName { name: String, separator: String },

    #[error("default locale \"{0}\" is not a configured locale")]
    UnknownDefaultLocale(String),

    #[error("strategy {0} requires a default locale")]
    MissingDefaultLocale(Strategy),
}

/// Generation options besides locales and strategy.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions<'a> {
    pub naming: &'a RouteNaming,
    pub pages: &'a PagesConfig,
    pub root_redirect: Option<&'a RootRedirect>,
    pub different_domains: bool,
}

/// Generate the locale-aware route tree for `base_routes`.
pub fn generate(
    base_routes: &[RouteNode],
    locales: &LocaleRegistry,
    default_locale: Option<&str>,
    strategy: Strategy,
    options: &GenerateOptions<'_>,
) -> Result<Vec<RouteNode>, GenerateError> {
    if let Some(default) = default_locale {
        if !locales.contains(default) {
            return Err(GenerateError::UnknownDefaultLocale(default.to_string()));
        }
    } else if strategy == Strategy::PrefixAndDefault {
        return Err(GenerateError::MissingDefaultLocale(strategy));
    }
    check_names(base_routes, options.naming.separator())?;

    let generator = Generator {
        codes: locales.codes(),
        default_locale,
        strategy,
        options,
    };

    let mut routes = Vec::new();
    if let Some(root) = options.root_redirect {
        let mut node = RouteNode::new("/").redirect_to(root.target());
        node.meta.insert(REDIRECT_STATUS_META.to_string(), root.status_code.into());
        routes.push(node);
    }

    if generator.codes.is_empty() || strategy == Strategy::NoPrefix {
        routes.extend(base_routes.iter().cloned());
    } else {
        for route in base_routes {
            routes.extend(generator.localize(route));
        }
    }

    tracing::debug!(
        strategy = %strategy,
        locales = generator.codes.len(),
        base_routes = base_routes.len(),
        generated_routes = routes.len(),
        "Generated locale routes"
    );

    Ok(routes)
}

fn check_names(routes: &[RouteNode], separator: &str) -> Result<(), GenerateError> {
    for route in routes {
        if let Some(name) = &route.name {
            if name.contains(separator) {
                return Err(GenerateError::AmbiguousName {
                    name: name.clone(),
                    separator: separator.to_string(),
                });
            }
        }
        check_names(&route.children, separator)?;
    }
    Ok(())
}

struct Generator<'a> {
    codes: Vec<&'a str>,
    default_locale: Option<&'a str>,
    strategy: Strategy,
    options: &'a GenerateOptions<'a>,
}

impl Generator<'_> {
    /// All copies of a top-level route.
    fn localize(&self, route: &RouteNode) -> Vec<RouteNode> {
        if self.options.pages.is_unlocalized(route.name.as_deref()) {
            return vec![route.clone()];
        }

        let mut routes = Vec::new();
        for code in &self.codes {
            if let Some(node) = self.localize_node(route, code, false, false) {
                routes.push(node);
            }
            if self.strategy == Strategy::PrefixAndDefault && self.is_default(code) {
                if let Some(node) = self.localize_node(route, code, false, true) {
                    routes.push(node);
                }
            }
        }
        routes
    }

    /// One copy of `route` for `code`; `None` when the page excludes the locale.
    fn localize_node(
        &self,
        route: &RouteNode,
        code: &str,
        is_child: bool,
        default_copy: bool,
    ) -> Option<RouteNode> {
        let mut path = match self.options.pages.path_for(route.name.as_deref(), code) {
            PagePath::Excluded => return None,
            PagePath::Override(path) => path,
            PagePath::Default => route.path.clone(),
        };
        if !is_child && !path.starts_with('/') {
            path.insert(0, '/');
        }

        let relative_child = is_child && !path.starts_with('/');
        if !relative_child && self.should_prefix(code, default_copy) {
            path = prefixed(code, &path);
        }

        let name = route.name.as_deref().map(|base| {
            if default_copy {
                self.options.naming.localized_default(base, code)
            } else {
                self.options.naming.localized(base, code)
            }
        });

        let children = route
            .children
            .iter()
            .filter_map(|child| {
                if self.options.pages.is_unlocalized(child.name.as_deref()) {
                    Some(child.clone())
                } else {
                    self.localize_node(child, code, true, default_copy)
                }
            })
            .collect();

        Some(RouteNode {
            name,
            path,
            children,
            redirect: route.redirect.clone(),
            meta: route.meta.clone(),
        })
    }

    fn should_prefix(&self, code: &str, default_copy: bool) -> bool {
        if self.options.different_domains {
            return false;
        }
        match self.strategy {
            Strategy::NoPrefix => false,
            Strategy::Prefix => true,
            Strategy::PrefixExceptDefault => !self.is_default(code),
            Strategy::PrefixAndDefault => !self.is_default(code) || default_copy,
        }
    }

    fn is_default(&self, code: &str) -> bool {
        self.default_locale == Some(code)
    }
}

/// `/<code>` joined with an absolute path; the root becomes `/<code>`.
fn prefixed(code: &str, path: &str) -> String {
    if path == "/" {
        format!("/{code}")
    } else {
        format!("/{code}{path}")
    }
}
