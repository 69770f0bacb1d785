//! Route tree types.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::schema::{PageEntry, PagePathEntry};

/// A node of a route tree.
///
/// Base trees are owned by the host application; generated trees are
/// independent copies and never share nodes with their input.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,

    /// Redirect target served instead of the route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl RouteNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
            children: Vec::new(),
            redirect: None,
            meta: BTreeMap::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }
}

/// Localized path of a page for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePath {
    /// Apply the strategy to the route's own path.
    Default,
    /// Use this path instead of the route's own path.
    Override(String),
    /// Do not generate the route for this locale.
    Excluded,
}

/// Localization settings of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOptions {
    /// The route is kept as is, without locale copies.
    Unlocalized,
    /// Per-locale paths; locales not listed use [`PagePath::Default`].
    Localized(BTreeMap<String, PagePath>),
}

impl From<&PageEntry> for PageOptions {
    fn from(entry: &PageEntry) -> Self {
        match entry {
            PageEntry::Enabled(false) => PageOptions::Unlocalized,
            PageEntry::Enabled(true) => PageOptions::Localized(BTreeMap::new()),
            PageEntry::Paths(paths) => PageOptions::Localized(
                paths
                    .iter()
                    .map(|(code, path)| {
                        let path = match path {
                            PagePathEntry::Path(p) => PagePath::Override(p.clone()),
                            PagePathEntry::Enabled(false) => PagePath::Excluded,
                            PagePathEntry::Enabled(true) => PagePath::Default,
                        };
                        (code.clone(), path)
                    })
                    .collect(),
            ),
        }
    }
}

/// Page overrides keyed by base route name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagesConfig {
    pages: HashMap<String, PageOptions>,
}

impl PagesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &BTreeMap<String, PageEntry>) -> Self {
        Self {
            pages: entries
                .iter()
                .map(|(name, entry)| (name.clone(), PageOptions::from(entry)))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, options: PageOptions) {
        self.pages.insert(name.into(), options);
    }

    /// True when the route must not be duplicated per locale.
    pub fn is_unlocalized(&self, name: Option<&str>) -> bool {
        name.and_then(|n| self.pages.get(n))
            .is_some_and(|options| *options == PageOptions::Unlocalized)
    }

    /// Path setting of `name` for `code`.
    pub fn path_for(&self, name: Option<&str>, code: &str) -> PagePath {
        match name.and_then(|n| self.pages.get(n)) {
            Some(PageOptions::Localized(paths)) => {
                paths.get(code).cloned().unwrap_or(PagePath::Default)
            }
            Some(PageOptions::Unlocalized) | None => PagePath::Default,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Locale codes referenced by any page.
    pub fn referenced_codes(&self) -> impl Iterator<Item = &str> {
        self.pages.values().flat_map(|options| match options {
            PageOptions::Localized(paths) => paths.keys().map(String::as_str).collect::<Vec<_>>(),
            PageOptions::Unlocalized => Vec::new(),
        })
    }
}
