//! Route path matching.
//!
//! # Responsibilities
//! - Compile route paths (`/posts/:slug`, `/:id?`, `*`) into patterns
//! - Match a request path and capture params
//! - Rebuild a path from a pattern and params
//! - Flatten a route tree into an ordered lookup table
//!
//! # Design Decisions
//! - Static segments are case-insensitive, like the paths they are matched against
//! - A trailing slash on the request path is tolerated
//! - Entries are ranked segment by segment: static, param, end of path,
//!   optional param, catch-all. Equal ranks keep tree order, children first
//! - No regex; param constraints in parentheses are ignored

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::routing::route::RouteNode;

/// Params captured by a match, keyed by param name.
pub type RouteParams = BTreeMap<String, String>;

/// Name of the param captured by a bare `*` segment.
pub const CATCH_ALL_PARAM: &str = "pathMatch";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param { name: String, optional: bool },
    CatchAll { name: String },
}

// Per-segment ranks; higher is tried first.
const RANK_STATIC: u8 = 40;
const RANK_PARAM: u8 = 30;
const RANK_END: u8 = 25;
const RANK_OPTIONAL: u8 = 20;
const RANK_CATCH_ALL: u8 = 10;

/// A compiled route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(path: &str) -> Self {
        let segments = split(path).map(parse_segment).collect();
        Self {
            raw: path.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_catch_all(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::CatchAll { .. }))
    }

    /// Specificity key; a higher key is matched first.
    ///
    /// The end marker sits between required and optional segments, so
    /// `/fr` ranks above `/fr/*` and `/fr/:slug` above `/fr`.
    pub fn rank(&self) -> Vec<u8> {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(_) => RANK_STATIC,
                Segment::Param { optional: false, .. } => RANK_PARAM,
                Segment::Param { optional: true, .. } => RANK_OPTIONAL,
                Segment::CatchAll { .. } => RANK_CATCH_ALL,
            })
            .chain(std::iter::once(RANK_END))
            .collect()
    }

    /// Match `path`, returning the captured params.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = split(path).collect();
        let mut params = RouteParams::new();
        if match_from(&self.segments, &parts, &mut params) {
            Some(params)
        } else {
            None
        }
    }

    /// Build a concrete path; `None` when a required param is missing.
    pub fn build(&self, params: &RouteParams) -> Option<String> {
        let mut parts = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Static(s) => parts.push(s.clone()),
                Segment::Param { name, optional } => match params.get(name) {
                    Some(value) if !value.is_empty() => parts.push(value.clone()),
                    _ if *optional => {}
                    _ => return None,
                },
                Segment::CatchAll { name } => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        parts.push(value.trim_matches('/').to_string());
                    }
                }
            }
        }
        Some(format!("/{}", parts.join("/")))
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn parse_segment(raw: &str) -> Segment {
    if raw == "*" {
        return Segment::CatchAll {
            name: CATCH_ALL_PARAM.to_string(),
        };
    }
    let Some(param) = raw.strip_prefix(':') else {
        return Segment::Static(raw.to_string());
    };

    let (param, modifier) = match param.chars().last() {
        Some(c @ ('?' | '*' | '+')) => (&param[..param.len() - 1], Some(c)),
        _ => (param, None),
    };
    let name = match param.find('(') {
        Some(index) => &param[..index],
        None => param,
    };
    match modifier {
        Some('*') | Some('+') => Segment::CatchAll {
            name: name.to_string(),
        },
        Some('?') => Segment::Param {
            name: name.to_string(),
            optional: true,
        },
        _ => Segment::Param {
            name: name.to_string(),
            optional: false,
        },
    }
}

fn match_from(segments: &[Segment], parts: &[&str], params: &mut RouteParams) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return parts.is_empty();
    };

    match segment {
        Segment::Static(expected) => match parts.split_first() {
            Some((part, remaining)) if part.eq_ignore_ascii_case(expected) => {
                match_from(rest, remaining, params)
            }
            _ => false,
        },
        Segment::Param { name, optional } => {
            if let Some((part, remaining)) = parts.split_first() {
                params.insert(name.clone(), (*part).to_string());
                if match_from(rest, remaining, params) {
                    return true;
                }
                params.remove(name);
            }
            *optional && match_from(rest, parts, params)
        }
        Segment::CatchAll { name } => {
            // Greedy: leave the fewest parts needed by the remaining segments.
            for split_at in (0..=parts.len()).rev() {
                let (taken, remaining) = parts.split_at(split_at);
                if match_from(rest, remaining, params) {
                    params.insert(name.clone(), taken.join("/"));
                    return true;
                }
            }
            false
        }
    }
}

/// A flattened route with its absolute path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub name: Option<String>,
    pub pattern: RoutePattern,
    pub redirect: Option<String>,
    pub meta: BTreeMap<String, serde_json::Value>,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: RouteParams,
}

/// Ordered lookup table built from a route tree.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn from_routes(routes: &[RouteNode]) -> Self {
        let mut entries = Vec::new();
        for route in routes {
            flatten(route, "", &mut entries);
        }
        // Stable, so equal ranks keep tree order.
        entries.sort_by_cached_key(|e| Reverse(e.pattern.rank()));
        Self { entries }
    }

    /// First entry matching `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|entry| {
            entry
                .pattern
                .matches(path)
                .map(|params| RouteMatch { entry, params })
        })
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.name.as_deref() == Some(name))
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(route: &RouteNode, parent: &str, entries: &mut Vec<RouteEntry>) {
    let path = join_paths(parent, &route.path);
    for child in &route.children {
        flatten(child, &path, entries);
    }
    entries.push(RouteEntry {
        name: route.name.clone(),
        pattern: RoutePattern::parse(&path),
        redirect: route.redirect.clone(),
        meta: route.meta.clone(),
    });
}

/// Resolve a child path against its parent path.
pub fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        child.to_string()
    } else if child.is_empty() {
        if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        }
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RouteParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_static_match() {
        let pattern = RoutePattern::parse("/fr/about");
        assert_eq!(pattern.matches("/fr/about"), Some(RouteParams::new()));
        assert_eq!(pattern.matches("/fr/about/"), Some(RouteParams::new()));
        assert_eq!(pattern.matches("/FR/About"), Some(RouteParams::new()));
        assert_eq!(pattern.matches("/fr"), None);
        assert_eq!(pattern.matches("/fr/about/more"), None);
    }

    #[test]
    fn test_root_pattern() {
        let pattern = RoutePattern::parse("/");
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("").is_some());
        assert!(pattern.matches("/en").is_none());
    }

    #[test]
    fn test_params() {
        let pattern = RoutePattern::parse("/posts/:slug");
        assert_eq!(pattern.matches("/posts/hello"), Some(params(&[("slug", "hello")])));
        assert_eq!(pattern.matches("/posts"), None);

        let optional = RoutePattern::parse("/users/:id?/edit");
        assert_eq!(optional.matches("/users/7/edit"), Some(params(&[("id", "7")])));
        assert_eq!(optional.matches("/users/edit"), Some(RouteParams::new()));

        let constrained = RoutePattern::parse("/items/:id(\\d+)");
        assert_eq!(constrained.matches("/items/12"), Some(params(&[("id", "12")])));
    }

    #[test]
    fn test_catch_all() {
        let star = RoutePattern::parse("/fr/*");
        assert!(star.is_catch_all());
        assert_eq!(star.matches("/fr/a/b"), Some(params(&[("pathMatch", "a/b")])));
        assert_eq!(star.matches("/fr"), Some(params(&[("pathMatch", "")])));
        assert_eq!(star.matches("/en/a"), None);

        let named = RoutePattern::parse("/:rest(.*)*");
        assert_eq!(named.matches("/x/y"), Some(params(&[("rest", "x/y")])));
    }

    #[test]
    fn test_build() {
        let pattern = RoutePattern::parse("/fr/posts/:slug");
        assert_eq!(pattern.build(&params(&[("slug", "hello")])), Some("/fr/posts/hello".into()));
        assert_eq!(pattern.build(&RouteParams::new()), None);

        assert_eq!(RoutePattern::parse("/").build(&RouteParams::new()), Some("/".into()));
        assert_eq!(
            RoutePattern::parse("/users/:id?").build(&RouteParams::new()),
            Some("/users".into())
        );
        assert_eq!(
            RoutePattern::parse("/en/*").build(&params(&[("pathMatch", "a/b")])),
            Some("/en/a/b".into())
        );
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("", "/"), "/");
        assert_eq!(join_paths("/fr/posts", ""), "/fr/posts");
        assert_eq!(join_paths("/fr/posts", ":slug"), "/fr/posts/:slug");
        assert_eq!(join_paths("/", "child"), "/child");
        assert_eq!(join_paths("/fr/posts", "/absolute"), "/absolute");
    }

    #[test]
    fn test_table_order_and_lookup() {
        let routes = vec![
            RouteNode::new("*").named("all"),
            RouteNode::new("/posts").with_children(vec![
                RouteNode::new("").named("posts"),
                RouteNode::new(":slug").named("posts-slug"),
            ]),
            RouteNode::new("/about").named("about"),
        ];
        let table = RouteTable::from_routes(&routes);

        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_deref()).collect();
        assert_eq!(names, vec![Some("posts-slug"), Some("posts"), None, Some("about"), Some("all")]);

        let matched = table.match_path("/posts").unwrap();
        assert_eq!(matched.entry.name.as_deref(), Some("posts"));

        let matched = table.match_path("/posts/hi").unwrap();
        assert_eq!(matched.entry.name.as_deref(), Some("posts-slug"));
        assert_eq!(matched.params, params(&[("slug", "hi")]));

        let matched = table.match_path("/nowhere").unwrap();
        assert_eq!(matched.entry.name.as_deref(), Some("all"));

        assert_eq!(table.find_by_name("about").unwrap().pattern.as_str(), "/about");
        assert!(table.find_by_name("missing").is_none());
    }

    #[test]
    fn test_rank_prefers_static_then_params_then_catch_all() {
        let rank = |path: &str| RoutePattern::parse(path).rank();
        assert!(rank("/fr/*") > rank("/*"));
        assert!(rank("/fr") > rank("/:slug"));
        assert!(rank("/fr") > rank("/fr/*"));
        assert!(rank("/fr/:slug") > rank("/fr"));
        assert!(rank("/") > rank("/:id?"));
        assert!(rank("/users/edit") > rank("/users/:id?/edit"));
    }

    #[test]
    fn test_locale_prefixed_routes_win_over_default_copies() {
        // Generated order for `prefix_except_default`: default copies first.
        let routes = vec![
            RouteNode::new("/").named("index___en"),
            RouteNode::new("/fr").named("index___fr"),
            RouteNode::new("/:slug").named("slug___en"),
            RouteNode::new("/fr/:slug").named("slug___fr"),
            RouteNode::new("/*").named("all___en"),
            RouteNode::new("/fr/*").named("all___fr"),
        ];
        let table = RouteTable::from_routes(&routes);
        let name = |path: &str| table.match_path(path).and_then(|m| m.entry.name.clone());

        assert_eq!(name("/fr").as_deref(), Some("index___fr"));
        assert_eq!(name("/fr/hello").as_deref(), Some("slug___fr"));
        assert_eq!(name("/fr/a/b").as_deref(), Some("all___fr"));
        assert_eq!(name("/").as_deref(), Some("index___en"));
        assert_eq!(name("/hello").as_deref(), Some("slug___en"));
        assert_eq!(name("/a/b").as_deref(), Some("all___en"));

        let matched = table.match_path("/fr/a/b").unwrap();
        assert_eq!(matched.params, params(&[("pathMatch", "a/b")]));
    }
}
