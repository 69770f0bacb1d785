//! Alternate-language links and `og:locale` meta for one page.
//!
//! # Responsibilities
//! - One `hreflang` alternate per locale with an external tag
//! - One bare-language alternate per language group, pointing at the
//!   group's catch-all locale (or its first member)
//! - `canonical` link for the prefixed default duplicate
//! - `og:locale` / `og:locale:alternate` meta
//!
//! # Design Decisions
//! - Link targets come from a caller-supplied `switch_path` so the builder
//!   stays independent of the route table
//! - Links are deduplicated by `hid`

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::schema::Strategy;
use crate::locale::registry::{primary_subtag, Locale, LocaleRegistry};

/// `<link>` head entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadLink {
    pub hid: String,
    pub rel: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
}

/// `<meta property=...>` head entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadMeta {
    pub hid: String,
    pub property: String,
    pub content: String,
}

/// Head tags for the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeoHead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_lang: Option<String>,
    pub links: Vec<HeadLink>,
    pub meta: Vec<HeadMeta>,
}

impl SeoHead {
    pub fn is_empty(&self) -> bool {
        self.html_lang.is_none() && self.links.is_empty() && self.meta.is_empty()
    }

    /// Render as HTML head fragments, one tag per line.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for link in &self.links {
            out.push_str(&format!(
                "<link data-hid=\"{}\" rel=\"{}\" href=\"{}\"",
                escape(&link.hid),
                escape(&link.rel),
                escape(&link.href)
            ));
            if let Some(hreflang) = &link.hreflang {
                out.push_str(&format!(" hreflang=\"{}\"", escape(hreflang)));
            }
            out.push_str(">\n");
        }
        for meta in &self.meta {
            out.push_str(&format!(
                "<meta data-hid=\"{}\" property=\"{}\" content=\"{}\">\n",
                escape(&meta.hid),
                escape(&meta.property),
                escape(&meta.content)
            ));
        }
        out
    }

    fn push_link(&mut self, link: HeadLink) {
        if !self.links.iter().any(|l| l.hid == link.hid) {
            self.links.push(link);
        }
    }
}

/// Page inputs for [`build_links`].
#[derive(Debug, Clone, Copy)]
pub struct SeoPage<'a> {
    pub current_locale: &'a str,
    /// Current path without query.
    pub current_path: &'a str,
    pub strategy: Strategy,
    /// Prepended to relative link targets.
    pub base_url: &'a str,
}

/// Build head tags for `page`; `switch_path(code)` returns the page in locale `code`.
pub fn build_links<F>(registry: &LocaleRegistry, page: SeoPage<'_>, switch_path: F) -> SeoHead
where
    F: Fn(&str) -> Option<String>,
{
    let current = registry.find(page.current_locale);
    let current_iso = current.and_then(|l| l.iso.as_deref());

    let mut head = SeoHead {
        html_lang: current_iso.map(str::to_string),
        ..SeoHead::default()
    };

    if page.strategy != Strategy::NoPrefix {
        alternate_links(registry, &page, &switch_path, &mut head);
    }

    if page.strategy == Strategy::PrefixAndDefault {
        if let Some(canonical) = current.and_then(|l| switch_path(&l.code)) {
            let canonical = strip_query(&canonical);
            if canonical != page.current_path {
                head.push_link(HeadLink {
                    hid: format!("canonical-lang-{}", page.current_locale),
                    rel: "canonical".into(),
                    href: absolute(page.base_url, canonical),
                    hreflang: None,
                });
            }
        }
    }

    if let Some(iso) = current_iso {
        head.meta.push(HeadMeta {
            hid: "og:locale".into(),
            property: "og:locale".into(),
            content: og_tag(iso),
        });
    }
    for iso in registry
        .iter()
        .filter_map(|l| l.iso.as_deref())
        .filter(|iso| Some(*iso) != current_iso)
    {
        head.meta.push(HeadMeta {
            hid: format!("og:locale:alternate-{iso}"),
            property: "og:locale:alternate".into(),
            content: og_tag(iso),
        });
    }

    head
}

fn alternate_links<F>(registry: &LocaleRegistry, page: &SeoPage<'_>, switch_path: &F, head: &mut SeoHead)
where
    F: Fn(&str) -> Option<String>,
{
    let mut tagged: Vec<(&Locale, &str, String)> = Vec::new();
    for locale in registry.iter() {
        let Some(iso) = locale.iso.as_deref() else {
            tracing::warn!(locale = %locale.code, "Locale ISO code is required to generate alternate link");
            continue;
        };
        let Some(path) = switch_path(&locale.code) else {
            continue;
        };
        tagged.push((locale, iso, absolute(page.base_url, &path)));
    }

    for (_, iso, href) in &tagged {
        head.push_link(alternate(iso, href));
    }

    let tags: BTreeSet<&str> = tagged.iter().map(|(_, iso, _)| *iso).collect();
    let mut seen = BTreeSet::new();
    for (_, iso, _) in &tagged {
        let language = primary_subtag(iso);
        if !seen.insert(language) || tags.contains(language) {
            continue;
        }
        let group: Vec<_> = tagged
            .iter()
            .filter(|(_, tag, _)| primary_subtag(tag) == language)
            .collect();
        if group.len() < 2 {
            continue;
        }
        let representative = group
            .iter()
            .find(|(locale, _, _)| locale.is_catchall)
            .unwrap_or(&group[0]);
        head.push_link(alternate(language, &representative.2));
    }
}

fn alternate(hreflang: &str, href: &str) -> HeadLink {
    HeadLink {
        hid: format!("alternate-hreflang-{hreflang}"),
        rel: "alternate".into(),
        href: href.to_string(),
        hreflang: Some(hreflang.to_string()),
    }
}

fn absolute(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}{path}", base_url.trim_end_matches('/'))
    }
}

fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

fn og_tag(iso: &str) -> String {
    iso.replace('-', "_")
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
