//! Localized route naming.
//!
//! # Responsibilities
//! - Build `<base><sep><code>[<sep><suffix>]` route names
//! - Recover `(base, code, is_default_copy)` from a generated name
//! - Extract a locale code from the first path segment
//!
//! # Design Decisions
//! - Base names must not contain the separator, which keeps names reversible
//! - Matching is case-insensitive; recovered codes are returned as configured

use regex::{Regex, RegexBuilder};

/// A generated route name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRouteName {
    pub base: String,
    pub locale: String,
    /// Prefixed copy of a default locale route.
    pub is_default_copy: bool,
}

/// Naming convention shared by the generator and the resolver.
#[derive(Debug, Clone)]
pub struct RouteNaming {
    separator: String,
    default_suffix: String,
    codes: Vec<String>,
    name_pattern: Option<Regex>,
    path_pattern: Option<Regex>,
}

impl RouteNaming {
    pub fn new(
        separator: impl Into<String>,
        default_suffix: impl Into<String>,
        codes: &[&str],
    ) -> Result<Self, regex::Error> {
        let separator = separator.into();
        let default_suffix = default_suffix.into();

        let (name_pattern, path_pattern) = if codes.is_empty() {
            (None, None)
        } else {
            let alternatives = codes.iter().map(|c| regex::escape(c)).collect::<Vec<_>>().join("|");
            let sep = regex::escape(&separator);
            let name = RegexBuilder::new(&format!(
                "^(.+?){sep}({alternatives})(?:{sep}{})?$",
                regex::escape(&default_suffix)
            ))
            .case_insensitive(true)
            .build()?;
            let path = RegexBuilder::new(&format!("^/({alternatives})(?:/|$)"))
                .case_insensitive(true)
                .build()?;
            (Some(name), Some(path))
        };

        Ok(Self {
            separator,
            default_suffix,
            codes: codes.iter().map(|c| c.to_string()).collect(),
            name_pattern,
            path_pattern,
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// `<base><sep><code>`
    pub fn localized(&self, base: &str, code: &str) -> String {
        format!("{base}{}{code}", self.separator)
    }

    /// `<base><sep><code><sep><suffix>`
    pub fn localized_default(&self, base: &str, code: &str) -> String {
        format!("{base}{sep}{code}{sep}{}", self.default_suffix, sep = self.separator)
    }

    /// Split a generated name. Returns `None` for names without a locale.
    pub fn parse(&self, name: &str) -> Option<LocaleRouteName> {
        let captures = self.name_pattern.as_ref()?.captures(name)?;
        let base = captures.get(1)?.as_str();
        let code = captures.get(2)?.as_str();
        let whole = captures.get(0)?.as_str();
        let unsuffixed = base.len() + self.separator.len() + code.len();
        Some(LocaleRouteName {
            base: base.to_string(),
            locale: self.canonical(code)?,
            is_default_copy: whole.len() > unsuffixed,
        })
    }

    /// Locale code carried by a route name.
    pub fn locale_from_name(&self, name: &str) -> Option<String> {
        self.parse(name).map(|parsed| parsed.locale)
    }

    /// Locale code carried by the first path segment.
    pub fn locale_from_path(&self, path: &str) -> Option<String> {
        let captures = self.path_pattern.as_ref()?.captures(path)?;
        self.canonical(captures.get(1)?.as_str())
    }

    /// Base name of a route name, or the name itself when it has no locale.
    pub fn base_name<'a>(&self, name: &'a str) -> &'a str {
        match self.parse(name) {
            Some(parsed) => &name[..parsed.base.len()],
            None => name,
        }
    }

    fn canonical(&self, code: &str) -> Option<String> {
        self.codes.iter().find(|c| c.eq_ignore_ascii_case(code)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naming() -> RouteNaming {
        RouteNaming::new("___", "default", &["en", "fr", "esVe"]).unwrap()
    }

    #[test]
    fn test_localized_names() {
        let naming = naming();
        assert_eq!(naming.localized("about", "fr"), "about___fr");
        assert_eq!(naming.localized_default("about", "en"), "about___en___default");
    }

    #[test]
    fn test_parse_names() {
        let naming = naming();
        assert_eq!(
            naming.parse("about___fr"),
            Some(LocaleRouteName { base: "about".into(), locale: "fr".into(), is_default_copy: false })
        );
        assert_eq!(
            naming.parse("posts-slug___en___default"),
            Some(LocaleRouteName {
                base: "posts-slug".into(),
                locale: "en".into(),
                is_default_copy: true
            })
        );
        assert_eq!(naming.locale_from_name("about___ESVE"), Some("esVe".into()));
        assert_eq!(naming.parse("about"), None);
        assert_eq!(naming.parse("about___de"), None);
        assert_eq!(naming.base_name("about___fr"), "about");
        assert_eq!(naming.base_name("about"), "about");
    }

    #[test]
    fn test_locale_from_path() {
        let naming = naming();
        assert_eq!(naming.locale_from_path("/fr"), Some("fr".into()));
        assert_eq!(naming.locale_from_path("/fr/about"), Some("fr".into()));
        assert_eq!(naming.locale_from_path("/FR/about"), Some("fr".into()));
        assert_eq!(naming.locale_from_path("/french"), None);
        assert_eq!(naming.locale_from_path("/about/fr"), None);
    }

    #[test]
    fn test_no_locales() {
        let naming = RouteNaming::new("___", "default", &[]).unwrap();
        assert_eq!(naming.parse("about___en"), None);
        assert_eq!(naming.locale_from_path("/en"), None);
    }

    proptest! {
        #[test]
        fn prop_names_are_reversible(
            base in "[a-z][a-z0-9-]{0,12}",
            code_index in 0usize..3,
            default_copy in any::<bool>(),
        ) {
            let naming = naming();
            let code = ["en", "fr", "esVe"][code_index];
            let name = if default_copy {
                naming.localized_default(&base, code)
            } else {
                naming.localized(&base, code)
            };
            let parsed = naming.parse(&name).unwrap();
            prop_assert_eq!(parsed.base, base);
            prop_assert_eq!(parsed.locale, code);
            prop_assert_eq!(parsed.is_default_copy, default_copy);
        }
    }
}
