//! Locale registry.
//!
//! # Responsibilities
//! - Normalize configured locale entries (bare codes or full tables)
//! - Reject duplicate codes
//! - Lookup by code and by domain
//!
//! # Design Decisions
//! - Built once from configuration, immutable afterwards
//! - Configuration order is preserved; it drives tie-breaking elsewhere

use thiserror::Error;

use crate::config::schema::{Direction, LocaleEntry};

/// Errors raised while normalizing locales.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("locale code must not be empty")]
    EmptyCode,

    #[error("duplicate locale code \"{0}\"")]
    DuplicateCode(String),
}

/// A normalized locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub code: String,
    pub iso: Option<String>,
    pub domain: Option<String>,
    pub is_catchall: bool,
    pub dir: Option<Direction>,
    pub name: Option<String>,
    pub file: Option<String>,
}

impl Locale {
    /// Locale with only a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            iso: None,
            domain: None,
            is_catchall: false,
            dir: None,
            name: None,
            file: None,
        }
    }

    pub fn with_iso(mut self, iso: impl Into<String>) -> Self {
        self.iso = Some(iso.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn catchall(mut self) -> Self {
        self.is_catchall = true;
        self
    }

    /// External tag used for matching: `iso`, falling back to `code`.
    pub fn tag(&self) -> &str {
        self.iso.as_deref().unwrap_or(&self.code)
    }

    /// Primary language subtag of the external tag (`fr-FR` -> `fr`).
    pub fn language(&self) -> &str {
        primary_subtag(self.tag())
    }
}

impl From<&LocaleEntry> for Locale {
    fn from(entry: &LocaleEntry) -> Self {
        match entry {
            LocaleEntry::Code(code) => Locale::new(code.clone()),
            LocaleEntry::Full(object) => Locale {
                code: object.code.clone(),
                iso: object.iso.clone(),
                domain: object.domain.clone(),
                is_catchall: object.is_catchall_locale,
                dir: object.dir,
                name: object.name.clone(),
                file: object.file.clone(),
            },
        }
    }
}

/// Primary subtag of a language tag.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Immutable set of configured locales.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleRegistry {
    locales: Vec<Locale>,
}

impl LocaleRegistry {
    /// Normalize raw configuration entries.
    pub fn normalize(entries: &[LocaleEntry]) -> Result<Self, RegistryError> {
        Self::from_locales(entries.iter().map(Locale::from).collect())
    }

    /// Build from already normalized locales.
    pub fn from_locales(locales: Vec<Locale>) -> Result<Self, RegistryError> {
        for (i, locale) in locales.iter().enumerate() {
            if locale.code.is_empty() {
                return Err(RegistryError::EmptyCode);
            }
            if locales[..i].iter().any(|l| l.code == locale.code) {
                return Err(RegistryError::DuplicateCode(locale.code.clone()));
            }
        }
        Ok(Self { locales })
    }

    /// Locale codes in configuration order.
    pub fn codes(&self) -> Vec<&str> {
        self.locales.iter().map(|l| l.code.as_str()).collect()
    }

    pub fn find(&self, code: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.code == code)
    }

    /// Case-insensitive lookup, used when codes come back from URLs.
    pub fn find_ignore_case(&self, code: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.code.eq_ignore_ascii_case(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    /// Locale whose configured domain equals `host`.
    pub fn find_by_domain(&self, host: &str) -> Option<&Locale> {
        self.locales
            .iter()
            .find(|l| l.domain.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(host)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LocaleObject;

    fn full(code: &str, iso: Option<&str>) -> LocaleEntry {
        LocaleEntry::Full(LocaleObject {
            code: code.into(),
            iso: iso.map(Into::into),
            domain: None,
            is_catchall_locale: false,
            dir: None,
            name: None,
            file: None,
        })
    }

    #[test]
    fn test_normalize_mixed_entries() {
        let registry =
            LocaleRegistry::normalize(&[LocaleEntry::Code("en".into()), full("fr", Some("fr-FR"))])
                .unwrap();

        assert_eq!(registry.codes(), vec!["en", "fr"]);
        assert_eq!(registry.find("en").unwrap().tag(), "en");
        assert_eq!(registry.find("fr").unwrap().tag(), "fr-FR");
        assert_eq!(registry.find("fr").unwrap().language(), "fr");
        assert!(registry.find("de").is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let err = LocaleRegistry::normalize(&[LocaleEntry::Code("en".into()), full("en", Some("en-US"))])
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCode("en".into()));
    }

    #[test]
    fn test_empty_code_rejected() {
        let err = LocaleRegistry::normalize(&[LocaleEntry::Code(String::new())]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyCode);
    }

    #[test]
    fn test_find_by_domain() {
        let registry = LocaleRegistry::from_locales(vec![
            Locale::new("en").with_domain("en.example.com"),
            Locale::new("fr").with_domain("fr.example.com"),
        ])
        .unwrap();

        assert_eq!(registry.find_by_domain("FR.example.com").unwrap().code, "fr");
        assert!(registry.find_by_domain("de.example.com").is_none());
    }
}
