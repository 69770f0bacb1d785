//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default, fallback and page locales exist)
//! - Validate value ranges (redirect status is 3xx, separators non-empty)
//! - Collect non-fatal warnings for the caller to log
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: I18nConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::{I18nConfig, LocaleEntry, PageEntry, RootRedirectEntry, Strategy};
use crate::routing::route::RouteNode;

/// A fatal configuration problem.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("locale code must not be empty")]
    EmptyLocaleCode,

    #[error("duplicate locale code \"{0}\"")]
    DuplicateLocale(String),

    #[error("{field} references unknown locale \"{code}\"")]
    UnknownLocale { field: &'static str, code: String },

    #[error("strategy {0} requires default_locale")]
    MissingDefaultLocale(Strategy),

    #[error("domain \"{0}\" is assigned to more than one locale")]
    DuplicateDomain(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("root_redirect status {0} is not a redirect status")]
    InvalidRedirectStatus(u16),

    #[error("route name \"{name}\" contains the separator \"{separator}\"")]
    AmbiguousRouteName { name: String, separator: String },

    #[error("base_url \"{0}\" is not an absolute http(s) origin")]
    InvalidBaseUrl(String),
}

/// A configuration problem that degrades behavior without being fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationWarning {
    #[error("different_domains has no effect with the no_prefix strategy")]
    DifferentDomainsWithoutPrefix,

    #[error("locale \"{0}\" has no domain while different_domains is enabled")]
    MissingDomain(String),
}

/// Validate the complete configuration.
pub fn validate_config(config: &I18nConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let options = &config.i18n;

    let mut codes = HashSet::new();
    for code in options.locale_codes() {
        if code.is_empty() {
            errors.push(ValidationError::EmptyLocaleCode);
        } else if !codes.insert(code) {
            errors.push(ValidationError::DuplicateLocale(code.to_string()));
        }
    }

    let check_code = |field: &'static str, code: Option<&str>, errors: &mut Vec<ValidationError>| {
        if let Some(code) = code {
            if !codes.contains(code) {
                errors.push(ValidationError::UnknownLocale {
                    field,
                    code: code.to_string(),
                });
            }
        }
    };
    check_code("default_locale", options.default_locale.as_deref(), &mut errors);
    if let Some(fallback) = &options.fallback_locale {
        for code in fallback.codes() {
            check_code("fallback_locale", Some(code), &mut errors);
        }
    }
    if let Some(detect) = &options.detect_browser_language {
        check_code(
            "detect_browser_language.fallback_locale",
            detect.fallback_locale.as_deref(),
            &mut errors,
        );
        if detect.cookie_key.is_empty() {
            errors.push(ValidationError::EmptyField("detect_browser_language.cookie_key"));
        }
    }
    for entry in options.pages.values() {
        if let PageEntry::Paths(paths) = entry {
            for code in paths.keys() {
                check_code("pages", Some(code.as_str()), &mut errors);
            }
        }
    }

    if options.strategy == Strategy::PrefixAndDefault && options.default_locale.is_none() {
        errors.push(ValidationError::MissingDefaultLocale(options.strategy));
    }

    let mut domains = HashSet::new();
    for entry in &options.locales {
        if let LocaleEntry::Full(locale) = entry {
            if let Some(domain) = &locale.domain {
                if !domains.insert(domain.to_ascii_lowercase()) {
                    errors.push(ValidationError::DuplicateDomain(domain.clone()));
                }
            }
        }
    }

    if options.routes_name_separator.is_empty() {
        errors.push(ValidationError::EmptyField("routes_name_separator"));
    } else {
        check_route_names(&config.routes, &options.routes_name_separator, &mut errors);
    }
    if options.default_locale_route_name_suffix.is_empty() {
        errors.push(ValidationError::EmptyField("default_locale_route_name_suffix"));
    }

    if !options.base_url.is_empty() && !is_http_origin(&options.base_url) {
        errors.push(ValidationError::InvalidBaseUrl(options.base_url.clone()));
    }

    if let Some(RootRedirectEntry::Full { status_code, .. }) = &options.root_redirect {
        if !(300..400).contains(status_code) {
            errors.push(ValidationError::InvalidRedirectStatus(*status_code));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_origin(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn check_route_names(routes: &[RouteNode], separator: &str, errors: &mut Vec<ValidationError>) {
    for route in routes {
        if let Some(name) = &route.name {
            if name.contains(separator) {
                errors.push(ValidationError::AmbiguousRouteName {
                    name: name.clone(),
                    separator: separator.to_string(),
                });
            }
        }
        check_route_names(&route.children, separator, errors);
    }
}

/// Non-fatal problems, in a stable order.
pub fn config_warnings(config: &I18nConfig) -> Vec<ValidationWarning> {
    let options = &config.i18n;
    let mut warnings = Vec::new();
    if !options.different_domains {
        return warnings;
    }

    if options.strategy == Strategy::NoPrefix {
        warnings.push(ValidationWarning::DifferentDomainsWithoutPrefix);
    }
    for entry in &options.locales {
        let missing = match entry {
            LocaleEntry::Code(code) => Some(code),
            LocaleEntry::Full(locale) if locale.domain.is_none() => Some(&locale.code),
            LocaleEntry::Full(_) => None,
        };
        if let Some(code) = missing {
            warnings.push(ValidationWarning::MissingDomain(code.clone()));
        }
    }
    warnings
}

/// Log every configuration warning once; returns them for the caller.
pub fn log_config_warnings(config: &I18nConfig) -> Vec<ValidationWarning> {
    let warnings = config_warnings(config);
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DetectBrowserLanguageConfig, LocaleObject, LocaleOptions, PagePathEntry};
    use std::collections::BTreeMap;

    fn domain_locale(code: &str, domain: &str) -> LocaleEntry {
        LocaleEntry::Full(LocaleObject {
            code: code.into(),
            iso: None,
            domain: Some(domain.into()),
            is_catchall_locale: false,
            dir: None,
            name: None,
            file: None,
        })
    }

    fn config(options: LocaleOptions) -> I18nConfig {
        I18nConfig {
            i18n: options,
            ..I18nConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = config(LocaleOptions {
            locales: vec![LocaleEntry::Code("en".into()), LocaleEntry::Code("fr".into())],
            default_locale: Some("en".into()),
            ..LocaleOptions::default()
        });
        assert!(validate_config(&config).is_ok());
        assert!(config_warnings(&config).is_empty());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut pages = BTreeMap::new();
        let mut about = BTreeMap::new();
        about.insert("de".to_string(), PagePathEntry::Enabled(false));
        pages.insert("about".to_string(), PageEntry::Paths(about));

        let mut config = config(LocaleOptions {
            locales: vec![
                domain_locale("en", "example.com"),
                domain_locale("fr", "EXAMPLE.com"),
                LocaleEntry::Code("en".into()),
            ],
            strategy: Strategy::PrefixAndDefault,
            root_redirect: Some(RootRedirectEntry::Full { path: "en".into(), status_code: 200 }),
            pages,
            ..LocaleOptions::default()
        });
        config.routes = vec![RouteNode::new("/").named("home___x")];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateLocale("en".into()),
                ValidationError::UnknownLocale { field: "pages", code: "de".into() },
                ValidationError::MissingDefaultLocale(Strategy::PrefixAndDefault),
                ValidationError::DuplicateDomain("EXAMPLE.com".into()),
                ValidationError::AmbiguousRouteName {
                    name: "home___x".into(),
                    separator: "___".into()
                },
                ValidationError::InvalidRedirectStatus(200),
            ]
        );
    }

    #[test]
    fn test_empty_cookie_key() {
        let config = config(LocaleOptions {
            detect_browser_language: Some(DetectBrowserLanguageConfig {
                cookie_key: String::new(),
                ..Default::default()
            }),
            ..LocaleOptions::default()
        });
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::EmptyField("detect_browser_language.cookie_key")]
        );
    }

    #[test]
    fn test_base_url_must_be_an_origin() {
        for (base_url, valid) in [("https://example.com", true), ("example.com", false), ("ftp://x.org", false)] {
            let config = config(LocaleOptions {
                base_url: base_url.into(),
                ..LocaleOptions::default()
            });
            assert_eq!(validate_config(&config).is_ok(), valid, "{base_url}");
        }
    }

    #[test]
    fn test_different_domains_with_no_prefix_warns_once() {
        let config = config(LocaleOptions {
            locales: vec![domain_locale("en", "en.example.com"), domain_locale("fr", "fr.example.com")],
            default_locale: Some("en".into()),
            strategy: Strategy::NoPrefix,
            different_domains: true,
            ..LocaleOptions::default()
        });
        assert!(validate_config(&config).is_ok());
        assert_eq!(
            config_warnings(&config),
            vec![ValidationWarning::DifferentDomainsWithoutPrefix]
        );
    }

    #[test]
    fn test_missing_domain_warning() {
        let config = config(LocaleOptions {
            locales: vec![domain_locale("en", "en.example.com"), LocaleEntry::Code("fr".into())],
            different_domains: true,
            ..LocaleOptions::default()
        });
        assert_eq!(config_warnings(&config), vec![ValidationWarning::MissingDomain("fr".into())]);
    }
}
