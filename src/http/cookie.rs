//! Locale cookie parsing and formatting.
//!
//! # Design Decisions
//! - One cookie, one-year lifetime, `Path=/`
//! - `SameSite=Lax` by default; cross-origin use switches to
//!   `SameSite=None; Secure`

use axum::http::{header, HeaderMap};

use crate::config::schema::DetectBrowserLanguageConfig;

/// One year, in seconds.
pub const COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Value of cookie `key` from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, key: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == key)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Attributes of the locale cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCookie {
    pub key: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub cross_origin: bool,
}

impl LocaleCookie {
    pub fn from_config(config: &DetectBrowserLanguageConfig) -> Self {
        Self {
            key: config.cookie_key.clone(),
            domain: config.cookie_domain.clone(),
            secure: config.cookie_secure,
            cross_origin: config.cookie_cross_origin,
        }
    }

    /// `Set-Cookie` header value storing `code`.
    pub fn set_cookie(&self, code: &str) -> String {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path=/",
            self.key, code, COOKIE_MAX_AGE_SECS
        );
        if let Some(domain) = &self.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        if self.cross_origin {
            cookie.push_str("; SameSite=None; Secure");
        } else {
            cookie.push_str("; SameSite=Lax");
            if self.secure {
                cookie.push_str("; Secure");
            }
        }
        cookie
    }
}
