//! Request inspection.
//!
//! # Responsibilities
//! - Build the `RequestContext` the resolver reads from HTTP headers
//! - Expose the request ID set by the request-id layer
//! - Identify the client whose navigations supersede each other
//!
//! # Design Decisions
//! - Header values that are not valid UTF-8 are treated as absent
//! - The locale cookie is read only when cookie detection is enabled

use axum::http::{header, HeaderMap, HeaderName, Uri};

use crate::config::settings::LocaleSettings;
use crate::http::cookie::read_cookie;
use crate::resolve::request::RequestContext;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Header naming the client (browser tab, app instance) behind a navigation.
pub const X_CLIENT_ID: HeaderName = HeaderName::from_static("x-client-id");

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Request ID assigned to this request, if any.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, X_REQUEST_ID.as_str())
}

/// Client id sent with the request; requests without one are never superseded.
pub fn client_id(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, X_CLIENT_ID.as_str()).filter(|id| !id.is_empty())
}

/// Resolver inputs for one HTTP request.
pub fn request_context(settings: &LocaleSettings, uri: &Uri, headers: &HeaderMap) -> RequestContext {
    let full_path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let mut context = RequestContext::new(full_path);
    context.host = header_str(headers, header::HOST.as_str()).map(str::to_string);
    context.forwarded_host = header_str(headers, X_FORWARDED_HOST).map(str::to_string);
    context.forwarded_proto = header_str(headers, X_FORWARDED_PROTO).map(str::to_string);
    context.accept_language = header_str(headers, header::ACCEPT_LANGUAGE.as_str()).map(str::to_string);
    if settings.uses_cookie() {
        if let Some(detect) = settings.detect() {
            context.locale_cookie = read_cookie(headers, &detect.cookie_key);
        }
    }
    context
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DetectBrowserLanguageConfig, LocaleEntry, LocaleOptions};
    use axum::http::HeaderValue;

    #[test]
    fn test_request_context_from_headers() {
        let settings = LocaleSettings::from_options(LocaleOptions {
            locales: vec![LocaleEntry::Code("en".into()), LocaleEntry::Code("fr".into())],
            default_locale: Some("en".into()),
            detect_browser_language: Some(DetectBrowserLanguageConfig::default()),
            ..LocaleOptions::default()
        })
        .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com"));
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("fr-FR,fr;q=0.9"));
        headers.insert(header::COOKIE, HeaderValue::from_static("i18n_redirected=fr"));
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));

        let uri: Uri = "/fr/about?x=1".parse().unwrap();
        let context = request_context(&settings, &uri, &headers);

        assert_eq!(context.full_path, "/fr/about?x=1");
        assert_eq!(context.host.as_deref(), Some("example.com"));
        assert_eq!(context.protocol(), "https");
        assert_eq!(context.locale_cookie.as_deref(), Some("fr"));
        assert_eq!(context.accept_language.as_deref(), Some("fr-FR,fr;q=0.9"));
        assert_eq!(request_id(&headers), Some("abc"));
        assert_eq!(client_id(&headers), None);

        headers.insert(X_CLIENT_ID, HeaderValue::from_static("tab-1"));
        assert_eq!(client_id(&headers), Some("tab-1"));
    }
}
