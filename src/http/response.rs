//! Responses produced by the locale layer.
//!
//! # Responsibilities
//! - Carry the navigation outcome to page handlers (`NavigationContext`)
//! - Build redirect and error responses
//! - Attach the locale cookie to any response
//!
//! # Design Decisions
//! - Unrepresentable `Location` values become 500s instead of panics
//! - Error bodies are small JSON documents

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::redirect::engine::{Redirect, RedirectEngine};
use crate::resolve::request::{resolve_base_url, RequestContext};
use crate::resolve::resolver::{LocaleSource, ResolveError, ResolvedLocale};
use crate::routing::links::LocaleLinks;
use crate::routing::matcher::RouteParams;
use crate::routing::router::RouteLocation;
use crate::seo::{page_head, SeoHead};

/// Outcome of locale resolution, inserted as a request extension.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationContext {
    pub locale: String,
    pub source: LocaleSource,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
    pub params: RouteParams,
    pub base_url: String,
    /// Current route in every other locale that serves it.
    pub alternates: Vec<AlternatePath>,
    pub seo: SeoHead,
}

impl NavigationContext {
    /// Context for `route` rendered in `resolved`.
    pub fn build(
        engine: &RedirectEngine,
        route: &RouteLocation,
        request: &RequestContext,
        resolved: &ResolvedLocale,
    ) -> Self {
        let router = engine.router();
        let settings = router.settings();
        let links = LocaleLinks::new(router, route, &resolved.locale, request.protocol());
        let base_url = resolve_base_url(settings, request, &resolved.locale);

        let alternates = settings
            .registry
            .iter()
            .filter(|locale| locale.code != resolved.locale)
            .filter_map(|locale| {
                links.switch_locale_path(&locale.code).map(|path| AlternatePath {
                    locale: locale.code.clone(),
                    path,
                })
            })
            .collect();

        Self {
            locale: resolved.locale.clone(),
            source: resolved.source,
            path: route.path.clone(),
            query: route.query.clone(),
            matched: route.matched,
            route_name: route.name.clone(),
            base_name: links.route_base_name(),
            params: route.params.clone(),
            seo: page_head(&links, &base_url, &route.path),
            base_url,
            alternates,
        }
    }
}

/// The current route in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternatePath {
    pub locale: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

/// Redirect response for `redirect`, keeping `query` when asked to.
pub fn redirect_response(redirect: &Redirect, query: Option<&str>) -> Response {
    let location = redirect.location(query);
    let Ok(value) = HeaderValue::try_from(location.as_str()) else {
        tracing::error!(location = %location, "Redirect target is not a valid header value");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "invalid_redirect", "invalid redirect target".into());
    };
    let status = StatusCode::from_u16(redirect.status).unwrap_or(StatusCode::FOUND);
    (status, [(header::LOCATION, value)]).into_response()
}

/// Response for a failed navigation.
pub fn resolve_error_response(err: &ResolveError) -> Response {
    match err {
        ResolveError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        ResolveError::LoadFailed { .. } => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "locale_load_failed", err.to_string())
        }
    }
}

pub fn error_response(status: StatusCode, error: &str, message: String) -> Response {
    (status, Json(ErrorBody { error, message })).into_response()
}

/// Append `Set-Cookie: <cookie>` to `response`.
pub fn with_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(cookie) = cookie {
        match HeaderValue::try_from(cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => tracing::warn!(error = %err, "Locale cookie is not a valid header value"),
        }
    }
    response
}
