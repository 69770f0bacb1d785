//! Redirect decisions for every navigation.
//!
//! # Responsibilities
//! - Root redirect, deferred redirect replay, browser detection redirect
//! - Switch the active locale (hooks, lazy loading, cookie)
//! - Compute the path of the current route in the new locale
//! - Discard the outcome of superseded navigations
//!
//! # Design Decisions
//! - The first applicable check is terminal
//! - Locale state lives in a `LocaleContext` passed by the caller
//! - Static generation only keeps the root redirect
//! - The cookie is written after the supersede check, so a stale
//!   navigation leaves no trace

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::config::schema::Strategy;
use crate::config::settings::{LocaleSettings, DEFAULT_REDIRECT_STATUS};
use crate::observability::metrics;
use crate::redirect::loader::{LanguageSwitchHook, MessageLoader};
use crate::redirect::session::{LocaleContext, NavigationTicket};
use crate::resolve::request::RequestContext;
use crate::resolve::resolver::{LocaleResolver, LocaleSource, ResolveError, ResolvedLocale};
use crate::routing::router::{with_query, LocaleRouter, RouteLocation, RouteTarget};

/// Why a navigation is redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    Root,
    Stored,
    Browser,
    LocaleSwitch,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::Root => "root",
            RedirectReason::Stored => "stored",
            RedirectReason::Browser => "browser",
            RedirectReason::LocaleSwitch => "locale_switch",
        }
    }
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A redirect the host must perform.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Redirect {
    pub status: u16,
    pub path: String,
    /// Append the original query string to `path`.
    pub preserve_query: bool,
    pub reason: RedirectReason,
}

impl Redirect {
    /// Final `Location` value for a request with `query`.
    pub fn location(&self, query: Option<&str>) -> String {
        if self.preserve_query {
            with_query(&self.path, query)
        } else {
            self.path.clone()
        }
    }
}

/// Outcome of [`RedirectEngine::on_navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Redirect(Redirect),
    /// Render the route with this locale.
    Continue(ResolvedLocale),
    /// A later navigation took over; nothing was applied.
    Superseded,
}

/// Outcome of [`RedirectEngine::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialLocale {
    /// Locale applied; its redirect, if any, is replayed by `on_navigate`.
    Applied(ResolvedLocale),
    /// No locale and no default to fall back to.
    Unresolved,
    /// A later navigation of the same client took over during loading.
    Superseded,
}

enum SwitchOutcome {
    Unchanged,
    Switched { redirect: Option<String> },
    Superseded,
}

/// Decides locales and redirects for navigations.
#[derive(Clone)]
pub struct RedirectEngine {
    resolver: LocaleResolver,
    loader: Option<Arc<dyn MessageLoader>>,
    hook: Option<Arc<dyn LanguageSwitchHook>>,
}

impl fmt::Debug for RedirectEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectEngine")
            .field("resolver", &self.resolver)
            .field("loader", &self.loader.is_some())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl RedirectEngine {
    pub fn new(router: Arc<LocaleRouter>) -> Self {
        Self {
            resolver: LocaleResolver::new(router),
            loader: None,
            hook: None,
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn MessageLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn LanguageSwitchHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn router(&self) -> &LocaleRouter {
        self.resolver.router()
    }

    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    fn settings(&self) -> &LocaleSettings {
        self.router().settings()
    }

    /// Initial setup: pick the first locale and defer its redirect to `on_navigate`.
    pub async fn initialize<C: LocaleContext>(
        &self,
        route: &RouteLocation,
        request: &RequestContext,
        ctx: &mut C,
    ) -> Result<InitialLocale, ResolveError> {
        let ticket = ctx.begin_navigation();
        let request = scoped_request(request, ctx);

        let initial = match self.resolver.detect_browser_language(route, &request, ctx.locale()) {
            Some(detected) => Some(detected),
            None => match self.resolver.resolve(route, &request) {
                Ok(resolved) => Some(resolved),
                Err(ResolveError::NotFound { .. }) => self
                    .settings()
                    .default_locale()
                    .map(|code| ResolvedLocale::new(code, LocaleSource::Default)),
                Err(err) => return Err(err),
            },
        };

        let Some(resolved) = initial else {
            return Ok(InitialLocale::Unresolved);
        };
        match self.switch_locale(&resolved.locale, route, ctx, ticket, true).await? {
            SwitchOutcome::Superseded => Ok(InitialLocale::Superseded),
            SwitchOutcome::Unchanged | SwitchOutcome::Switched { .. } => Ok(InitialLocale::Applied(resolved)),
        }
    }

    /// Per-navigation hook: redirect, continue with a locale, or drop a superseded navigation.
    pub async fn on_navigate<C: LocaleContext>(
        &self,
        route: &RouteLocation,
        request: &RequestContext,
        ctx: &mut C,
    ) -> Result<NavigationDecision, ResolveError> {
        let ticket = ctx.begin_navigation();
        metrics::record_navigation();

        if route.path == "/" {
            if let Some(root) = &self.settings().root_redirect {
                return Ok(self.redirect(Redirect {
                    status: root.status_code,
                    path: root.target(),
                    preserve_query: true,
                    reason: RedirectReason::Root,
                }));
            }
        }

        if let Some(path) = ctx.take_redirect() {
            return Ok(self.redirect(Redirect {
                status: DEFAULT_REDIRECT_STATUS,
                path,
                preserve_query: false,
                reason: RedirectReason::Stored,
            }));
        }

        let request = scoped_request(request, ctx);
        let mut not_found = false;
        let resolved = match self.resolver.detect_browser_language(route, &request, ctx.locale()) {
            Some(detected) => detected,
            None => match self.resolver.resolve(route, &request) {
                Ok(resolved) => resolved,
                Err(ResolveError::NotFound { path }) => {
                    not_found = true;
                    match ctx.locale().or(self.settings().default_locale()) {
                        Some(code) => ResolvedLocale::new(code, LocaleSource::Default),
                        None => return Err(self.not_found(path)),
                    }
                }
                Err(err) => return Err(err),
            },
        };

        if self.settings().options.skip_setting_locale_on_navigate {
            if not_found {
                return Err(self.not_found(route.path.clone()));
            }
            ctx.set_pending_locale(resolved.locale.clone());
            return Ok(NavigationDecision::Continue(resolved));
        }

        let reason = match resolved.source {
            LocaleSource::Browser | LocaleSource::Cookie => RedirectReason::Browser,
            _ => RedirectReason::LocaleSwitch,
        };
        let redirect = match self.switch_locale(&resolved.locale, route, ctx, ticket, false).await? {
            SwitchOutcome::Superseded => return Ok(NavigationDecision::Superseded),
            SwitchOutcome::Switched { redirect } => redirect,
            SwitchOutcome::Unchanged if not_found => {
                self.redirect_path_for_locale(route, &resolved.locale)
            }
            SwitchOutcome::Unchanged => None,
        };

        match redirect {
            Some(path) => Ok(self.redirect(Redirect {
                status: DEFAULT_REDIRECT_STATUS,
                path,
                preserve_query: false,
                reason,
            })),
            None if not_found => Err(self.not_found(route.path.clone())),
            None => {
                tracing::debug!(locale = %resolved.locale, source = %resolved.source, path = %route.path, "Navigation resolved");
                Ok(NavigationDecision::Continue(resolved))
            }
        }
    }

    /// Switch to `code` as a host-initiated change; returns the path to redirect to.
    pub async fn set_locale<C: LocaleContext>(
        &self,
        code: &str,
        route: &RouteLocation,
        ctx: &mut C,
    ) -> Result<Option<String>, ResolveError> {
        let ticket = ctx.begin_navigation();
        match self.switch_locale(code, route, ctx, ticket, false).await? {
            SwitchOutcome::Switched { redirect } => Ok(redirect),
            SwitchOutcome::Unchanged | SwitchOutcome::Superseded => Ok(None),
        }
    }

    /// Apply the locale deferred by `skip_setting_locale_on_navigate`.
    pub async fn finalize_pending_locale_change<C: LocaleContext>(
        &self,
        route: &RouteLocation,
        ctx: &mut C,
    ) -> Result<Option<String>, ResolveError> {
        let Some(code) = ctx.pending_locale().map(str::to_string) else {
            return Ok(None);
        };
        let redirect = self.set_locale(&code, route, ctx).await?;
        ctx.resolve_pending();
        Ok(redirect)
    }

    /// Wait until a deferred locale change is applied or superseded.
    pub async fn wait_for_pending_locale_change<C: LocaleContext>(&self, ctx: &C) {
        ctx.wait_for_pending().await;
    }

    async fn switch_locale<C: LocaleContext>(
        &self,
        code: &str,
        route: &RouteLocation,
        ctx: &mut C,
        ticket: NavigationTicket,
        initial: bool,
    ) -> Result<SwitchOutcome, ResolveError> {
        let settings = self.settings();
        if !initial && settings.options.different_domains {
            return Ok(SwitchOutcome::Unchanged);
        }
        if ctx.locale() == Some(code) {
            return Ok(SwitchOutcome::Unchanged);
        }

        let old = ctx.locale().map(str::to_string);
        if !initial {
            if let Some(hook) = &self.hook {
                hook.before_language_switch(old.as_deref(), code);
            }
        }

        if settings.options.lazy {
            if let Some(loader) = &self.loader {
                if let Some(fallback) = &settings.options.fallback_locale {
                    let fallbacks = fallback.for_locale(code);
                    try_join_all(fallbacks.into_iter().map(|fb| load(loader.as_ref(), fb))).await?;
                }
                load(loader.as_ref(), code).await?;
            }
        }

        if !ctx.is_current(ticket) {
            tracing::debug!(locale = code, "Locale change superseded by a later navigation");
            return Ok(SwitchOutcome::Superseded);
        }

        if settings.uses_cookie() {
            ctx.set_locale_cookie(code);
        }
        ctx.set_locale(code);

        let redirect = self.redirect_path_for_locale(route, code);
        if initial {
            ctx.store_redirect(redirect);
            return Ok(SwitchOutcome::Switched { redirect: None });
        }

        if let Some(hook) = &self.hook {
            hook.on_language_switched(old.as_deref(), code);
        }
        tracing::debug!(old = old.as_deref().unwrap_or(""), new = code, "Locale switched");
        Ok(SwitchOutcome::Switched { redirect })
    }

    /// Path of `route` in `locale` when the client must be sent there.
    pub fn redirect_path_for_locale(&self, route: &RouteLocation, locale: &str) -> Option<String> {
        let settings = self.settings();
        if settings.options.static_generation
            || settings.options.different_domains
            || settings.strategy() == Strategy::NoPrefix
        {
            return None;
        }

        let router = self.router();
        if router.locale_from_route(route).as_deref() == Some(locale) {
            let prefers_unprefixed_default = settings
                .detect()
                .is_some_and(|d| d.only_on_root || d.only_on_no_prefix);
            if !prefers_unprefixed_default
                || settings.default_locale() != Some(locale)
                || settings.strategy() != Strategy::PrefixAndDefault
            {
                return None;
            }
        }

        let full_path = route.full_path();
        let path = router
            .switch_locale_path(route, locale)
            .or_else(|| router.locale_path(RouteTarget::Path(&full_path), locale))?;

        if path == full_path || path.starts_with("//") {
            return None;
        }
        Some(path)
    }

    fn redirect(&self, redirect: Redirect) -> NavigationDecision {
        tracing::info!(
            status = redirect.status,
            location = %redirect.path,
            reason = %redirect.reason,
            "Redirecting navigation"
        );
        metrics::record_redirect(redirect.status, redirect.reason.as_str());
        NavigationDecision::Redirect(redirect)
    }

    fn not_found(&self, path: String) -> ResolveError {
        tracing::debug!(path = %path, "No locale for path");
        metrics::record_not_found();
        ResolveError::NotFound { path }
    }
}

async fn load(loader: &dyn MessageLoader, locale: &str) -> Result<(), ResolveError> {
    loader.load(locale).await.map_err(|source| {
        tracing::error!(locale, error = %source, "Failed to load locale messages");
        ResolveError::LoadFailed {
            locale: locale.to_string(),
            source,
        }
    })
}

/// Request view completed with the session's cookie and locale.
fn scoped_request<'a, C: LocaleContext>(request: &'a RequestContext, ctx: &C) -> Cow<'a, RequestContext> {
    if ctx.locale_cookie().is_none() && ctx.locale().is_none() {
        return Cow::Borrowed(request);
    }
    let mut scoped = request.clone();
    if let Some(cookie) = ctx.locale_cookie() {
        scoped.locale_cookie = Some(cookie.to_string());
    }
    if scoped.stored_locale.is_none() {
        scoped.stored_locale = ctx.locale().map(str::to_string);
    }
    Cow::Owned(scoped)
}
