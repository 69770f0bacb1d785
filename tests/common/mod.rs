//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use locale_router::config::{parse_config, I18nConfig, LocaleSettings, Strategy};
use locale_router::redirect::{LocaleSession, NavigationDecision, RedirectEngine};
use locale_router::resolve::{RequestContext, ResolveError};
use locale_router::{HttpServer, LocaleRouter};

pub const ALL_STRATEGIES: [Strategy; 4] = [
    Strategy::NoPrefix,
    Strategy::Prefix,
    Strategy::PrefixExceptDefault,
    Strategy::PrefixAndDefault,
];

/// Two locales (`en` default, `fr`), four pages, browser detection on.
pub fn fixture_config(strategy: Strategy) -> I18nConfig {
    let toml = format!(
        r#"
        [server]
        bind_address = "127.0.0.1:0"
        request_secs = 5

        [i18n]
        locales = [
            {{ code = "en", iso = "en-US" }},
            {{ code = "fr", iso = "fr-FR" }},
        ]
        default_locale = "en"
        strategy = "{strategy}"
        base_url = "https://example.com"

        [i18n.detect_browser_language]
        cookie_key = "i18n_redirected"

        [[routes]]
        name = "index"
        path = "/"

        [[routes]]
        name = "about"
        path = "/about"

        [[routes]]
        name = "post"
        path = "/posts/:slug"

        [[routes]]
        path = "/old-about"
        redirect = "/about"
        "#
    );
    parse_config(&toml).unwrap()
}

/// Index, dynamic and catch-all pages; detection off.
pub fn dynamic_config(strategy: Strategy) -> I18nConfig {
    let toml = format!(
        r#"
        [i18n]
        locales = ["en", "fr"]
        default_locale = "en"
        strategy = "{strategy}"

        [[routes]]
        name = "index"
        path = "/"

        [[routes]]
        name = "slug"
        path = "/:slug"

        [[routes]]
        name = "all"
        path = "*"
        "#
    );
    parse_config(&toml).unwrap()
}

pub fn engine(config: &I18nConfig) -> RedirectEngine {
    let settings = Arc::new(LocaleSettings::from_options(config.i18n.clone()).unwrap());
    let router = LocaleRouter::new(settings, &config.routes).unwrap();
    RedirectEngine::new(Arc::new(router))
}

/// One full navigation with a fresh session, as the HTTP middleware runs it.
pub async fn navigate(
    engine: &RedirectEngine,
    request: &RequestContext,
) -> (Result<NavigationDecision, ResolveError>, LocaleSession) {
    let route = engine.router().resolve_location(&request.full_path);
    let mut session = LocaleSession::new().with_cookie(request.locale_cookie.clone());
    if let Err(err) = engine.initialize(&route, request, &mut session).await {
        return (Err(err), session);
    }
    let decision = engine.on_navigate(&route, request, &mut session).await;
    (decision, session)
}

/// Serve `config` on an ephemeral port.
pub async fn spawn_server(config: I18nConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}
