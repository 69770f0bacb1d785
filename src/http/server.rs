//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the locale router and redirect engine from configuration
//! - Create the Axum Router with page and introspection handlers
//! - Wire up middleware (tracing, request ID, timeout, locale)
//! - Serve with graceful shutdown

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::LocaleEntry;
use crate::config::{ConfigError, I18nConfig, LocaleSettings};
use crate::http::cookie::LocaleCookie;
use crate::http::middleware::locale_middleware;
use crate::http::request::X_REQUEST_ID;
use crate::http::response::NavigationContext;
use crate::redirect::engine::RedirectEngine;
use crate::redirect::loader::FileMessageLoader;
use crate::redirect::session::ClientSequencers;
use crate::routing::router::LocaleRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RedirectEngine>,
    /// Present when cookie detection is enabled.
    pub cookie: Option<LocaleCookie>,
    /// Navigation order per `X-Client-Id`.
    pub sequencers: Arc<ClientSequencers>,
}

/// HTTP server exposing the locale-aware route table.
pub struct HttpServer {
    router: Router,
    config: I18nConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: I18nConfig) -> Result<Self, ConfigError> {
        let settings = Arc::new(LocaleSettings::from_options(config.i18n.clone())?);
        let router = Arc::new(LocaleRouter::new(settings, &config.routes)?);

        let mut engine = RedirectEngine::new(router);
        if config.i18n.lazy {
            engine = engine.with_loader(Arc::new(file_loader(&config)));
        }
        Ok(Self::with_engine(config, engine))
    }

    /// Create a server around a prepared engine (custom loaders or hooks).
    pub fn with_engine(config: I18nConfig, engine: RedirectEngine) -> Self {
        let cookie = engine
            .router()
            .settings()
            .detect()
            .filter(|detect| detect.use_cookie)
            .map(LocaleCookie::from_config);
        let state = AppState {
            engine: Arc::new(engine),
            cookie,
            sequencers: Arc::new(ClientSequencers::new()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &I18nConfig, state: AppState) -> Router {
        let pages = Router::new()
            .route("/", get(page_handler))
            .route("/{*path}", get(page_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), locale_middleware));

        Router::new()
            .route("/_i18n/routes", get(routes_handler))
            .merge(pages)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Axum router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            strategy = %self.config.i18n.strategy,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &I18nConfig {
        &self.config
    }
}

fn file_loader(config: &I18nConfig) -> FileMessageLoader {
    let dir = config.i18n.lang_dir.as_deref().unwrap_or(".");
    let files = config
        .i18n
        .locales
        .iter()
        .filter_map(|entry| match entry {
            LocaleEntry::Full(locale) => locale
                .file
                .as_ref()
                .map(|file| (locale.code.clone(), file.clone())),
            LocaleEntry::Code(_) => None,
        })
        .collect();
    FileMessageLoader::new(Path::new(dir), files)
}

/// Page handler: echoes the navigation context; 404 for paths no route serves.
async fn page_handler(Extension(context): Extension<NavigationContext>) -> Response {
    if context.matched {
        Json(context).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(context)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct RouteSummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'a str>,
}

/// Generated route table, in match order.
async fn routes_handler(State(state): State<AppState>) -> Response {
    let table = state.engine.router().table();
    let routes: Vec<RouteSummary<'_>> = table
        .entries()
        .iter()
        .map(|entry| RouteSummary {
            name: entry.name.as_deref(),
            path: entry.pattern.as_str(),
            redirect: entry.redirect.as_deref(),
        })
        .collect();
    Json(routes).into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
