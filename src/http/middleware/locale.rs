//! Locale middleware.
//! Resolves the locale of every page request and enforces redirects.
//!
//! Requests sharing an `X-Client-Id` are ordered: when a later one starts
//! while an earlier one is still loading locale messages, the earlier one
//! answers 409 without applying its locale.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::{client_id, request_context, request_id};
use crate::http::response::{
    error_response, redirect_response, resolve_error_response, with_cookie, NavigationContext,
};
use crate::http::server::AppState;
use crate::redirect::engine::{InitialLocale, NavigationDecision};
use crate::redirect::session::{ClientSequencers, LocaleSession, NavigationSequencer};

/// What the middleware does once the locale is decided.
enum Outcome {
    Respond(Response),
    Forward {
        context: NavigationContext,
        cookie: Option<String>,
    },
}

pub async fn locale_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let client = client_id(req.headers()).map(|id| ClientSlot {
        sequencers: &state.sequencers,
        id: id.to_string(),
    });
    let sequencer = client.as_ref().map(|slot| slot.sequencers.acquire(&slot.id));

    let outcome = navigate(&state, req.uri(), req.headers(), sequencer).await;
    drop(client);

    match outcome {
        Outcome::Respond(response) => response,
        Outcome::Forward { context, cookie } => {
            req.extensions_mut().insert(context);
            with_cookie(next.run(req).await.into_response(), cookie)
        }
    }
}

/// Releases the client's sequencer, also when the request is cancelled.
struct ClientSlot<'a> {
    sequencers: &'a ClientSequencers,
    id: String,
}

impl Drop for ClientSlot<'_> {
    fn drop(&mut self) {
        self.sequencers.release(&self.id);
    }
}

async fn navigate(
    state: &AppState,
    uri: &Uri,
    headers: &HeaderMap,
    sequencer: Option<NavigationSequencer>,
) -> Outcome {
    let engine = &state.engine;
    let settings = engine.router().settings();

    let request = request_context(settings, uri, headers);
    let route = engine.router().resolve_location(&request.full_path);
    let request_id = request_id(headers).unwrap_or("unknown").to_string();

    let mut session = LocaleSession::new().with_cookie(request.locale_cookie.clone());
    if let Some(sequencer) = sequencer {
        session = session.with_sequencer(sequencer);
    }

    // 1. Initial setup for this client; a redirect found here is replayed below.
    match engine.initialize(&route, &request, &mut session).await {
        Ok(InitialLocale::Superseded) => return superseded(&request_id, &route.path),
        Ok(InitialLocale::Applied(_) | InitialLocale::Unresolved) => {}
        Err(err) => {
            tracing::warn!(request_id = %request_id, path = %route.path, error = %err, "Locale initialization failed");
            return Outcome::Respond(resolve_error_response(&err));
        }
    }

    // 2. Per-navigation decision
    let decision = match engine.on_navigate(&route, &request, &mut session).await {
        Ok(decision) => decision,
        Err(err) => {
            tracing::debug!(request_id = %request_id, path = %route.path, error = %err, "Navigation rejected");
            return Outcome::Respond(resolve_error_response(&err));
        }
    };

    let cookie = session
        .written_cookie()
        .and_then(|code| state.cookie.as_ref().map(|c| c.set_cookie(code)));

    // 3. Redirect, or forward with the navigation context attached
    match decision {
        NavigationDecision::Redirect(redirect) => Outcome::Respond(with_cookie(
            redirect_response(&redirect, route.query.as_deref()),
            cookie,
        )),
        NavigationDecision::Continue(resolved) => {
            let context = NavigationContext::build(engine, &route, &request, &resolved);
            tracing::debug!(
                request_id = %request_id,
                locale = %context.locale,
                source = %context.source,
                "Locale resolved"
            );
            Outcome::Forward { context, cookie }
        }
        NavigationDecision::Superseded => superseded(&request_id, &route.path),
    }
}

fn superseded(request_id: &str, path: &str) -> Outcome {
    tracing::debug!(request_id = %request_id, path = %path, "Navigation superseded");
    Outcome::Respond(error_response(
        StatusCode::CONFLICT,
        "superseded",
        "navigation superseded by a later request".into(),
    ))
}
