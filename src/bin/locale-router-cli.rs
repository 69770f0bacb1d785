use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use locale_router::config::{load_config, log_config_warnings, I18nConfig, LocaleSettings};
use locale_router::http::NavigationContext;
use locale_router::redirect::{LocaleSession, NavigationDecision, RedirectEngine};
use locale_router::resolve::{RequestContext, ResolveError};
use locale_router::LocaleRouter;

#[derive(Parser)]
#[command(name = "locale-router-cli")]
#[command(about = "Inspect locale routes and navigation decisions", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, default_value = "locale-router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Request inputs shared by the navigation commands.
#[derive(clap::Args)]
struct RequestArgs {
    /// Path with optional query string, e.g. `/fr/about?x=1`.
    path: String,

    /// `Accept-Language` header value.
    #[arg(short, long)]
    accept_language: Option<String>,

    /// Locale cookie value.
    #[arg(long)]
    cookie: Option<String>,

    /// `Host` header value.
    #[arg(long)]
    host: Option<String>,

    /// Protocol seen by the client (`X-Forwarded-Proto`).
    #[arg(long)]
    proto: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated route table
    Routes,
    /// Resolve the locale and redirect decision for a path
    Resolve(RequestArgs),
    /// Print the SEO head of a path
    Seo {
        #[command(flatten)]
        request: RequestArgs,

        /// Print HTML tags instead of JSON.
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    for warning in log_config_warnings(&config) {
        eprintln!("warning: {warning}");
    }
    let engine = build_engine(&config)?;

    match cli.command {
        Commands::Routes => {
            let routes: Vec<Value> = engine
                .router()
                .table()
                .entries()
                .iter()
                .map(|entry| {
                    json!({
                        "name": entry.name,
                        "path": entry.pattern.as_str(),
                        "redirect": entry.redirect,
                    })
                })
                .collect();
            print_json(&Value::Array(routes))?;
        }
        Commands::Resolve(args) => {
            let output = match navigate(&engine, &args).await {
                Ok((NavigationDecision::Redirect(redirect), request)) => {
                    let query = engine.router().resolve_location(&request.full_path).query;
                    json!({
                        "redirect": redirect,
                        "location": redirect.location(query.as_deref()),
                    })
                }
                Ok((NavigationDecision::Continue(resolved), request)) => {
                    let route = engine.router().resolve_location(&request.full_path);
                    json!({ "context": NavigationContext::build(&engine, &route, &request, &resolved) })
                }
                Ok((NavigationDecision::Superseded, _)) => json!({ "superseded": true }),
                Err(err) => error_json(&err),
            };
            print_json(&output)?;
        }
        Commands::Seo { request: args, html } => match navigate(&engine, &args).await {
            Ok((NavigationDecision::Continue(resolved), request)) => {
                let route = engine.router().resolve_location(&request.full_path);
                let context = NavigationContext::build(&engine, &route, &request, &resolved);
                if html {
                    print!("{}", context.seo.to_html());
                } else {
                    print_json(&serde_json::to_value(&context.seo)?)?;
                }
            }
            Ok((NavigationDecision::Redirect(redirect), _)) => {
                eprintln!("Error: {} redirects to {} ({})", args.path, redirect.path, redirect.status);
            }
            Ok((NavigationDecision::Superseded, _)) => eprintln!("Error: navigation superseded"),
            Err(err) => eprintln!("Error: {err}"),
        },
    }

    Ok(())
}

fn build_engine(config: &I18nConfig) -> Result<RedirectEngine, Box<dyn std::error::Error>> {
    let settings = Arc::new(LocaleSettings::from_options(config.i18n.clone())?);
    let router = LocaleRouter::new(settings, &config.routes)?;
    Ok(RedirectEngine::new(Arc::new(router)))
}

async fn navigate(
    engine: &RedirectEngine,
    args: &RequestArgs,
) -> Result<(NavigationDecision, RequestContext), ResolveError> {
    let mut request = RequestContext::new(args.path.clone());
    request.accept_language = args.accept_language.clone();
    request.locale_cookie = args.cookie.clone();
    request.host = args.host.clone();
    request.forwarded_proto = args.proto.clone();

    let route = engine.router().resolve_location(&request.full_path);
    let mut session = LocaleSession::new().with_cookie(request.locale_cookie.clone());
    engine.initialize(&route, &request, &mut session).await?;
    let decision = engine.on_navigate(&route, &request, &mut session).await?;
    Ok((decision, request))
}

fn error_json(err: &ResolveError) -> Value {
    let kind = match err {
        ResolveError::NotFound { .. } => "not_found",
        ResolveError::LoadFailed { .. } => "locale_load_failed",
    };
    json!({ "error": kind, "message": err.to_string() })
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
