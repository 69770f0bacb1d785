//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → request.rs (RequestContext from path, Host, cookie, Accept-Language)
//!     → middleware/locale.rs (initialize + on_navigate)
//!         Redirect  → Location (+ Set-Cookie)
//!         NotFound  → 404
//!         Superseded (same X-Client-Id, later request won) → 409
//!         Continue  → NavigationContext extension → page handler
//!     → response.rs (JSON bodies, cookie header)
//!     → Send to client
//! ```

pub mod cookie;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use cookie::LocaleCookie;
pub use request::{client_id, request_context, X_CLIENT_ID, X_REQUEST_ID};
pub use response::NavigationContext;
pub use server::{AppState, HttpServer};
