//! Redirect decision subsystem.
//!
//! # Data Flow
//! ```text
//! initialize (once per client)
//!     → browser detection, else resolver, else default locale
//!     → switch locale (initial): cookie + locale set, redirect stored
//!     → overtaken while loading → Superseded
//!
//! on_navigate (every navigation)
//!     1. path "/" + root_redirect   → Redirect(root status, query kept)
//!     2. stored redirect            → Redirect(302)
//!     3. browser detection          ─┐
//!     4. resolver                   ─┴→ locale
//!     5. skip_setting_locale        → pending locale, Continue
//!     6. switch locale
//!          hooks → lazy load → supersede check → cookie → locale
//!     7. path differs in new locale → Redirect(302)
//!        otherwise                  → Continue(locale)
//! ```
//!
//! # Design Decisions
//! - One `LocaleContext` per client; the engine itself is stateless
//! - Navigations are ordered by ticket; a stale one returns `Superseded`
//! - Message loading and switch callbacks are pluggable traits

pub mod engine;
pub mod loader;
pub mod session;

pub use engine::{InitialLocale, NavigationDecision, Redirect, RedirectEngine, RedirectReason};
pub use loader::{FileMessageLoader, LanguageSwitchHook, LoadError, MessageLoader};
pub use session::{ClientSequencers, LocaleContext, LocaleSession, NavigationSequencer, NavigationTicket};
