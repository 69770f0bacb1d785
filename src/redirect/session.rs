//! Request-scoped locale state.
//!
//! # Responsibilities
//! - Hold the active locale, locale cookie and deferred redirect of one client
//! - Track pending locale changes and their waiters
//! - Order navigations so the latest one wins
//!
//! # Design Decisions
//! - Owned by a single navigation (`&mut` access), no locks
//! - Pending changes are one-shot channels; replacing one drops its sender,
//!   which releases the old waiters without applying anything
//! - The sequencer is the only shared piece, an atomic counter
//! - `ClientSequencers` keeps one sequencer per client while it has
//!   navigations in flight, then forgets it

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::future::{FutureExt, Shared};
use tokio::sync::oneshot;

/// Identity of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket(u64);

/// Hands out increasing tickets; only the latest ticket is current.
#[derive(Debug, Clone, Default)]
pub struct NavigationSequencer {
    latest: Arc<AtomicU64>,
}

impl NavigationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> NavigationTicket {
        NavigationTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Whether another clone is alive.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.latest) > 1
    }
}

/// Navigation sequencers keyed by client id.
#[derive(Debug, Default)]
pub struct ClientSequencers {
    clients: Mutex<HashMap<String, NavigationSequencer>>,
}

impl ClientSequencers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequencer shared by the in-flight navigations of `client`.
    pub fn acquire(&self, client: &str) -> NavigationSequencer {
        self.lock().entry(client.to_string()).or_default().clone()
    }

    /// Forget `client` once none of its navigations hold the sequencer.
    pub fn release(&self, client: &str) {
        let mut clients = self.lock();
        if clients.get(client).is_some_and(|sequencer| !sequencer.is_shared()) {
            clients.remove(client);
        }
    }

    /// Clients with navigations in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, NavigationSequencer>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Locale state the redirect engine reads and writes.
#[async_trait]
pub trait LocaleContext: Send + Sync {
    fn locale(&self) -> Option<&str>;

    fn set_locale(&mut self, code: &str);

    fn locale_cookie(&self) -> Option<&str>;

    fn set_locale_cookie(&mut self, code: &str);

    /// Take the redirect deferred by the initial setup, clearing it.
    fn take_redirect(&mut self) -> Option<String>;

    fn store_redirect(&mut self, path: Option<String>);

    fn pending_locale(&self) -> Option<&str>;

    /// Defer a locale change; supersedes any pending one.
    fn set_pending_locale(&mut self, code: String);

    /// Clear the pending change and release its waiters.
    fn resolve_pending(&mut self);

    fn begin_navigation(&self) -> NavigationTicket;

    fn is_current(&self, ticket: NavigationTicket) -> bool;

    /// Wait until the pending change is applied or superseded.
    async fn wait_for_pending(&self);
}

struct PendingLocale {
    locale: String,
    done: oneshot::Sender<()>,
    waiter: Shared<oneshot::Receiver<()>>,
}

impl fmt::Debug for PendingLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLocale").field("locale", &self.locale).finish_non_exhaustive()
    }
}

/// Default [`LocaleContext`] used by the HTTP middleware.
#[derive(Debug, Default)]
pub struct LocaleSession {
    locale: Option<String>,
    cookie: Option<String>,
    written_cookie: Option<String>,
    redirect: Option<String>,
    pending: Option<PendingLocale>,
    sequencer: NavigationSequencer,
}

impl LocaleSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with the locale cookie sent by the client.
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    /// Share navigation ordering with other sessions of the same client.
    pub fn with_sequencer(mut self, sequencer: NavigationSequencer) -> Self {
        self.sequencer = sequencer;
        self
    }

    /// Locale cookie written during this navigation, if any.
    pub fn written_cookie(&self) -> Option<&str> {
        self.written_cookie.as_deref()
    }
}

#[async_trait]
impl LocaleContext for LocaleSession {
    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn set_locale(&mut self, code: &str) {
        self.locale = Some(code.to_string());
    }

    fn locale_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    fn set_locale_cookie(&mut self, code: &str) {
        self.cookie = Some(code.to_string());
        self.written_cookie = Some(code.to_string());
    }

    fn take_redirect(&mut self) -> Option<String> {
        self.redirect.take().filter(|path| !path.is_empty())
    }

    fn store_redirect(&mut self, path: Option<String>) {
        self.redirect = path;
    }

    fn pending_locale(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.locale.as_str())
    }

    fn set_pending_locale(&mut self, code: String) {
        let (done, receiver) = oneshot::channel();
        if let Some(previous) = self.pending.take() {
            tracing::debug!(previous = %previous.locale, next = %code, "Pending locale superseded");
        }
        self.pending = Some(PendingLocale {
            locale: code,
            done,
            waiter: receiver.shared(),
        });
    }

    fn resolve_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.done.send(());
        }
    }

    fn begin_navigation(&self) -> NavigationTicket {
        self.sequencer.begin()
    }

    fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.sequencer.is_current(ticket)
    }

    async fn wait_for_pending(&self) {
        let waiter = self.pending.as_ref().map(|p| p.waiter.clone());
        if let Some(waiter) = waiter {
            // Err means superseded; either way nothing is pending any more.
            let _ = waiter.await;
        }
    }
}
