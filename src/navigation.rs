//! Navigation store
//!
//! [`Navigator`] owns the one piece of live state of a running app, the
//! current [`RouteMatch`], and derives it from the location hash. Every hash
//! goes through the route table, then through the first access guard covering
//! the matched route, and is finally published to subscribers.
//!
//! Resolutions may overlap because guards are asynchronous. Each resolution
//! takes a generation number when it starts and is dropped if a newer one
//! started while its guard was pending.

use crate::error::Result;
use crate::matcher::{RouteMatch, RouteTable};
use crate::types::ROOT_ROUTE_NAME;
use parking_lot::Mutex;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Browser-style location whose hash drives navigation.
pub trait Location: Send + Sync {
    /// Raw hash, with or without its leading `#`. Empty when there is none.
    fn hash(&self) -> String;
    /// Navigates to `hash`, adding a history entry.
    fn push_hash(&self, hash: &str);
    /// Rewrites the current history entry.
    fn replace_hash(&self, hash: &str);
}

/// In-memory [`Location`] keeping the full history, for hosts without a
/// browser and for tests.
#[derive(Debug)]
pub struct MemoryLocation {
    entries: Mutex<Vec<String>>,
}

impl MemoryLocation {
    pub fn new(initial_hash: &str) -> Self {
        Self {
            entries: Mutex::new(vec![initial_hash.trim_start_matches('#').to_string()]),
        }
    }

    /// Current hash without `#`.
    pub fn current(&self) -> String {
        self.entries.lock().last().cloned().unwrap_or_default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> String {
        let current = self.current();
        if current.is_empty() {
            current
        } else {
            format!("#{}", current)
        }
    }

    fn push_hash(&self, hash: &str) {
        self.entries.lock().push(hash.trim_start_matches('#').to_string());
    }

    fn replace_hash(&self, hash: &str) {
        let mut entries = self.entries.lock();
        let hash = hash.trim_start_matches('#').to_string();
        match entries.last_mut() {
            Some(last) => *last = hash,
            None => entries.push(hash),
        }
    }
}

pub type GuardFuture = Pin<Box<dyn Future<Output = Option<String>> + Send>>;

/// Authorization check for a route and its descendants. Resolves to the
/// canonical path of another route to redirect to, or `None` to allow.
pub trait AccessGuard: Send + Sync {
    fn check(&self, route: &RouteMatch, hash: &str) -> GuardFuture;
}

impl<F, Fut> AccessGuard for F
where
    F: Fn(RouteMatch, String) -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    fn check(&self, route: &RouteMatch, hash: &str) -> GuardFuture {
        Box::pin(self(route.clone(), hash.to_string()))
    }
}

pub type Listener = Arc<dyn Fn(Option<&RouteMatch>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Outcome of one hash resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The current route changed and subscribers were notified.
    Updated(Option<RouteMatch>),
    /// The hash resolved to the route already current.
    Unchanged,
    /// A newer resolution started while this one was waiting on a guard.
    Superseded,
}

pub struct Navigator<L: Location> {
    table: RouteTable,
    location: L,
    guards: Vec<(String, Box<dyn AccessGuard>)>,
    current: Mutex<Option<RouteMatch>>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    generation: AtomicU64,
}

impl<L: Location> Navigator<L> {
    pub fn new(table: RouteTable, location: L) -> Self {
        Self {
            table,
            location,
            guards: Vec::new(),
            current: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        }
    }

    /// Adds a guard for `prefix` and its descendants. Guards are tried in
    /// insertion order and only the first covering guard runs.
    pub fn with_guard(mut self, prefix: impl Into<String>, guard: impl AccessGuard + 'static) -> Self {
        self.guards.push((prefix.into(), Box::new(guard)));
        self
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> Option<RouteMatch> {
        self.current.lock().clone()
    }

    /// Parameter of the current match.
    pub fn param(&self, name: &str) -> Option<String> {
        self.current
            .lock()
            .as_ref()
            .and_then(|m| m.param(name).map(str::to_string))
    }

    /// Resolves the hash the location holds right now.
    /// A relative hash is taken from the root and written back.
    pub async fn init(&self) -> Resolution {
        let hash = normalize_hash(&self.location.hash());
        let absolute = ensure_absolute_hash(&hash, ROOT_ROUTE_NAME);
        if absolute != hash {
            log::debug!("Rewriting initial hash {} as {}", hash, absolute);
            self.location.replace_hash(&absolute);
        }
        self.resolve(&absolute).await
    }

    /// Handles a hash change from `old_hash` to `new_hash`. A relative new
    /// hash is made absolute and written back in place of the history entry.
    pub async fn on_hash_change(&self, old_hash: &str, new_hash: &str) -> Resolution {
        let old_hash = normalize_hash(old_hash);
        let new_hash = normalize_hash(new_hash);
        let absolute = ensure_absolute_hash(&new_hash, &old_hash);
        if absolute != new_hash {
            log::debug!("Rewriting relative hash {} as {}", new_hash, absolute);
            self.location.replace_hash(&absolute);
        }
        self.resolve(&absolute).await
    }

    /// Matches `hash`, runs the covering guard and publishes the result.
    pub async fn resolve(&self, hash: &str) -> Resolution {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let resolved = self.table.find_route_for_path(hash);

        let redirect = match &resolved {
            Some(found) => match self.find_guard(&found.route) {
                Some(guard) => guard
                    .check(found, hash)
                    .await
                    .filter(|target| *target != found.route),
                None => None,
            },
            None => None,
        };
        let resolved = match &redirect {
            Some(target) => self.table.find_route_for_path(target),
            None => resolved,
        };
        self.commit(generation, hash, resolved, redirect.as_deref())
    }

    /// Navigates to `route` with `params` filling its parameter segments.
    /// Returns `false` without navigating when that path is already current.
    pub fn goto<P: Display>(&self, route: &str, params: &[P]) -> Result<bool> {
        let path = self.table.hydrate(route, params)?;
        if self.current_path().as_deref() == Some(path.as_str()) {
            return Ok(false);
        }
        self.location.push_hash(&path);
        Ok(true)
    }

    /// `goto` bound to its arguments, for event handlers.
    pub fn make_goto(&self, route: &str, params: Vec<String>) -> impl Fn() -> Result<bool> + '_ {
        let route = route.to_string();
        move || self.goto(&route, params.as_slice())
    }

    pub fn is_route_equal_to<P: Display>(&self, route: &str, params: &[P]) -> bool {
        match self.table.hydrate(route, params) {
            Ok(path) => self.current_path().as_deref() == Some(path.as_str()),
            Err(_) => false,
        }
    }

    pub fn subscribe(&self, listener: impl Fn(Option<&RouteMatch>) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Drops every listener and invalidates pending resolutions.
    pub fn dispose(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().clear();
    }

    fn current_path(&self) -> Option<String> {
        self.current.lock().as_ref().map(|m| m.path.clone())
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn find_guard(&self, route: &str) -> Option<&dyn AccessGuard> {
        self.guards
            .iter()
            .find(|(prefix, _)| guard_covers(prefix, route))
            .map(|(_, guard)| guard.as_ref())
    }

    /// Stores `resolved` unless it names the current route. Only the route
    /// name is compared: a parameter change alone does not notify.
    ///
    /// The generation check, the redirect and the store happen under the
    /// `current` lock, so a newer resolution can never be overwritten.
    fn commit(
        &self,
        generation: u64,
        hash: &str,
        resolved: Option<RouteMatch>,
        redirect: Option<&str>,
    ) -> Resolution {
        {
            let mut current = self.current.lock();
            if !self.is_latest(generation) {
                log::debug!("Dropping stale resolution of {}", hash);
                return Resolution::Superseded;
            }
            if let Some(target) = redirect {
                log::info!("Access to {} redirected to {}", hash, target);
                self.location.push_hash(target);
            }
            let same_route = current.as_ref().map(|m| m.route.as_str())
                == resolved.as_ref().map(|m| m.route.as_str());
            if same_route {
                return Resolution::Unchanged;
            }
            *current = resolved.clone();
        }

        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(resolved.as_ref());
        }
        Resolution::Updated(resolved)
    }
}

/// Whether a guard registered for `prefix` applies to `route`.
pub fn guard_covers(prefix: &str, route: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    prefix.is_empty()
        || route == prefix
        || route
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('/'))
}

/// Drops the `#` and maps an empty hash to `/`.
pub fn normalize_hash(hash: &str) -> String {
    let hash = hash.strip_prefix('#').unwrap_or(hash);
    if hash.is_empty() {
        ROOT_ROUTE_NAME.to_string()
    } else {
        hash.to_string()
    }
}

/// Resolves `new_hash` against `old_hash` when it does not start with `/`.
pub fn ensure_absolute_hash(new_hash: &str, old_hash: &str) -> String {
    if new_hash.starts_with('/') {
        return new_hash.to_string();
    }

    let mut hash = new_hash;
    while let Some(rest) = hash.strip_prefix("./") {
        hash = rest;
    }
    let mut path: Vec<&str> = old_hash
        .split('/')
        .filter(|item| !item.trim().is_empty())
        .collect();
    for item in hash.split('/') {
        match item {
            "" | "." => {}
            ".." => {
                path.pop();
            }
            _ => path.push(item),
        }
    }
    format!("{}{}", ROOT_ROUTE_NAME, path.join("/"))
}
