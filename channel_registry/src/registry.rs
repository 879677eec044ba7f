//! Name-keyed handler tables with a registration watch

use channel_types::{CallHandler, Kind, NotifyHandler, Scope};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error types for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A call handler is already bound for this (scope, name)
    #[error("call channel '{name}' is already bound in {scope} scope")]
    DuplicateCallBinding {
        /// Scope of the existing binding
        scope: Scope,
        /// Channel name of the existing binding
        name: String,
    },
}

/// Handler storage for one (scope, kind, name) entry
///
/// The tagged slot is what enforces cardinality: notify entries grow a
/// list, call entries hold exactly one handler.
enum HandlerSlot {
    Notify(Vec<NotifyHandler>),
    Call(CallHandler),
}

type ChannelKey = (Scope, Kind, String);

/// Handler registry for one execution context
///
/// Maintains the four logical tables (Local/Remote x Notify/Call) as a
/// single map keyed by the full tuple. All mutation and lookup is guarded
/// by one mutex; registration signals a condition variable so a delivery
/// that raced a late registration can wait for it instead of polling.
pub struct Registry {
    entries: Mutex<HashMap<ChannelKey, HandlerSlot>>,
    registered: Condvar,
    debug: bool,
}

impl Registry {
    /// Creates an empty registry
    ///
    /// `debug` gates verbose per-registration diagnostics; warnings are
    /// emitted regardless.
    pub fn new(debug: bool) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            registered: Condvar::new(),
            debug,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ChannelKey, HandlerSlot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a notify handler for (scope, name)
    ///
    /// Always succeeds; handlers accumulate in registration order and are
    /// never deduplicated.
    pub fn add_notify(&self, scope: Scope, name: &str, handler: NotifyHandler) {
        let mut entries = self.lock();
        let slot = entries
            .entry((scope, Kind::Notify, name.to_string()))
            .or_insert_with(|| HandlerSlot::Notify(Vec::new()));
        if let HandlerSlot::Notify(handlers) = slot {
            handlers.push(handler);
            if self.debug {
                debug!(
                    "registered {} notify handler #{} for '{}'",
                    scope,
                    handlers.len(),
                    name
                );
            }
        }
        drop(entries);
        self.registered.notify_all();
    }

    /// Binds the single call handler for (scope, name)
    ///
    /// Fails if a handler is already bound; the existing binding is
    /// preserved unchanged.
    pub fn bind_call(
        &self,
        scope: Scope,
        name: &str,
        handler: CallHandler,
    ) -> Result<(), RegistryError> {
        let mut entries = self.lock();
        let key = (scope, Kind::Call, name.to_string());
        if entries.contains_key(&key) {
            warn!("rejected duplicate call binding for {} '{}'", scope, name);
            return Err(RegistryError::DuplicateCallBinding {
                scope,
                name: name.to_string(),
            });
        }
        entries.insert(key, HandlerSlot::Call(handler));
        if self.debug {
            debug!("bound {} call handler for '{}'", scope, name);
        }
        drop(entries);
        self.registered.notify_all();
        Ok(())
    }

    /// Clears the entry for `name` in all four tables
    ///
    /// Unconditional: removing a name that was registered in only one table
    /// (or none) is not an error.
    pub fn remove(&self, name: &str) {
        let mut entries = self.lock();
        for scope in [Scope::Local, Scope::Remote] {
            for kind in [Kind::Notify, Kind::Call] {
                entries.remove(&(scope, kind, name.to_string()));
            }
        }
        if self.debug {
            debug!("removed all registrations for '{}'", name);
        }
    }

    /// Returns whether `name` has a non-empty entry in any of the four tables
    pub fn exists(&self, name: &str) -> bool {
        let entries = self.lock();
        [Scope::Local, Scope::Remote].iter().any(|&scope| {
            [Kind::Notify, Kind::Call].iter().any(|&kind| {
                match entries.get(&(scope, kind, name.to_string())) {
                    Some(HandlerSlot::Notify(handlers)) => !handlers.is_empty(),
                    Some(HandlerSlot::Call(_)) => true,
                    None => false,
                }
            })
        })
    }

    /// Returns the notify handlers for (scope, name), if any are registered
    pub fn notify_handlers(&self, scope: Scope, name: &str) -> Option<Vec<NotifyHandler>> {
        let entries = self.lock();
        match entries.get(&(scope, Kind::Notify, name.to_string())) {
            Some(HandlerSlot::Notify(handlers)) if !handlers.is_empty() => Some(handlers.clone()),
            _ => None,
        }
    }

    /// Returns the call handler for (scope, name), if bound
    pub fn call_handler(&self, scope: Scope, name: &str) -> Option<CallHandler> {
        let entries = self.lock();
        match entries.get(&(scope, Kind::Call, name.to_string())) {
            Some(HandlerSlot::Call(handler)) => Some(handler.clone()),
            _ => None,
        }
    }

    /// Waits up to `grace` for notify handlers to appear for (scope, name)
    ///
    /// Returns immediately when already registered. Otherwise blocks on the
    /// registration watch until the entry appears or the window elapses.
    pub fn wait_for_notify(
        &self,
        scope: Scope,
        name: &str,
        grace: Duration,
    ) -> Option<Vec<NotifyHandler>> {
        self.wait_for(grace, |entries| {
            match entries.get(&(scope, Kind::Notify, name.to_string())) {
                Some(HandlerSlot::Notify(handlers)) if !handlers.is_empty() => {
                    Some(handlers.clone())
                }
                _ => None,
            }
        })
    }

    /// Waits up to `grace` for the call handler to appear for (scope, name)
    pub fn wait_for_call(&self, scope: Scope, name: &str, grace: Duration) -> Option<CallHandler> {
        self.wait_for(grace, |entries| {
            match entries.get(&(scope, Kind::Call, name.to_string())) {
                Some(HandlerSlot::Call(handler)) => Some(handler.clone()),
                _ => None,
            }
        })
    }

    fn wait_for<T>(
        &self,
        grace: Duration,
        lookup: impl Fn(&HashMap<ChannelKey, HandlerSlot>) -> Option<T>,
    ) -> Option<T> {
        let deadline = Instant::now() + grace;
        let mut entries = self.lock();
        loop {
            if let Some(found) = lookup(&entries) {
                return Some(found);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .registered
                .wait_timeout(entries, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            entries = guard;
        }
    }

    /// Returns the number of non-empty entries across all four tables
    pub fn count(&self) -> usize {
        let entries = self.lock();
        entries
            .values()
            .filter(|slot| match slot {
                HandlerSlot::Notify(handlers) => !handlers.is_empty(),
                HandlerSlot::Call(_) => true,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_types::Delivery;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn noop_notify() -> NotifyHandler {
        Arc::new(|_| {})
    }

    fn echo_call() -> CallHandler {
        Arc::new(|delivery: &Delivery| Ok(delivery.args.clone()))
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = Registry::new(false);
        assert_eq!(registry.count(), 0);
        assert!(!registry.exists("anything"));
    }

    #[test]
    fn test_add_notify_is_cumulative() {
        let registry = Registry::new(false);
        registry.add_notify(Scope::Local, "tick", noop_notify());
        registry.add_notify(Scope::Local, "tick", noop_notify());
        registry.add_notify(Scope::Local, "tick", noop_notify());

        let handlers = registry.notify_handlers(Scope::Local, "tick").unwrap();
        assert_eq!(handlers.len(), 3);
    }

    #[test]
    fn test_notify_handlers_preserve_registration_order() {
        let registry = Registry::new(false);
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in 0..4 {
            let order = order.clone();
            registry.add_notify(
                Scope::Remote,
                "ordered",
                Arc::new(move |_| order.lock().unwrap().push(tag)),
            );
        }

        let handlers = registry.notify_handlers(Scope::Remote, "ordered").unwrap();
        let delivery = Delivery::local(Vec::new());
        for handler in &handlers {
            handler(&delivery);
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_bind_call_rejects_duplicate_and_keeps_original() {
        let registry = Registry::new(false);
        registry
            .bind_call(Scope::Local, "square", echo_call())
            .unwrap();

        let result = registry.bind_call(
            Scope::Local,
            "square",
            Arc::new(|_| Err("should never install".to_string())),
        );
        assert_eq!(
            result,
            Err(RegistryError::DuplicateCallBinding {
                scope: Scope::Local,
                name: "square".to_string(),
            })
        );

        // Original handler still invocable.
        let handler = registry.call_handler(Scope::Local, "square").unwrap();
        let args = vec![serde_json::json!(4)];
        assert_eq!(handler(&Delivery::local(args.clone())).unwrap(), args);
    }

    #[test]
    fn test_same_name_allowed_across_scopes() {
        let registry = Registry::new(false);
        registry
            .bind_call(Scope::Local, "square", echo_call())
            .unwrap();
        registry
            .bind_call(Scope::Remote, "square", echo_call())
            .unwrap();
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_remove_clears_all_four_tables() {
        let registry = Registry::new(false);
        registry.add_notify(Scope::Local, "mixed", noop_notify());
        registry.add_notify(Scope::Remote, "mixed", noop_notify());
        registry.bind_call(Scope::Local, "mixed", echo_call()).unwrap();
        registry.bind_call(Scope::Remote, "mixed", echo_call()).unwrap();

        registry.remove("mixed");

        assert!(!registry.exists("mixed"));
        assert!(registry.notify_handlers(Scope::Local, "mixed").is_none());
        assert!(registry.notify_handlers(Scope::Remote, "mixed").is_none());
        assert!(registry.call_handler(Scope::Local, "mixed").is_none());
        assert!(registry.call_handler(Scope::Remote, "mixed").is_none());
    }

    #[test]
    fn test_remove_single_table_registration_clears_everywhere() {
        let registry = Registry::new(false);
        registry.add_notify(Scope::Remote, "solo", noop_notify());
        registry.remove("solo");
        assert!(!registry.exists("solo"));
    }

    #[test]
    fn test_remove_unknown_name_is_not_an_error() {
        let registry = Registry::new(false);
        registry.remove("never-registered");
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_exists_across_any_table() {
        let registry = Registry::new(false);
        registry.bind_call(Scope::Remote, "only-remote-call", echo_call()).unwrap();
        assert!(registry.exists("only-remote-call"));
        assert!(!registry.exists("only-remote"));
    }

    #[test]
    fn test_wait_for_returns_immediately_when_present() {
        let registry = Registry::new(false);
        registry.bind_call(Scope::Local, "fast", echo_call()).unwrap();

        let start = Instant::now();
        let handler = registry.wait_for_call(Scope::Local, "fast", Duration::from_secs(3));
        assert!(handler.is_some());
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_wait_for_sees_registration_inside_grace_window() {
        let registry = Arc::new(Registry::new(false));
        let writer = registry.clone();
        let joiner = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            writer.bind_call(Scope::Remote, "late", echo_call()).unwrap();
        });

        let start = Instant::now();
        let handler = registry.wait_for_call(Scope::Remote, "late", Duration::from_millis(500));
        joiner.join().unwrap();

        assert!(handler.is_some());
        // Woke on registration, well before the full window.
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn test_wait_for_gives_up_after_grace_window() {
        let registry = Registry::new(false);
        let start = Instant::now();
        let handler = registry.wait_for_call(Scope::Local, "never", Duration::from_millis(80));
        assert!(handler.is_none());
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_concurrent_registration_keeps_order_per_thread_visible() {
        let registry = Arc::new(Registry::new(false));
        let counter = Arc::new(AtomicUsize::new(0));
        let mut joins = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            let counter = counter.clone();
            joins.push(thread::spawn(move || {
                let counter = counter.clone();
                registry.add_notify(
                    Scope::Local,
                    "stress",
                    Arc::new(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }));
        }
        for join in joins {
            join.join().unwrap();
        }

        let handlers = registry.notify_handlers(Scope::Local, "stress").unwrap();
        assert_eq!(handlers.len(), 8);
        let delivery = Delivery::local(Vec::new());
        for handler in &handlers {
            handler(&delivery);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }
}
