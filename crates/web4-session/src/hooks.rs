//! Lifecycle hook registries
//!
//! Each session keeps one observer list per event type (open, close,
//! heartbeat timeout). Registration hands back a [`HookId`] token which is
//! the only way to unregister - there is no function identity in Rust to
//! compare against.
//!
//! Emission carries a per-event-type in-progress flag: while the hooks for
//! event type X are running, a nested emission of X on the same session is
//! suppressed. Nested emissions of other event types are unaffected. This
//! keeps a close hook that calls `disconnect` again from recursing into the
//! close list a second time.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// A registered lifecycle hook; receives the session id of the transition.
pub type SessionHook = Arc<dyn Fn(u64) + Send + Sync>;

/// Token returned at registration, used to unregister a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Lifecycle transitions a session announces to its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session transitioned to connected
    Open,
    /// The session transitioned to disconnected
    Close,
    /// The heartbeat silence budget was exceeded
    HeartbeatTimeout,
}

#[derive(Default)]
struct EventHooks {
    list: Mutex<Vec<(HookId, SessionHook)>>,
    in_progress: AtomicBool,
}

/// Observer lists for all session event types.
#[derive(Default)]
pub(crate) struct HookRegistry {
    open: EventHooks,
    close: EventHooks,
    heartbeat_timeout: EventHooks,
    next_id: AtomicU64,
}

impl HookRegistry {
    fn slot(&self, event: SessionEvent) -> &EventHooks {
        match event {
            SessionEvent::Open => &self.open,
            SessionEvent::Close => &self.close,
            SessionEvent::HeartbeatTimeout => &self.heartbeat_timeout,
        }
    }

    pub(crate) fn register(&self, event: SessionEvent, hook: SessionHook) -> HookId {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.slot(event).list.lock().push((id, hook));
        id
    }

    /// Remove a hook by token; returns false when the token is unknown.
    pub(crate) fn unregister(&self, event: SessionEvent, id: HookId) -> bool {
        let mut list = self.slot(event).list.lock();
        let before = list.len();
        list.retain(|(hook_id, _)| *hook_id != id);
        list.len() != before
    }

    /// Drop every hook for every event type.
    pub(crate) fn clear(&self) {
        self.open.list.lock().clear();
        self.close.list.lock().clear();
        self.heartbeat_timeout.list.lock().clear();
    }

    /// Invoke the hooks for `event`, unless an emission of the same event
    /// type is already running on this session.
    ///
    /// Hooks are cloned out of the list before invocation so a hook may
    /// register or unregister without deadlocking the registry.
    pub(crate) fn emit(&self, event: SessionEvent, session_id: u64) {
        let slot = self.slot(event);
        if slot.in_progress.swap(true, Ordering::Acquire) {
            // Nested emission of the same event type; the outer call owns it.
            return;
        }
        // The flag must clear even when a hook panics, or this event type
        // would stay suppressed for the rest of the session's life.
        struct InProgress<'a>(&'a AtomicBool);
        impl Drop for InProgress<'_> {
            fn drop(&mut self) {
                self.0.store(false, Ordering::Release);
            }
        }
        let _guard = InProgress(&slot.in_progress);
        let hooks: Vec<SessionHook> = slot.list.lock().iter().map(|(_, h)| h.clone()).collect();
        for hook in hooks {
            hook(session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn unregister_removes_only_the_token() {
        let registry = HookRegistry::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = {
            let calls = calls.clone();
            registry.register(
                SessionEvent::Close,
                Arc::new(move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                }),
            )
        };
        let kept = calls.clone();
        registry.register(
            SessionEvent::Close,
            Arc::new(move |_| {
                kept.fetch_add(10, Ordering::SeqCst);
            }),
        );

        assert!(registry.unregister(SessionEvent::Close, first));
        assert!(!registry.unregister(SessionEvent::Close, first));

        registry.emit(SessionEvent::Close, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn panicking_hook_does_not_wedge_the_event_type() {
        let registry = HookRegistry::default();
        let id = registry.register(SessionEvent::Close, Arc::new(|_| panic!("hook failure")));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.emit(SessionEvent::Close, 1);
        }));
        assert!(result.is_err());
        assert!(registry.unregister(SessionEvent::Close, id));

        let calls = Arc::new(AtomicUsize::new(0));
        {
            let calls = calls.clone();
            registry.register(
                SessionEvent::Close,
                Arc::new(move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        // later emissions of the same type still run
        registry.emit(SessionEvent::Close, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn other_event_types_are_not_guarded() {
        let registry = HookRegistry::default();
        let opens = Arc::new(AtomicUsize::new(0));

        {
            let opens = opens.clone();
            registry.register(
                SessionEvent::Open,
                Arc::new(move |_| {
                    opens.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        // A close hook that emits an open event must still reach open hooks.
        // The guard only suppresses nested emissions of the same type.
        registry.emit(SessionEvent::Close, 1);
        registry.emit(SessionEvent::Open, 1);
        assert_eq!(opens.load(Ordering::SeqCst), 1);
    }
}
