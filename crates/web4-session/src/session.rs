//! Bounded session queue with QoS-aware admission
//!
//! The monitor pattern: one `Mutex` guards the queue, statistics, and
//! connectivity flag; one `Condvar` tied to that mutex serves `block`-policy
//! waiters. Hooks always fire after the lock is released, so a hook may
//! call back into the session without deadlocking.

use crate::config::{BackpressurePolicy, SessionConfig};
use crate::error::SessionError;
use crate::hooks::{HookId, HookRegistry, SessionEvent};
use crate::stats::SessionStats;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, warn};

struct Inner<M> {
    queue: VecDeque<M>,
    connected: bool,
    stats: SessionStats,
    last_heartbeat_at: Instant,
    reconnects: u64,
}

/// A single bounded, typed message queue with a configurable backpressure
/// policy, transfer statistics, connectivity state, heartbeat tracking, and
/// lifecycle hooks.
///
/// Construction starts the session connected and fires no hooks: hooks mark
/// transitions, not initial state.
pub struct Session<M> {
    config: SessionConfig,
    inner: Mutex<Inner<M>>,
    room: Condvar,
    hooks: HookRegistry,
}

impl<M> Session<M> {
    /// Create a connected session from its configuration
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                connected: true,
                stats: SessionStats::default(),
                last_heartbeat_at: Instant::now(),
                reconnects: 0,
            }),
            room: Condvar::new(),
            hooks: HookRegistry::default(),
        }
    }

    /// Session identity, as stamped on hooks and observability payloads
    pub fn session_id(&self) -> u64 {
        self.config.session_id
    }

    /// The configuration this session was built from
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the session is currently connected
    pub fn connected(&self) -> bool {
        self.inner.lock().connected
    }

    /// Current queue length
    pub fn pending(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Snapshot of the transfer statistics
    pub fn stats(&self) -> SessionStats {
        self.inner.lock().stats
    }

    /// Number of completed reconnects over the session's lifetime
    pub fn reconnects(&self) -> u64 {
        self.inner.lock().reconnects
    }

    fn admit(inner: &mut Inner<M>, message: M) {
        inner.queue.push_back(message);
        inner.stats.enqueued += 1;
        inner.stats.max_queue_len = inner.stats.max_queue_len.max(inner.queue.len() as u64);
    }

    /// Send one message under the configured admission policy.
    ///
    /// Every call increments `attempted`. A disconnected session fails with
    /// [`SessionError::Disconnected`] regardless of queue state; a full
    /// queue is resolved per the backpressure policy.
    pub fn send(&self, message: M) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.stats.attempted += 1;
        if !inner.connected {
            inner.stats.errors += 1;
            return Err(SessionError::Disconnected);
        }
        if inner.queue.len() < self.config.capacity() {
            Self::admit(&mut inner, message);
            self.room.notify_all();
            return Ok(());
        }
        self.overflow(inner, message)
    }

    fn overflow(&self, mut inner: MutexGuard<'_, Inner<M>>, message: M) -> Result<(), SessionError> {
        inner.stats.overflow_events += 1;
        match self.config.backpressure_policy {
            BackpressurePolicy::DropOldest => {
                inner.queue.pop_front();
                inner.stats.dropped_oldest += 1;
                Self::admit(&mut inner, message);
                self.room.notify_all();
                Ok(())
            }
            BackpressurePolicy::DropNewest => {
                inner.stats.dropped_newest += 1;
                Ok(())
            }
            BackpressurePolicy::Error => {
                inner.stats.errors += 1;
                debug!(
                    session_id = self.config.session_id,
                    pending = inner.queue.len(),
                    "send refused, queue full"
                );
                Err(SessionError::queue_full())
            }
            BackpressurePolicy::Block => self.block_for_room(inner, message),
        }
    }

    /// Wait for room under the `block` policy.
    ///
    /// The predicate (room available AND connected) is re-checked after
    /// every wakeup; a single wakeup never satisfies the wait on its own,
    /// which tolerates spurious wakeups and broadcast notifications.
    fn block_for_room(
        &self,
        mut inner: MutexGuard<'_, Inner<M>>,
        message: M,
    ) -> Result<(), SessionError> {
        inner.stats.blocked += 1;
        let deadline = Instant::now() + self.config.block_timeout();
        while inner.queue.len() >= self.config.capacity() && inner.connected {
            if Instant::now() >= deadline {
                inner.stats.errors += 1;
                debug!(
                    session_id = self.config.session_id,
                    "blocked send timed out"
                );
                return Err(SessionError::block_timeout());
            }
            let _ = self.room.wait_until(&mut inner, deadline);
        }
        if !inner.connected {
            inner.stats.errors += 1;
            return Err(SessionError::Disconnected);
        }
        Self::admit(&mut inner, message);
        self.room.notify_all();
        Ok(())
    }

    /// Send messages in order; the batch is not atomic.
    ///
    /// The first per-item failure propagates, leaving earlier items queued.
    pub fn send_batch(&self, messages: impl IntoIterator<Item = M>) -> Result<(), SessionError> {
        for message in messages {
            self.send(message)?;
        }
        Ok(())
    }

    /// Pop the oldest queued message, never blocking.
    ///
    /// Returns `Ok(None)` on an empty queue and fails on a disconnected
    /// session.
    pub fn receive(&self) -> Result<Option<M>, SessionError> {
        let mut inner = self.inner.lock();
        if !inner.connected {
            return Err(SessionError::Disconnected);
        }
        match inner.queue.pop_front() {
            Some(message) => {
                // Waiters blocked on room can make progress now.
                self.room.notify_all();
                Ok(Some(message))
            }
            None => Ok(None),
        }
    }

    /// Transition to disconnected and fire on-close hooks. Idempotent.
    ///
    /// A sender blocked for room observes the disconnection on its next
    /// wake and fails with [`SessionError::Disconnected`].
    pub fn disconnect(&self, reason: &str) {
        let transitioned = {
            let mut inner = self.inner.lock();
            if !inner.connected {
                false
            } else {
                inner.connected = false;
                self.room.notify_all();
                true
            }
        };
        if transitioned {
            debug!(
                session_id = self.config.session_id,
                reason, "session disconnected"
            );
            self.hooks.emit(SessionEvent::Close, self.config.session_id);
        }
    }

    /// Transition to connected and fire on-open hooks. Idempotent.
    ///
    /// Messages queued before the disconnect belonged to the dead
    /// connection and are cleared; the heartbeat clock restarts.
    pub fn reconnect(&self) {
        let transitioned = {
            let mut inner = self.inner.lock();
            if inner.connected {
                false
            } else {
                inner.connected = true;
                inner.queue.clear();
                inner.reconnects += 1;
                inner.last_heartbeat_at = Instant::now();
                self.room.notify_all();
                true
            }
        };
        if transitioned {
            debug!(session_id = self.config.session_id, "session reconnected");
            self.hooks.emit(SessionEvent::Open, self.config.session_id);
        }
    }

    /// Record proof of life from the peer
    pub fn heartbeat(&self) {
        self.inner.lock().last_heartbeat_at = Instant::now();
    }

    /// Check whether the heartbeat silence budget has been exceeded.
    ///
    /// On expiry this fires on-heartbeat-timeout hooks, then performs an
    /// implicit disconnect (firing on-close hooks as well) and returns
    /// true. Each real timeout occurrence reports true exactly once: the
    /// connectivity flag flips inside the lock, so concurrent checkers and
    /// later calls see a session that is already disconnected.
    pub fn check_heartbeat_timeout(&self) -> bool {
        {
            let mut inner = self.inner.lock();
            let expired =
                inner.connected && inner.last_heartbeat_at.elapsed() > self.config.heartbeat_timeout();
            if !expired {
                return false;
            }
            inner.connected = false;
            self.room.notify_all();
        }
        warn!(
            session_id = self.config.session_id,
            timeout_s = self.config.heartbeat_timeout_s,
            "heartbeat timeout, disconnecting session"
        );
        self.hooks
            .emit(SessionEvent::HeartbeatTimeout, self.config.session_id);
        self.hooks.emit(SessionEvent::Close, self.config.session_id);
        true
    }

    /// Test hook: age the last heartbeat so a timeout can be provoked
    /// without sleeping.
    #[doc(hidden)]
    pub fn backdate_heartbeat(&self, age: std::time::Duration) {
        let mut inner = self.inner.lock();
        if let Some(at) = Instant::now().checked_sub(age) {
            inner.last_heartbeat_at = at;
        }
    }

    /// Register an on-open hook.
    ///
    /// If the session is already connected the new hook fires immediately,
    /// once, with the current session id - subscribers are told the current
    /// state, not just future transitions.
    pub fn register_on_session_open(
        &self,
        hook: impl Fn(u64) + Send + Sync + 'static,
    ) -> HookId {
        let hook: std::sync::Arc<dyn Fn(u64) + Send + Sync> = std::sync::Arc::new(hook);
        let id = self.hooks.register(SessionEvent::Open, hook.clone());
        let connected = self.inner.lock().connected;
        if connected {
            hook(self.config.session_id);
        }
        id
    }

    /// Register an on-close hook; fires only on future disconnects.
    pub fn register_on_session_close(
        &self,
        hook: impl Fn(u64) + Send + Sync + 'static,
    ) -> HookId {
        self.hooks
            .register(SessionEvent::Close, std::sync::Arc::new(hook))
    }

    /// Register an on-heartbeat-timeout hook.
    pub fn register_on_heartbeat_timeout(
        &self,
        hook: impl Fn(u64) + Send + Sync + 'static,
    ) -> HookId {
        self.hooks
            .register(SessionEvent::HeartbeatTimeout, std::sync::Arc::new(hook))
    }

    /// Remove an on-open hook by token
    pub fn unregister_on_session_open(&self, id: HookId) -> bool {
        self.hooks.unregister(SessionEvent::Open, id)
    }

    /// Remove an on-close hook by token
    pub fn unregister_on_session_close(&self, id: HookId) -> bool {
        self.hooks.unregister(SessionEvent::Close, id)
    }

    /// Remove an on-heartbeat-timeout hook by token
    pub fn unregister_on_heartbeat_timeout(&self, id: HookId) -> bool {
        self.hooks.unregister(SessionEvent::HeartbeatTimeout, id)
    }

    /// Drop every registered hook for every event type
    pub fn clear_session_hooks(&self) {
        self.hooks.clear();
    }
}
