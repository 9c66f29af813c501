//! Bounded connection pooling with a borrow/return protocol.
//!
//! A [`Pool`] lazily creates, caches, and recycles expensive connection
//! objects so callers can borrow one, use it, and return it without paying
//! creation cost on every use. The pool is generic over the connection type
//! through a factory closure injected at construction.
//!
//! Acquisition never blocks waiting for capacity: an empty idle store means
//! the factory runs and the caller gets a fresh connection. The idle store
//! is capped at `max_size`; surplus returned connections are dropped.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::config::PoolConfig;
use crate::error::{ConfigError, ConnectError};

/// A bounded FIFO cache of reusable connections.
///
/// Connection parameters live in the factory closure's captures, so the
/// pool itself stays generic over the concrete connection type. All
/// operations are safe to call from multiple threads concurrently.
pub struct Pool<C> {
    config: PoolConfig,
    idle: Mutex<VecDeque<C>>,
    connect: Box<dyn Fn() -> Result<C, ConnectError> + Send + Sync>,
}

impl<C> std::fmt::Debug for Pool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("min_size", &self.config.min_size)
            .field("max_size", &self.config.max_size)
            .field("idle", &self.size())
            .finish_non_exhaustive()
    }
}

impl<C> Pool<C> {
    /// Create a pool with the given sizing policy and connection factory.
    ///
    /// Nothing connects eagerly; call [`fill`](Self::fill) to pre-warm.
    /// Fails with [`ConfigError::PoolSizing`] if `min_size > max_size`.
    pub fn new<F>(config: PoolConfig, connect: F) -> Result<Self, ConfigError>
    where
        F: Fn() -> Result<C, ConnectError> + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            idle: Mutex::new(VecDeque::new()),
            connect: Box::new(connect),
        })
    }

    /// Number of idle connections currently available.
    pub fn size(&self) -> usize {
        self.lock_idle().len()
    }

    /// Pre-warm the pool by constructing connections until the idle store
    /// holds `min_size`. No-op once at `min_size`; factory failures
    /// propagate and leave any connections created so far in the pool.
    pub fn fill(&self) -> Result<(), ConnectError> {
        while self.size() < self.config.min_size {
            let conn = (self.connect)()?;
            self.add(conn);
        }
        Ok(())
    }

    /// Return a connection to the idle store.
    ///
    /// If the store already holds `max_size` connections the surplus is
    /// dropped rather than retained. This is the pool's only backpressure
    /// mechanism: it self-limits its idle footprint by discarding, never
    /// by blocking.
    pub fn add(&self, conn: C) {
        let mut idle = self.lock_idle();
        if idle.len() < self.config.max_size {
            idle.push_back(conn);
        } else {
            debug!(max_size = self.config.max_size, "idle store full, dropping connection");
        }
    }

    /// Discard all idle connections immediately.
    ///
    /// Connections currently borrowed are unaffected; when returned they
    /// re-enter through [`add`](Self::add) as usual.
    pub fn drain(&self) {
        *self.lock_idle() = VecDeque::new();
    }

    /// Borrow a connection for the duration of the returned guard.
    ///
    /// Pops an idle connection if one is available, otherwise constructs a
    /// fresh one via the factory (failures propagate and no guard is
    /// produced). On drop the guard returns the connection to the idle
    /// store and tops the pool back up toward `min_size`, whether the
    /// borrowing scope exited normally, unwound, or was cancelled.
    pub fn acquire(&self) -> Result<PooledConnection<'_, C>, ConnectError> {
        let idle_conn = self.lock_idle().pop_front();
        let conn = match idle_conn {
            Some(conn) => conn,
            None => {
                debug!("idle store empty, constructing new connection");
                (self.connect)()?
            }
        };
        Ok(PooledConnection {
            pool: self,
            conn: Some(conn),
        })
    }

    /// The sizing policy this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    // A panic can never occur while the idle lock is held (push/pop/len
    // only), so a poisoned lock carries no broken invariant.
    fn lock_idle(&self) -> MutexGuard<'_, VecDeque<C>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A connection borrowed from a [`Pool`].
///
/// Dereferences to the underlying connection. Dropping the guard returns
/// the connection to the pool and refills the idle store toward
/// `min_size`; refill failures at that point cannot be raised and are
/// logged instead.
pub struct PooledConnection<'a, C> {
    pool: &'a Pool<C>,
    conn: Option<C>,
}

impl<C> std::ops::Deref for PooledConnection<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.conn.as_ref().expect("connection present until drop")
    }
}

impl<C> std::ops::DerefMut for PooledConnection<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.conn.as_mut().expect("connection present until drop")
    }
}

impl<C> Drop for PooledConnection<'_, C> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.add(conn);
        }
        if let Err(error) = self.pool.fill() {
            warn!(%error, "failed to refill pool after returning connection");
        }
    }
}
