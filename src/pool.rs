use std::{fmt, pin::Pin, sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::{
    sync::{futures::Notified, Notify},
    time::Instant,
};

use crate::{
    gate::Gate,
    members::{Location, Members},
    PoolBuilder, PoolConfig, PoolError, PoolMetrics, ResourcePool, Status,
};

/// Generic pool of caller-supplied resources.
///
/// This struct can be cloned and transferred across thread boundaries and uses
/// reference counting for its internal state.
///
/// A new pool is closed and empty. Resources may be added at any time, but
/// can only be acquired once the pool has been [opened](Pool::open).
pub struct Pool<R> {
    pub(crate) inner: Arc<PoolInner<R>>,
}

impl<R: fmt::Debug> fmt::Debug for Pool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("inner", &self.inner).finish()
    }
}

impl<R> Clone for Pool<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R> Default for Pool<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Pool<R> {
    /// Creates a closed, empty [`Pool`] with the default [`PoolConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Instantiates a builder for a new [`Pool`].
    pub fn builder() -> PoolBuilder<R> {
        PoolBuilder::new()
    }

    pub(crate) fn from_builder(builder: PoolBuilder<R>) -> Self {
        log::info!("Resource pool created.");
        Self {
            inner: Arc::new(PoolInner {
                state: Mutex::new(State {
                    open: false,
                    members: Members::new(),
                }),
                gate: Gate::new(),
                changed: Notify::new(),
                config: builder.config,
                metrics: PoolMetrics::default(),
            }),
        }
    }

    /// Allows resources to be acquired from this [`Pool`].
    pub fn open(&self) {
        let mut state = self.inner.state.lock();
        if !state.open {
            state.open = true;
            log::info!("Resource pool opened.");
        }
    }

    /// Indicates whether this [`Pool`] is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.state.lock().open
    }

    /// Retrieves [`Status`] of this [`Pool`].
    #[must_use]
    pub fn status(&self) -> Status {
        let state = self.inner.state.lock();
        Status {
            open: state.open,
            available: state.members.available(),
            acquired: state.members.acquired(),
        }
    }

    /// Returns the [`PoolConfig`] this [`Pool`] was built with.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Returns the [`PoolMetrics`] of this [`Pool`].
    #[must_use]
    pub fn metrics(&self) -> &PoolMetrics {
        &self.inner.metrics
    }

    /// Closes this [`Pool`] without waiting for acquired resources.
    ///
    /// Tasks waiting in [`Pool::acquire()`] give up immediately. Resources that
    /// are still acquired stay tracked until they are removed. Releasing them
    /// has no effect while the pool is closed.
    pub async fn close_now(&self) {
        let _permit = self.inner.gate.exclusive().await;
        self.inner.state.lock().open = false;
        self.inner.changed.notify_waiters();
        log::info!("Resource pool closed with immediate effect.");
    }
}

impl<R> Pool<R>
where
    R: Clone + PartialEq,
{
    /// Waits until every acquired resource has been released and closes this
    /// [`Pool`].
    ///
    /// Resources may still be acquired while the pool drains. The pool closes
    /// as soon as it is observed without acquired resources. On a pool closed
    /// by [`Pool::close_now()`] releases have no effect, so the wait ends once
    /// the remaining resources are taken out with [`Pool::remove_now()`] or
    /// released after reopening the pool.
    pub async fn close(&self) {
        let abort = WaitAbort::new("close");
        loop {
            let notified = self.inner.changed.notified();
            tokio::pin!(notified);
            let _ = notified.as_mut().enable();
            {
                let _permit = self.inner.gate.exclusive().await;
                if self.inner.try_close() {
                    break;
                }
            }
            self.inner.wait(notified, None).await;
        }
        abort.disarm();
        self.inner.changed.notify_waiters();
        log::info!("Resource pool closed.");
    }

    /// Adds `resource` to the tail of the available queue.
    ///
    /// Returns `false` without touching the pool if an equal resource is
    /// already tracked, whether available or acquired.
    pub async fn add(&self, resource: R) -> bool {
        let _permit = self.inner.gate.shared().await;
        let available = {
            let mut state = self.inner.state.lock();
            if !state.members.insert(resource) {
                return false;
            }
            state.members.available()
        };
        self.inner.changed.notify_waiters();
        log::debug!("Number of available resources {}", available);
        true
    }

    /// Removes `resource` from this [`Pool`].
    ///
    /// An available resource is removed right away. An acquired resource is
    /// removed once it has been released, and this call waits for that to
    /// happen. The resource is not reserved while waiting: if another task
    /// acquires it between its release and its removal, it stays in the pool
    /// and `false` is returned.
    pub async fn remove(&self, resource: &R) -> bool {
        let location = {
            let _permit = self.inner.gate.exclusive().await;
            self.inner.remove_if_available(resource)
        };
        match location {
            None => {
                log::debug!("Resource is not managed by this pool.");
                return false;
            }
            Some(Location::Available) => return true,
            Some(Location::Acquired) => {}
        }

        let abort = WaitAbort::new("remove");
        self.wait_until_released(resource).await;
        let _permit = self.inner.gate.exclusive().await;
        abort.disarm();
        self.inner.remove_available(resource)
    }

    /// Removes `resource` from this [`Pool`] even if it is acquired.
    pub async fn remove_now(&self, resource: &R) -> bool {
        let _permit = self.inner.gate.exclusive().await;
        if !self.inner.state.lock().members.remove_any(resource) {
            log::debug!("Resource is not managed by this pool.");
            return false;
        }
        self.inner.changed.notify_waiters();
        true
    }

    /// Takes the oldest available resource out of this [`Pool`] or waits for
    /// one to become available.
    ///
    /// Returns [`None`] if the pool is closed, now or while waiting.
    pub async fn acquire(&self) -> Option<R> {
        self.timeout_get(None).await.ok()
    }

    /// Like [`Pool::acquire()`] but gives up once `timeout` has elapsed.
    pub async fn acquire_timeout(&self, timeout: Duration) -> Option<R> {
        self.timeout_get(Some(timeout)).await.ok()
    }

    /// Retrieves a resource from this [`Pool`] using the configured
    /// [`PoolConfig::timeout`].
    ///
    /// # Errors
    ///
    /// See [`PoolError`] for details.
    pub async fn get(&self) -> Result<R, PoolError> {
        self.timeout_get(self.inner.config.timeout).await
    }

    /// Retrieves a resource from this [`Pool`] using a different `timeout`
    /// than the configured one.
    ///
    /// The deadline is fixed when this method is called. A zero `timeout`
    /// makes a single attempt.
    ///
    /// # Errors
    ///
    /// See [`PoolError`] for details.
    pub async fn timeout_get(&self, timeout: Option<Duration>) -> Result<R, PoolError> {
        let start = Instant::now();
        let deadline = timeout.and_then(|d| start.checked_add(d));

        let abort = WaitAbort::new("acquire");
        let result = self.check_out(deadline).await;
        abort.disarm();

        match &result {
            Ok(_) => self.inner.metrics.record_acquired(start),
            Err(e) => {
                self.inner.metrics.record_failure();
                log::debug!("No resource acquired: {}", e);
            }
        }
        result
    }

    /// Hands `resource` back to this [`Pool`].
    ///
    /// Nothing happens if the pool is closed or `resource` is not acquired.
    pub async fn release(&self, resource: &R) {
        let _permit = self.inner.gate.shared().await;
        let released = {
            let mut state = self.inner.state.lock();
            state.open && state.members.check_in(resource)
        };
        if released {
            self.inner.changed.notify_waiters();
            log::debug!("Released resource back to the pool.");
        }
    }

    async fn check_out(&self, deadline: Option<Instant>) -> Result<R, PoolError> {
        loop {
            let notified = self.inner.changed.notified();
            tokio::pin!(notified);
            let _ = notified.as_mut().enable();
            let attempt = {
                let _permit = self.inner.gate.shared().await;
                self.inner.try_check_out()
            };
            if let Some(resource) = attempt? {
                return Ok(resource);
            }
            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                return Err(PoolError::Timeout);
            }
            self.inner.wait(notified, deadline).await;
        }
    }

    async fn wait_until_released(&self, resource: &R) {
        loop {
            let notified = self.inner.changed.notified();
            tokio::pin!(notified);
            let _ = notified.as_mut().enable();
            if !self.inner.is_acquired(resource) {
                return;
            }
            self.inner.wait(notified, None).await;
        }
    }
}

#[async_trait]
impl<R> ResourcePool<R> for Pool<R>
where
    R: Clone + PartialEq + Send + Sync + 'static,
{
    fn open(&self) {
        Pool::open(self);
    }

    fn is_open(&self) -> bool {
        Pool::is_open(self)
    }

    async fn close(&self) {
        Pool::close(self).await;
    }

    async fn close_now(&self) {
        Pool::close_now(self).await;
    }

    async fn add(&self, resource: R) -> bool {
        Pool::add(self, resource).await
    }

    async fn remove(&self, resource: &R) -> bool {
        Pool::remove(self, resource).await
    }

    async fn remove_now(&self, resource: &R) -> bool {
        Pool::remove_now(self, resource).await
    }

    async fn acquire(&self) -> Option<R> {
        Pool::acquire(self).await
    }

    async fn acquire_timeout(&self, timeout: Duration) -> Option<R> {
        Pool::acquire_timeout(self, timeout).await
    }

    async fn release(&self, resource: &R) {
        Pool::release(self, resource).await;
    }
}

#[derive(Debug)]
struct State<R> {
    open: bool,
    members: Members<R>,
}

#[derive(Debug)]
pub(crate) struct PoolInner<R> {
    state: Mutex<State<R>>,
    gate: Gate,
    /// Signalled whenever the state changes.
    changed: Notify,
    config: PoolConfig,
    metrics: PoolMetrics,
}

impl<R> PoolInner<R> {
    /// Waits for the next state change, the next periodic check or
    /// `deadline`, whichever comes first.
    async fn wait(&self, notified: Pin<&mut Notified<'_>>, deadline: Option<Instant>) {
        let poll_interval = self.config.poll_interval;
        let recheck = if poll_interval.is_zero() {
            None
        } else {
            Instant::now().checked_add(poll_interval)
        };
        let wake_at = match (recheck, deadline) {
            (Some(recheck), Some(deadline)) => Some(recheck.min(deadline)),
            (recheck, deadline) => recheck.or(deadline),
        };
        match wake_at {
            Some(instant) => {
                let _ = tokio::time::timeout_at(instant, notified).await;
            }
            None => notified.await,
        }
    }

    /// Closes the pool unless resources are still acquired.
    fn try_close(&self) -> bool {
        let mut state = self.state.lock();
        if state.members.acquired() > 0 {
            return false;
        }
        state.open = false;
        true
    }
}

impl<R: Clone + PartialEq> PoolInner<R> {
    fn try_check_out(&self) -> Result<Option<R>, PoolError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(PoolError::Closed);
        }
        Ok(state.members.check_out())
    }

    /// Removes `resource` if it is available and reports where it was found.
    fn remove_if_available(&self, resource: &R) -> Option<Location> {
        let mut state = self.state.lock();
        let location = state.members.locate(resource)?;
        if location == Location::Available {
            let _ = state.members.remove_available(resource);
        }
        Some(location)
    }

    fn remove_available(&self, resource: &R) -> bool {
        self.state.lock().members.remove_available(resource)
    }

    fn is_acquired(&self, resource: &R) -> bool {
        self.state.lock().members.is_acquired(resource)
    }
}

/// Reports an operation whose future was dropped while it was waiting.
struct WaitAbort {
    operation: &'static str,
    armed: bool,
}

impl WaitAbort {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for WaitAbort {
    fn drop(&mut self) {
        if self.armed {
            log::warn!(
                "Pool operation `{}` aborted while waiting.",
                self.operation
            );
        }
    }
}
