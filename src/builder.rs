use std::{fmt, marker::PhantomData, time::Duration};

use super::{Pool, PoolConfig};

/// Builder for [`Pool`]s.
///
/// Instances of this are created by calling the [`Pool::builder()`] method.
#[must_use = "builder does nothing itself, use `.build()` to build it"]
pub struct PoolBuilder<R> {
    pub(crate) config: PoolConfig,
    _resource: PhantomData<fn() -> R>,
}

// Implemented manually to avoid unnecessary trait bound on `R` type parameter.
impl<R> fmt::Debug for PoolBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl<R> PoolBuilder<R> {
    pub(crate) fn new() -> Self {
        Self {
            config: PoolConfig::default(),
            _resource: PhantomData,
        }
    }

    /// Builds the [`Pool`]. It starts out closed and empty.
    pub fn build(self) -> Pool<R> {
        Pool::from_builder(self)
    }

    /// Sets a [`PoolConfig`] to build the [`Pool`] with.
    pub fn config(mut self, value: PoolConfig) -> Self {
        self.config = value;
        self
    }

    /// Sets the [`PoolConfig::timeout`].
    pub fn timeout(mut self, value: Option<Duration>) -> Self {
        self.config.timeout = value;
        self
    }

    /// Sets the [`PoolConfig::poll_interval`].
    pub fn poll_interval(mut self, value: Duration) -> Self {
        self.config.poll_interval = value;
        self
    }
}
