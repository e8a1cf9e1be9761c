use std::time::Duration;

/// [`Pool`] configuration.
///
/// [`Pool`]: super::Pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Timeout used by [`Pool::get()`]. [`None`] waits indefinitely.
    ///
    /// [`Pool::get()`]: super::Pool::get
    pub timeout: Option<Duration>,

    /// Upper bound between two checks of the pool state while waiting.
    ///
    /// Waiters are woken whenever the pool changes, so this only matters as a
    /// fallback. Zero disables the periodic check.
    pub poll_interval: Duration,
}

impl PoolConfig {
    /// Default interval between two checks of a waiting operation.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Creates a new [`PoolConfig`] without a timeout and with the provided
    /// `poll_interval`.
    #[must_use]
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            timeout: None,
            poll_interval,
        }
    }
}

impl Default for PoolConfig {
    /// Creates a new [`PoolConfig`] without a timeout, polling every 100ms.
    fn default() -> Self {
        Self::new(Self::DEFAULT_POLL_INTERVAL)
    }
}
