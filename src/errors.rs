use std::fmt;

/// Reasons why [`Pool::get()`] did not return a resource.
///
/// [`Pool::get()`]: super::Pool::get
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// No resource became available before the timeout elapsed.
    Timeout,

    /// [`Pool`] is not open.
    ///
    /// [`Pool`]: super::Pool
    Closed,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "Timeout occurred while waiting for a resource to become available"
            ),
            Self::Closed => write!(f, "Pool is closed"),
        }
    }
}

impl std::error::Error for PoolError {}
