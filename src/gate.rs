//! Admission gate separating the two classes of pool operations.
//!
//! Shared operations (add, acquire, release) run alongside each other, while
//! exclusive operations (remove, close) run alone. Both take permits from a
//! single FIFO semaphore: a shared operation takes one, an exclusive operation
//! takes all of them. Since the semaphore hands out permits in request order,
//! a waiting exclusive operation also holds back every shared operation queued
//! after it.

use tokio::sync::{Semaphore, SemaphorePermit};

/// Upper bound on concurrently admitted shared operations.
const PERMITS: u32 = 1 << 20;

#[derive(Debug)]
pub(crate) struct Gate {
    semaphore: Semaphore,
}

impl Gate {
    pub(crate) fn new() -> Self {
        Self {
            semaphore: Semaphore::new(PERMITS as usize),
        }
    }

    /// Waits for admission of a shared operation.
    pub(crate) async fn shared(&self) -> SemaphorePermit<'_> {
        self.semaphore
            .acquire()
            .await
            .expect("gate semaphore is never closed")
    }

    /// Waits until no other operation is admitted.
    pub(crate) async fn exclusive(&self) -> SemaphorePermit<'_> {
        self.semaphore
            .acquire_many(PERMITS)
            .await
            .expect("gate semaphore is never closed")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::Gate;

    const SHORT: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn shared_operations_overlap() {
        let gate = Gate::new();
        let _a = gate.shared().await;
        let _b = timeout(SHORT, gate.shared()).await.unwrap();
    }

    #[tokio::test]
    async fn exclusive_waits_for_shared() {
        let gate = Gate::new();
        let shared = gate.shared().await;
        let exclusive = gate.exclusive();
        tokio::pin!(exclusive);
        assert!(timeout(SHORT, &mut exclusive).await.is_err());
        drop(shared);
        let _permit = timeout(SHORT, exclusive).await.unwrap();
    }

    #[tokio::test]
    async fn exclusive_excludes_everything() {
        let gate = Gate::new();
        let exclusive = gate.exclusive().await;
        assert!(timeout(SHORT, gate.shared()).await.is_err());
        assert!(timeout(SHORT, gate.exclusive()).await.is_err());
        drop(exclusive);
        let _permit = timeout(SHORT, gate.shared()).await.unwrap();
    }

    #[tokio::test]
    async fn pending_exclusive_holds_back_later_shared() {
        let gate = Gate::new();
        let first = gate.shared().await;
        let exclusive = gate.exclusive();
        tokio::pin!(exclusive);
        assert!(timeout(SHORT, &mut exclusive).await.is_err());

        let later = gate.shared();
        tokio::pin!(later);
        assert!(timeout(SHORT, &mut later).await.is_err());

        drop(first);
        let permit = timeout(SHORT, exclusive).await.unwrap();
        assert!(timeout(SHORT, &mut later).await.is_err());
        drop(permit);
        let _permit = timeout(SHORT, later).await.unwrap();
    }
}
