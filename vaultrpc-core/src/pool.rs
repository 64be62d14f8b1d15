//! Connection pool module.
//!
//! Bounds the number of attempts in flight against one node. Each attempt
//! holds a [`PoolSlot`] for its duration; dropping the slot returns it,
//! whether the attempt finished, failed, timed out or was cancelled.
//!
//! # Example
//!
//! ```rust
//! use vaultrpc_core::pool::ConnectionPool;
//!
//! # async fn example() {
//! let pool = ConnectionPool::new(10);
//! let slot = pool.acquire().await.unwrap();
//! assert_eq!(pool.available(), 9);
//! drop(slot);
//! assert_eq!(pool.available(), 10);
//! # }
//! ```

use crate::error::{TransportError, TransportErrorKind};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

/// Default number of concurrent slots.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Bounded pool of request slots, shared between dispatches.
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl ConnectionPool {
    /// Creates a pool with `size` slots. A size of zero is raised to one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Waits for a free slot.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportErrorKind::PoolClosed`] error once the pool has
    /// been closed.
    pub async fn acquire(&self) -> Result<PoolSlot, TransportError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| {
                TransportError::new(TransportErrorKind::PoolClosed, "connection pool is closed")
            })?;
        trace!(available = self.available(), "Pool slot acquired");
        Ok(PoolSlot { _permit: permit })
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Total number of slots.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Closes the pool. Pending and future acquisitions fail; held slots stay valid.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }
}

impl Default for ConnectionPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

/// A held pool slot, released on drop.
#[derive(Debug)]
pub struct PoolSlot {
    _permit: OwnedSemaphorePermit,
}
