//! In-memory persistent byte store.
//!
//! Models the keeper's credential EEPROM: an addressed cell array where
//! every operation takes a settle delay before the next one may safely
//! run. The delay defaults to the real part's 20ms and is configurable so
//! tests can shrink it.

use crate::{HardwareError, Result, traits::PersistentStore};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Default cell count.
const DEFAULT_SIZE: usize = 256;

/// Default settle delay between operations.
const DEFAULT_SETTLE: Duration = Duration::from_millis(20);

#[derive(Debug)]
struct Inner {
    cells: Vec<u8>,
    writes: usize,
    reads: usize,
}

/// Mock persistent store device.
#[derive(Debug)]
pub struct MockStore {
    inner: Arc<Mutex<Inner>>,
    settle: Duration,
}

impl MockStore {
    /// Create a store with the default size and settle delay, plus its
    /// observation handle.
    pub fn new() -> (Self, MockStoreHandle) {
        Self::with_size(DEFAULT_SIZE)
    }

    /// Create a store with a specific cell count.
    pub fn with_size(size: usize) -> (Self, MockStoreHandle) {
        let inner = Arc::new(Mutex::new(Inner {
            cells: vec![0u8; size],
            writes: 0,
            reads: 0,
        }));
        (
            MockStore {
                inner: Arc::clone(&inner),
                settle: DEFAULT_SETTLE,
            },
            MockStoreHandle { inner },
        )
    }

    /// Override the settle delay (tests shrink it to keep suites fast).
    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    fn check_addr(&self, addr: u16) -> Result<usize> {
        let size = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cells
            .len();
        let index = addr as usize;
        if index >= size {
            return Err(HardwareError::AddressOutOfRange { addr, size });
        }
        Ok(index)
    }
}

impl PersistentStore for MockStore {
    async fn write_byte(&mut self, addr: u16, value: u8) -> Result<()> {
        let index = self.check_addr(addr)?;
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.cells[index] = value;
            inner.writes += 1;
        }
        tokio::time::sleep(self.settle).await;
        Ok(())
    }

    async fn read_byte(&mut self, addr: u16) -> Result<u8> {
        let index = self.check_addr(addr)?;
        let value = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.reads += 1;
            inner.cells[index]
        };
        tokio::time::sleep(self.settle).await;
        Ok(value)
    }
}

/// Handle for inspecting a [`MockStore`] from outside the keeper.
#[derive(Debug, Clone)]
pub struct MockStoreHandle {
    inner: Arc<Mutex<Inner>>,
}

impl MockStoreHandle {
    /// Snapshot of the whole cell array.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cells
            .clone()
    }

    /// Bytes at `addr..addr + len`.
    #[must_use]
    pub fn range(&self, addr: u16, len: usize) -> Vec<u8> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .cells
            .iter()
            .skip(addr as usize)
            .take(len)
            .copied()
            .collect()
    }

    /// Total write operations performed.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
    }

    /// Total read operations performed.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reads
    }
}
