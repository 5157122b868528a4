use crate::domain::ports::{BookStoreBox, BorrowLedgerBox, ClockRef};
use crate::error::{LibraryError, Result};
use crate::infrastructure::clock::SystemClock;
use std::sync::Arc;

/// The main entry point for library operations.
///
/// `Library` owns no state of its own. Books and loans live in the stores it
/// is built with, and every operation is a sequence of calls against them.
/// The stores serialize their own read-modify-write steps; `Library` relies
/// on that rather than locking.
pub struct Library {
    pub(crate) books: BookStoreBox,
    pub(crate) ledger: BorrowLedgerBox,
    pub(crate) clock: ClockRef,
}

impl Library {
    /// Creates a new `Library`.
    ///
    /// # Arguments
    ///
    /// * `books` - The catalog store.
    /// * `ledger` - The borrow ledger.
    /// * `clock` - Source of "now" for due dates and late fees.
    pub fn new(books: BookStoreBox, ledger: BorrowLedgerBox, clock: ClockRef) -> Self {
        Self {
            books,
            ledger,
            clock,
        }
    }

    /// Creates a `Library` that reads wall-clock time.
    pub fn with_system_clock(books: BookStoreBox, ledger: BorrowLedgerBox) -> Self {
        Self::new(books, ledger, Arc::new(SystemClock))
    }
}

/// Turns the outcome of a store write into `StoreError(operation)` unless the
/// store accepted it.
pub(crate) fn ensure_written(result: Result<bool>, operation: &'static str) -> Result<()> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::warn!(operation, "Store rejected write");
            Err(LibraryError::StoreError(operation))
        }
        Err(e) => {
            tracing::error!(operation, error = %e, "Store write failed");
            Err(LibraryError::StoreError(operation))
        }
    }
}
