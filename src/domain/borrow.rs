use super::book::BookId;
use super::patron::PatronId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days a patron may keep a book before it becomes overdue.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Maximum number of books a patron may hold at once.
pub const MAX_ACTIVE_LOANS: usize = 5;

/// One loan of one book to one patron.
///
/// The record is active until `return_date` is set.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct BorrowRecord {
    pub patron_id: PatronId,
    pub book_id: BookId,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    /// Opens a loan starting at `borrow_date` with the standard loan period.
    pub fn new(patron_id: PatronId, book_id: BookId, borrow_date: DateTime<Utc>) -> Self {
        Self {
            patron_id,
            book_id,
            borrow_date,
            due_date: borrow_date + Duration::days(LOAN_PERIOD_DAYS),
            return_date: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    pub fn is_for(&self, patron_id: &PatronId, book_id: BookId) -> bool {
        &self.patron_id == patron_id && self.book_id == book_id
    }
}
