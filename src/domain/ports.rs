use super::book::{Book, BookId, NewBook};
use super::borrow::BorrowRecord;
use super::patron::PatronId;
use super::payment::{ChargeResponse, PaymentStatus, RefundResponse};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Persists books and their copy counts.
///
/// Mutating calls return `Ok(false)` when the store rejects the write and
/// `Err` when the backend itself fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn get_book_by_id(&self, id: BookId) -> Result<Option<Book>>;
    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;
    /// All books, ordered by id.
    async fn get_all_books(&self) -> Result<Vec<Book>>;
    /// Stores a new book with every copy available. Rejects a duplicate isbn.
    async fn insert_book(&self, book: NewBook) -> Result<bool>;
    /// Adds `delta` to the available copies. Rejects a change that would
    /// leave `0..=total_copies`, or an unknown id.
    async fn update_book_availability(&self, id: BookId, delta: i32) -> Result<bool>;
}

/// Persists borrow records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowLedger: Send + Sync {
    /// Number of active loans held by the patron.
    async fn get_patron_borrow_count(&self, patron_id: &PatronId) -> Result<usize>;
    /// Active loans held by the patron, oldest first.
    async fn get_patron_borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<BorrowRecord>>;
    /// Rejects a record when the patron already has an active loan of the same book.
    async fn insert_borrow_record(&self, record: BorrowRecord) -> Result<bool>;
    async fn update_borrow_record_return_date(
        &self,
        patron_id: &PatronId,
        book_id: BookId,
        return_date: DateTime<Utc>,
    ) -> Result<bool>;
    /// Deletes the active record for the pair. Only used to undo a borrow
    /// whose availability update failed.
    async fn remove_borrow_record(&self, patron_id: &PatronId, book_id: BookId) -> Result<bool>;
}

/// A payment processor.
///
/// `Err` means the gateway could not be reached or did not answer; a
/// declined request is an `Ok` response with `success == false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> std::result::Result<ChargeResponse, GatewayError>;
    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> std::result::Result<RefundResponse, GatewayError>;
    async fn verify_payment_status(
        &self,
        transaction_id: &str,
    ) -> std::result::Result<PaymentStatus, GatewayError>;
}

/// Source of "now" for due dates and fees.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type BookStoreBox = Box<dyn BookStore>;
pub type BorrowLedgerBox = Box<dyn BorrowLedger>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type ClockRef = Arc<dyn Clock>;
