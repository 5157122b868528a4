use crate::domain::book::{Book, BookId, NewBook};
use crate::domain::borrow::BorrowRecord;
use crate::domain::patron::PatronId;
use crate::domain::ports::{BookStore, BorrowLedger};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Catalog {
    books: BTreeMap<BookId, Book>,
    next_id: BookId,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            books: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// A thread-safe in-memory book store.
///
/// Ids are assigned sequentially from 1. Every check-then-write runs under a
/// single write guard, so availability can never leave `0..=total_copies`.
#[derive(Default, Clone)]
pub struct InMemoryBookStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryBookStore {
    /// Creates a new, empty in-memory book store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn get_book_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.books.get(&id).cloned())
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn get_all_books(&self) -> Result<Vec<Book>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.books.values().cloned().collect())
    }

    async fn insert_book(&self, book: NewBook) -> Result<bool> {
        let mut catalog = self.catalog.write().await;
        if catalog.books.values().any(|b| b.isbn == book.isbn) {
            return Ok(false);
        }
        let id = catalog.next_id;
        catalog.next_id += 1;
        catalog.books.insert(id, book.into_book(id));
        Ok(true)
    }

    async fn update_book_availability(&self, id: BookId, delta: i32) -> Result<bool> {
        let mut catalog = self.catalog.write().await;
        match catalog.books.get_mut(&id) {
            Some(book) => Ok(book.adjust_availability(delta).is_ok()),
            None => Ok(false),
        }
    }
}

/// A thread-safe in-memory borrow ledger.
///
/// Keeps returned records as well as active ones, in insertion order.
#[derive(Default, Clone)]
pub struct InMemoryBorrowLedger {
    records: Arc<RwLock<Vec<BorrowRecord>>>,
}

impl InMemoryBorrowLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record ever inserted, returned or not.
    pub async fn all_records(&self) -> Vec<BorrowRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl BorrowLedger for InMemoryBorrowLedger {
    async fn get_patron_borrow_count(&self, patron_id: &PatronId) -> Result<usize> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.is_active() && &r.patron_id == patron_id)
            .count())
    }

    async fn get_patron_borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<BorrowRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.is_active() && &r.patron_id == patron_id)
            .cloned()
            .collect())
    }

    async fn insert_borrow_record(&self, record: BorrowRecord) -> Result<bool> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.is_active() && r.is_for(&record.patron_id, record.book_id))
        {
            return Ok(false);
        }
        records.push(record);
        Ok(true)
    }

    async fn update_borrow_record_return_date(
        &self,
        patron_id: &PatronId,
        book_id: BookId,
        return_date: DateTime<Utc>,
    ) -> Result<bool> {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.is_active() && r.is_for(patron_id, book_id))
        {
            Some(record) => {
                record.return_date = Some(return_date);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_borrow_record(&self, patron_id: &PatronId, book_id: BookId) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !(r.is_active() && r.is_for(patron_id, book_id)));
        Ok(records.len() < before)
    }
}
