use crate::domain::book::{Book, BookId, NewBook};
use crate::domain::borrow::BorrowRecord;
use crate::domain::patron::PatronId;
use crate::domain::ports::{BookStore, BorrowLedger};
use crate::error::{LibraryError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for catalog entries, keyed by big-endian book id.
pub const CF_BOOKS: &str = "books";
/// Column Family for borrow records, keyed by patron id, book id and borrow time.
pub const CF_BORROWS: &str = "borrows";
/// Column Family for counters.
pub const CF_META: &str = "meta";

const NEXT_BOOK_ID: &[u8] = b"next_book_id";

/// A persistent store implementation using RocksDB.
///
/// Implements both `BookStore` and `BorrowLedger`. Values are JSON. Every
/// mutating operation holds `write_lock` for its whole read-check-write
/// sequence, so availability checks and the one-active-loan rule hold under
/// concurrent callers sharing a clone.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_BOOKS, CF_BORROWS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| LibraryError::internal(format!("{name} column family not found")))
    }

    fn load_book(&self, id: BookId) -> Result<Option<Book>> {
        let cf = self.cf(CF_BOOKS)?;
        self.db
            .get_cf(cf, id.to_be_bytes())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn load_books(&self) -> Result<Vec<Book>> {
        let cf = self.cf(CF_BOOKS)?;
        self.db
            .iterator_cf(cf, IteratorMode::Start)
            .map(|item| {
                let (_key, value) = item?;
                decode(&value)
            })
            .collect()
    }

    fn store_book(&self, book: &Book) -> Result<()> {
        let cf = self.cf(CF_BOOKS)?;
        self.db.put_cf(cf, book.id.to_be_bytes(), encode(book)?)?;
        Ok(())
    }

    fn next_book_id(&self) -> Result<BookId> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(cf, NEXT_BOOK_ID)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| LibraryError::internal("Corrupt book id sequence"))?;
                Ok(BookId::from_be_bytes(raw))
            }
            None => Ok(1),
        }
    }

    fn active_records(&self, patron_id: &PatronId) -> Result<Vec<BorrowRecord>> {
        let cf = self.cf(CF_BORROWS)?;
        let prefix = patron_id.as_str().as_bytes();
        let mut records = Vec::new();
        for item in self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            let record: BorrowRecord = decode(&value)?;
            if record.is_active() {
                records.push(record);
            }
        }
        records.sort_by_key(|r| r.borrow_date);
        Ok(records)
    }

    fn active_record(&self, patron_id: &PatronId, book_id: BookId) -> Result<Option<BorrowRecord>> {
        Ok(self
            .active_records(patron_id)?
            .into_iter()
            .find(|r| r.book_id == book_id))
    }
}

fn borrow_key(record: &BorrowRecord) -> Vec<u8> {
    let mut key = Vec::with_capacity(6 + 8 + 8);
    key.extend_from_slice(record.patron_id.as_str().as_bytes());
    key.extend_from_slice(&record.book_id.to_be_bytes());
    key.extend_from_slice(&record.borrow_date.timestamp_micros().to_be_bytes());
    key
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| LibraryError::InternalError(Box::new(e)))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| LibraryError::InternalError(Box::new(e)))
}

#[async_trait]
impl BookStore for RocksDBStore {
    async fn get_book_by_id(&self, id: BookId) -> Result<Option<Book>> {
        self.load_book(id)
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self.load_books()?.into_iter().find(|b| b.isbn == isbn))
    }

    async fn get_all_books(&self) -> Result<Vec<Book>> {
        self.load_books()
    }

    async fn insert_book(&self, book: NewBook) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self.load_books()?.iter().any(|b| b.isbn == book.isbn) {
            return Ok(false);
        }

        let id = self.next_book_id()?;
        let book = book.into_book(id);

        // Book and sequence land together or not at all.
        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_BOOKS)?, id.to_be_bytes(), encode(&book)?);
        batch.put_cf(self.cf(CF_META)?, NEXT_BOOK_ID, (id + 1).to_be_bytes());
        self.db.write(batch)?;
        Ok(true)
    }

    async fn update_book_availability(&self, id: BookId, delta: i32) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let Some(mut book) = self.load_book(id)? else {
            return Ok(false);
        };
        if book.adjust_availability(delta).is_err() {
            return Ok(false);
        }
        self.store_book(&book)?;
        Ok(true)
    }
}

#[async_trait]
impl BorrowLedger for RocksDBStore {
    async fn get_patron_borrow_count(&self, patron_id: &PatronId) -> Result<usize> {
        Ok(self.active_records(patron_id)?.len())
    }

    async fn get_patron_borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<BorrowRecord>> {
        self.active_records(patron_id)
    }

    async fn insert_borrow_record(&self, record: BorrowRecord) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self
            .active_record(&record.patron_id, record.book_id)?
            .is_some()
        {
            return Ok(false);
        }
        let cf = self.cf(CF_BORROWS)?;
        self.db.put_cf(cf, borrow_key(&record), encode(&record)?)?;
        Ok(true)
    }

    async fn update_borrow_record_return_date(
        &self,
        patron_id: &PatronId,
        book_id: BookId,
        return_date: DateTime<Utc>,
    ) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let Some(mut record) = self.active_record(patron_id, book_id)? else {
            return Ok(false);
        };
        record.return_date = Some(return_date);
        let cf = self.cf(CF_BORROWS)?;
        self.db.put_cf(cf, borrow_key(&record), encode(&record)?)?;
        Ok(true)
    }

    async fn remove_borrow_record(&self, patron_id: &PatronId, book_id: BookId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let Some(record) = self.active_record(patron_id, book_id)? else {
            return Ok(false);
        };
        let cf = self.cf(CF_BORROWS)?;
        self.db.delete_cf(cf, borrow_key(&record))?;
        Ok(true)
    }
}
