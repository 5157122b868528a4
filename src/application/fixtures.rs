use super::library::Library;
use crate::domain::book::{Book, BookId, NewBook};
use crate::domain::borrow::BorrowRecord;
use crate::domain::patron::PatronId;
use crate::domain::ports::{BookStore, BorrowLedger, MockBookStore, MockBorrowLedger};
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::in_memory::{InMemoryBookStore, InMemoryBorrowLedger};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

pub const PATRON: &str = "123456";

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

pub fn patron() -> PatronId {
    PatronId::parse(PATRON).unwrap()
}

pub fn book(id: BookId, title: &str, available: u32, total: u32) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: "Author".to_string(),
        isbn: format!("{:013}", id),
        total_copies: total,
        available_copies: available,
    }
}

/// An active loan of `book_id` that fell due `days_late` days before [`start`].
pub fn overdue_record(book_id: BookId, days_late: i64) -> BorrowRecord {
    let borrowed = start() - Duration::days(14 + days_late);
    BorrowRecord::new(patron(), book_id, borrowed)
}

pub fn mocked(books: MockBookStore, ledger: MockBorrowLedger) -> Library {
    Library::new(
        Box::new(books),
        Box::new(ledger),
        Arc::new(ManualClock::new(start())),
    )
}

pub struct InMemoryLibrary {
    pub library: Library,
    pub books: InMemoryBookStore,
    pub ledger: InMemoryBorrowLedger,
    pub clock: ManualClock,
}

pub fn in_memory() -> InMemoryLibrary {
    let books = InMemoryBookStore::new();
    let ledger = InMemoryBorrowLedger::new();
    let clock = ManualClock::new(start());
    let library = Library::new(
        Box::new(books.clone()),
        Box::new(ledger.clone()),
        Arc::new(clock.clone()),
    );
    InMemoryLibrary {
        library,
        books,
        ledger,
        clock,
    }
}

impl InMemoryLibrary {
    /// Adds a book straight to the store and returns its id.
    pub async fn shelve(&self, title: &str, isbn: &str, copies: i64) -> BookId {
        let new_book = NewBook::new(title, "Author", isbn, copies).unwrap();
        assert!(self.books.insert_book(new_book).await.unwrap());
        self.books.get_book_by_isbn(isbn).await.unwrap().unwrap().id
    }

    pub async fn record(&self, record: BorrowRecord) {
        assert!(self.ledger.insert_borrow_record(record).await.unwrap());
    }
}
