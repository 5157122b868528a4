use super::library::{Library, ensure_written};
use crate::domain::book::BookId;
use crate::domain::borrow::{BorrowRecord, MAX_ACTIVE_LOANS};
use crate::domain::fee::{AssessmentStatus, FeeAssessment, LateFee};
use crate::domain::patron::PatronId;
use crate::error::{LibraryError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A loan that was just granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    pub book_id: BookId,
    pub title: String,
    pub due_date: DateTime<Utc>,
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully borrowed \"{}\". Due date: {}.",
            self.title,
            self.due_date.format("%Y-%m-%d")
        )
    }
}

/// A book that was just handed back, with whatever it cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookReturned {
    pub book_id: BookId,
    pub title: String,
    pub late_fee: LateFee,
}

impl fmt::Display for BookReturned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.late_fee.is_due() {
            write!(
                f,
                "Book \"{}\" returned. Your late fee is: ${:.2} for {} overdue day(s).",
                self.title, self.late_fee.amount, self.late_fee.days_overdue
            )
        } else {
            write!(
                f,
                "Book \"{}\" returned on time. No late fees applied.",
                self.title
            )
        }
    }
}

impl Library {
    /// Lends a book to a patron.
    ///
    /// The ledger insert and the availability decrement are two writes. If
    /// the decrement fails, the inserted record is removed again before the
    /// `StoreError` is returned.
    pub async fn borrow_book(&self, patron_id: &str, book_id: BookId) -> Result<Loan> {
        let patron = PatronId::parse(patron_id)?;

        let book = self
            .books
            .get_book_by_id(book_id)
            .await?
            .ok_or(LibraryError::BookNotFound)?;

        if !book.is_available() {
            return Err(LibraryError::Unavailable);
        }

        let active_loans = self.ledger.get_patron_borrow_count(&patron).await?;
        if active_loans >= MAX_ACTIVE_LOANS {
            return Err(LibraryError::LimitExceeded(MAX_ACTIVE_LOANS));
        }

        let record = BorrowRecord::new(patron.clone(), book_id, self.clock.now());
        let due_date = record.due_date;
        ensure_written(
            self.ledger.insert_borrow_record(record).await,
            "creating borrow record",
        )?;

        if let Err(e) = ensure_written(
            self.books.update_book_availability(book_id, -1).await,
            "updating book availability",
        ) {
            self.undo_borrow_record(&patron, book_id).await;
            return Err(e);
        }

        tracing::info!(%patron, book_id, due_date = %due_date.format("%Y-%m-%d"), "Book borrowed");
        Ok(Loan {
            book_id,
            title: book.title,
            due_date,
        })
    }

    async fn undo_borrow_record(&self, patron: &PatronId, book_id: BookId) {
        match self.ledger.remove_borrow_record(patron, book_id).await {
            Ok(true) => tracing::warn!(%patron, book_id, "Rolled back borrow record"),
            Ok(false) => {
                tracing::error!(%patron, book_id, "Borrow record to roll back was not found")
            }
            Err(e) => {
                tracing::error!(%patron, book_id, error = %e, "Failed to roll back borrow record")
            }
        }
    }

    /// Takes a book back from a patron and reports any late fee.
    ///
    /// Overdue books are always accepted; the fee is reported, not collected.
    /// Availability is only incremented while it is below the total.
    pub async fn return_book(&self, patron_id: &str, book_id: BookId) -> Result<BookReturned> {
        let patron = PatronId::parse(patron_id)?;

        let book = self
            .books
            .get_book_by_id(book_id)
            .await?
            .ok_or(LibraryError::BookNotFound)?;

        let record = self
            .ledger
            .get_patron_borrowed_books(&patron)
            .await?
            .into_iter()
            .find(|r| r.book_id == book_id)
            .ok_or(LibraryError::NoActiveRecord)?;

        let now = self.clock.now();
        let late_fee = LateFee::assess(record.due_date, now);

        ensure_written(
            self.ledger
                .update_borrow_record_return_date(&patron, book_id, now)
                .await,
            "recording the return",
        )?;

        if book.available_copies < book.total_copies {
            ensure_written(
                self.books.update_book_availability(book_id, 1).await,
                "updating book availability",
            )?;
        } else {
            tracing::warn!(book_id, "All copies already on the shelf; availability left as is");
        }

        tracing::info!(
            %patron,
            book_id,
            days_overdue = late_fee.days_overdue,
            fee = %late_fee.amount,
            "Book returned"
        );
        Ok(BookReturned {
            book_id,
            title: book.title,
            late_fee,
        })
    }

    /// Looks up the late fee a patron currently owes for one book.
    ///
    /// Never fails on bad input: an invalid patron id or a missing loan
    /// yields a zero assessment whose status says why. Only store failures
    /// are returned as errors.
    pub async fn calculate_late_fee(&self, patron_id: &str, book_id: BookId) -> Result<FeeAssessment> {
        let Ok(patron) = PatronId::parse(patron_id) else {
            return Ok(FeeAssessment::unavailable(AssessmentStatus::InvalidPatronId));
        };

        let record = self
            .ledger
            .get_patron_borrowed_books(&patron)
            .await?
            .into_iter()
            .find(|r| r.book_id == book_id);

        Ok(match record {
            Some(record) => {
                FeeAssessment::assessed(LateFee::assess(record.due_date, self.clock.now()))
            }
            None => FeeAssessment::unavailable(AssessmentStatus::RecordNotFound),
        })
    }
}
