use super::library::Library;
use crate::domain::book::BookId;
use crate::domain::fee::LateFee;
use crate::domain::patron::PatronId;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// One active loan as it appears in a patron report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowedBook {
    pub book_id: BookId,
    /// `None` when the book has since left the catalog.
    pub title: Option<String>,
    pub author: Option<String>,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub is_overdue: bool,
    pub late_fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatronStatusReport {
    pub currently_borrowed: Vec<BorrowedBook>,
    /// Sum of the per-book fees. Each fee is capped on its own; the total is not.
    pub total_late_fees: Decimal,
    pub num_currently_borrowed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PatronStatusReport {
    fn invalid_patron() -> Self {
        Self {
            currently_borrowed: Vec::new(),
            total_late_fees: Decimal::ZERO,
            num_currently_borrowed: 0,
            status: Some("Invalid patron ID".to_string()),
        }
    }
}

impl Library {
    /// Summarizes a patron's active loans and what they currently owe.
    pub async fn patron_status_report(&self, patron_id: &str) -> Result<PatronStatusReport> {
        let Ok(patron) = PatronId::parse(patron_id) else {
            return Ok(PatronStatusReport::invalid_patron());
        };

        let records = self.ledger.get_patron_borrowed_books(&patron).await?;
        let now = self.clock.now();

        let mut currently_borrowed = Vec::with_capacity(records.len());
        for record in records {
            let book = self.books.get_book_by_id(record.book_id).await?;
            let fee = LateFee::assess(record.due_date, now);
            currently_borrowed.push(BorrowedBook {
                book_id: record.book_id,
                title: book.as_ref().map(|b| b.title.clone()),
                author: book.map(|b| b.author),
                borrow_date: record.borrow_date,
                due_date: record.due_date,
                is_overdue: fee.days_overdue > 0,
                late_fee: fee.amount,
            });
        }

        let total_late_fees: Decimal = currently_borrowed.iter().map(|b| b.late_fee).sum();
        tracing::debug!(%patron, loans = currently_borrowed.len(), %total_late_fees, "Patron report");
        Ok(PatronStatusReport {
            num_currently_borrowed: currently_borrowed.len(),
            currently_borrowed,
            total_late_fees,
            status: None,
        })
    }
}
