//! Replays journal rows against a [`Library`].
//!
//! Every row produces exactly one [`Outcome`]. Failures are reported in the
//! outcome, never returned, so one bad row cannot stop a replay.

use super::csv::operation_reader::{JournalEntry, Operation, OperationType};
use super::csv::outcome_writer::Outcome;
use crate::application::Library;
use crate::domain::book::BookId;
use crate::domain::fee::AssessmentStatus;
use crate::domain::ports::PaymentGatewayBox;
use crate::error::{LibraryError, Result};
use crate::infrastructure::clock::ManualClock;
use chrono::Utc;
use serde::Serialize;

struct Applied {
    message: String,
    detail: Option<String>,
}

impl Applied {
    fn message(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
        }
    }

    fn with_detail(message: impl ToString, detail: String) -> Self {
        Self {
            message: message.to_string(),
            detail: Some(detail),
        }
    }
}

pub struct Journal {
    library: Library,
    gateway: PaymentGatewayBox,
    clock: ManualClock,
}

impl Journal {
    /// `clock` must be the clock `library` was built with; each row moves it
    /// to the row's `at` before running.
    pub fn new(library: Library, gateway: PaymentGatewayBox, clock: ManualClock) -> Self {
        Self {
            library,
            gateway,
            clock,
        }
    }

    pub async fn apply(&self, entry: JournalEntry) -> Outcome {
        let JournalEntry { line, operation } = entry;
        self.clock.set(operation.at.unwrap_or_else(Utc::now));

        match self.run(&operation).await {
            Ok(applied) => Outcome {
                line,
                op: operation.op,
                success: true,
                kind: None,
                message: applied.message,
                detail: applied.detail,
            },
            Err(e) => {
                tracing::info!(line, op = ?operation.op, error = %e, "Operation failed");
                Outcome {
                    line,
                    op: operation.op,
                    success: false,
                    kind: Some(e.kind()),
                    message: e.to_string(),
                    detail: None,
                }
            }
        }
    }

    async fn run(&self, op: &Operation) -> Result<Applied> {
        let library = &self.library;
        let gateway = self.gateway.as_ref();
        let patron = op.patron.as_deref().unwrap_or_default();

        match op.op {
            OperationType::AddBook => {
                let added = library
                    .add_book(
                        op.title.as_deref().unwrap_or_default(),
                        op.author.as_deref().unwrap_or_default(),
                        op.isbn.as_deref().unwrap_or_default(),
                        op.copies.unwrap_or_default(),
                    )
                    .await?;
                Ok(Applied::message(added))
            }
            OperationType::Catalog => {
                let books = library.catalog().await?;
                Ok(Applied::with_detail(
                    format!("{} book(s) in the catalog.", books.len()),
                    json(&books)?,
                ))
            }
            OperationType::Borrow => {
                let loan = library.borrow_book(patron, book_id(op)?).await?;
                Ok(Applied::message(loan))
            }
            OperationType::Return => {
                let returned = library.return_book(patron, book_id(op)?).await?;
                let detail = json(&returned.late_fee)?;
                Ok(Applied::with_detail(returned, detail))
            }
            OperationType::LateFee => {
                let assessment = library.calculate_late_fee(patron, book_id(op)?).await?;
                match assessment.status {
                    AssessmentStatus::Ok => Ok(Applied::with_detail(
                        format!(
                            "Late fee: ${:.2} for {} overdue day(s).",
                            assessment.fee_amount, assessment.days_overdue
                        ),
                        json(&assessment)?,
                    )),
                    AssessmentStatus::InvalidPatronId => Err(LibraryError::InvalidPatronId),
                    AssessmentStatus::RecordNotFound => Err(LibraryError::NoActiveRecord),
                }
            }
            OperationType::PayFees => {
                let receipt = library
                    .pay_late_fees(patron, book_id(op)?, gateway)
                    .await?;
                let detail = receipt.transaction_id.to_string();
                Ok(Applied::with_detail(receipt, detail))
            }
            OperationType::Refund => {
                let amount = op.amount.ok_or_else(|| missing("amount"))?;
                let message = library
                    .refund_late_fee_payment(op.txn.as_deref().unwrap_or_default(), amount, gateway)
                    .await?;
                Ok(Applied::message(message))
            }
            OperationType::Verify => {
                let status = library
                    .verify_payment(op.txn.as_deref().unwrap_or_default(), gateway)
                    .await?;
                Ok(Applied::with_detail(status.status(), json(&status)?))
            }
            OperationType::Search => {
                let hits = library
                    .search_catalog(
                        op.query.as_deref().unwrap_or_default(),
                        op.by.as_deref().unwrap_or_default(),
                    )
                    .await?;
                Ok(Applied::with_detail(
                    format!("{} book(s) found.", hits.len()),
                    json(&hits)?,
                ))
            }
            OperationType::Report => {
                let report = library.patron_status_report(patron).await?;
                let message = match &report.status {
                    Some(status) => status.clone(),
                    None => format!(
                        "{} book(s) borrowed. Total late fees: ${:.2}.",
                        report.num_currently_borrowed, report.total_late_fees
                    ),
                };
                Ok(Applied::with_detail(message, json(&report)?))
            }
        }
    }
}

fn missing(column: &str) -> LibraryError {
    LibraryError::ValidationError(format!("Missing required column: {column}"))
}

fn book_id(op: &Operation) -> Result<BookId> {
    op.book.ok_or_else(|| missing("book"))
}

fn json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| LibraryError::InternalError(Box::new(e)))
}
