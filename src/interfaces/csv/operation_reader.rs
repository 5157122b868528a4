use crate::domain::book::BookId;
use crate::error::{LibraryError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    AddBook,
    Catalog,
    Borrow,
    Return,
    LateFee,
    PayFees,
    Refund,
    Verify,
    Search,
    Report,
}

/// One row of an operation journal.
///
/// Columns an operation does not use are left empty.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub op: OperationType,
    pub patron: Option<String>,
    pub book: Option<BookId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub copies: Option<i64>,
    pub query: Option<String>,
    pub by: Option<String>,
    pub txn: Option<String>,
    pub amount: Option<Decimal>,
    /// When the operation happened. Empty means "now".
    #[serde(default, deserialize_with = "deserialize_at")]
    pub at: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_at(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| format!("invalid timestamp: {raw}"))
}

fn deserialize_at<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.filter(|s| !s.is_empty())
        .map(|s| parse_at(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// A journal row together with its line number (the header is line 1).
#[derive(Debug, PartialEq, Clone)]
pub struct JournalEntry {
    pub line: u64,
    pub operation: Operation,
}

/// Reads operations from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and tolerating short rows.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes the journal, one entry per data row.
    pub fn operations(self) -> impl Iterator<Item = Result<JournalEntry>> {
        self.reader
            .into_deserialize()
            .enumerate()
            .map(|(index, result)| {
                result
                    .map(|operation| JournalEntry {
                        line: index as u64 + 2,
                        operation,
                    })
                    .map_err(LibraryError::from)
            })
    }
}
