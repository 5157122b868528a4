use super::patron::{PatronId, is_patron_id};
use crate::error::LibraryError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TRANSACTION_PREFIX: &str = "txn";

/// Identifier of a completed charge: `txn_<patron id>_<unix timestamp>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(patron_id: &PatronId, issued_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{TRANSACTION_PREFIX}_{patron_id}_{}",
            issued_at.timestamp()
        ))
    }

    pub fn parse(raw: &str) -> Result<Self, LibraryError> {
        if is_transaction_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(LibraryError::InvalidTransactionId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true when `raw` has the shape of an id issued by the gateway.
pub fn is_transaction_id(raw: &str) -> bool {
    let mut parts = raw.split('_');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(patron), Some(timestamp), None) => {
            prefix == TRANSACTION_PREFIX
                && is_patron_id(patron)
                && !timestamp.is_empty()
                && timestamp.bytes().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

impl TryFrom<String> for TransactionId {
    type Error = LibraryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gateway answer to a charge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeResponse {
    pub success: bool,
    /// Present only when the charge went through.
    pub transaction_id: Option<TransactionId>,
    pub message: String,
}

impl ChargeResponse {
    pub fn approved(transaction_id: TransactionId, message: impl Into<String>) -> Self {
        Self {
            success: true,
            transaction_id: Some(transaction_id),
            message: message.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: None,
            message: message.into(),
        }
    }
}

/// Gateway answer to a refund request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResponse {
    pub success: bool,
    pub message: String,
}

/// Gateway view of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed {
        transaction_id: TransactionId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    },
    NotFound {
        message: String,
    },
}

impl PaymentStatus {
    pub fn status(&self) -> &'static str {
        match self {
            PaymentStatus::Completed { .. } => "completed",
            PaymentStatus::NotFound { .. } => "not_found",
        }
    }
}
