use serde::Serialize;
use thiserror::Error;

/// Errors produced by the library workflows and their storage backends.
///
/// The `Display` output of each workflow variant is the message shown to the
/// patron or librarian.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{0}")]
    ValidationError(String),
    #[error("A book with this ISBN already exists.")]
    DuplicateIsbn,
    #[error("Invalid patron ID. Must be exactly 6 digits.")]
    InvalidPatronId,
    #[error("Book not found.")]
    BookNotFound,
    #[error("This book is currently not available.")]
    Unavailable,
    #[error("You have reached the maximum borrowing limit of {0} books.")]
    LimitExceeded(usize),
    #[error("No borrow record found for this patron and book.")]
    NoActiveRecord,
    #[error("No late fees to pay for this book.")]
    NoFeeDue,
    #[error("Unable to calculate late fees.")]
    CalculationError,
    #[error("Invalid transaction ID.")]
    InvalidTransactionId,
    #[error("{0}")]
    InvalidAmount(String),
    #[error("Database error occurred while {0}.")]
    StoreError(&'static str),
    #[error("{0}")]
    GatewayError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse category of a [`LibraryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input. Never touches storage.
    Validation,
    NotFound,
    /// The request is well formed but the current state forbids it.
    State,
    Store,
    Gateway,
    Calculation,
    Internal,
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::ValidationError(_)
            | LibraryError::DuplicateIsbn
            | LibraryError::InvalidPatronId
            | LibraryError::InvalidTransactionId
            | LibraryError::InvalidAmount(_) => ErrorKind::Validation,
            LibraryError::BookNotFound => ErrorKind::NotFound,
            LibraryError::Unavailable
            | LibraryError::LimitExceeded(_)
            | LibraryError::NoActiveRecord
            | LibraryError::NoFeeDue => ErrorKind::State,
            LibraryError::StoreError(_) => ErrorKind::Store,
            LibraryError::GatewayError(_) => ErrorKind::Gateway,
            LibraryError::CalculationError => ErrorKind::Calculation,
            LibraryError::CsvError(_) | LibraryError::IoError(_) | LibraryError::InternalError(_) => {
                ErrorKind::Internal
            }
            #[cfg(feature = "storage-rocksdb")]
            LibraryError::StorageError(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        LibraryError::InternalError(Box::new(std::io::Error::other(message.into())))
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

/// Faults raised by a payment gateway before it could answer.
///
/// A declined charge is not a fault; it is reported through the gateway's
/// response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Gateway timed out")]
    Timeout,
}
