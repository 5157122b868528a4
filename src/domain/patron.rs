use crate::error::LibraryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a library card number.
pub const PATRON_ID_LEN: usize = 6;

/// A library card number: exactly six ASCII digits.
///
/// Construction always goes through [`PatronId::parse`], including when a
/// record is deserialized from storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatronId(String);

impl PatronId {
    pub fn parse(raw: &str) -> Result<Self, LibraryError> {
        if is_patron_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(LibraryError::InvalidPatronId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true when `raw` has the shape of a library card number.
pub fn is_patron_id(raw: &str) -> bool {
    raw.len() == PATRON_ID_LEN && raw.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<String> for PatronId {
    type Error = LibraryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PatronId> for String {
    fn from(id: PatronId) -> Self {
        id.0
    }
}

impl fmt::Display for PatronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
