use crate::error::LibraryError;
use serde::{Deserialize, Serialize};

pub type BookId = u64;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;
pub const ISBN_LEN: usize = 13;

/// A catalog entry and its copy counts.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Book {
    /// Store-assigned identifier.
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// 13 ASCII digits, unique across the catalog.
    pub isbn: String,
    pub total_copies: u32,
    /// Always within `0..=total_copies`.
    pub available_copies: u32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Applies a copy-count change, refusing to leave `0..=total_copies`.
    pub fn adjust_availability(&mut self, delta: i32) -> Result<(), LibraryError> {
        let next = i64::from(self.available_copies) + i64::from(delta);
        if next < 0 || next > i64::from(self.total_copies) {
            return Err(LibraryError::ValidationError(format!(
                "Availability of book {} would leave 0..={}",
                self.id, self.total_copies
            )));
        }
        self.available_copies = next as u32;
        Ok(())
    }
}

/// A validated request to add a book to the catalog.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: u32,
}

impl NewBook {
    /// Validates catalog input.
    ///
    /// Checks run in a fixed order and the first failure wins: title blank,
    /// title length, author blank, author length, isbn format, copies.
    /// Title and author are stored trimmed.
    pub fn new(
        title: &str,
        author: &str,
        isbn: &str,
        total_copies: i64,
    ) -> Result<Self, LibraryError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(validation("Title is required."));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(validation("Title must be less than 200 characters."));
        }

        let author = author.trim();
        if author.is_empty() {
            return Err(validation("Author is required."));
        }
        if author.chars().count() > MAX_AUTHOR_LEN {
            return Err(validation("Author must be less than 100 characters."));
        }

        if !is_isbn(isbn) {
            return Err(validation("ISBN must be exactly 13 digits."));
        }

        let total_copies = u32::try_from(total_copies)
            .ok()
            .filter(|copies| *copies > 0)
            .ok_or_else(|| validation("Total copies must be a positive integer."))?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            total_copies,
        })
    }

    /// Materializes the entry with a store-assigned id and every copy on the shelf.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            total_copies: self.total_copies,
            available_copies: self.total_copies,
        }
    }
}

pub fn is_isbn(raw: &str) -> bool {
    raw.len() == ISBN_LEN && raw.bytes().all(|b| b.is_ascii_digit())
}

fn validation(message: &str) -> LibraryError {
    LibraryError::ValidationError(message.to_string())
}
