use super::library::{Library, ensure_written};
use crate::domain::book::{Book, NewBook};
use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confirmation that a book entered the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookAdded {
    pub title: String,
}

impl fmt::Display for BookAdded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book \"{}\" has been successfully added to the catalog.",
            self.title
        )
    }
}

/// Catalog field a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Case-insensitive substring match.
    Title,
    /// Case-insensitive substring match.
    Author,
    /// Exact match.
    Isbn,
}

impl FromStr for SearchType {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(SearchType::Title),
            "author" => Ok(SearchType::Author),
            "isbn" => Ok(SearchType::Isbn),
            other => Err(LibraryError::ValidationError(format!(
                "Unknown search type: {other}"
            ))),
        }
    }
}

impl SearchType {
    fn matches(&self, book: &Book, term: &str) -> bool {
        match self {
            SearchType::Title => book.title.to_lowercase().contains(term),
            SearchType::Author => book.author.to_lowercase().contains(term),
            SearchType::Isbn => book.isbn == term,
        }
    }
}

impl Library {
    /// Adds a new book to the catalog with every copy available.
    ///
    /// # Errors
    ///
    /// * `ValidationError` for malformed input, see [`NewBook::new`].
    /// * `DuplicateIsbn` if the isbn is already catalogued.
    /// * `StoreError` if the store rejects the insert.
    pub async fn add_book(
        &self,
        title: &str,
        author: &str,
        isbn: &str,
        total_copies: i64,
    ) -> Result<BookAdded> {
        let new_book = NewBook::new(title, author, isbn, total_copies)?;

        if self.books.get_book_by_isbn(&new_book.isbn).await?.is_some() {
            return Err(LibraryError::DuplicateIsbn);
        }

        let title = new_book.title.clone();
        let isbn = new_book.isbn.clone();
        ensure_written(self.books.insert_book(new_book).await, "adding the book")?;

        tracing::info!(%isbn, %title, "Book added to catalog");
        Ok(BookAdded { title })
    }

    /// Every book in the catalog, ordered by id.
    pub async fn catalog(&self) -> Result<Vec<Book>> {
        self.books.get_all_books().await
    }

    /// Searches the catalog.
    ///
    /// `search_type` is one of `title`, `author` or `isbn`. A blank term or
    /// an unknown type yields no results rather than an error.
    pub async fn search_catalog(&self, term: &str, search_type: &str) -> Result<Vec<Book>> {
        let Ok(search_type) = search_type.parse::<SearchType>() else {
            tracing::debug!(search_type, "Ignoring search with unknown type");
            return Ok(Vec::new());
        };
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let term = match search_type {
            SearchType::Isbn => term.to_string(),
            SearchType::Title | SearchType::Author => term.to_lowercase(),
        };

        Ok(self
            .books
            .get_all_books()
            .await?
            .into_iter()
            .filter(|book| search_type.matches(book, &term))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{self, book};
    use super::*;
    use crate::domain::ports::{MockBookStore, MockBorrowLedger};

    #[tokio::test]
    async fn test_add_book_success() {
        let lib = fixtures::in_memory();
        let added = lib
            .library
            .add_book("  Test Book ", "Test Author", "1234567890123", 5)
            .await
            .unwrap();
        assert_eq!(
            added.to_string(),
            "Book \"Test Book\" has been successfully added to the catalog."
        );

        let catalog = lib.library.catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].isbn, "1234567890123");
        assert_eq!(catalog[0].title, "Test Book");
        assert_eq!(catalog[0].available_copies, 5);
    }

    #[tokio::test]
    async fn test_add_book_duplicate_isbn() {
        let lib = fixtures::in_memory();
        lib.library
            .add_book("First", "Author", "1234567890123", 1)
            .await
            .unwrap();
        let err = lib
            .library
            .add_book("Second", "Author", "1234567890123", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateIsbn));
        assert!(err.to_string().to_lowercase().contains("isbn"));
    }

    #[tokio::test]
    async fn test_add_book_validation_skips_store() {
        // No expectations: any store call would panic.
        let library = fixtures::mocked(MockBookStore::new(), MockBorrowLedger::new());
        let err = library
            .add_book("Title", "Author", "123456789012", 1)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "ISBN must be exactly 13 digits.");
    }

    #[tokio::test]
    async fn test_add_book_insert_failure() {
        let mut books = MockBookStore::new();
        books.expect_get_book_by_isbn().returning(|_| Ok(None));
        books.expect_insert_book().times(1).returning(|_| Ok(false));

        let library = fixtures::mocked(books, MockBorrowLedger::new());
        let err = library
            .add_book("DB Err", "A", "3213213213213", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::StoreError(_)));
        assert!(err.to_string().to_lowercase().contains("database error"));
    }

    fn search_library() -> Library {
        let mut books = MockBookStore::new();
        books.expect_get_all_books().returning(|| {
            let mut python = book(41, "Python 101", 3, 3);
            python.author = "Martin Fowler".to_string();
            python.isbn = "9780132350884".to_string();
            let mut other = book(42, "Other", 1, 1);
            other.author = "Someone Else".to_string();
            other.isbn = "1111111111111".to_string();
            Ok(vec![python, other])
        });
        fixtures::mocked(books, MockBorrowLedger::new())
    }

    #[tokio::test]
    async fn test_search_by_title_is_case_insensitive() {
        let library = search_library();
        let results = library.search_catalog("python", "title").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Python 101");

        let results = library.search_catalog("PYTHON", "title").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_author() {
        let results = search_library()
            .search_catalog("fowler", "author")
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].author, "Martin Fowler");
    }

    #[tokio::test]
    async fn test_search_by_isbn_is_exact() {
        let library = search_library();
        let results = library
            .search_catalog("9780132350884", "isbn")
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 41);

        assert!(library.search_catalog("978013235", "isbn").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_degenerate_input_is_empty() {
        // No store expectations: these must return before reading the catalog.
        let library = fixtures::mocked(MockBookStore::new(), MockBorrowLedger::new());
        assert!(library.search_catalog("   ", "title").await.unwrap().is_empty());
        assert!(library.search_catalog("Python", "genre").await.unwrap().is_empty());
        assert!(library.search_catalog("Python", "Title").await.unwrap().is_empty());

        assert!(
            search_library()
                .search_catalog("Nothing", "title")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
