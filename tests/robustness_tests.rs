mod common;

use assert_cmd::prelude::*;
use common::{JournalBuilder, PATRON, library_cmd};
use predicates::prelude::*;

#[test]
fn test_malformed_rows_are_skipped() {
    let journal = JournalBuilder::new()
        .add_book("Dune", "9780441172719", 1, "2024-01-01")
        // Unknown operation
        .row("lend,123456,1,,,,,,,,,2024-01-01")
        // Book id is not a number
        .row("borrow,123456,one,,,,,,,,,2024-01-01")
        // Unparseable timestamp
        .row("borrow,123456,1,,,,,,,,,yesterday")
        .borrow(PATRON, 1, "2024-01-02")
        .write();

    library_cmd(&journal)
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading operation"))
        .stdout(predicate::str::contains("\n3,").not())
        .stdout(predicate::str::contains("\n4,").not())
        .stdout(predicate::str::contains("\n5,").not())
        .stdout(predicate::str::contains(
            "6,borrow,true,,\"Successfully borrowed \"\"Dune\"\". Due date: 2024-01-16.\",",
        ));
}

#[test]
fn test_invalid_input_reported_per_row() {
    let journal = JournalBuilder::new()
        .row("add_book,,,,Author,9780441172719,1,,,,,2024-01-01")
        .row("add_book,,,Dune,Author,978044117271X,1,,,,,2024-01-01")
        .row("add_book,,,Dune,Author,9780441172719,0,,,,,2024-01-01")
        .borrow("12345", 1, "2024-01-01")
        .row("borrow,123456,,,,,,,,,,2024-01-01")
        .row("search,,,,,,,Dune,genre,,,2024-01-01")
        .write();

    library_cmd(&journal)
        .assert()
        .success()
        .stdout(predicate::str::contains("2,add_book,false,validation,Title is required.,"))
        .stdout(predicate::str::contains(
            "3,add_book,false,validation,ISBN must be exactly 13 digits.,",
        ))
        .stdout(predicate::str::contains(
            "4,add_book,false,validation,Total copies must be a positive integer.,",
        ))
        .stdout(predicate::str::contains(
            "5,borrow,false,validation,Invalid patron ID. Must be exactly 6 digits.,",
        ))
        .stdout(predicate::str::contains(
            "6,borrow,false,validation,Missing required column: book,",
        ))
        .stdout(predicate::str::contains("7,search,true,,0 book(s) found.,[]"));
}

#[test]
fn test_json_logs() {
    let journal = JournalBuilder::new()
        .row("lend,123456,1,,,,,,,,,2024-01-01")
        .write();

    library_cmd(&journal)
        .arg("--log-format")
        .arg("json")
        .assert()
        .success()
        .stderr(predicate::str::contains("\"level\":\"WARN\""))
        .stderr(predicate::str::contains("Error reading operation"));
}
