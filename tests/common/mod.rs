#![allow(dead_code)]

use assert_cmd::cargo_bin;
use rand::Rng;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

pub const HEADER: &str = "op,patron,book,title,author,isbn,copies,query,by,txn,amount,at";
pub const PATRON: &str = "123456";

/// A random 13-digit isbn.
pub fn random_isbn() -> String {
    let mut rng = rand::thread_rng();
    (0..13)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Builds an operation journal row by row.
#[derive(Default)]
pub struct JournalBuilder {
    rows: Vec<String>,
}

impl JournalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: impl Into<String>) -> Self {
        self.rows.push(row.into());
        self
    }

    pub fn add_book(self, title: &str, isbn: &str, copies: u32, at: &str) -> Self {
        self.row(format!("add_book,,,{title},Author,{isbn},{copies},,,,,{at}"))
    }

    pub fn borrow(self, patron: &str, book: u64, at: &str) -> Self {
        self.row(format!("borrow,{patron},{book},,,,,,,,,{at}"))
    }

    pub fn give_back(self, patron: &str, book: u64, at: &str) -> Self {
        self.row(format!("return,{patron},{book},,,,,,,,,{at}"))
    }

    pub fn late_fee(self, patron: &str, book: u64, at: &str) -> Self {
        self.row(format!("late_fee,{patron},{book},,,,,,,,,{at}"))
    }

    pub fn pay_fees(self, patron: &str, book: u64, at: &str) -> Self {
        self.row(format!("pay_fees,{patron},{book},,,,,,,,,{at}"))
    }

    pub fn refund(self, txn: &str, amount: &str) -> Self {
        self.row(format!("refund,,,,,,,,,{txn},{amount},"))
    }

    pub fn write(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in &self.rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }
}

/// The binary, pointed at `journal`, with no gateway latency and info logs.
pub fn library_cmd(journal: &NamedTempFile) -> Command {
    let mut cmd = Command::new(cargo_bin!("library-circulation"));
    cmd.arg(journal.path())
        .arg("--gateway-latency-ms")
        .arg("0")
        .env("RUST_LOG", "info")
        .env_remove("LIBRARY_DB_PATH")
        .env_remove("LOG_FORMAT");
    cmd
}
