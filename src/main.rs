use clap::Parser;
use library_circulation::application::Library;
use library_circulation::config::Config;
use library_circulation::domain::ports::{BookStoreBox, BorrowLedgerBox};
use library_circulation::infrastructure::clock::ManualClock;
use library_circulation::infrastructure::in_memory::{InMemoryBookStore, InMemoryBorrowLedger};
#[cfg(feature = "storage-rocksdb")]
use library_circulation::infrastructure::rocksdb::RocksDBStore;
use library_circulation::infrastructure::simulated_gateway::SimulatedPaymentGateway;
use library_circulation::interfaces::csv::operation_reader::OperationReader;
use library_circulation::interfaces::csv::outcome_writer::OutcomeWriter;
use library_circulation::interfaces::journal::Journal;
use library_circulation::telemetry::init_telemetry;
use chrono::Utc;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

fn in_memory_stores() -> (BookStoreBox, BorrowLedgerBox) {
    (
        Box::new(InMemoryBookStore::new()),
        Box::new(InMemoryBorrowLedger::new()),
    )
}

fn open_stores(config: &Config) -> Result<(BookStoreBox, BorrowLedgerBox)> {
    match &config.db_path {
        Some(db_path) => persistent_stores(db_path),
        None => Ok(in_memory_stores()),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn persistent_stores(db_path: &Path) -> Result<(BookStoreBox, BorrowLedgerBox)> {
    tracing::info!(path = %db_path.display(), "Opening RocksDB store");
    let store = RocksDBStore::open(db_path).into_diagnostic()?;
    Ok((Box::new(store.clone()), Box::new(store)))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn persistent_stores(db_path: &Path) -> Result<(BookStoreBox, BorrowLedgerBox)> {
    tracing::warn!(
        path = %db_path.display(),
        "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
    );
    Ok(in_memory_stores())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_telemetry(config.log_format);

    let (books, ledger) = open_stores(&config)?;
    let clock = ManualClock::new(Utc::now());
    let library = Library::new(books, ledger, Arc::new(clock.clone()));
    let gateway = SimulatedPaymentGateway::new(config.gateway_latency());
    let journal = Journal::new(library, Box::new(gateway), clock);

    let file = File::open(&config.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    for entry in reader.operations() {
        match entry {
            Ok(entry) => {
                let outcome = journal.apply(entry).await;
                writer.write(&outcome).into_diagnostic()?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error reading operation");
            }
        }
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}
