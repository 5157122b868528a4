use chrono::Utc;
use library_circulation::application::Library;
use library_circulation::domain::book::NewBook;
use library_circulation::domain::borrow::BorrowRecord;
use library_circulation::domain::patron::PatronId;
use library_circulation::domain::ports::{
    BookStore, BookStoreBox, BorrowLedger, BorrowLedgerBox, PaymentGateway, PaymentGatewayBox,
};
use library_circulation::infrastructure::in_memory::{InMemoryBookStore, InMemoryBorrowLedger};
use library_circulation::infrastructure::simulated_gateway::SimulatedPaymentGateway;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let book_store: BookStoreBox = Box::new(InMemoryBookStore::new());
    let ledger: BorrowLedgerBox = Box::new(InMemoryBorrowLedger::new());
    let gateway: PaymentGatewayBox = Box::new(SimulatedPaymentGateway::new(Duration::ZERO));

    let patron = PatronId::parse("123456").unwrap();
    let record = BorrowRecord::new(patron.clone(), 1, Utc::now());

    // Verify Send + Sync by spawning tasks
    let books_handle = tokio::spawn(async move {
        let book = NewBook::new("Dune", "Frank Herbert", "9780441172719", 3).unwrap();
        assert!(book_store.insert_book(book).await.unwrap());
        book_store.get_book_by_id(1).await.unwrap().unwrap()
    });

    let ledger_handle = tokio::spawn(async move {
        assert!(ledger.insert_borrow_record(record).await.unwrap());
        ledger.get_patron_borrow_count(&patron).await.unwrap()
    });

    let gateway_handle = tokio::spawn(async move {
        gateway
            .process_payment("123456", dec!(1.50), "Late fees")
            .await
            .unwrap()
    });

    let book = books_handle.await.unwrap();
    assert_eq!(book.available_copies, 3);
    assert_eq!(ledger_handle.await.unwrap(), 1);
    assert!(gateway_handle.await.unwrap().success);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_borrows_of_last_copy() {
    let books = InMemoryBookStore::new();
    let ledger = InMemoryBorrowLedger::new();
    let library = Arc::new(Library::with_system_clock(
        Box::new(books.clone()),
        Box::new(ledger.clone()),
    ));
    library
        .add_book("Dune", "Frank Herbert", "9780441172719", 1)
        .await
        .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|n| {
            let library = Arc::clone(&library);
            tokio::spawn(async move { library.borrow_book(&format!("{:06}", 100_000 + n), 1).await })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            granted += 1;
        }
    }
    assert_eq!(granted, 1);

    let book = books.get_book_by_id(1).await.unwrap().unwrap();
    assert_eq!(book.available_copies, 0);
    let active = ledger
        .all_records()
        .await
        .into_iter()
        .filter(BorrowRecord::is_active)
        .count();
    assert_eq!(active, 1);
}
