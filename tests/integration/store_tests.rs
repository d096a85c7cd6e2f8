//! Postgres store tests
//!
//! Need a database reachable through `DATABASE_URL`; run with
//! `cargo test --test store_tests -- --ignored`.

use library_server::{
    error::AppError,
    models::{book::NewBook, borrow::BorrowOutcome},
    repository::{books::BooksRepository, borrows::BorrowsRepository, BookStore, BorrowStore},
};
use sqlx::PgPool;
use uuid::Uuid;

const REJECTED_BORROWER: &str = "00000000-0000-0000-0000-00000000dead";

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.expect("Failed to connect");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate");
    pool
}

fn new_book(inventory: i32) -> NewBook {
    NewBook {
        admin: Uuid::new_v4(),
        name: "Midnight".to_string(),
        author: Some("Mao Dun".to_string()),
        press: None,
        inventory,
        date: None,
        score: 6,
        cover: None,
        introduction: "Shanghai, 1930".to_string(),
    }
}

/// Make the ledger insert fail for one borrower
async fn install_rejecting_trigger(pool: &PgPool) {
    sqlx::query(&format!(
        r#"
        CREATE OR REPLACE FUNCTION reject_borrower() RETURNS trigger AS $$
        BEGIN
            IF NEW.user_id = '{}'::uuid THEN
                RAISE EXCEPTION 'borrower rejected';
            END IF;
            RETURN NEW;
        END
        $$ LANGUAGE plpgsql
        "#,
        REJECTED_BORROWER
    ))
    .execute(pool)
    .await
    .expect("Failed to create trigger function");

    sqlx::query("DROP TRIGGER IF EXISTS reject_borrower ON borrows")
        .execute(pool)
        .await
        .expect("Failed to drop trigger");

    sqlx::query(
        "CREATE TRIGGER reject_borrower BEFORE INSERT ON borrows \
         FOR EACH ROW EXECUTE FUNCTION reject_borrower()",
    )
    .execute(pool)
    .await
    .expect("Failed to create trigger");
}

#[tokio::test]
#[ignore]
async fn failed_ledger_insert_rolls_back_the_decrement() {
    let pool = pool().await;
    install_rejecting_trigger(&pool).await;

    let books = BooksRepository::new(pool.clone());
    let borrows = BorrowsRepository::new(pool.clone());
    let book = books.create(&new_book(2)).await.expect("Failed to create book");

    let rejected: Uuid = REJECTED_BORROWER.parse().unwrap();
    let err = borrows.borrow(book.id, rejected).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let stored = books.get_raw_book_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.inventory, 2);
    assert_eq!(borrows.count_for_book(book.id).await.unwrap(), 0);

    // Other borrowers are unaffected
    let outcome = borrows.borrow(book.id, Uuid::new_v4()).await.unwrap();
    assert!(matches!(outcome, BorrowOutcome::Borrowed { remaining: 1, .. }));

    sqlx::query("DROP TRIGGER IF EXISTS reject_borrower ON borrows")
        .execute(&pool)
        .await
        .unwrap();
    books.delete_by_id(book.id, book.admin).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn borrow_stops_at_zero_inventory() {
    let pool = pool().await;
    let books = BooksRepository::new(pool.clone());
    let borrows = BorrowsRepository::new(pool.clone());
    let book = books.create(&new_book(1)).await.expect("Failed to create book");

    let first = borrows.borrow(book.id, Uuid::new_v4()).await.unwrap();
    assert!(matches!(first, BorrowOutcome::Borrowed { remaining: 0, .. }));

    let second = borrows.borrow(book.id, Uuid::new_v4()).await.unwrap();
    assert!(matches!(second, BorrowOutcome::OutOfStock));
    assert_eq!(borrows.count_for_book(book.id).await.unwrap(), 1);

    let missing = borrows.borrow(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
    assert!(matches!(missing, BorrowOutcome::NoSuchBook));

    books.delete_by_id(book.id, book.admin).await.unwrap();
}
