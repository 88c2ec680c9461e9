//! Integration tests for Category repository.

mod common;

use chrono::NaiveDate;
use common::{create_test_user, setup_db};
use rust_decimal_macros::dec;
use tally_core::aggregation::CategoryTotal;
use tally_core::category::CategoryType;
use tally_db::repositories::{BudgetInput, CategoryError, CategoryInput, TransactionInput};
use tally_db::{BudgetRepository, CategoryRepository, SummaryRepository, TransactionRepository};

fn input(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        color: None,
        kind: CategoryType::Expense,
    }
}

#[tokio::test]
async fn test_create_defaults_color_and_rejects_duplicates() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;
    let repo = CategoryRepository::new(db.clone());

    let books = repo.create(user_id, input("Books")).await.unwrap();
    assert_eq!(books.color, "#000000");
    assert_eq!(books.kind, "expense");

    let duplicate = repo.create(user_id, input("Books")).await;
    assert!(matches!(duplicate, Err(CategoryError::DuplicateName(_))));
}

#[tokio::test]
async fn test_same_name_allowed_across_users() {
    let db = setup_db().await;
    let alice = create_test_user(&db, "alice@example.com").await;
    let bob = create_test_user(&db, "bob@example.com").await;
    let repo = CategoryRepository::new(db.clone());

    let alice_books = repo.create(alice, input("Books")).await.unwrap();
    let bob_books = repo.create(bob, input("Books")).await.unwrap();

    assert_ne!(alice_books.id, bob_books.id);
    assert!(repo.list(alice).await.unwrap().iter().all(|c| c.user_id == alice));
}

#[tokio::test]
async fn test_other_users_category_is_not_found() {
    let db = setup_db().await;
    let alice = create_test_user(&db, "alice@example.com").await;
    let bob = create_test_user(&db, "bob@example.com").await;
    let repo = CategoryRepository::new(db.clone());
    let books = repo.create(alice, input("Books")).await.unwrap();

    assert!(matches!(repo.find(bob, books.id).await, Err(CategoryError::NotFound(_))));
    assert!(matches!(
        repo.update(bob, books.id, input("Stolen")).await,
        Err(CategoryError::NotFound(_))
    ));
    assert!(matches!(repo.delete(bob, books.id).await, Err(CategoryError::NotFound(_))));
    assert_eq!(repo.find(alice, books.id).await.unwrap().name, "Books");
}

#[tokio::test]
async fn test_rename_updates_linked_transactions() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;
    let categories = CategoryRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let books = categories.create(user_id, input("Books")).await.unwrap();

    let tx = transactions
        .create(
            user_id,
            TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                amount: dec!(-12.00),
                description: None,
                category: None,
                category_id: Some(books.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(tx.category, "Books");

    let renamed = categories
        .update(
            user_id,
            books.id,
            CategoryInput {
                name: "Reading".to_string(),
                color: Some("#123456".to_string()),
                kind: CategoryType::Expense,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.color, "#123456");

    let stored = transactions.find(user_id, tx.id).await.unwrap();
    assert_eq!(stored.category, "Reading");
    assert_eq!(stored.category_id, Some(books.id));

    let clash = categories.update(user_id, books.id, input("Food")).await;
    assert!(matches!(clash, Err(CategoryError::DuplicateName(_))));
}

#[tokio::test]
async fn test_delete_removes_budgets_and_unlinks_transactions() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;
    let categories = CategoryRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let budgets = BudgetRepository::new(db.clone());
    let books = categories.create(user_id, input("Books")).await.unwrap();

    let tx = transactions
        .create(
            user_id,
            TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                amount: dec!(-5),
                description: Some("paperback".to_string()),
                category: None,
                category_id: Some(books.id),
            },
        )
        .await
        .unwrap();
    budgets
        .upsert(
            user_id,
            BudgetInput {
                category_id: books.id,
                amount: dec!(40),
                month: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            },
        )
        .await
        .unwrap();

    categories.delete(user_id, books.id).await.unwrap();

    assert!(budgets.list(user_id).await.unwrap().is_empty());
    let stored = transactions.find(user_id, tx.id).await.unwrap();
    assert_eq!(stored.category_id, None);
    assert_eq!(stored.category, "Books");
}

#[tokio::test]
async fn test_new_category_adopts_unlinked_rows_and_keeps_them_on_rename() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;
    let categories = CategoryRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let summary = SummaryRepository::new(db.clone());

    let tx = transactions
        .create(
            user_id,
            TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                amount: dec!(-40),
                description: None,
                category: Some("Books".to_string()),
                category_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(tx.category_id, None);

    let books = categories.create(user_id, input("Books")).await.unwrap();
    let stored = transactions.find(user_id, tx.id).await.unwrap();
    assert_eq!(stored.category_id, Some(books.id));

    categories
        .update(user_id, books.id, input("Reading"))
        .await
        .unwrap();

    let stored = transactions.find(user_id, tx.id).await.unwrap();
    assert_eq!(stored.category, "Reading");
    let reading = summary
        .category_summary(user_id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == books.id)
        .unwrap();
    assert_eq!(reading.total, CategoryTotal::Spent(dec!(40.00)));
}

#[tokio::test]
async fn test_recreated_category_relinks_history() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;
    let categories = CategoryRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let books = categories.create(user_id, input("Books")).await.unwrap();

    let tx = transactions
        .create(
            user_id,
            TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
                amount: dec!(-8),
                description: None,
                category: None,
                category_id: Some(books.id),
            },
        )
        .await
        .unwrap();
    categories.delete(user_id, books.id).await.unwrap();

    let again = categories.create(user_id, input("Books")).await.unwrap();
    let stored = transactions.find(user_id, tx.id).await.unwrap();
    assert_eq!(stored.category_id, Some(again.id));
}
