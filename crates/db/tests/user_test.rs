//! Integration tests for User repository.

mod common;

use chrono::Utc;
use common::{create_test_user, setup_db};
use sea_orm::{ActiveModelTrait, Set};
use tally_db::entities::users;
use tally_db::repositories::is_unique_violation;
use tally_db::repositories::UserError;
use tally_db::{CategoryRepository, UserRepository};

#[tokio::test]
async fn test_register_seeds_default_categories() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;

    let categories = CategoryRepository::new(db.clone()).list(user_id).await.unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["Food", "Transportation", "Utilities", "Entertainment", "Income"]
    );
    assert_eq!(categories[4].kind, "income");
    assert_eq!(categories[0].color, "#FF7043");
}

#[tokio::test]
async fn test_seeding_defaults_twice_is_idempotent() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;
    let repo = CategoryRepository::new(db.clone());

    let seeded = repo.ensure_defaults(user_id).await.unwrap();

    assert_eq!(seeded.len(), 5);
    assert_eq!(repo.list(user_id).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let db = setup_db().await;
    create_test_user(&db, "alice@example.com").await;

    let result = UserRepository::new(db.clone())
        .register("alice@example.com", "$argon2id$other", "Other")
        .await;

    assert!(matches!(result, Err(UserError::EmailTaken(_))));
}

#[tokio::test]
async fn test_find_and_email_exists() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "bob@example.com").await;
    let repo = UserRepository::new(db.clone());

    let found = repo.find_by_email("bob@example.com").await.unwrap().unwrap();
    assert_eq!(found.id, user_id);
    assert!(found.is_active);
    assert!(repo.email_exists("bob@example.com").await.unwrap());
    assert!(!repo.email_exists("nobody@example.com").await.unwrap());
    assert!(repo.find_by_id(user_id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_identity() {
    let db = setup_db().await;
    let alice = create_test_user(&db, "alice@example.com").await;
    create_test_user(&db, "bob@example.com").await;
    let repo = UserRepository::new(db.clone());

    let clash = repo
        .update_identity(alice, None, Some("bob@example.com".to_string()))
        .await;
    assert!(matches!(clash, Err(UserError::EmailTaken(_))));

    let updated = repo
        .update_identity(
            alice,
            Some("Alice Liddell".to_string()),
            Some("alice@wonderland.test".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Alice Liddell");
    assert_eq!(updated.email, "alice@wonderland.test");
}

#[tokio::test]
async fn test_update_password() {
    let db = setup_db().await;
    let user_id = create_test_user(&db, "alice@example.com").await;
    let repo = UserRepository::new(db.clone());

    repo.update_password(user_id, "$argon2id$new").await.unwrap();

    let user = repo.find_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(user.password_hash, "$argon2id$new");
    assert!(matches!(
        repo.update_password(9999, "x").await,
        Err(UserError::NotFound(9999))
    ));
}

#[tokio::test]
async fn test_unique_email_index_is_reported_as_unique_violation() {
    let db = setup_db().await;
    create_test_user(&db, "alice@example.com").await;

    let now = Utc::now();
    let err = users::ActiveModel {
        email: Set("alice@example.com".to_string()),
        full_name: Set("Racing Alice".to_string()),
        password_hash: Set("$argon2id$test".to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap_err();

    assert!(is_unique_violation(&err));
}
