//! User repository: accounts, identity and credentials.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use super::category::CategoryRepository;
use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(i32),

    /// Email already registered to another account.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn email_taken_or(err: DbErr, email: &str) -> UserError {
    if super::is_unique_violation(&err) {
        UserError::EmailTaken(email.to_string())
    } else {
        UserError::Database(err)
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates an account and its starter categories in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the email is registered, or a
    /// database error. Nothing is written when an error is returned.
    pub async fn register(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<users::Model, UserError> {
        let txn = self.db.begin().await?;

        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&txn)
            .await?
            > 0;
        if taken {
            return Err(UserError::EmailTaken(email.to_string()));
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(full_name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| email_taken_or(e, email))?;

        CategoryRepository::seed_defaults(&txn, user.id).await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, "registered user");
        Ok(user)
    }

    /// Updates name and/or email.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the new email belongs to someone
    /// else, `UserError::NotFound` if the user does not exist.
    pub async fn update_identity(
        &self,
        user_id: i32,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<users::Model, UserError> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        if let Some(email) = &email {
            let clash = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .filter(users::Column::Id.ne(user_id))
                .count(&self.db)
                .await?
                > 0;
            if clash {
                return Err(UserError::EmailTaken(email.clone()));
            }
        }

        let requested = email.clone();
        let mut active = user.into_active_model();
        if let Some(full_name) = full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(&self.db)
            .await
            .map_err(|e| email_taken_or(e, requested.as_deref().unwrap_or_default()))
    }

    /// Replaces the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist.
    pub async fn update_password(&self, user_id: i32, password_hash: &str) -> Result<(), UserError> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let mut active = user.into_active_model();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        Ok(())
    }
}
