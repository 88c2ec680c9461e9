//! Transaction repository: a user's dated, signed money movements.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tally_core::aggregation::TransactionRecord;
use tally_core::money::{self, MoneyError};

use crate::entities::{categories, transactions};

/// Category label stored on transactions that were never categorized.
pub const UNCATEGORIZED: &str = "N/A";

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found (or owned by someone else).
    #[error("Transaction not found: {0}")]
    NotFound(i32),

    /// Referenced category does not exist or belongs to someone else.
    #[error("Invalid category: {0}")]
    InvalidCategory(i32),

    /// Amount has too many decimals or is out of range.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields written on create and update.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// Calendar date.
    pub date: NaiveDate,
    /// Signed amount; negative is an expense.
    pub amount: Decimal,
    /// Free-text description.
    pub description: Option<String>,
    /// Category name, used when no `category_id` is given.
    pub category: Option<String>,
    /// Category to link.
    pub category_id: Option<i32>,
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Converts a stored row into its two-decimal form.
    #[must_use]
    pub fn to_record(model: transactions::Model) -> TransactionRecord {
        TransactionRecord {
            id: model.id,
            date: model.date,
            description: model.description,
            category: model.category,
            category_id: model.category_id,
            amount: money::from_minor(model.amount_minor),
        }
    }

    /// Lists the user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: i32) -> Result<Vec<TransactionRecord>, DbErr> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Self::to_record).collect())
    }

    /// The user's `limit` most recent transactions (date, then id, descending).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(&self, user_id: i32, limit: u64) -> Result<Vec<TransactionRecord>, DbErr> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Self::to_record).collect())
    }

    /// The user's transactions dated in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn in_range(
        &self,
        user_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRecord>, DbErr> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Date.gte(start))
            .filter(transactions::Column::Date.lt(end))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Self::to_record).collect())
    }

    /// The user's expenses across all time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn expenses(&self, user_id: i32) -> Result<Vec<TransactionRecord>, DbErr> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::AmountMinor.lt(0))
            .order_by_asc(transactions::Column::Date)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Self::to_record).collect())
    }

    /// Every transaction of the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn all(&self, user_id: i32) -> Result<Vec<TransactionRecord>, DbErr> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Self::to_record).collect())
    }

    /// Finds one of the user's transactions.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist
    /// or belongs to another user.
    pub async fn find(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Creates a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvalidCategory` if `category_id` is not one
    /// of the user's categories and `TransactionError::InvalidAmount` if the
    /// amount cannot be stored exactly.
    pub async fn create(
        &self,
        user_id: i32,
        input: TransactionInput,
    ) -> Result<TransactionRecord, TransactionError> {
        let amount_minor = money::to_minor(input.amount)?;
        let (category_id, category) = self
            .resolve_category(user_id, input.category_id, input.category)
            .await?;
        let now = Utc::now();

        let model = transactions::ActiveModel {
            user_id: Set(user_id),
            category_id: Set(category_id),
            category: Set(category),
            description: Set(input.description),
            amount_minor: Set(amount_minor),
            date: Set(input.date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::debug!(user_id, transaction_id = model.id, "created transaction");
        Ok(Self::to_record(model))
    }

    /// Replaces every writable field of a transaction.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus `TransactionError::NotFound` for a
    /// transaction the user does not own.
    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: TransactionInput,
    ) -> Result<TransactionRecord, TransactionError> {
        let existing = self.find(user_id, id).await?;
        let amount_minor = money::to_minor(input.amount)?;
        let (category_id, category) = self
            .resolve_category(user_id, input.category_id, input.category)
            .await?;

        let mut active = existing.into_active_model();
        active.category_id = Set(category_id);
        active.category = Set(category);
        active.description = Set(input.description);
        active.amount_minor = Set(amount_minor);
        active.date = Set(input.date);
        active.updated_at = Set(Utc::now());

        Ok(Self::to_record(active.update(&self.db).await?))
    }

    /// Deletes one of the user's transactions.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` for a transaction the user does
    /// not own.
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TransactionError::NotFound(id));
        }
        Ok(())
    }

    /// Works out the `(category_id, category)` pair to store.
    async fn resolve_category(
        &self,
        user_id: i32,
        category_id: Option<i32>,
        name: Option<String>,
    ) -> Result<(Option<i32>, String), TransactionError> {
        if let Some(id) = category_id {
            let category = categories::Entity::find_by_id(id)
                .filter(categories::Column::UserId.eq(user_id))
                .one(&self.db)
                .await?
                .ok_or(TransactionError::InvalidCategory(id))?;
            return Ok((Some(category.id), category.name));
        }

        let Some(name) = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
        else {
            return Ok((None, UNCATEGORIZED.to_string()));
        };

        let linked = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?;

        Ok(match linked {
            Some(category) => (Some(category.id), category.name),
            None => (None, name),
        })
    }
}
