//! Category repository: per-user categories and the starter set.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use tally_core::aggregation::CategoryRecord;
use tally_core::category::{CategoryType, DEFAULT_CATEGORIES, DEFAULT_COLOR};

use crate::entities::{budgets, categories, transactions};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found (or owned by someone else).
    #[error("Category not found: {0}")]
    NotFound(i32),

    /// The user already has a category with this name.
    #[error("Category with name '{0}' already exists")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn duplicate_or(err: DbErr, name: &str) -> CategoryError {
    if super::is_unique_violation(&err) {
        CategoryError::DuplicateName(name.to_string())
    } else {
        CategoryError::Database(err)
    }
}

/// Fields written on create and update.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    /// Category name.
    pub name: String,
    /// `#RRGGBB`; defaults to black when absent.
    pub color: Option<String>,
    /// Expense or income.
    pub kind: CategoryType,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Converts a stored row into the aggregation input.
    #[must_use]
    pub fn to_record(model: &categories::Model) -> CategoryRecord {
        CategoryRecord {
            id: model.id,
            name: model.name.clone(),
            kind: Self::kind_of(model),
            color: model.color.clone(),
        }
    }

    /// Parses the stored kind, treating unknown values as expense.
    #[must_use]
    pub fn kind_of(model: &categories::Model) -> CategoryType {
        model.kind.parse().unwrap_or_default()
    }

    /// Creates the starter categories for a user, skipping any that exist.
    ///
    /// Runs on whatever connection it is given so registration can call it
    /// inside its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or insert fails.
    pub async fn seed_defaults<C>(conn: &C, user_id: i32) -> Result<Vec<categories::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut seeded = Vec::with_capacity(DEFAULT_CATEGORIES.len());

        for default in &DEFAULT_CATEGORIES {
            let existing = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::Name.eq(default.name))
                .one(conn)
                .await?;

            let model = match existing {
                Some(model) => model,
                None => {
                    categories::ActiveModel {
                        user_id: Set(user_id),
                        name: Set(default.name.to_string()),
                        color: Set(default.color.to_string()),
                        kind: Set(default.kind.as_str().to_string()),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(conn)
                    .await?
                }
            };
            seeded.push(model);
        }

        Ok(seeded)
    }

    /// Creates any missing starter categories for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or insert fails.
    pub async fn ensure_defaults(&self, user_id: i32) -> Result<Vec<categories::Model>, DbErr> {
        Self::seed_defaults(&self.db, user_id).await
    }

    /// Lists the user's categories in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: i32) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds one of the user's categories.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist or
    /// belongs to another user.
    pub async fn find(&self, user_id: i32, id: i32) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Finds one of the user's categories by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(
        &self,
        user_id: i32,
        name: &str,
    ) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::DuplicateName` if the user already has a
    /// category with this name.
    pub async fn create(
        &self,
        user_id: i32,
        input: CategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        if self.find_by_name(user_id, &input.name).await?.is_some() {
            return Err(CategoryError::DuplicateName(input.name));
        }

        let txn = self.db.begin().await?;

        let model = categories::ActiveModel {
            user_id: Set(user_id),
            name: Set(input.name.clone()),
            color: Set(input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string())),
            kind: Set(input.kind.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| duplicate_or(e, &input.name))?;

        Self::adopt_unlinked(&txn, user_id, model.id, &input.name, &input.name).await?;
        txn.commit().await?;

        tracing::debug!(user_id, category_id = model.id, "created category");
        Ok(model)
    }

    /// Replaces a category's name, color and kind.
    ///
    /// A rename is carried into the name stored on linked transactions, and
    /// unlinked transactions filed under the old name are linked.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` for a category the user does not own
    /// and `CategoryError::DuplicateName` if the new name is taken.
    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: CategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let existing = self.find(user_id, id).await?;

        let renamed = existing.name != input.name;
        if renamed && self.find_by_name(user_id, &input.name).await?.is_some() {
            return Err(CategoryError::DuplicateName(input.name));
        }

        let old_name = existing.name.clone();
        let txn = self.db.begin().await?;

        let mut active = existing.into_active_model();
        active.name = Set(input.name.clone());
        active.color = Set(input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()));
        active.kind = Set(input.kind.as_str().to_string());
        let model = active
            .update(&txn)
            .await
            .map_err(|e| duplicate_or(e, &input.name))?;

        if renamed {
            transactions::Entity::update_many()
                .col_expr(transactions::Column::Category, Expr::value(input.name.clone()))
                .filter(transactions::Column::CategoryId.eq(id))
                .filter(transactions::Column::UserId.eq(user_id))
                .exec(&txn)
                .await?;
        }
        Self::adopt_unlinked(&txn, user_id, id, &old_name, &input.name).await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Links the user's unlinked transactions filed under `name` to a
    /// category, rewriting their stored name to `new_name`.
    async fn adopt_unlinked<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        category_id: i32,
        name: &str,
        new_name: &str,
    ) -> Result<u64, DbErr> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::CategoryId, Expr::value(category_id))
            .col_expr(transactions::Column::Category, Expr::value(new_name))
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::CategoryId.is_null())
            .filter(transactions::Column::Category.eq(name))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes a category, its budgets, and unlinks its transactions.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` for a category the user does not own.
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), CategoryError> {
        self.find(user_id, id).await?;

        let txn = self.db.begin().await?;

        budgets::Entity::delete_many()
            .filter(budgets::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        transactions::Entity::update_many()
            .col_expr(
                transactions::Column::CategoryId,
                Expr::value(Option::<i32>::None),
            )
            .filter(transactions::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        categories::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::debug!(user_id, category_id = id, "deleted category");
        Ok(())
    }
}
