//! Budget repository: monthly spending caps per category.
//!
//! Budgets carry no user column; ownership is always checked through the
//! category they belong to.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use tally_core::aggregation::BudgetRecord;
use tally_core::money::{self, MoneyError};
use tally_core::period::{Month, normalize_budget_month};

use crate::entities::{budgets, categories};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found (or owned by someone else).
    #[error("Budget not found: {0}")]
    NotFound(i32),

    /// Referenced category does not exist or belongs to someone else.
    #[error("Invalid category: {0}")]
    InvalidCategory(i32),

    /// Amount is negative, has too many decimals or is out of range.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// Another budget already covers this category and month.
    #[error("A budget for this category and month already exists")]
    DuplicateMonth,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields written on create and update.
#[derive(Debug, Clone, Copy)]
pub struct BudgetInput {
    /// Category the budget caps.
    pub category_id: i32,
    /// Planned amount, zero or more.
    pub amount: Decimal,
    /// Any day of the budgeted month.
    pub month: NaiveDate,
}

/// Result of creating a budget through [`BudgetRepository::upsert`].
#[derive(Debug, Clone)]
pub struct UpsertedBudget {
    /// Stored budget row.
    pub budget: budgets::Model,
    /// Owning category.
    pub category: categories::Model,
    /// False when an existing row for the same month was overwritten.
    pub created: bool,
}

fn duplicate_month_or(err: DbErr) -> BudgetError {
    if super::is_unique_violation(&err) {
        BudgetError::DuplicateMonth
    } else {
        BudgetError::Database(err)
    }
}

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's budgets with their categories, latest month first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: i32,
    ) -> Result<Vec<(budgets::Model, categories::Model)>, DbErr> {
        budgets::Entity::find()
            .find_also_related(categories::Entity)
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::Month)
            .order_by_desc(budgets::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| {
                rows.into_iter()
                    .filter_map(|(budget, category)| category.map(|c| (budget, c)))
                    .collect()
            })
    }

    /// Finds one of the user's budgets with its category.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist or its
    /// category belongs to another user.
    pub async fn find(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<(budgets::Model, categories::Model), BudgetError> {
        let row = budgets::Entity::find_by_id(id)
            .find_also_related(categories::Entity)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        match row {
            Some((budget, Some(category))) => Ok((budget, category)),
            _ => Err(BudgetError::NotFound(id)),
        }
    }

    /// The user's budgets for one month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_month(&self, user_id: i32, month: Month) -> Result<Vec<BudgetRecord>, DbErr> {
        let rows = budgets::Entity::find()
            .inner_join(categories::Entity)
            .filter(categories::Column::UserId.eq(user_id))
            .filter(budgets::Column::Month.gte(month.first_day()))
            .filter(budgets::Column::Month.lt(month.next_first_day()))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|b| BudgetRecord {
                month: b.month,
                amount: money::from_minor(b.amount_minor),
            })
            .collect())
    }

    /// Creates the budget for a category and month, or overwrites the amount
    /// of the one that already exists.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidCategory` if the category is not the
    /// user's and `BudgetError::InvalidAmount` for a negative or malformed
    /// amount.
    pub async fn upsert(
        &self,
        user_id: i32,
        input: BudgetInput,
    ) -> Result<UpsertedBudget, BudgetError> {
        let amount_minor = money::to_minor_non_negative(input.amount)?;
        let category = self.owned_category(user_id, input.category_id).await?;
        let month = normalize_budget_month(input.month);

        let existing = budgets::Entity::find()
            .filter(budgets::Column::CategoryId.eq(category.id))
            .filter(budgets::Column::Month.eq(month))
            .one(&self.db)
            .await?;

        let (budget, created) = match existing {
            Some(budget) => {
                let mut active = budget.into_active_model();
                active.amount_minor = Set(amount_minor);
                (active.update(&self.db).await?, false)
            }
            None => {
                let budget = budgets::ActiveModel {
                    category_id: Set(category.id),
                    amount_minor: Set(amount_minor),
                    month: Set(month),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(duplicate_month_or)?;
                (budget, true)
            }
        };

        tracing::debug!(user_id, budget_id = budget.id, created, "saved budget");
        Ok(UpsertedBudget {
            budget,
            category,
            created,
        })
    }

    /// Replaces a budget's category, amount and month.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` for a budget the user does not own,
    /// `BudgetError::DuplicateMonth` if another budget already covers the
    /// target category and month, and the same errors as [`Self::upsert`].
    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: BudgetInput,
    ) -> Result<(budgets::Model, categories::Model), BudgetError> {
        let (existing, _) = self.find(user_id, id).await?;
        let amount_minor = money::to_minor_non_negative(input.amount)?;
        let category = self.owned_category(user_id, input.category_id).await?;
        let month = normalize_budget_month(input.month);

        let clash = budgets::Entity::find()
            .filter(budgets::Column::CategoryId.eq(category.id))
            .filter(budgets::Column::Month.eq(month))
            .filter(budgets::Column::Id.ne(id))
            .one(&self.db)
            .await?;
        if clash.is_some() {
            return Err(BudgetError::DuplicateMonth);
        }

        let mut active = existing.into_active_model();
        active.category_id = Set(category.id);
        active.amount_minor = Set(amount_minor);
        active.month = Set(month);

        let budget = active.update(&self.db).await.map_err(duplicate_month_or)?;
        Ok((budget, category))
    }

    /// Deletes one of the user's budgets.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` for a budget the user does not own.
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), BudgetError> {
        let (budget, _) = self.find(user_id, id).await?;
        budgets::Entity::delete_by_id(budget.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn owned_category(
        &self,
        user_id: i32,
        category_id: i32,
    ) -> Result<categories::Model, BudgetError> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::InvalidCategory(category_id))
    }
}
