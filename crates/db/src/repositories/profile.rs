//! Profile repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

use crate::entities::profiles;

/// Currency given to profiles created on first access.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Profile repository.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the user's profile, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub async fn get_or_create(&self, user_id: i32) -> Result<profiles::Model, DbErr> {
        let existing = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        if let Some(profile) = existing {
            return Ok(profile);
        }

        profiles::ActiveModel {
            user_id: Set(user_id),
            currency: Set(DEFAULT_CURRENCY.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Sets the preferred currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_currency(
        &self,
        user_id: i32,
        currency: &str,
    ) -> Result<profiles::Model, DbErr> {
        let mut active = self.get_or_create(user_id).await?.into_active_model();
        active.currency = Set(currency.to_string());
        active.update(&self.db).await
    }
}
