//! Session repository: server-side records of issued refresh tokens.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    UpdateMany,
    sea_query::{Expr, SimpleExpr},
};
use sha2::{Digest, Sha256};

use crate::entities::sessions;

/// Session repository for refresh token bookkeeping.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a refresh token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Records a newly issued refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: i32,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<sessions::Model, DbErr> {
        let now = Utc::now();

        sessions::ActiveModel {
            user_id: Set(user_id),
            refresh_token_hash: Set(Self::hash_token(refresh_token)),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Finds the unrevoked, unexpired session for a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(Self::hash_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Marks a session revoked. Returns false if it was already revoked, so two
    /// concurrent rotations of the same token cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke(&self, id: i32) -> Result<bool, DbErr> {
        let result = Self::revoke_where(sessions::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Revokes the session of a refresh token. Returns false if none was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_by_token(&self, refresh_token: &str) -> Result<bool, DbErr> {
        let result = Self::revoke_where(
            sessions::Column::RefreshTokenHash.eq(Self::hash_token(refresh_token)),
        )
        .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
        .exec(&self.db)
        .await?;
        Ok(result.rows_affected > 0)
    }

    /// Revokes every active session of a user, returning how many were active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_all_user_sessions(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = Self::revoke_where(sessions::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Update stamping `revoked_at` on the matching sessions not yet revoked.
    fn revoke_where(condition: SimpleExpr) -> UpdateMany<sessions::Entity> {
        let now = Utc::now();
        sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(now))
            .col_expr(sessions::Column::UpdatedAt, Expr::value(now))
            .filter(condition)
            .filter(sessions::Column::RevokedAt.is_null())
    }

    /// Deletes expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
