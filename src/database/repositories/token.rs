//! Special token repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::map_unique_violation;
use crate::models::token::SpecialToken;
use crate::utils::errors::Result;

const TOKEN_COLUMNS: &str = "id, name, value, used, max_usage, valid_till";

pub(crate) const DUPLICATE_VALUE: &str = "Special token with this Value already exists.";

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(
        &self,
        name: &str,
        value: &str,
        max_usage: i32,
        valid_till: DateTime<Utc>,
    ) -> Result<SpecialToken>;

    async fn find_by_value(&self, value: &str) -> Result<Option<SpecialToken>>;

    /// Spend one use of the token if it is still valid at `now`.
    ///
    /// Check and increment happen in one statement, so concurrent
    /// redemptions never exceed `max_usage`.
    async fn redeem(&self, value: &str, now: DateTime<Utc>) -> Result<Option<SpecialToken>>;
}

#[derive(Clone, Debug)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn create(
        &self,
        name: &str,
        value: &str,
        max_usage: i32,
        valid_till: DateTime<Utc>,
    ) -> Result<SpecialToken> {
        let token = sqlx::query_as::<_, SpecialToken>(&format!(
            r#"
            INSERT INTO special_tokens (name, value, used, max_usage, valid_till)
            VALUES ($1, $2, 0, $3, $4)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(value)
        .bind(max_usage)
        .bind(valid_till)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "value", DUPLICATE_VALUE))?;

        Ok(token)
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<SpecialToken>> {
        let token = sqlx::query_as::<_, SpecialToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM special_tokens WHERE value = $1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn redeem(&self, value: &str, now: DateTime<Utc>) -> Result<Option<SpecialToken>> {
        let token = sqlx::query_as::<_, SpecialToken>(&format!(
            r#"
            UPDATE special_tokens
            SET used = used + 1
            WHERE value = $1 AND used < max_usage AND valid_till > $2
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(value)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }
}
