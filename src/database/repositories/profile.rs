//! Profile repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use super::map_unique_violation;
use super::alumni::{bind_member_fields, ALUMNI_COLUMNS};
use crate::models::member::{Alumni, MemberDetails, Profile};
use crate::utils::errors::{CmsError, Result};

const PROFILE_COLUMNS: &str = "id, user_id, first_name, last_name, alias, bio, image, email, \
     phone_number, degree_name, passout_year, position, convert_to_alumni, git_link, facebook_link, \
     twitter_link, reddit_link, linkedin_link";

pub(crate) const DUPLICATE_PROFILE: &str = "Profile with this User already exists.";

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, user_id: i64, details: MemberDetails) -> Result<Profile>;

    async fn update(
        &self,
        id: i64,
        details: MemberDetails,
        convert_to_alumni: bool,
    ) -> Result<Profile>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Profile>>;

    async fn find_by_user(&self, user_id: i64) -> Result<Option<Profile>>;

    async fn list(&self) -> Result<Vec<Profile>>;

    async fn count(&self) -> Result<i64>;

    /// Insert `details` as a new alumni row and delete the profile, in one
    /// transaction. Nothing changes if either step fails.
    async fn migrate_to_alumni(&self, profile_id: i64, details: MemberDetails) -> Result<Alumni>;
}

#[derive(Clone, Debug)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn create(&self, user_id: i64, details: MemberDetails) -> Result<Profile> {
        let sql = format!(
            r#"
            INSERT INTO profiles (first_name, last_name, alias, bio, image, email, phone_number,
                degree_name, passout_year, position, git_link, facebook_link, twitter_link,
                reddit_link, linkedin_link, user_id, convert_to_alumni)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, FALSE)
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let query: QueryAs<'_, Postgres, Profile, PgArguments> = sqlx::query_as(&sql);
        let profile = bind_member_fields(query, details)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "user", DUPLICATE_PROFILE))?;

        Ok(profile)
    }

    async fn update(
        &self,
        id: i64,
        details: MemberDetails,
        convert_to_alumni: bool,
    ) -> Result<Profile> {
        let sql = format!(
            r#"
            UPDATE profiles
            SET first_name = $1, last_name = $2, alias = $3, bio = $4, image = $5, email = $6,
                phone_number = $7, degree_name = $8, passout_year = $9, position = $10,
                git_link = $11, facebook_link = $12, twitter_link = $13, reddit_link = $14,
                linkedin_link = $15, convert_to_alumni = $16
            WHERE id = $17
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let query: QueryAs<'_, Postgres, Profile, PgArguments> = sqlx::query_as(&sql);
        bind_member_fields(query, details)
            .bind(convert_to_alumni)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CmsError::not_found("Profile", id.to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn list(&self) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn migrate_to_alumni(&self, profile_id: i64, details: MemberDetails) -> Result<Alumni> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO alumni (first_name, last_name, alias, bio, image, email, phone_number,
                degree_name, passout_year, position, git_link, facebook_link, twitter_link,
                reddit_link, linkedin_link)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {ALUMNI_COLUMNS}
            "#
        );
        let query: QueryAs<'_, Postgres, Alumni, PgArguments> = sqlx::query_as(&sql);
        let alumni = bind_member_fields(query, details)
            .fetch_one(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(CmsError::not_found("Profile", profile_id.to_string()));
        }

        tx.commit().await?;
        Ok(alumni)
    }
}
