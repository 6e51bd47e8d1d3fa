//! Alumni repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::member::{Alumni, MemberDetails};
use crate::utils::errors::Result;

pub(crate) const ALUMNI_COLUMNS: &str = "id, first_name, last_name, alias, bio, image, email, \
     phone_number, degree_name, passout_year, position, git_link, facebook_link, twitter_link, \
     reddit_link, linkedin_link";

/// Bind the shared member fields as `$1..$15`
pub(crate) fn bind_member_fields<O>(
    query: QueryAs<'_, Postgres, O, PgArguments>,
    details: MemberDetails,
) -> QueryAs<'_, Postgres, O, PgArguments> {
    query
        .bind(details.first_name)
        .bind(details.last_name)
        .bind(details.alias)
        .bind(details.bio)
        .bind(details.image)
        .bind(details.email)
        .bind(details.phone_number)
        .bind(details.degree_name)
        .bind(details.passout_year)
        .bind(details.position)
        .bind(details.git_link)
        .bind(details.facebook_link)
        .bind(details.twitter_link)
        .bind(details.reddit_link)
        .bind(details.linkedin_link)
}

#[async_trait]
pub trait AlumniRepository: Send + Sync {
    async fn create(&self, details: MemberDetails) -> Result<Alumni>;

    async fn list(&self) -> Result<Vec<Alumni>>;
}

#[derive(Clone, Debug)]
pub struct PgAlumniRepository {
    pool: PgPool,
}

impl PgAlumniRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlumniRepository for PgAlumniRepository {
    async fn create(&self, details: MemberDetails) -> Result<Alumni> {
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
            .fetch_one(&self.pool)
            .await?;

        Ok(alumni)
    }

    async fn list(&self) -> Result<Vec<Alumni>> {
        let alumni = sqlx::query_as::<_, Alumni>(&format!(
            "SELECT {ALUMNI_COLUMNS} FROM alumni ORDER BY passout_year DESC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(alumni)
    }
}
