//! Repository for the plain content records
//!
//! These tables are filled through the admin site; the service reads them
//! and accepts "Contact Us" submissions.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::content::{
    About, Activity, CarouselImage, Contact, Ctf, DevPost, Facad, Linit, LinitEdition, LinitImage,
    NewContact, SiteConfig, Sponsor, TechBytes,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_about(&self, identifier: &str) -> Result<Option<About>>;

    async fn list_activities(&self) -> Result<Vec<Activity>>;

    async fn list_carousel(&self) -> Result<Vec<CarouselImage>>;

    /// Magazine editions, newest first, each with its images
    async fn list_linit_editions(&self) -> Result<Vec<LinitEdition>>;

    async fn list_sponsors(&self) -> Result<Vec<Sponsor>>;

    /// Newest first
    async fn list_techbytes(&self) -> Result<Vec<TechBytes>>;

    /// Newest first
    async fn list_devposts(&self) -> Result<Vec<DevPost>>;

    async fn list_ctfs(&self) -> Result<Vec<Ctf>>;

    async fn list_facads(&self) -> Result<Vec<Facad>>;

    async fn list_enabled_configs(&self) -> Result<Vec<SiteConfig>>;

    async fn create_contact(&self, contact: NewContact) -> Result<Contact>;
}

/// Attach images to their editions, keeping the edition order
pub(crate) fn group_linit_images(linits: Vec<Linit>, images: Vec<LinitImage>) -> Vec<LinitEdition> {
    let mut by_linit: HashMap<i64, Vec<LinitImage>> = HashMap::new();
    for image in images {
        by_linit.entry(image.linit_id).or_default().push(image);
    }

    linits
        .into_iter()
        .map(|linit| LinitEdition {
            images: by_linit.remove(&linit.id).unwrap_or_default(),
            linit,
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn find_about(&self, identifier: &str) -> Result<Option<About>> {
        let about = sqlx::query_as::<_, About>(
            "SELECT id, identifier, heading, content FROM abouts WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(about)
    }

    async fn list_activities(&self) -> Result<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT id, title, description, image FROM activities ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn list_carousel(&self) -> Result<Vec<CarouselImage>> {
        let images = sqlx::query_as::<_, CarouselImage>(
            r#"
            SELECT id, identifier, image, mobile_image, heading, sub_heading
            FROM carousel_images
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn list_linit_editions(&self) -> Result<Vec<LinitEdition>> {
        let linits = sqlx::query_as::<_, Linit>(
            r#"
            SELECT id, title, description, image, year_edition
            FROM linits
            ORDER BY year_edition DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let images = sqlx::query_as::<_, LinitImage>(
            "SELECT id, linit_id, image FROM linit_images ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(group_linit_images(linits, images))
    }

    async fn list_sponsors(&self) -> Result<Vec<Sponsor>> {
        let sponsors = sqlx::query_as::<_, Sponsor>(
            "SELECT id, name, logo, website FROM sponsors ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sponsors)
    }

    async fn list_techbytes(&self) -> Result<Vec<TechBytes>> {
        let posts = sqlx::query_as::<_, TechBytes>(
            "SELECT id, title, image, body, link, pub_date FROM techbytes ORDER BY pub_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_devposts(&self) -> Result<Vec<DevPost>> {
        let posts = sqlx::query_as::<_, DevPost>(
            "SELECT id, title, image, dev_link, body, pub_date FROM devposts ORDER BY pub_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_ctfs(&self) -> Result<Vec<Ctf>> {
        let ctfs = sqlx::query_as::<_, Ctf>(
            "SELECT id, name, photo, link, description, created_at FROM ctfs ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ctfs)
    }

    async fn list_facads(&self) -> Result<Vec<Facad>> {
        let facads = sqlx::query_as::<_, Facad>(
            r#"
            SELECT id, post, first_name, last_name, linkedin_link, email, image
            FROM facads
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(facads)
    }

    async fn list_enabled_configs(&self) -> Result<Vec<SiteConfig>> {
        let configs = sqlx::query_as::<_, SiteConfig>(
            "SELECT id, key, value, enable FROM site_configs WHERE enable ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(configs)
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, email, phone_number, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone_number, message
            "#,
        )
        .bind(contact.name)
        .bind(contact.email)
        .bind(contact.phone_number)
        .bind(contact.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }
}
