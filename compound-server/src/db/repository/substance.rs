//! Substance Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Substance, SubstanceCreate, SubstanceStatus, SubstanceUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const SUBSTANCE_TABLE: &str = "substance";

#[derive(Clone)]
pub struct SubstanceRepository {
    base: BaseRepository,
}

impl SubstanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active substances, optionally filtered by name (case-insensitive)
    pub async fn find_active(&self, name_filter: Option<&str>) -> RepoResult<Vec<Substance>> {
        let substances: Vec<Substance> = match name_filter {
            Some(name) if !name.is_empty() => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM substance
                         WHERE status = $status
                           AND string::lowercase(name) CONTAINS string::lowercase($name)
                         ORDER BY number",
                    )
                    .bind(("status", SubstanceStatus::Active))
                    .bind(("name", name.to_string()))
                    .await?
                    .take(0)?
            }
            _ => {
                self.base
                    .db()
                    .query("SELECT * FROM substance WHERE status = $status ORDER BY number")
                    .bind(("status", SubstanceStatus::Active))
                    .await?
                    .take(0)?
            }
        };
        Ok(substances)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Substance>> {
        let substance: Option<Substance> = self.base.db().select(id.clone()).await?;
        Ok(substance)
    }

    /// Create a new substance (enters the catalog as Active)
    pub async fn create(&self, data: SubstanceCreate) -> RepoResult<Substance> {
        let substance = Substance {
            id: None,
            name: data.name,
            description: data.description,
            number: data.number,
            image: data.image,
            status: SubstanceStatus::Active,
        };

        let created: Option<Substance> = self
            .base
            .db()
            .create(SUBSTANCE_TABLE)
            .content(substance)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create substance".to_string()))
    }

    /// Update a substance (partial)
    pub async fn update(&self, id: &RecordId, data: SubstanceUpdate) -> RepoResult<Substance> {
        let mut set_parts: Vec<&str> = Vec::new();

        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.number.is_some() {
            set_parts.push("number = $number");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }

        if set_parts.is_empty() {
            // No fields to update
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Substance {} not found", id)));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("id", id.clone()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.number {
            query = query.bind(("number", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }

        let mut result = query.await?;
        let substances: Vec<Substance> = result.take(0)?;
        substances
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Substance {} not found", id)))
    }

    /// Soft delete: flip status to Archived, never remove the record
    pub async fn archive(&self, id: &RecordId) -> RepoResult<Substance> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("status", SubstanceStatus::Archived))
            .await?;
        let substances: Vec<Substance> = result.take(0)?;
        substances
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Substance {} not found", id)))
    }

    /// Replace the external image reference
    pub async fn set_image(&self, id: &RecordId, image: String) -> RepoResult<Substance> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET image = $image RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("image", image))
            .await?;
        let substances: Vec<Substance> = result.take(0)?;
        substances
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Substance {} not found", id)))
    }
}
