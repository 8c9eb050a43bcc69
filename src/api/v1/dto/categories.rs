use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::required;
use crate::error::AppError;
use crate::repos::catalog_repo::CategoryRow;
use crate::services::id_codec::IdCodec;

/// `disease_id` is a public id; the handler decodes it and checks that it exists.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub disease_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug)]
pub struct ValidCategory {
    pub disease_id: String,
    pub name: String,
    pub description: String,
}

impl CreateCategoryRequest {
    pub fn validate(self) -> Result<ValidCategory, AppError> {
        Ok(ValidCategory {
            disease_id: required(&self.disease_id)?,
            name: required(&self.name)?,
            description: required(&self.description)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub disease_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl CategoryResponse {
    pub fn from_row(codec: &IdCodec, row: CategoryRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.id)?,
            disease_id: codec.encode(row.disease_id)?,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub disease_categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize)]
pub struct CategoryItem {
    pub disease_category: CategoryResponse,
}
