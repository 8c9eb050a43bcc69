use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::required;
use crate::error::AppError;
use crate::repos::catalog_repo::{DiseaseRow, NewDisease};
use crate::services::id_codec::IdCodec;

#[derive(Debug, Deserialize)]
pub struct CreateDiseaseRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CreateDiseaseRequest {
    pub fn validate(self) -> Result<NewDisease, AppError> {
        Ok(NewDisease {
            name: required(&self.name)?,
            description: required(&self.description)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DiseaseResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl DiseaseResponse {
    pub fn from_row(codec: &IdCodec, row: DiseaseRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.id)?,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DiseaseList {
    pub diseases: Vec<DiseaseResponse>,
}

#[derive(Debug, Serialize)]
pub struct DiseaseItem {
    pub disease: DiseaseResponse,
}
