use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::required;
use crate::error::AppError;
use crate::repos::catalog_repo::TreatmentRow;
use crate::services::id_codec::IdCodec;

#[derive(Debug, Deserialize)]
pub struct CreateTreatmentRequest {
    #[serde(default)]
    pub disease_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug)]
pub struct ValidTreatment {
    pub disease_id: String,
    pub name: String,
    pub description: String,
    pub instructions: String,
}

impl CreateTreatmentRequest {
    pub fn validate(self) -> Result<ValidTreatment, AppError> {
        Ok(ValidTreatment {
            disease_id: required(&self.disease_id)?,
            name: required(&self.name)?,
            description: required(&self.description)?,
            instructions: required(&self.instructions)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TreatmentResponse {
    pub id: String,
    pub disease_id: String,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
}

impl TreatmentResponse {
    pub fn from_row(codec: &IdCodec, row: TreatmentRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.id)?,
            disease_id: codec.encode(row.disease_id)?,
            name: row.name,
            description: row.description,
            instructions: row.instructions,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TreatmentList {
    pub treatments: Vec<TreatmentResponse>,
}

#[derive(Debug, Serialize)]
pub struct TreatmentItem {
    pub treatment: TreatmentResponse,
}
