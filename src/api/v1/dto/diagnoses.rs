use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::required;
use crate::error::AppError;
use crate::repos::catalog_repo::DiagnosisRow;
use crate::services::{id_codec::IdCodec, sanitizer};

/// The diagnosing user is never taken from the body; it is the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreateDiagnosisRequest {
    #[serde(default)]
    pub disease_id: String,
    pub image_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct ValidDiagnosis {
    pub disease_id: String,
    pub image_id: Option<String>,
    pub notes: Option<String>,
}

impl CreateDiagnosisRequest {
    pub fn validate(self) -> Result<ValidDiagnosis, AppError> {
        Ok(ValidDiagnosis {
            disease_id: required(&self.disease_id)?,
            image_id: sanitizer::clean_opt(self.image_id.as_deref()),
            notes: sanitizer::clean_opt(self.notes.as_deref()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosisResponse {
    pub id: String,
    pub user_email: String,
    pub disease_id: String,
    pub image_id: Option<String>,
    pub notes: Option<String>,
    pub diagnosed_at: DateTime<Utc>,
}

impl DiagnosisResponse {
    pub fn from_row(codec: &IdCodec, row: DiagnosisRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.id)?,
            user_email: row.user_email,
            disease_id: codec.encode(row.disease_id)?,
            image_id: codec.encode_opt(row.image_id)?,
            notes: row.notes,
            diagnosed_at: row.diagnosed_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosisList {
    pub diagnoses: Vec<DiagnosisResponse>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosisItem {
    pub diagnosis: DiagnosisResponse,
}
