use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::required;
use crate::error::AppError;
use crate::repos::catalog_repo::ReviewRow;
use crate::services::id_codec::IdCodec;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub treatment_id: String,
    #[serde(default)]
    pub disease_id: String,
    #[serde(default)]
    pub opinion: String,
    pub rating: Option<i64>,
}

#[derive(Debug)]
pub struct ValidReview {
    pub treatment_id: String,
    pub disease_id: String,
    pub opinion: String,
    pub rating: i16,
}

impl CreateReviewRequest {
    pub fn validate(self) -> Result<ValidReview, AppError> {
        let treatment_id = required(&self.treatment_id)?;
        let disease_id = required(&self.disease_id)?;
        let opinion = required(&self.opinion)?;
        let rating = self.rating.ok_or(AppError::MissingFields)?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::invalid_input("rating must be between 1 and 5"));
        }

        Ok(ValidReview {
            treatment_id,
            disease_id,
            opinion,
            // range-checked above
            rating: rating as i16,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub treatment_id: String,
    pub disease_id: String,
    pub opinion: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

impl ReviewResponse {
    pub fn from_row(codec: &IdCodec, row: ReviewRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.id)?,
            treatment_id: codec.encode(row.treatment_id)?,
            disease_id: codec.encode(row.disease_id)?,
            opinion: row.opinion,
            rating: row.rating,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewList {
    pub reviews: Vec<ReviewResponse>,
}

#[derive(Debug, Serialize)]
pub struct ReviewItem {
    pub review: ReviewResponse,
}
