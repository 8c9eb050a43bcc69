/*
 * Responsibility
 * - Images DTOs
 * - coordinate range checks (latitude [-90, 90], longitude [-180, 180])
 * - `user_id` falls back to the caller; the capture timestamp is always the server's
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::required;
use crate::error::AppError;
use crate::repos::catalog_repo::{ImageRow, NewImage};
use crate::services::{id_codec::IdCodec, sanitizer};

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn validate(self) -> Result<Self, AppError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::invalid_input(
                "latitude must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::invalid_input(
                "longitude must be between -180 and 180",
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateImageRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub url: String,
    pub coordinates: Option<Coordinates>,
}

impl CreateImageRequest {
    pub fn validate(self, caller_email: &str) -> Result<NewImage, AppError> {
        let url = required(&self.url)?;
        let coordinates = self.coordinates.ok_or(AppError::MissingFields)?.validate()?;
        let user_id = sanitizer::clean_opt(self.user_id.as_deref())
            .unwrap_or_else(|| caller_email.to_string());

        Ok(NewImage {
            user_id,
            url,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub coordinates: Coordinates,
    pub captured_at: DateTime<Utc>,
}

impl ImageResponse {
    pub fn from_row(codec: &IdCodec, row: ImageRow) -> Result<Self, AppError> {
        Ok(Self {
            id: codec.encode(row.id)?,
            user_id: row.user_id,
            url: row.url,
            coordinates: Coordinates {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            captured_at: row.captured_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ImageList {
    pub images: Vec<ImageResponse>,
}

#[derive(Debug, Serialize)]
pub struct ImageItem {
    pub image: ImageResponse,
}
