use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{
    api::v1::{
        dto::{
            Created, Envelope,
            reviews::{CreateReviewRequest, ReviewItem, ReviewList, ReviewResponse},
        },
        extractors::{ApiJson, public_id::PublicReviewId},
        handlers::{decode_ref, unknown_ref},
    },
    error::AppError,
    repos::catalog_repo::NewReview,
    state::AppState,
};

pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Envelope<ReviewList>>, AppError> {
    let rows = state.catalog.list_reviews().await?;

    let mut reviews = Vec::with_capacity(rows.len());
    for row in rows {
        reviews.push(ReviewResponse::from_row(&state.id_codec, row)?);
    }

    Ok(Json(Envelope::ok(ReviewList { reviews })))
}

pub async fn create_review(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Envelope<Created<String>>>), AppError> {
    let valid = req.validate()?;

    let treatment_id = decode_ref(&state, "treatment_id", &valid.treatment_id)?;
    let disease_id = decode_ref(&state, "disease_id", &valid.disease_id)?;
    state
        .catalog
        .get_treatment(treatment_id)
        .await?
        .ok_or_else(|| unknown_ref("treatment_id"))?;
    state
        .catalog
        .get_disease(disease_id)
        .await?
        .ok_or_else(|| unknown_ref("disease_id"))?;

    let row = state
        .catalog
        .create_review(
            NewReview {
                treatment_id,
                disease_id,
                opinion: valid.opinion,
                rating: valid.rating,
            },
            Utc::now(),
        )
        .await?;

    let id = state.id_codec.encode(row.id)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("review registered", Created { id })),
    ))
}

pub async fn get_review(
    State(state): State<AppState>,
    review_id: PublicReviewId,
) -> Result<Json<Envelope<ReviewItem>>, AppError> {
    let row = state
        .catalog
        .get_review(review_id.id)
        .await?
        .ok_or(AppError::NotFound("review"))?;

    Ok(Json(Envelope::ok(ReviewItem {
        review: ReviewResponse::from_row(&state.id_codec, row)?,
    })))
}
