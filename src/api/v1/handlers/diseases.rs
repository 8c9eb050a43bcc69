/*
 * Responsibility
 * - /diseases handlers
 * - `{id}` arrives as a public id and is decoded by the PublicDiseaseId extractor
 */
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{
    api::v1::{
        dto::{
            Created, Envelope,
            diseases::{CreateDiseaseRequest, DiseaseItem, DiseaseList, DiseaseResponse},
        },
        extractors::{ApiJson, public_id::PublicDiseaseId},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_diseases(
    State(state): State<AppState>,
) -> Result<Json<Envelope<DiseaseList>>, AppError> {
    let rows = state.catalog.list_diseases().await?;

    let mut diseases = Vec::with_capacity(rows.len());
    for row in rows {
        diseases.push(DiseaseResponse::from_row(&state.id_codec, row)?);
    }

    Ok(Json(Envelope::ok(DiseaseList { diseases })))
}

pub async fn create_disease(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDiseaseRequest>,
) -> Result<(StatusCode, Json<Envelope<Created<String>>>), AppError> {
    let new = req.validate()?;
    let row = state.catalog.create_disease(new, Utc::now()).await?;

    let id = state.id_codec.encode(row.id)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("disease created", Created { id })),
    ))
}

pub async fn get_disease(
    State(state): State<AppState>,
    disease_id: PublicDiseaseId,
) -> Result<Json<Envelope<DiseaseItem>>, AppError> {
    let row = state
        .catalog
        .get_disease(disease_id.id)
        .await?
        .ok_or(AppError::NotFound("disease"))?;

    Ok(Json(Envelope::ok(DiseaseItem {
        disease: DiseaseResponse::from_row(&state.id_codec, row)?,
    })))
}
