use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{
    api::v1::{
        dto::{
            Created, Envelope,
            treatments::{CreateTreatmentRequest, TreatmentItem, TreatmentList, TreatmentResponse},
        },
        extractors::{ApiJson, public_id::PublicTreatmentId},
        handlers::{decode_ref, unknown_ref},
    },
    error::AppError,
    repos::catalog_repo::NewTreatment,
    state::AppState,
};

pub async fn list_treatments(
    State(state): State<AppState>,
) -> Result<Json<Envelope<TreatmentList>>, AppError> {
    let rows = state.catalog.list_treatments().await?;

    let mut treatments = Vec::with_capacity(rows.len());
    for row in rows {
        treatments.push(TreatmentResponse::from_row(&state.id_codec, row)?);
    }

    Ok(Json(Envelope::ok(TreatmentList { treatments })))
}

pub async fn create_treatment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTreatmentRequest>,
) -> Result<(StatusCode, Json<Envelope<Created<String>>>), AppError> {
    let valid = req.validate()?;

    let disease_id = decode_ref(&state, "disease_id", &valid.disease_id)?;
    state
        .catalog
        .get_disease(disease_id)
        .await?
        .ok_or_else(|| unknown_ref("disease_id"))?;

    let row = state
        .catalog
        .create_treatment(
            NewTreatment {
                disease_id,
                name: valid.name,
                description: valid.description,
                instructions: valid.instructions,
            },
            Utc::now(),
        )
        .await?;

    let id = state.id_codec.encode(row.id)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("treatment created", Created { id })),
    ))
}

pub async fn get_treatment(
    State(state): State<AppState>,
    treatment_id: PublicTreatmentId,
) -> Result<Json<Envelope<TreatmentItem>>, AppError> {
    let row = state
        .catalog
        .get_treatment(treatment_id.id)
        .await?
        .ok_or(AppError::NotFound("treatment"))?;

    Ok(Json(Envelope::ok(TreatmentItem {
        treatment: TreatmentResponse::from_row(&state.id_codec, row)?,
    })))
}
