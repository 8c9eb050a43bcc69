/*
 * Responsibility
 * - /diagnoses handlers
 * - the diagnosing user is the caller from AuthCtx; disease and optional image
 *   references must exist
 */
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{
    api::v1::{
        dto::{
            Created, Envelope,
            diagnoses::{CreateDiagnosisRequest, DiagnosisItem, DiagnosisList, DiagnosisResponse},
        },
        extractors::{ApiJson, AuthCtxExtractor, public_id::PublicDiagnosisId},
        handlers::{decode_ref, unknown_ref},
    },
    error::AppError,
    repos::catalog_repo::NewDiagnosis,
    state::AppState,
};

pub async fn list_diagnoses(
    State(state): State<AppState>,
) -> Result<Json<Envelope<DiagnosisList>>, AppError> {
    let rows = state.catalog.list_diagnoses().await?;

    let mut diagnoses = Vec::with_capacity(rows.len());
    for row in rows {
        diagnoses.push(DiagnosisResponse::from_row(&state.id_codec, row)?);
    }

    Ok(Json(Envelope::ok(DiagnosisList { diagnoses })))
}

pub async fn create_diagnosis(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateDiagnosisRequest>,
) -> Result<(StatusCode, Json<Envelope<Created<String>>>), AppError> {
    let valid = req.validate()?;

    let disease_id = decode_ref(&state, "disease_id", &valid.disease_id)?;
    state
        .catalog
        .get_disease(disease_id)
        .await?
        .ok_or_else(|| unknown_ref("disease_id"))?;

    let image_id = match valid.image_id.as_deref() {
        Some(public_id) => {
            let image_id = decode_ref(&state, "image_id", public_id)?;
            state
                .catalog
                .get_image(image_id)
                .await?
                .ok_or_else(|| unknown_ref("image_id"))?;
            Some(image_id)
        }
        None => None,
    };

    let row = state
        .catalog
        .create_diagnosis(
            NewDiagnosis {
                user_email: ctx.email,
                disease_id,
                image_id,
                notes: valid.notes,
            },
            Utc::now(),
        )
        .await?;

    let id = state.id_codec.encode(row.id)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("diagnosis registered", Created { id })),
    ))
}

pub async fn get_diagnosis(
    State(state): State<AppState>,
    diagnosis_id: PublicDiagnosisId,
) -> Result<Json<Envelope<DiagnosisItem>>, AppError> {
    let row = state
        .catalog
        .get_diagnosis(diagnosis_id.id)
        .await?
        .ok_or(AppError::NotFound("diagnosis"))?;

    Ok(Json(Envelope::ok(DiagnosisItem {
        diagnosis: DiagnosisResponse::from_row(&state.id_codec, row)?,
    })))
}
