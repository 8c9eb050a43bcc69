use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{
    api::v1::{
        dto::{
            Created, Envelope,
            categories::{CategoryItem, CategoryList, CategoryResponse, CreateCategoryRequest},
        },
        extractors::{ApiJson, public_id::PublicCategoryId},
        handlers::{decode_ref, unknown_ref},
    },
    error::AppError,
    repos::catalog_repo::NewCategory,
    state::AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Envelope<CategoryList>>, AppError> {
    let rows = state.catalog.list_categories().await?;

    let mut disease_categories = Vec::with_capacity(rows.len());
    for row in rows {
        disease_categories.push(CategoryResponse::from_row(&state.id_codec, row)?);
    }

    Ok(Json(Envelope::ok(CategoryList { disease_categories })))
}

pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
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
        .create_category(
            NewCategory {
                disease_id,
                name: valid.name,
                description: valid.description,
            },
            Utc::now(),
        )
        .await?;

    let id = state.id_codec.encode(row.id)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "disease category created",
            Created { id },
        )),
    ))
}

pub async fn get_category(
    State(state): State<AppState>,
    category_id: PublicCategoryId,
) -> Result<Json<Envelope<CategoryItem>>, AppError> {
    let row = state
        .catalog
        .get_category(category_id.id)
        .await?
        .ok_or(AppError::NotFound("disease category"))?;

    Ok(Json(Envelope::ok(CategoryItem {
        disease_category: CategoryResponse::from_row(&state.id_codec, row)?,
    })))
}
