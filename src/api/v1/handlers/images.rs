use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{
    api::v1::{
        dto::{
            Created, Envelope,
            images::{CreateImageRequest, ImageItem, ImageList, ImageResponse},
        },
        extractors::{ApiJson, AuthCtxExtractor, public_id::PublicImageId},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Envelope<ImageList>>, AppError> {
    let rows = state.catalog.list_images().await?;

    let mut images = Vec::with_capacity(rows.len());
    for row in rows {
        images.push(ImageResponse::from_row(&state.id_codec, row)?);
    }

    Ok(Json(Envelope::ok(ImageList { images })))
}

pub async fn create_image(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateImageRequest>,
) -> Result<(StatusCode, Json<Envelope<Created<String>>>), AppError> {
    let new = req.validate(&ctx.email)?;
    let row = state.catalog.create_image(new, Utc::now()).await?;

    let id = state.id_codec.encode(row.id)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("image registered", Created { id })),
    ))
}

pub async fn get_image(
    State(state): State<AppState>,
    image_id: PublicImageId,
) -> Result<Json<Envelope<ImageItem>>, AppError> {
    let row = state
        .catalog
        .get_image(image_id.id)
        .await?
        .ok_or(AppError::NotFound("image"))?;

    Ok(Json(Envelope::ok(ImageItem {
        image: ImageResponse::from_row(&state.id_codec, row)?,
    })))
}
