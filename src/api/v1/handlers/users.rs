/*
 * Responsibility
 * - /users handlers (registration is public, everything else is gated)
 * - users are addressed by email and keep UUID ids (no public-id encoding)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::{
            Created, Empty, Envelope,
            users::{CreateUserRequest, UpdateUserRequest, UserItem, UserList, UserResponse},
        },
        extractors::{ApiJson, AuthCtxExtractor},
    },
    error::AppError,
    repos::user_repo::{NewUser, UserPatch},
    services::sanitizer,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Envelope<UserList>>, AppError> {
    let rows = state.users.list().await?;
    let users = rows.into_iter().map(UserResponse::from).collect();

    Ok(Json(Envelope::ok(UserList { users })))
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Envelope<Created<Uuid>>>), AppError> {
    let valid = req.validate()?;

    // skip the hashing cost for an obvious duplicate; the unique index still decides races
    if state.users.exists(&valid.email).await? {
        return Err(AppError::AlreadyExists("email"));
    }

    let password_hash = state.passwords.hash(valid.password).await?;
    let row = state
        .users
        .create(
            NewUser {
                email: valid.email,
                password_hash,
                first_name: valid.first_name,
                paternal_surname: valid.paternal_surname,
                maternal_surname: valid.maternal_surname,
                address: valid.address,
            },
            Utc::now(),
        )
        .await?;

    info!(user_id = %row.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("user created", Created { id: row.id })),
    ))
}

pub async fn update_user_by_email(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(email): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<Envelope<UserItem>>, AppError> {
    let email = sanitizer::clean(&email);
    let update = req.validate()?;

    let password_hash = match update.password {
        Some(plain) => Some(state.passwords.hash(plain).await?),
        None => None,
    };
    let patch = UserPatch {
        first_name: update.first_name,
        paternal_surname: update.paternal_surname,
        maternal_surname: update.maternal_surname,
        address: update.address,
        password_hash,
    };

    let row = state
        .users
        .update_by_email(&email, patch, Utc::now())
        .await?
        .ok_or(AppError::NotFound("user"))?;

    info!(user_id = %row.id, by = %ctx.email, "user updated");
    Ok(Json(Envelope::with_message(
        "user updated",
        UserItem {
            user: UserResponse::from(row),
        },
    )))
}

pub async fn delete_user_by_email(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(email): Path<String>,
) -> Result<Json<Envelope<Empty>>, AppError> {
    let email = sanitizer::clean(&email);

    if !state.users.delete_by_email(&email).await? {
        return Err(AppError::NotFound("user"));
    }

    info!(by = %ctx.email, "user deleted");
    Ok(Json(Envelope::message("user deleted")))
}
