/*
 * Responsibility
 * - URL layout of v1
 * - decides which routes sit behind the access gate: registration and login are
 *   public, everything else goes through middleware::auth::access
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{home, login, logout},
    categories::{create_category, get_category, list_categories},
    diagnoses::{create_diagnosis, get_diagnosis, list_diagnoses},
    diseases::{create_disease, get_disease, list_diseases},
    images::{create_image, get_image, list_images},
    reviews::{create_review, get_review, list_reviews},
    treatments::{create_treatment, get_treatment, list_treatments},
    users::{create_user, delete_user_by_email, list_users, update_user_by_email},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/login", post(login))
        .route("/users", post(create_user));

    let protected = Router::new()
        .route("/", get(home))
        .route("/logout", get(logout))
        .route("/users", get(list_users))
        .route(
            "/users/email/{email}",
            put(update_user_by_email).delete(delete_user_by_email),
        )
        .route("/diseases", get(list_diseases).post(create_disease))
        .route("/diseases/{id}", get(get_disease))
        .route(
            "/disease_categories",
            get(list_categories).post(create_category),
        )
        .route("/disease_categories/{id}", get(get_category))
        .route("/treatments", get(list_treatments).post(create_treatment))
        .route("/treatments/{id}", get(get_treatment))
        .route("/images", get(list_images).post(create_image))
        .route("/images/{id}", get(get_image))
        .route("/diagnoses", get(list_diagnoses).post(create_diagnosis))
        .route("/diagnoses/{id}", get(get_diagnosis))
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/reviews/{id}", get(get_review));

    // same path on both sides (/users) merges per method
    public.merge(access::apply(protected, state))
}
