/*
 * Responsibility
 * - Persistence for the disease catalog and field records:
 *   diseases, disease categories, treatments, images, diagnoses, reviews
 * - Only list / get / create (records are append-only through the API)
 * - Internal ids are BIGSERIAL (i64); handlers expose them through IdCodec
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct DiseaseRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDisease {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub disease_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub disease_id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TreatmentRow {
    pub id: i64,
    pub disease_id: i64,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTreatment {
    pub disease_id: i64,
    pub name: String,
    pub description: String,
    pub instructions: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ImageRow {
    pub id: i64,
    // free-form uploader reference; defaults to the caller's email
    pub user_id: String,
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub user_id: String,
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct DiagnosisRow {
    pub id: i64,
    pub user_email: String,
    pub disease_id: i64,
    pub image_id: Option<i64>,
    pub notes: Option<String>,
    pub diagnosed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDiagnosis {
    pub user_email: String,
    pub disease_id: i64,
    pub image_id: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub treatment_id: i64,
    pub disease_id: i64,
    pub opinion: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub treatment_id: i64,
    pub disease_id: i64,
    pub opinion: String,
    pub rating: i16,
}

/// Catalog persistence. Lists are ordered by id (oldest first).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_diseases(&self) -> RepoResult<Vec<DiseaseRow>>;
    async fn get_disease(&self, id: i64) -> RepoResult<Option<DiseaseRow>>;
    async fn create_disease(&self, new: NewDisease, now: DateTime<Utc>) -> RepoResult<DiseaseRow>;

    async fn list_categories(&self) -> RepoResult<Vec<CategoryRow>>;
    async fn get_category(&self, id: i64) -> RepoResult<Option<CategoryRow>>;
    async fn create_category(&self, new: NewCategory, now: DateTime<Utc>)
    -> RepoResult<CategoryRow>;

    async fn list_treatments(&self) -> RepoResult<Vec<TreatmentRow>>;
    async fn get_treatment(&self, id: i64) -> RepoResult<Option<TreatmentRow>>;
    async fn create_treatment(
        &self,
        new: NewTreatment,
        now: DateTime<Utc>,
    ) -> RepoResult<TreatmentRow>;

    async fn list_images(&self) -> RepoResult<Vec<ImageRow>>;
    async fn get_image(&self, id: i64) -> RepoResult<Option<ImageRow>>;
    async fn create_image(&self, new: NewImage, now: DateTime<Utc>) -> RepoResult<ImageRow>;

    async fn list_diagnoses(&self) -> RepoResult<Vec<DiagnosisRow>>;
    async fn get_diagnosis(&self, id: i64) -> RepoResult<Option<DiagnosisRow>>;
    async fn create_diagnosis(
        &self,
        new: NewDiagnosis,
        now: DateTime<Utc>,
    ) -> RepoResult<DiagnosisRow>;

    async fn list_reviews(&self) -> RepoResult<Vec<ReviewRow>>;
    async fn get_review(&self, id: i64) -> RepoResult<Option<ReviewRow>>;
    async fn create_review(&self, new: NewReview, now: DateTime<Utc>) -> RepoResult<ReviewRow>;
}

#[derive(Clone, Debug)]
pub struct PgCatalogRepo {
    pool: PgPool,
}

impl PgCatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogRepo {
    async fn list_diseases(&self) -> RepoResult<Vec<DiseaseRow>> {
        let rows = sqlx::query_as::<_, DiseaseRow>(
            r#"
            SELECT id, name, description, created_at
            FROM diseases
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_disease(&self, id: i64) -> RepoResult<Option<DiseaseRow>> {
        let row = sqlx::query_as::<_, DiseaseRow>(
            r#"
            SELECT id, name, description, created_at
            FROM diseases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_disease(&self, new: NewDisease, now: DateTime<Utc>) -> RepoResult<DiseaseRow> {
        let row = sqlx::query_as::<_, DiseaseRow>(
            r#"
            INSERT INTO diseases (name, description, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(new.name)
        .bind(new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_categories(&self) -> RepoResult<Vec<CategoryRow>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, disease_id, name, description, created_at
            FROM disease_categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_category(&self, id: i64) -> RepoResult<Option<CategoryRow>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, disease_id, name, description, created_at
            FROM disease_categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_category(
        &self,
        new: NewCategory,
        now: DateTime<Utc>,
    ) -> RepoResult<CategoryRow> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO disease_categories (disease_id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, disease_id, name, description, created_at
            "#,
        )
        .bind(new.disease_id)
        .bind(new.name)
        .bind(new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_treatments(&self) -> RepoResult<Vec<TreatmentRow>> {
        let rows = sqlx::query_as::<_, TreatmentRow>(
            r#"
            SELECT id, disease_id, name, description, instructions, created_at
            FROM treatments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_treatment(&self, id: i64) -> RepoResult<Option<TreatmentRow>> {
        let row = sqlx::query_as::<_, TreatmentRow>(
            r#"
            SELECT id, disease_id, name, description, instructions, created_at
            FROM treatments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_treatment(
        &self,
        new: NewTreatment,
        now: DateTime<Utc>,
    ) -> RepoResult<TreatmentRow> {
        let row = sqlx::query_as::<_, TreatmentRow>(
            r#"
            INSERT INTO treatments (disease_id, name, description, instructions, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, disease_id, name, description, instructions, created_at
            "#,
        )
        .bind(new.disease_id)
        .bind(new.name)
        .bind(new.description)
        .bind(new.instructions)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_images(&self) -> RepoResult<Vec<ImageRow>> {
        let rows = sqlx::query_as::<_, ImageRow>(
            r#"
            SELECT id, user_id, url, latitude, longitude, captured_at
            FROM images
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_image(&self, id: i64) -> RepoResult<Option<ImageRow>> {
        let row = sqlx::query_as::<_, ImageRow>(
            r#"
            SELECT id, user_id, url, latitude, longitude, captured_at
            FROM images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_image(&self, new: NewImage, now: DateTime<Utc>) -> RepoResult<ImageRow> {
        let row = sqlx::query_as::<_, ImageRow>(
            r#"
            INSERT INTO images (user_id, url, latitude, longitude, captured_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, url, latitude, longitude, captured_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.url)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_diagnoses(&self) -> RepoResult<Vec<DiagnosisRow>> {
        let rows = sqlx::query_as::<_, DiagnosisRow>(
            r#"
            SELECT id, user_email, disease_id, image_id, notes, diagnosed_at
            FROM diagnoses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_diagnosis(&self, id: i64) -> RepoResult<Option<DiagnosisRow>> {
        let row = sqlx::query_as::<_, DiagnosisRow>(
            r#"
            SELECT id, user_email, disease_id, image_id, notes, diagnosed_at
            FROM diagnoses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_diagnosis(
        &self,
        new: NewDiagnosis,
        now: DateTime<Utc>,
    ) -> RepoResult<DiagnosisRow> {
        let row = sqlx::query_as::<_, DiagnosisRow>(
            r#"
            INSERT INTO diagnoses (user_email, disease_id, image_id, notes, diagnosed_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_email, disease_id, image_id, notes, diagnosed_at
            "#,
        )
        .bind(new.user_email)
        .bind(new.disease_id)
        .bind(new.image_id)
        .bind(new.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_reviews(&self) -> RepoResult<Vec<ReviewRow>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, treatment_id, disease_id, opinion, rating, created_at
            FROM reviews
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_review(&self, id: i64) -> RepoResult<Option<ReviewRow>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, treatment_id, disease_id, opinion, rating, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_review(&self, new: NewReview, now: DateTime<Utc>) -> RepoResult<ReviewRow> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (treatment_id, disease_id, opinion, rating, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, treatment_id, disease_id, opinion, rating, created_at
            "#,
        )
        .bind(new.treatment_id)
        .bind(new.disease_id)
        .bind(new.opinion)
        .bind(new.rating)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
