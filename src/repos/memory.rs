//! In-memory implementation of `UserStore` and `CatalogStore`.
//!
//! Used when `DATABASE_URL` is not configured and by the tests.
//! - Not durable: everything is lost on restart.
//! - Single-process consistency only: maps live behind `tokio::sync::RwLock`,
//!   reads share the lock and writes take it exclusively.
//! - Catalog ids are assigned per table starting at 1, like BIGSERIAL.
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::catalog_repo::{
    CatalogStore, CategoryRow, DiagnosisRow, DiseaseRow, ImageRow, NewCategory, NewDiagnosis,
    NewDisease, NewImage, NewReview, NewTreatment, ReviewRow, TreatmentRow,
};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{
    DEFAULT_ACCOUNT_STATUS, DEFAULT_ACCOUNT_TYPE, NewUser, UserPatch, UserRow, UserStore,
};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    // keyed by email
    users: RwLock<HashMap<String, UserRow>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        let mut rows: Vec<UserRow> = self.users.read().await.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.registered_at
                .cmp(&a.registered_at)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(rows)
    }

    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepoResult<UserRow> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(RepoError::Conflict("email"));
        }

        let row = UserRow {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            paternal_surname: user.paternal_surname,
            maternal_surname: user.maternal_surname,
            address: user.address,
            registered_at: now,
            account_type: DEFAULT_ACCOUNT_TYPE.to_string(),
            account_status: DEFAULT_ACCOUNT_STATUS.to_string(),
            account_modified_at: now,
        };
        users.insert(row.email.clone(), row.clone());
        Ok(row)
    }

    async fn update_by_email(
        &self,
        email: &str,
        patch: UserPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRow>> {
        let mut users = self.users.write().await;
        let Some(row) = users.get_mut(email) else {
            return Ok(None);
        };
        patch.apply(row, now);
        Ok(Some(row.clone()))
    }

    async fn delete_by_email(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.write().await.remove(email).is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// One catalog table: rows ordered by id, plus the next id to hand out.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn list(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    diseases: RwLock<Table<DiseaseRow>>,
    categories: RwLock<Table<CategoryRow>>,
    treatments: RwLock<Table<TreatmentRow>>,
    images: RwLock<Table<ImageRow>>,
    diagnoses: RwLock<Table<DiagnosisRow>>,
    reviews: RwLock<Table<ReviewRow>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_diseases(&self) -> RepoResult<Vec<DiseaseRow>> {
        Ok(self.diseases.read().await.list())
    }

    async fn get_disease(&self, id: i64) -> RepoResult<Option<DiseaseRow>> {
        Ok(self.diseases.read().await.get(id))
    }

    async fn create_disease(&self, new: NewDisease, now: DateTime<Utc>) -> RepoResult<DiseaseRow> {
        Ok(self.diseases.write().await.insert_with(|id| DiseaseRow {
            id,
            name: new.name,
            description: new.description,
            created_at: now,
        }))
    }

    async fn list_categories(&self) -> RepoResult<Vec<CategoryRow>> {
        Ok(self.categories.read().await.list())
    }

    async fn get_category(&self, id: i64) -> RepoResult<Option<CategoryRow>> {
        Ok(self.categories.read().await.get(id))
    }

    async fn create_category(
        &self,
        new: NewCategory,
        now: DateTime<Utc>,
    ) -> RepoResult<CategoryRow> {
        Ok(self.categories.write().await.insert_with(|id| CategoryRow {
            id,
            disease_id: new.disease_id,
            name: new.name,
            description: new.description,
            created_at: now,
        }))
    }

    async fn list_treatments(&self) -> RepoResult<Vec<TreatmentRow>> {
        Ok(self.treatments.read().await.list())
    }

    async fn get_treatment(&self, id: i64) -> RepoResult<Option<TreatmentRow>> {
        Ok(self.treatments.read().await.get(id))
    }

    async fn create_treatment(
        &self,
        new: NewTreatment,
        now: DateTime<Utc>,
    ) -> RepoResult<TreatmentRow> {
        Ok(self.treatments.write().await.insert_with(|id| TreatmentRow {
            id,
            disease_id: new.disease_id,
            name: new.name,
            description: new.description,
            instructions: new.instructions,
            created_at: now,
        }))
    }

    async fn list_images(&self) -> RepoResult<Vec<ImageRow>> {
        Ok(self.images.read().await.list())
    }

    async fn get_image(&self, id: i64) -> RepoResult<Option<ImageRow>> {
        Ok(self.images.read().await.get(id))
    }

    async fn create_image(&self, new: NewImage, now: DateTime<Utc>) -> RepoResult<ImageRow> {
        Ok(self.images.write().await.insert_with(|id| ImageRow {
            id,
            user_id: new.user_id,
            url: new.url,
            latitude: new.latitude,
            longitude: new.longitude,
            captured_at: now,
        }))
    }

    async fn list_diagnoses(&self) -> RepoResult<Vec<DiagnosisRow>> {
        Ok(self.diagnoses.read().await.list())
    }

    async fn get_diagnosis(&self, id: i64) -> RepoResult<Option<DiagnosisRow>> {
        Ok(self.diagnoses.read().await.get(id))
    }

    async fn create_diagnosis(
        &self,
        new: NewDiagnosis,
        now: DateTime<Utc>,
    ) -> RepoResult<DiagnosisRow> {
        Ok(self.diagnoses.write().await.insert_with(|id| DiagnosisRow {
            id,
            user_email: new.user_email,
            disease_id: new.disease_id,
            image_id: new.image_id,
            notes: new.notes,
            diagnosed_at: now,
        }))
    }

    async fn list_reviews(&self) -> RepoResult<Vec<ReviewRow>> {
        Ok(self.reviews.read().await.list())
    }

    async fn get_review(&self, id: i64) -> RepoResult<Option<ReviewRow>> {
        Ok(self.reviews.read().await.get(id))
    }

    async fn create_review(&self, new: NewReview, now: DateTime<Utc>) -> RepoResult<ReviewRow> {
        Ok(self.reviews.write().await.insert_with(|id| ReviewRow {
            id,
            treatment_id: new.treatment_id,
            disease_id: new.disease_id,
            opinion: new.opinion,
            rating: new.rating,
            created_at: now,
        }))
    }
}
