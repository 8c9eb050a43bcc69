/*
 * Responsibility
 * - users persistence: the lookup interface used by the credential issuer and the access gate
 *   (find_by_email / exists) plus the CRUD used by /users handlers
 * - UserStore trait so the backend can be Postgres (PgUserRepo) or memory (repos::memory)
 * - email is the lookup key and is unique
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

pub const DEFAULT_ACCOUNT_TYPE: &str = "standard";
pub const DEFAULT_ACCOUNT_STATUS: &str = "active";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    // Argon2 PHC string, never the plain password
    pub password_hash: String,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub address: String,
    pub registered_at: DateTime<Utc>,
    pub account_type: String,
    pub account_status: String,
    pub account_modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub address: String,
}

/// Partial profile update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub(crate) fn apply(self, row: &mut UserRow, now: DateTime<Utc>) {
        if let Some(v) = self.first_name {
            row.first_name = v;
        }
        if let Some(v) = self.paternal_surname {
            row.paternal_surname = v;
        }
        if let Some(v) = self.maternal_surname {
            row.maternal_surname = v;
        }
        if let Some(v) = self.address {
            row.address = v;
        }
        if let Some(v) = self.password_hash {
            row.password_hash = v;
        }
        row.account_modified_at = now;
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>>;

    async fn exists(&self, email: &str) -> RepoResult<bool>;

    // Newest first.
    async fn list(&self) -> RepoResult<Vec<UserRow>>;

    // Fails with `RepoError::Conflict("email")` when the email is taken.
    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepoResult<UserRow>;

    // Also bumps `account_modified_at` to `now`. Ok(None) when the email is unknown.
    async fn update_by_email(
        &self,
        email: &str,
        patch: UserPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRow>>;

    async fn delete_by_email(&self, email: &str) -> RepoResult<bool>;

    fn backend_name(&self) -> &'static str;
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id, email, password_hash, first_name, paternal_surname, maternal_surname,
                address, registered_at, account_type, account_status, account_modified_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn exists(&self, email: &str) -> RepoResult<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id, email, password_hash, first_name, paternal_surname, maternal_surname,
                address, registered_at, account_type, account_status, account_modified_at
            FROM users
            ORDER BY registered_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepoResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                email, password_hash, first_name, paternal_surname, maternal_surname, address,
                registered_at, account_type, account_status, account_modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $7)
            RETURNING
                id, email, password_hash, first_name, paternal_surname, maternal_surname,
                address, registered_at, account_type, account_status, account_modified_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.paternal_surname)
        .bind(&user.maternal_surname)
        .bind(&user.address)
        .bind(now)
        .bind(DEFAULT_ACCOUNT_TYPE)
        .bind(DEFAULT_ACCOUNT_STATUS)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::from_sqlx(e, "email"))?;

        Ok(row)
    }

    async fn update_by_email(
        &self,
        email: &str,
        patch: UserPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                first_name = COALESCE($2, first_name),
                paternal_surname = COALESCE($3, paternal_surname),
                maternal_surname = COALESCE($4, maternal_surname),
                address = COALESCE($5, address),
                password_hash = COALESCE($6, password_hash),
                account_modified_at = $7
            WHERE email = $1
            RETURNING
                id, email, password_hash, first_name, paternal_surname, maternal_surname,
                address, registered_at, account_type, account_status, account_modified_at
            "#,
        )
        .bind(email)
        .bind(patch.first_name)
        .bind(patch.paternal_surname)
        .bind(patch.maternal_surname)
        .bind(patch.address)
        .bind(patch.password_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_by_email(&self, email: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
