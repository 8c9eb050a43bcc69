/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - stores, id codec, credential issuer, access gate, password service
 * - Cheap to clone (everything inside is Arc / Clone-cheap)
 * - The issuer and the gate are built from the SAME TokenCodec, i.e. the same signing key
 */
use std::sync::Arc;

use crate::repos::{CatalogStore, UserStore};
use crate::services::{
    auth::{AccessGate, CredentialIssuer, PasswordService, TokenCodec},
    id_codec::IdCodec,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub id_codec: IdCodec,
    pub passwords: PasswordService,
    pub issuer: Arc<CredentialIssuer>,
    pub gate: Arc<AccessGate>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn CatalogStore>,
        id_codec: IdCodec,
        passwords: PasswordService,
        codec: TokenCodec,
    ) -> Self {
        let codec = Arc::new(codec);
        let issuer = CredentialIssuer::new(users.clone(), passwords.clone(), codec.clone());
        let gate = AccessGate::new(codec, users.clone());

        Self {
            users,
            catalog,
            id_codec,
            passwords,
            issuer: Arc::new(issuer),
            gate: Arc::new(gate),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("users", &self.users.backend_name())
            .field("id_codec", &self.id_codec)
            .finish()
    }
}
