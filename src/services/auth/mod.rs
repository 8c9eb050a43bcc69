pub mod access_gate;
pub mod credential_issuer;
pub mod jwt;
pub mod password;
pub mod signing_key;

pub use access_gate::{AccessGate, GateRejection};
pub use credential_issuer::{CredentialIssuer, IssuedToken};
pub use jwt::TokenCodec;
pub use password::PasswordService;
pub use signing_key::SigningKey;
