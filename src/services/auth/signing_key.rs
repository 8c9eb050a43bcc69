/*
 * Responsibility
 * - The HMAC secret that signs and verifies access tokens
 * - Generated once per process from the OS RNG and only ever held in memory:
 *   a restart means a new key, so every previously issued token stops verifying
 * - Tests build it from fixed bytes
 */
use std::fmt;

pub const SIGNING_KEY_LEN: usize = 32;

#[derive(Clone)]
pub struct SigningKey {
    bytes: [u8; SIGNING_KEY_LEN],
}

impl SigningKey {
    pub fn generate() -> Result<Self, getrandom::Error> {
        let mut bytes = [0u8; SIGNING_KEY_LEN];
        getrandom::fill(&mut bytes)?;
        Ok(Self { bytes })
    }

    #[cfg(test)]
    pub fn from_bytes(bytes: [u8; SIGNING_KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// Key material must never reach logs.
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}
