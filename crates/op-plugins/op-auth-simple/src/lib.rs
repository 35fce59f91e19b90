//! # op-auth-simple
//!
//! Argon2-based implementation of `AuthProvider`.
//! Handles password storage and salted-signature session tokens.
//!
//! Tokens are `<user-id>.<signature>` where the signature is a SHA-256 over
//! the session salt and the user id. They carry identity only; the caller
//! resolves the current role from the user store on every request, so a role
//! change takes effect immediately.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use op_core::traits::AuthProvider;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub struct SimpleAuthProvider {
    /// Secret used to sign session tokens. Rotating it logs everyone out.
    session_salt: String,
}

impl SimpleAuthProvider {
    /// Accepts a salt string (e.g., from an environment variable).
    pub fn new(salt: &str) -> Self {
        Self {
            session_salt: salt.to_string(),
        }
    }

    fn sign(&self, user_id: Uuid) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.session_salt.as_bytes());
        hasher.update(b".");
        hasher.update(user_id.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    fn issue_token(&self, user_id: Uuid) -> String {
        format!("{}.{}", user_id, self.sign(user_id))
    }

    fn verify_token(&self, token: &str) -> Option<Uuid> {
        let (id, signature) = token.split_once('.')?;
        let user_id = Uuid::parse_str(id).ok()?;
        if signature == self.sign(user_id) {
            Some(user_id)
        } else {
            None
        }
    }

    fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
        Ok(hash.to_string())
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let auth = SimpleAuthProvider::new("unit-test-salt");
        let user_id = Uuid::now_v7();
        let token = auth.issue_token(user_id);
        assert_eq!(auth.verify_token(&token), Some(user_id));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let auth = SimpleAuthProvider::new("unit-test-salt");
        let token = auth.issue_token(Uuid::now_v7());

        let mut forged = token.clone();
        forged.pop();
        forged.push('0');
        assert_eq!(auth.verify_token(&forged), None);

        // A token signed under a different salt fails too.
        let other = SimpleAuthProvider::new("other-salt");
        assert_eq!(other.verify_token(&token), None);

        assert_eq!(auth.verify_token("not-even-a-token"), None);
    }

    #[tokio::test]
    async fn password_hash_and_verify() {
        let auth = SimpleAuthProvider::new("unit-test-salt");
        let hash = auth.hash_password("correct horse battery").unwrap();
        assert!(auth.verify_password("correct horse battery", &hash).await);
        assert!(!auth.verify_password("wrong guess", &hash).await);
        assert!(!auth.verify_password("anything", "not-a-phc-string").await);
    }
}
