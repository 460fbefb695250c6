//! One-way credential hashing for seeded users

use crate::error::{MigrateError, MigrateResult};

/// bcrypt cost factor, matching what the API verifies against
pub const HASH_COST: u32 = 10;

/// Hash a plaintext password off the async runtime
pub async fn hash_password(plain: &str) -> MigrateResult<String> {
    let plain = plain.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, HASH_COST))
        .await
        .map_err(|e| MigrateError::Hash(e.to_string()))?
        .map_err(|e| MigrateError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored hash
pub fn verify_password(plain: &str, hash: &str) -> MigrateResult<bool> {
    bcrypt::verify(plain, hash).map_err(|e| MigrateError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_is_not_plaintext() {
        let hash = hash_password("password123").await.unwrap();
        assert_ne!(hash, "password123");
        assert!(hash.starts_with("$2"));
        assert!(hash.contains("$10$"));
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("test123456").await.unwrap();
        let b = hash_password("test123456").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }
}
