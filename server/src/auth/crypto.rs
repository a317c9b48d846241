use sha2::{Digest, Sha256};

/// Session tokens are stored as the hex SHA-256 of the bearer value.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
