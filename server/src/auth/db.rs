use crate::db::DbPool;
use crate::schema::sessions;
use chrono::Utc;
use diesel::prelude::*;

use super::crypto::hash_token;

/// Resolve a bearer token to the user id of its live session.
pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Option<String> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    sessions::table
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(sessions::user_id)
        .first(&mut conn)
        .ok()
}
