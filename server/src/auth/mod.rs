mod crypto;
mod db;
mod extractor;
mod middleware;

pub use extractor::AuthUser;
pub use middleware::require_auth;
