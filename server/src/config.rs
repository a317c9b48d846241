use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Server settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub s3: S3Config,
    pub parser_url: String,
    pub parser_secret: String,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2).
    pub endpoint: Option<String>,
    pub region: String,
    /// Static credentials; the default AWS provider chain is used when unset.
    pub credentials: Option<(String, String)>,
    pub upload_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let credentials = match (
            env::var("S3_ACCESS_KEY_ID").ok(),
            env::var("S3_SECRET_ACCESS_KEY").ok(),
        ) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        };

        Self {
            database_url: required("DATABASE_URL"),
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3000"),
            s3: S3Config {
                bucket: required("S3_BUCKET"),
                endpoint: env::var("S3_ENDPOINT").ok(),
                region: try_load("S3_REGION", "auto"),
                credentials,
                upload_ttl: Duration::from_secs(try_load("S3_UPLOAD_TTL_SECS", "600")),
            },
            parser_url: required("PARSER_URL"),
            parser_secret: env::var("PARSER_SECRET").unwrap_or_default(),
        }
    }
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .unwrap_or_else(|e| panic!("Invalid {key} value '{raw}': {e}"))
}
