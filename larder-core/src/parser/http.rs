use async_trait::async_trait;
use std::time::Duration;

use super::{ParsedRecipe, RecipeParser};
use crate::error::ParseError;

/// Calls `GET {base}/parse?url=...` on the parsing service, authenticating
/// with a shared secret in the `Authorization` header.
pub struct HttpRecipeParser {
    client: reqwest::Client,
    endpoint: url::Url,
    secret: String,
}

impl HttpRecipeParser {
    pub fn new(base_url: &str, secret: impl Into<String>) -> Result<Self, ParseError> {
        if base_url.trim().is_empty() {
            return Err(ParseError::NotConfigured("PARSER_URL is empty".to_string()));
        }
        let endpoint = url::Url::parse(&format!("{}/parse", base_url.trim_end_matches('/')))
            .map_err(|e| ParseError::NotConfigured(format!("invalid parser url: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            secret: secret.into(),
        })
    }

    fn request_url(&self, recipe_url: &str) -> Result<url::Url, ParseError> {
        let parsed =
            url::Url::parse(recipe_url).map_err(|e| ParseError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ParseError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut endpoint = self.endpoint.clone();
        endpoint.query_pairs_mut().append_pair("url", recipe_url);
        Ok(endpoint)
    }
}

#[async_trait]
impl RecipeParser for HttpRecipeParser {
    async fn parse(&self, url: &str) -> Result<ParsedRecipe, ParseError> {
        let request_url = self.request_url(url)?;

        let response = self
            .client
            .get(request_url)
            .header(reqwest::header::AUTHORIZATION, &self.secret)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Parser rejected recipe url");
            return Err(ParseError::Status(status.as_u16()));
        }

        Ok(response.json::<ParsedRecipe>().await?)
    }
}
