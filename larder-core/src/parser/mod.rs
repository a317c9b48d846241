//! Client for the external recipe-parsing service.
//!
//! The service takes a recipe page URL and returns its title, description,
//! image, ingredients, instructions and times. Its output is turned into an
//! unsaved [`RecipeDraft`] the create form can be prefilled with.

mod fake;
mod http;

pub use fake::FakeParser;
pub use http::HttpRecipeParser;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{numbered, RecipeDraft, SiteInfo};

/// Recipe as returned by the parsing service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecipe {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions_list: Vec<String>,
    #[serde(default)]
    pub prep_time: Option<f64>,
    #[serde(default)]
    pub cook_time: Option<f64>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Prefill data for the create form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InitialData {
    #[serde(flatten)]
    pub recipe: RecipeDraft,
    pub url_source_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ParsedRecipeForm {
    pub site_info: SiteInfo,
    pub initial_data: InitialData,
}

#[async_trait]
pub trait RecipeParser: Send + Sync {
    async fn parse(&self, url: &str) -> Result<ParsedRecipe, ParseError>;
}

impl ParsedRecipe {
    /// Shape the parser output into form prefill for `source_url`.
    ///
    /// Parsed recipes start private with no taxonomy; every line is a plain
    /// (non-header) item in the order the service returned it.
    pub fn into_form(self, source_url: &str) -> ParsedRecipeForm {
        ParsedRecipeForm {
            site_info: SiteInfo {
                url: source_url.to_string(),
                author: self.author,
            },
            initial_data: InitialData {
                recipe: RecipeDraft {
                    name: self.title,
                    description: self.description.unwrap_or_default(),
                    prep_time: self.prep_time,
                    cook_time: self.cook_time,
                    is_public: false,
                    ingredients: numbered(self.ingredients),
                    steps: numbered(self.instructions_list),
                    ..Default::default()
                },
                url_source_image: self.image,
            },
        }
    }
}

/// Fetch and shape a recipe for the create form.
pub async fn parse_for_form(
    parser: &dyn RecipeParser,
    url: &str,
) -> Result<ParsedRecipeForm, ParseError> {
    let parsed = parser.parse(url).await?;
    tracing::info!(
        url,
        ingredients = parsed.ingredients.len(),
        steps = parsed.instructions_list.len(),
        "Parsed recipe"
    );
    Ok(parsed.into_form(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed() -> ParsedRecipe {
        ParsedRecipe {
            title: "Dal".to_string(),
            description: Some("Weeknight lentils".to_string()),
            image: Some("https://site.example/dal.jpg".to_string()),
            ingredients: vec!["1 cup lentils".to_string(), "1 onion".to_string()],
            instructions_list: vec!["Rinse".to_string(), "Simmer".to_string(), "Temper".to_string()],
            prep_time: Some(10.0),
            cook_time: Some(30.0),
            author: Some("Asha".to_string()),
        }
    }

    #[test]
    fn test_into_form_maps_fields() {
        let form = parsed().into_form("https://site.example/dal");
        assert_eq!(form.site_info.url, "https://site.example/dal");
        assert_eq!(form.site_info.author.as_deref(), Some("Asha"));

        let data = form.initial_data;
        assert_eq!(data.recipe.name, "Dal");
        assert_eq!(data.recipe.ingredients.len(), 2);
        assert_eq!(data.recipe.steps[2].name, "Temper");
        assert_eq!(data.recipe.steps[2].position, 2);
        assert!(data.recipe.steps.iter().all(|s| !s.is_header));
        assert!(!data.recipe.is_public);
        assert!(data.recipe.meal_types.is_empty());
        assert_eq!(data.recipe.cook_time, Some(30.0));
        assert_eq!(
            data.url_source_image.as_deref(),
            Some("https://site.example/dal.jpg")
        );
    }

    #[test]
    fn test_service_payload_defaults() {
        let parsed: ParsedRecipe =
            serde_json::from_value(serde_json::json!({"title": "Toast"})).unwrap();
        let form = parsed.into_form("https://x.example");
        assert_eq!(form.initial_data.recipe.description, "");
        assert!(form.initial_data.recipe.ingredients.is_empty());
        assert!(form.initial_data.url_source_image.is_none());
    }

    #[tokio::test]
    async fn test_parse_for_form_uses_parser() {
        let parser = FakeParser::with_recipe("https://site.example/dal", parsed());
        let form = parse_for_form(&parser, "https://site.example/dal")
            .await
            .unwrap();
        assert_eq!(form.initial_data.recipe.name, "Dal");

        let missing = parse_for_form(&parser, "https://site.example/other").await;
        assert!(missing.is_err());
    }
}
