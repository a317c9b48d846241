use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use axum::{
    extract::{Query, State},
    Json,
};
use larder_core::{parse_for_form, ParsedRecipeForm, RecipeParser};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParseRecipeParams {
    /// Recipe page to parse
    pub url: String,
}

#[utoipa::path(
    get,
    path = "/api/parse",
    tag = "parse",
    params(ParseRecipeParams),
    responses(
        (status = 200, description = "Unsaved recipe prefilled from the page", body = ParsedRecipeForm),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Unable to parse recipe", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn parse_recipe(
    AuthUser(_user): AuthUser,
    State(parser): State<Arc<dyn RecipeParser>>,
    Query(params): Query<ParseRecipeParams>,
) -> Result<Json<ParsedRecipeForm>, ApiError> {
    let form = parse_for_form(parser.as_ref(), &params.url).await?;
    Ok(Json(form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::{FakeParser, ParsedRecipe};

    fn state(parser: FakeParser) -> State<Arc<dyn RecipeParser>> {
        State(Arc::new(parser))
    }

    #[tokio::test]
    async fn test_parse_recipe_prefills_form() {
        let url = "https://recipes.example.com/toast";
        let parser = FakeParser::with_recipe(
            url,
            ParsedRecipe {
                title: "Toast".to_string(),
                image: Some("https://recipes.example.com/toast.jpg".to_string()),
                ingredients: vec!["Bread".to_string(), "Butter".to_string()],
                instructions_list: vec!["Toast the bread".to_string()],
                ..Default::default()
            },
        );

        let Json(form) = parse_recipe(
            AuthUser("alice".to_string()),
            state(parser),
            Query(ParseRecipeParams {
                url: url.to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(form.site_info.url, url);
        assert_eq!(form.initial_data.recipe.name, "Toast");
        assert_eq!(form.initial_data.recipe.ingredients.len(), 2);
        assert!(!form.initial_data.recipe.is_public);
        assert_eq!(
            form.initial_data.url_source_image.as_deref(),
            Some("https://recipes.example.com/toast.jpg")
        );
    }

    #[tokio::test]
    async fn test_parse_failure_is_upstream_error() {
        let result = parse_recipe(
            AuthUser("alice".to_string()),
            state(FakeParser::new()),
            Query(ParseRecipeParams {
                url: "https://recipes.example.com/missing".to_string(),
            }),
        )
        .await;

        match result {
            Err(ApiError::Upstream(message)) => assert_eq!(message, "Unable to parse recipe"),
            other => panic!("expected upstream error, got {:?}", other.map(|_| ())),
        }
    }
}
