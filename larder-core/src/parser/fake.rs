//! Fake recipe parser for testing.

use super::{ParsedRecipe, RecipeParser};
use crate::error::ParseError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Returns canned recipes keyed by URL; unknown URLs fail like an
/// unparseable page would.
#[derive(Debug, Default)]
pub struct FakeParser {
    recipes: RwLock<HashMap<String, ParsedRecipe>>,
}

impl FakeParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipe(url: &str, recipe: ParsedRecipe) -> Self {
        let parser = Self::new();
        parser.add_recipe(url, recipe);
        parser
    }

    pub fn add_recipe(&self, url: &str, recipe: ParsedRecipe) {
        if let Ok(mut recipes) = self.recipes.write() {
            recipes.insert(url.to_string(), recipe);
        }
    }
}

#[async_trait]
impl RecipeParser for FakeParser {
    async fn parse(&self, url: &str) -> Result<ParsedRecipe, ParseError> {
        let recipes = self
            .recipes
            .read()
            .map_err(|_| ParseError::NotConfigured("FakeParser lock poisoned".to_string()))?;
        recipes.get(url).cloned().ok_or(ParseError::Status(422))
    }
}
