//! Recipe aggregate persistence.
//!
//! A recipe is read and written as one unit together with its ingredients,
//! steps, site info, main image and taxonomy links.

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgRecipeStore;

use chrono::{DateTime, Utc};
use larder_core::{
    FilterSubject, ImageStateError, ListItem, MainImage, RecipeDraft, RecipeQuery, SiteInfo,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Corrupt recipe image: {0}")]
    Corrupt(#[from] ImageStateError),

    #[error("Unknown {kind} id {id}")]
    UnknownTaxonomy { kind: TaxonomyKind, id: Uuid },

    #[error("Recipe {0} not found")]
    NotFound(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaxonomyKind {
    MealTypes,
    Nationalities,
    CookingMethods,
    Utensils,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 4] = [
        TaxonomyKind::MealTypes,
        TaxonomyKind::Nationalities,
        TaxonomyKind::CookingMethods,
        TaxonomyKind::Utensils,
    ];

    /// Ids of this kind referenced by a draft.
    pub fn ids_in(self, draft: &RecipeDraft) -> &[Uuid] {
        match self {
            TaxonomyKind::MealTypes => &draft.meal_types,
            TaxonomyKind::Nationalities => &draft.nationalities,
            TaxonomyKind::CookingMethods => &draft.cooking_methods,
            TaxonomyKind::Utensils => &draft.utensils,
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaxonomyKind::MealTypes => "meal type",
            TaxonomyKind::Nationalities => "nationality",
            TaxonomyKind::CookingMethods => "cooking method",
            TaxonomyKind::Utensils => "utensil",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyEntry {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeTaxonomy {
    pub meal_types: Vec<TaxonomyEntry>,
    pub nationalities: Vec<TaxonomyEntry>,
    pub cooking_methods: Vec<TaxonomyEntry>,
    pub utensils: Vec<TaxonomyEntry>,
}

impl RecipeTaxonomy {
    pub fn entries_mut(&mut self, kind: TaxonomyKind) -> &mut Vec<TaxonomyEntry> {
        match kind {
            TaxonomyKind::MealTypes => &mut self.meal_types,
            TaxonomyKind::Nationalities => &mut self.nationalities,
            TaxonomyKind::CookingMethods => &mut self.cooking_methods,
            TaxonomyKind::Utensils => &mut self.utensils,
        }
    }
}

/// A fully loaded recipe aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecipe {
    pub id: Uuid,
    pub author_id: String,
    pub name: String,
    pub description: String,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub is_public: bool,
    pub site_info: Option<SiteInfo>,
    pub main_image: MainImage,
    pub taxonomy: RecipeTaxonomy,
    pub ingredients: Vec<ListItem>,
    pub steps: Vec<ListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRecipe {
    pub fn visible_to(&self, user_id: &str) -> bool {
        self.is_public || self.author_id == user_id
    }

    pub fn filter_subject(&self) -> FilterSubject<'_> {
        FilterSubject {
            name: &self.name,
            ingredients: self
                .ingredients
                .iter()
                .filter(|item| !item.is_header)
                .map(|item| item.name.as_str())
                .collect(),
            nationalities: self
                .taxonomy
                .nationalities
                .iter()
                .map(|n| (n.id, n.name.as_str()))
                .collect(),
        }
    }
}

/// Owner and current image of a recipe, as needed to plan an image edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOwner {
    pub author_id: String,
    pub image: MainImage,
}

/// Storage seam for recipe aggregates. Every write is all-or-nothing.
pub trait RecipeStore: Send + Sync {
    /// Recipes in the query's scope that pass its search and filters, most
    /// recently updated first.
    fn list_recipes(
        &self,
        user_id: &str,
        query: &RecipeQuery,
    ) -> Result<Vec<StoredRecipe>, StoreError>;

    fn get_recipe(&self, id: Uuid) -> Result<Option<StoredRecipe>, StoreError>;

    fn get_main_image(&self, id: Uuid) -> Result<Option<ImageOwner>, StoreError>;

    /// Insert the recipe with its children and image, then link its taxonomy.
    fn create_recipe(
        &self,
        author_id: &str,
        draft: &RecipeDraft,
        site_info: Option<&SiteInfo>,
        image: &MainImage,
    ) -> Result<Uuid, StoreError>;

    /// Replace the recipe's fields, children and taxonomy links. `image` is
    /// `None` when the image is left as it is.
    fn update_recipe(
        &self,
        id: Uuid,
        draft: &RecipeDraft,
        image: Option<&MainImage>,
    ) -> Result<(), StoreError>;

    fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError>;

    fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, StoreError>;
}

/// Drop repeated ids, keeping first occurrences in order.
pub(crate) fn unique_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
