use chrono::{DateTime, Utc};
use larder_core::{DisplayImage, ImageMetadata, ListItem, SiteInfo};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::{StoredRecipe, TaxonomyEntry};

/// A recipe as shown on list and detail pages.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeView {
    pub id: Uuid,
    pub author_id: String,
    pub name: String,
    pub description: String,
    /// Minutes
    pub prep_time: Option<f64>,
    /// Minutes
    pub cook_time: Option<f64>,
    pub is_public: bool,
    pub site_info: Option<SiteInfo>,
    pub image: DisplayImage,
    pub meal_types: Vec<TaxonomyEntry>,
    pub nationalities: Vec<TaxonomyEntry>,
    pub cooking_methods: Vec<TaxonomyEntry>,
    pub utensils: Vec<TaxonomyEntry>,
    pub ingredients: Vec<ListItem>,
    pub steps: Vec<ListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeView {
    pub fn new(recipe: StoredRecipe, image: DisplayImage) -> Self {
        Self {
            id: recipe.id,
            author_id: recipe.author_id,
            name: recipe.name,
            description: recipe.description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            is_public: recipe.is_public,
            site_info: recipe.site_info,
            image,
            meal_types: recipe.taxonomy.meal_types,
            nationalities: recipe.taxonomy.nationalities,
            cooking_methods: recipe.taxonomy.cooking_methods,
            utensils: recipe.taxonomy.utensils,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// The current image as the edit form needs it: enough to tell "kept the
/// existing file" apart from "picked a new one".
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormImage {
    /// Set when the image lives in object storage.
    pub metadata: Option<ImageMetadata>,
    /// Set when the image is hosted elsewhere.
    pub url_source_image: Option<String>,
    /// Preview the form can render right away.
    pub src: DisplayImage,
}

/// Raw editable fields of a recipe, for its author.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeFormView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub is_public: bool,
    pub site_info: Option<SiteInfo>,
    pub image: FormImage,
    pub meal_types: Vec<TaxonomyEntry>,
    pub nationalities: Vec<TaxonomyEntry>,
    pub cooking_methods: Vec<TaxonomyEntry>,
    pub utensils: Vec<TaxonomyEntry>,
    pub ingredients: Vec<ListItem>,
    pub steps: Vec<ListItem>,
}

impl RecipeFormView {
    pub fn new(recipe: StoredRecipe, src: DisplayImage) -> Self {
        let image = FormImage {
            metadata: recipe.main_image.metadata().cloned(),
            url_source_image: recipe.main_image.external_url().map(str::to_string),
            src,
        };
        Self {
            id: recipe.id,
            name: recipe.name,
            description: recipe.description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            is_public: recipe.is_public,
            site_info: recipe.site_info,
            image,
            meal_types: recipe.taxonomy.meal_types,
            nationalities: recipe.taxonomy.nationalities,
            cooking_methods: recipe.taxonomy.cooking_methods,
            utensils: recipe.taxonomy.utensils,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
        }
    }
}
