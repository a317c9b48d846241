//! In-memory recipe store for service tests.

use chrono::{Duration, Utc};
use larder_core::{MainImage, RecipeDraft, RecipeQuery, SiteInfo, ViewScope};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{
    unique_ids, ImageOwner, RecipeStore, RecipeTaxonomy, StoreError, StoredRecipe, TaxonomyEntry,
    TaxonomyKind,
};

#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: Mutex<HashMap<Uuid, StoredRecipe>>,
    taxonomy: Mutex<HashMap<TaxonomyKind, Vec<TaxonomyEntry>>>,
    /// Ticks per write so `updated_at` strictly increases.
    clock: Mutex<i64>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a taxonomy entry and return its id.
    pub fn add_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.taxonomy
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(TaxonomyEntry {
                id,
                name: name.to_string(),
            });
        id
    }

    pub fn recipe(&self, id: Uuid) -> Option<StoredRecipe> {
        self.recipes.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.recipes.lock().unwrap().len()
    }

    fn tick(&self) -> chrono::DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        *clock += 1;
        Utc::now() + Duration::milliseconds(*clock)
    }

    fn resolve_taxonomy(&self, draft: &RecipeDraft) -> Result<RecipeTaxonomy, StoreError> {
        let known = self.taxonomy.lock().unwrap();
        let mut taxonomy = RecipeTaxonomy::default();
        for kind in TaxonomyKind::ALL {
            let entries = known.get(&kind).cloned().unwrap_or_default();
            for id in unique_ids(kind.ids_in(draft)) {
                let entry = entries
                    .iter()
                    .find(|entry| entry.id == id)
                    .cloned()
                    .ok_or(StoreError::UnknownTaxonomy { kind, id })?;
                taxonomy.entries_mut(kind).push(entry);
            }
            taxonomy
                .entries_mut(kind)
                .sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(taxonomy)
    }
}

fn sorted(items: &[larder_core::ListItem]) -> Vec<larder_core::ListItem> {
    let mut items = items.to_vec();
    items.sort_by_key(|item| item.position);
    items
}

impl RecipeStore for MemoryRecipeStore {
    fn list_recipes(
        &self,
        user_id: &str,
        query: &RecipeQuery,
    ) -> Result<Vec<StoredRecipe>, StoreError> {
        let recipes = self.recipes.lock().unwrap();
        let mut found: Vec<StoredRecipe> = recipes
            .values()
            .filter(|recipe| match query.scope {
                ViewScope::Mine => recipe.author_id == user_id,
                ViewScope::Public => recipe.is_public && recipe.author_id != user_id,
            })
            .filter(|recipe| query.matches(&recipe.filter_subject()))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    fn get_recipe(&self, id: Uuid) -> Result<Option<StoredRecipe>, StoreError> {
        Ok(self.recipe(id))
    }

    fn get_main_image(&self, id: Uuid) -> Result<Option<ImageOwner>, StoreError> {
        Ok(self.recipe(id).map(|recipe| ImageOwner {
            author_id: recipe.author_id,
            image: recipe.main_image,
        }))
    }

    fn create_recipe(
        &self,
        author_id: &str,
        draft: &RecipeDraft,
        site_info: Option<&SiteInfo>,
        image: &MainImage,
    ) -> Result<Uuid, StoreError> {
        let taxonomy = self.resolve_taxonomy(draft)?;
        let now = self.tick();
        let id = Uuid::new_v4();
        let recipe = StoredRecipe {
            id,
            author_id: author_id.to_string(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            is_public: draft.is_public,
            site_info: site_info.cloned(),
            main_image: image.clone(),
            taxonomy,
            ingredients: sorted(&draft.ingredients),
            steps: sorted(&draft.steps),
            created_at: now,
            updated_at: now,
        };
        self.recipes.lock().unwrap().insert(id, recipe);
        Ok(id)
    }

    fn update_recipe(
        &self,
        id: Uuid,
        draft: &RecipeDraft,
        image: Option<&MainImage>,
    ) -> Result<(), StoreError> {
        let taxonomy = self.resolve_taxonomy(draft)?;
        let now = self.tick();
        let mut recipes = self.recipes.lock().unwrap();
        let recipe = recipes.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        recipe.name = draft.name.clone();
        recipe.description = draft.description.clone();
        recipe.prep_time = draft.prep_time;
        recipe.cook_time = draft.cook_time;
        recipe.is_public = draft.is_public;
        recipe.ingredients = sorted(&draft.ingredients);
        recipe.steps = sorted(&draft.steps);
        recipe.taxonomy = taxonomy;
        if let Some(image) = image {
            recipe.main_image = image.clone();
        }
        recipe.updated_at = now;
        Ok(())
    }

    fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError> {
        self.recipes
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, StoreError> {
        let mut entries = self
            .taxonomy
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
