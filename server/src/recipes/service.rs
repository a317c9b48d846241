use chrono::Utc;
use larder_core::{
    cache_bucket_date, plan_transition, state_name, validate_image_url, ImageChange, ImageUpload,
    MainImage, RecipeDraft, RecipeQuery, SiteInfo,
};
use std::sync::Arc;
use uuid::Uuid;

use super::images::{resolve_all, resolve_display_image};
use super::views::{RecipeFormView, RecipeView};
use crate::error::ApiError;
use crate::storage::{ImageStorage, PresignedUpload};
use crate::store::{RecipeStore, TaxonomyEntry, TaxonomyKind};

/// Recipe operations shared by the HTTP handlers.
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    storage: Arc<dyn ImageStorage>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>, storage: Arc<dyn ImageStorage>) -> Self {
        Self { store, storage }
    }

    pub async fn list_recipes(
        &self,
        user_id: &str,
        query: &RecipeQuery,
    ) -> Result<Vec<RecipeView>, ApiError> {
        let recipes = self.store.list_recipes(user_id, query)?;
        let bucket = cache_bucket_date(Utc::now());
        let images = resolve_all(self.storage.as_ref(), &recipes, &bucket).await;

        Ok(recipes
            .into_iter()
            .zip(images)
            .map(|(recipe, image)| RecipeView::new(recipe, image))
            .collect())
    }

    /// The recipe if the caller may see it.
    pub async fn get_recipe(&self, user_id: &str, id: Uuid) -> Result<Option<RecipeView>, ApiError> {
        let Some(recipe) = self.store.get_recipe(id)? else {
            return Ok(None);
        };
        if !recipe.visible_to(user_id) {
            return Ok(None);
        }

        let bucket = cache_bucket_date(Utc::now());
        let image = resolve_display_image(
            self.storage.as_ref(),
            &recipe.author_id,
            recipe.id,
            &recipe.main_image,
            &bucket,
        )
        .await;
        Ok(Some(RecipeView::new(recipe, image)))
    }

    /// Editable fields, for the author only.
    pub async fn get_form_fields(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> Result<Option<RecipeFormView>, ApiError> {
        let Some(recipe) = self.store.get_recipe(id)? else {
            return Ok(None);
        };
        if recipe.author_id != user_id {
            return Ok(None);
        }

        let bucket = cache_bucket_date(Utc::now());
        let src = resolve_display_image(
            self.storage.as_ref(),
            &recipe.author_id,
            recipe.id,
            &recipe.main_image,
            &bucket,
        )
        .await;
        Ok(Some(RecipeFormView::new(recipe, src)))
    }

    /// Create a recipe whose image the client uploads afterwards.
    pub async fn add_recipe(
        &self,
        user_id: &str,
        draft: &RecipeDraft,
        image: &ImageUpload,
    ) -> Result<PresignedUpload, ApiError> {
        draft.validate()?;
        image.validate()?;

        let metadata = image.with_key(Uuid::new_v4().to_string());
        let recipe_id = self.store.create_recipe(
            user_id,
            draft,
            None,
            &MainImage::Stored(metadata.clone()),
        )?;
        tracing::info!(recipe_id = %recipe_id, key = %metadata.key, "Created recipe");

        let upload = self
            .storage
            .upload_url(user_id, recipe_id, &metadata)
            .await?;
        Ok(upload)
    }

    /// Create a recipe from parser output. Its image, if any, stays external.
    pub async fn add_parsed_recipe(
        &self,
        user_id: &str,
        draft: &RecipeDraft,
        site_info: &SiteInfo,
        image_url: Option<&str>,
    ) -> Result<Uuid, ApiError> {
        draft.validate()?;

        let image = match image_url {
            Some(url) => {
                validate_image_url(url)?;
                MainImage::External {
                    url: url.to_string(),
                }
            }
            None => MainImage::None,
        };

        let recipe_id = self
            .store
            .create_recipe(user_id, draft, Some(site_info), &image)?;
        tracing::info!(recipe_id = %recipe_id, source = %site_info.url, "Created parsed recipe");
        Ok(recipe_id)
    }

    /// Save an edit and carry out its image change.
    ///
    /// Returns an upload descriptor when the edit asked for a new upload.
    pub async fn edit_recipe(
        &self,
        user_id: &str,
        id: Uuid,
        draft: &RecipeDraft,
        change: &ImageChange,
    ) -> Result<Option<PresignedUpload>, ApiError> {
        draft.validate()?;
        change.validate()?;

        let owner = self
            .store
            .get_main_image(id)?
            .filter(|owner| owner.author_id == user_id)
            .ok_or_else(ApiError::recipe_not_found)?;

        let fresh_key = Uuid::new_v4().to_string();
        let plan = plan_transition(&owner.image, change, &fresh_key);

        self.store
            .update_recipe(id, draft, plan.as_ref().map(|plan| &plan.next))?;

        let Some(plan) = plan else {
            return Ok(None);
        };
        tracing::info!(
            recipe_id = %id,
            from = state_name(&owner.image),
            to = state_name(&plan.next),
            "Changed recipe image"
        );

        if let Some(stale_key) = &plan.stale_key {
            self.delete_object_best_effort(&owner.author_id, id, stale_key)
                .await;
        }

        match &plan.upload {
            Some(metadata) => {
                let upload = self
                    .storage
                    .upload_url(&owner.author_id, id, metadata)
                    .await?;
                Ok(Some(upload))
            }
            None => Ok(None),
        }
    }

    /// Remove a recipe and, best-effort, its stored image.
    pub async fn delete_recipe(&self, user_id: &str, id: Uuid) -> Result<(), ApiError> {
        let owner = self
            .store
            .get_main_image(id)?
            .filter(|owner| owner.author_id == user_id)
            .ok_or_else(ApiError::recipe_not_found)?;

        self.store.delete_recipe(id)?;
        tracing::info!(recipe_id = %id, "Deleted recipe");

        if let Some(key) = owner.image.storage_key() {
            self.delete_object_best_effort(&owner.author_id, id, key)
                .await;
        }
        Ok(())
    }

    pub fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, ApiError> {
        Ok(self.store.list_taxonomy(kind)?)
    }

    async fn delete_object_best_effort(&self, owner_id: &str, recipe_id: Uuid, key: &str) {
        if let Err(e) = self.storage.delete_object(owner_id, recipe_id, key).await {
            tracing::warn!(
                recipe_id = %recipe_id,
                key = %key,
                error = %e,
                "Failed to delete old image object"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fake::{FakeStorage, StorageCall};
    use crate::store::memory::MemoryRecipeStore;
    use larder_core::{numbered, parse_query, DisplayImageType, ListItem, ViewScope};

    struct Harness {
        store: Arc<MemoryRecipeStore>,
        storage: Arc<FakeStorage>,
        service: RecipeService,
    }

    fn harness_with(storage: FakeStorage) -> Harness {
        let store = Arc::new(MemoryRecipeStore::new());
        let storage = Arc::new(storage);
        let service = RecipeService::new(store.clone(), storage.clone());
        Harness {
            store,
            storage,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeStorage::new())
    }

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn draft_with_ingredients(name: &str, ingredients: &[&str]) -> RecipeDraft {
        RecipeDraft {
            ingredients: numbered(ingredients.iter().map(|s| s.to_string())),
            ..draft(name)
        }
    }

    fn upload() -> ImageUpload {
        ImageUpload {
            name: "soup.png".to_string(),
            size: 4096,
            mime_type: "image/png".to_string(),
        }
    }

    fn external(url: &str) -> MainImage {
        MainImage::External {
            url: url.to_string(),
        }
    }

    fn names(views: &[RecipeView]) -> Vec<&str> {
        views.iter().map(|v| v.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_recipe_end_to_end_with_failing_deletes() {
        let h = harness_with(FakeStorage::new().failing_deletes());
        let draft = RecipeDraft {
            ingredients: numbered(["Flour", "Eggs", "Milk"].map(String::from)),
            steps: numbered(["Whisk", "Fry"].map(String::from)),
            ..draft("Pancakes")
        };

        let upload = h.service.add_recipe("alice", &draft, &upload()).await.unwrap();

        let listed = h
            .service
            .list_recipes("alice", &RecipeQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        let stored = h.store.recipe(listed[0].id).unwrap();
        assert_eq!(stored.ingredients.len(), 3);
        assert_eq!(stored.steps.len(), 2);
        assert_eq!(stored.main_image.storage_key(), Some(upload.key.as_str()));
        assert_eq!(upload.method, "PUT");
        assert!(upload.url.contains(&format!("alice/{}/", stored.id)));
    }

    #[tokio::test]
    async fn test_add_recipe_rejects_bad_input_before_writing() {
        let h = harness();

        let err = h
            .service
            .add_recipe("alice", &draft("  "), &upload())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let too_big = ImageUpload {
            size: larder_core::MAX_IMAGE_SIZE + 1,
            ..upload()
        };
        let err = h
            .service
            .add_recipe("alice", &draft("Soup"), &too_big)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let duplicate = RecipeDraft {
            ingredients: vec![
                ListItem {
                    position: 0,
                    name: "Salt".to_string(),
                    is_header: false,
                },
                ListItem {
                    position: 0,
                    name: "Pepper".to_string(),
                    is_header: false,
                },
            ],
            ..draft("Soup")
        };
        let err = h
            .service
            .add_recipe("alice", &duplicate, &upload())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        assert_eq!(h.store.len(), 0);
        assert!(h.storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_recipe_upload_failure_is_upstream_error() {
        let h = harness_with(FakeStorage::new().failing_uploads());
        let err = h
            .service
            .add_recipe("alice", &draft("Soup"), &upload())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_add_recipe_unknown_taxonomy_is_not_found() {
        let h = harness();
        let draft = RecipeDraft {
            utensils: vec![Uuid::new_v4()],
            ..draft("Soup")
        };
        let err = h
            .service
            .add_recipe("alice", &draft, &upload())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(h.store.len(), 0);
    }

    #[tokio::test]
    async fn test_edit_none_to_upload_persists_stored_key() {
        let h = harness();
        let id = h
            .store
            .create_recipe("alice", &draft("Soup"), None, &MainImage::None)
            .unwrap();

        let upload = h
            .service
            .edit_recipe("alice", id, &draft("Soup"), &ImageChange::Upload { metadata: upload() })
            .await
            .unwrap()
            .expect("upload descriptor");

        let image = h.store.recipe(id).unwrap().main_image;
        assert_eq!(image.storage_key(), Some(upload.key.as_str()));
        assert_eq!(image.external_url(), None);
        assert!(h.storage.deleted_paths().is_empty());
    }

    #[tokio::test]
    async fn test_edit_stored_to_upload_rotates_key_and_tolerates_delete_failure() {
        let h = harness_with(FakeStorage::new().failing_deletes());
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft("Soup"),
                None,
                &MainImage::Stored(upload().with_key("old-key")),
            )
            .unwrap();

        let upload = h
            .service
            .edit_recipe("alice", id, &draft("Soup"), &ImageChange::Upload { metadata: upload() })
            .await
            .unwrap()
            .expect("upload descriptor");

        assert_ne!(upload.key, "old-key");
        assert_eq!(
            h.store.recipe(id).unwrap().main_image.storage_key(),
            Some(upload.key.as_str())
        );
        assert_eq!(
            h.storage.deleted_paths(),
            vec![format!("alice/{}/old-key", id)]
        );
    }

    #[tokio::test]
    async fn test_edit_external_to_upload_deletes_nothing() {
        let h = harness();
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft("Soup"),
                None,
                &external("https://example.com/a.jpg"),
            )
            .unwrap();

        let upload = h
            .service
            .edit_recipe("alice", id, &draft("Soup"), &ImageChange::Upload { metadata: upload() })
            .await
            .unwrap();

        assert!(upload.is_some());
        assert!(h.storage.deleted_paths().is_empty());
        assert!(h.store.recipe(id).unwrap().main_image.metadata().is_some());
    }

    #[tokio::test]
    async fn test_edit_stored_to_url_deletes_old_object() {
        let h = harness();
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft("Soup"),
                None,
                &MainImage::Stored(upload().with_key("k1")),
            )
            .unwrap();

        let change = ImageChange::Url {
            url: "https://example.com/b.jpg".to_string(),
        };
        let upload = h
            .service
            .edit_recipe("alice", id, &draft("Soup"), &change)
            .await
            .unwrap();

        assert!(upload.is_none());
        assert_eq!(
            h.store.recipe(id).unwrap().main_image,
            external("https://example.com/b.jpg")
        );
        assert_eq!(h.storage.deleted_paths(), vec![format!("alice/{}/k1", id)]);
    }

    #[tokio::test]
    async fn test_edit_remove_clears_image() {
        let h = harness();
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft("Soup"),
                None,
                &MainImage::Stored(upload().with_key("k1")),
            )
            .unwrap();

        h.service
            .edit_recipe("alice", id, &draft("Soup"), &ImageChange::Remove)
            .await
            .unwrap();

        assert_eq!(h.store.recipe(id).unwrap().main_image, MainImage::None);
        assert_eq!(h.storage.deleted_paths().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_keep_leaves_image_and_updates_fields() {
        let h = harness();
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft("Soup"),
                None,
                &external("https://example.com/a.jpg"),
            )
            .unwrap();

        let upload = h
            .service
            .edit_recipe("alice", id, &draft("Tomato Soup"), &ImageChange::Keep)
            .await
            .unwrap();

        assert!(upload.is_none());
        let recipe = h.store.recipe(id).unwrap();
        assert_eq!(recipe.name, "Tomato Soup");
        assert_eq!(recipe.main_image, external("https://example.com/a.jpg"));
        assert!(h.storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_by_non_author_is_not_found_without_side_effects() {
        let h = harness();
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft("Soup"),
                None,
                &MainImage::Stored(upload().with_key("k1")),
            )
            .unwrap();

        let err = h
            .service
            .edit_recipe("bob", id, &draft("Mine now"), &ImageChange::Remove)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(h.store.recipe(id).unwrap().name, "Soup");
        assert!(h.storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_upload_failure_is_upstream_error() {
        let h = harness_with(FakeStorage::new().failing_uploads());
        let id = h
            .store
            .create_recipe("alice", &draft("Soup"), None, &MainImage::None)
            .unwrap();

        let err = h
            .service
            .edit_recipe("alice", id, &draft("Soup"), &ImageChange::Upload { metadata: upload() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_include_filters_are_anded() {
        let h = harness();
        for (name, ingredients) in [
            ("Omelette", &["Eggs", "Butter"][..]),
            ("Crepes", &["Eggs", "Milk", "Flour"][..]),
            ("Milkshake", &["Milk", "Ice cream"][..]),
        ] {
            h.store
                .create_recipe(
                    "alice",
                    &draft_with_ingredients(name, ingredients),
                    None,
                    &MainImage::None,
                )
                .unwrap();
        }

        let query = RecipeQuery::new(ViewScope::Mine, Some("ingredient:egg ingredient:milk"));
        let found = h.service.list_recipes("alice", &query).await.unwrap();
        assert_eq!(names(&found), vec!["Crepes"]);

        let query = RecipeQuery::new(ViewScope::Mine, Some("ingredient:milk -ingredient:flour"));
        let found = h.service.list_recipes("alice", &query).await.unwrap();
        assert_eq!(names(&found), vec!["Milkshake"]);
    }

    #[tokio::test]
    async fn test_header_rows_do_not_match_filters() {
        let h = harness();
        let draft = RecipeDraft {
            ingredients: vec![
                ListItem {
                    position: 0,
                    name: "For the cheese sauce".to_string(),
                    is_header: true,
                },
                ListItem {
                    position: 1,
                    name: "Butter".to_string(),
                    is_header: false,
                },
            ],
            ..draft("Pasta")
        };
        h.store
            .create_recipe("alice", &draft, None, &MainImage::None)
            .unwrap();

        let query = RecipeQuery::new(ViewScope::Mine, Some("-ingredient:cheese"));
        let found = h.service.list_recipes("alice", &query).await.unwrap();
        assert_eq!(names(&found), vec!["Pasta"]);
    }

    #[tokio::test]
    async fn test_nationality_filter_matches_name_or_id() {
        let h = harness();
        let italian = h.store.add_taxonomy(TaxonomyKind::Nationalities, "Italian");
        let thai = h.store.add_taxonomy(TaxonomyKind::Nationalities, "Thai");
        h.store
            .create_recipe(
                "alice",
                &RecipeDraft {
                    nationalities: vec![italian],
                    ..draft("Risotto")
                },
                None,
                &MainImage::None,
            )
            .unwrap();
        h.store
            .create_recipe(
                "alice",
                &RecipeDraft {
                    nationalities: vec![thai],
                    ..draft("Green curry")
                },
                None,
                &MainImage::None,
            )
            .unwrap();

        let by_name = RecipeQuery::new(ViewScope::Mine, Some("nationality:italian"));
        let found = h.service.list_recipes("alice", &by_name).await.unwrap();
        assert_eq!(names(&found), vec!["Risotto"]);

        let q = format!("nationality:{}", thai);
        let by_id = RecipeQuery::new(ViewScope::Mine, Some(q.as_str()));
        let found = h.service.list_recipes("alice", &by_id).await.unwrap();
        assert_eq!(names(&found), vec!["Green curry"]);

        let excluded = RecipeQuery::new(ViewScope::Mine, Some("-nationality:Thai"));
        let found = h.service.list_recipes("alice", &excluded).await.unwrap();
        assert_eq!(names(&found), vec!["Risotto"]);
    }

    #[tokio::test]
    async fn test_public_scope_excludes_own_recipes() {
        let h = harness();
        let public = RecipeDraft {
            is_public: true,
            ..draft("Shared soup")
        };
        h.store
            .create_recipe("alice", &public, None, &MainImage::None)
            .unwrap();
        h.store
            .create_recipe(
                "bob",
                &RecipeDraft {
                    is_public: true,
                    ..draft("Bob's bread")
                },
                None,
                &MainImage::None,
            )
            .unwrap();
        h.store
            .create_recipe("bob", &draft("Bob's secret"), None, &MainImage::None)
            .unwrap();

        let query = RecipeQuery::new(ViewScope::Public, None);
        let found = h.service.list_recipes("alice", &query).await.unwrap();
        assert_eq!(names(&found), vec!["Bob's bread"]);
        assert!(found.iter().all(|r| r.author_id != "alice"));
    }

    #[tokio::test]
    async fn test_search_applies_to_public_scope() {
        let h = harness();
        for name in ["Bread", "Soup"] {
            h.store
                .create_recipe(
                    "bob",
                    &RecipeDraft {
                        is_public: true,
                        ..draft(name)
                    },
                    None,
                    &MainImage::None,
                )
                .unwrap();
        }

        let query = RecipeQuery {
            scope: ViewScope::Public,
            ..parse_query("sou")
        };
        let found = h.service.list_recipes("alice", &query).await.unwrap();
        assert_eq!(names(&found), vec!["Soup"]);
    }

    #[tokio::test]
    async fn test_list_orders_by_most_recently_updated() {
        let h = harness();
        let first = h
            .store
            .create_recipe("alice", &draft("First"), None, &MainImage::None)
            .unwrap();
        h.store
            .create_recipe("alice", &draft("Second"), None, &MainImage::None)
            .unwrap();
        h.service
            .edit_recipe("alice", first, &draft("First"), &ImageChange::Keep)
            .await
            .unwrap();

        let found = h
            .service
            .list_recipes("alice", &RecipeQuery::default())
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_list_resolves_each_image_under_author_prefix() {
        let h = harness_with(FakeStorage::new().failing_downloads());
        let id = h
            .store
            .create_recipe(
                "bob",
                &RecipeDraft {
                    is_public: true,
                    ..draft("Bread")
                },
                None,
                &MainImage::Stored(upload().with_key("k1")),
            )
            .unwrap();

        let found = h
            .service
            .list_recipes("alice", &RecipeQuery::new(ViewScope::Public, None))
            .await
            .unwrap();

        assert_eq!(found[0].image.kind, DisplayImageType::NoImage);
        assert!(matches!(
            &h.storage.calls()[0],
            StorageCall::Download { path, .. } if *path == format!("bob/{}/k1", id)
        ));
    }

    #[tokio::test]
    async fn test_list_image_failure_affects_only_that_recipe() {
        let h = harness_with(FakeStorage::new().failing_download_for("broken"));
        for (name, image) in [
            ("Bread", MainImage::Stored(upload().with_key("good"))),
            ("Soup", MainImage::Stored(upload().with_key("broken"))),
            ("Salad", external("https://example.com/salad.jpg")),
        ] {
            h.store
                .create_recipe("alice", &draft(name), None, &image)
                .unwrap();
        }

        let found = h
            .service
            .list_recipes("alice", &RecipeQuery::default())
            .await
            .unwrap();

        assert_eq!(names(&found), vec!["Salad", "Soup", "Bread"]);
        let kinds: Vec<_> = found.iter().map(|view| view.image.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DisplayImageType::Url,
                DisplayImageType::NoImage,
                DisplayImageType::PresignedUrl,
            ]
        );
        assert_eq!(found[0].image.url, "https://example.com/salad.jpg");
        assert_eq!(found[1].image.url, "");
        assert!(found[2].image.url.contains("/good?v="));
    }

    #[tokio::test]
    async fn test_get_recipe_visibility() {
        let h = harness();
        let private = h
            .store
            .create_recipe("alice", &draft("Private"), None, &MainImage::None)
            .unwrap();
        let public = h
            .store
            .create_recipe(
                "alice",
                &RecipeDraft {
                    is_public: true,
                    ..draft("Public")
                },
                None,
                &MainImage::None,
            )
            .unwrap();

        assert!(h.service.get_recipe("alice", private).await.unwrap().is_some());
        assert!(h.service.get_recipe("bob", private).await.unwrap().is_none());
        assert!(h.service.get_recipe("bob", public).await.unwrap().is_some());
        assert!(h
            .service
            .get_recipe("bob", Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_form_fields_are_author_only_and_raw() {
        let h = harness();
        let method = h.store.add_taxonomy(TaxonomyKind::CookingMethods, "Baking");
        let draft = RecipeDraft {
            prep_time: Some(12.5),
            is_public: true,
            cooking_methods: vec![method],
            ..draft("Bread")
        };
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft,
                None,
                &MainImage::Stored(upload().with_key("k1")),
            )
            .unwrap();

        let form = h.service.get_form_fields("alice", id).await.unwrap().unwrap();
        assert_eq!(form.prep_time, Some(12.5));
        assert_eq!(form.image.metadata.as_ref().map(|m| m.key.as_str()), Some("k1"));
        assert_eq!(form.image.src.kind, DisplayImageType::PresignedUrl);
        assert_eq!(form.cooking_methods[0].name, "Baking");

        assert!(h.service.get_form_fields("bob", id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_parsed_recipe_keeps_external_image_and_site_info() {
        let h = harness();
        let site = SiteInfo {
            url: "https://recipes.example.com/soup".to_string(),
            author: Some("Ana".to_string()),
        };

        let id = h
            .service
            .add_parsed_recipe(
                "alice",
                &draft("Soup"),
                &site,
                Some("https://recipes.example.com/soup.jpg"),
            )
            .await
            .unwrap();

        let recipe = h.store.recipe(id).unwrap();
        assert_eq!(recipe.site_info, Some(site));
        assert_eq!(
            recipe.main_image,
            external("https://recipes.example.com/soup.jpg")
        );
        assert!(h.storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_recipe_removes_stored_object() {
        let h = harness_with(FakeStorage::new().failing_deletes());
        let id = h
            .store
            .create_recipe(
                "alice",
                &draft("Soup"),
                None,
                &MainImage::Stored(upload().with_key("k1")),
            )
            .unwrap();

        assert!(matches!(
            h.service.delete_recipe("bob", id).await,
            Err(ApiError::NotFound(_))
        ));
        h.service.delete_recipe("alice", id).await.unwrap();

        assert!(h.store.recipe(id).is_none());
        assert_eq!(h.storage.deleted_paths(), vec![format!("alice/{}/k1", id)]);
    }

    #[tokio::test]
    async fn test_list_taxonomy_is_sorted_by_name() {
        let h = harness();
        h.store.add_taxonomy(TaxonomyKind::MealTypes, "Dinner");
        h.store.add_taxonomy(TaxonomyKind::MealTypes, "Breakfast");

        let entries = h.service.list_taxonomy(TaxonomyKind::MealTypes).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Breakfast", "Dinner"]);
        assert!(h.service.list_taxonomy(TaxonomyKind::Utensils).unwrap().is_empty());
    }
}
