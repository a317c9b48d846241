use chrono::Utc;
use diesel::prelude::*;
use larder_core::{
    ImageMetadata, ImageStateError, ListItem, MainImage, RecipeDraft, RecipeQuery, SiteInfo,
    ViewScope,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    unique_ids, ImageOwner, RecipeStore, RecipeTaxonomy, StoreError, StoredRecipe, TaxonomyEntry,
    TaxonomyKind,
};
use crate::db::{DbConn, DbPool};
use crate::models::{
    ListRow, MainImageRow, NewIngredient, NewMainImage, NewMetadataImage, NewRecipe, NewStep,
    NewUrlImage, ParsedSiteInfo, Recipe, RecipeChanges,
};
use crate::schema::{
    cooking_methods, ingredients, main_images, meal_types, metadata_images, nationalities,
    parsed_site_infos, recipe_cooking_methods, recipe_meal_types, recipe_nationalities,
    recipe_utensils, recipes, steps, url_images, utensils,
};

/// Expand `$body!` with the join table, entry table and foreign key column
/// for a taxonomy kind.
macro_rules! for_kind {
    ($kind:expr, $body:ident!($($args:tt)*)) => {
        match $kind {
            TaxonomyKind::MealTypes => {
                $body!(recipe_meal_types, meal_types, meal_type_id, $($args)*)
            }
            TaxonomyKind::Nationalities => {
                $body!(recipe_nationalities, nationalities, nationality_id, $($args)*)
            }
            TaxonomyKind::CookingMethods => {
                $body!(recipe_cooking_methods, cooking_methods, cooking_method_id, $($args)*)
            }
            TaxonomyKind::Utensils => $body!(recipe_utensils, utensils, utensil_id, $($args)*),
        }
    };
}

macro_rules! load_links {
    ($link:ident, $entries:ident, $fk:ident, $conn:expr, $ids:expr) => {
        $link::table
            .inner_join($entries::table)
            .filter($link::recipe_id.eq_any($ids))
            .order($entries::name.asc())
            .select(($link::recipe_id, $entries::id, $entries::name))
            .load::<(Uuid, Uuid, String)>($conn)
    };
}

macro_rules! known_ids {
    ($link:ident, $entries:ident, $fk:ident, $conn:expr, $ids:expr) => {
        $entries::table
            .filter($entries::id.eq_any($ids))
            .select($entries::id)
            .load::<Uuid>($conn)
    };
}

macro_rules! insert_links {
    ($link:ident, $entries:ident, $fk:ident, $conn:expr, $recipe_id:expr, $ids:expr) => {{
        let rows: Vec<_> = $ids
            .iter()
            .map(|id| ($link::recipe_id.eq($recipe_id), $link::$fk.eq(*id)))
            .collect();
        diesel::insert_into($link::table).values(&rows).execute($conn)
    }};
}

macro_rules! delete_links {
    ($link:ident, $entries:ident, $fk:ident, $conn:expr, $recipe_id:expr) => {
        diesel::delete($link::table.filter($link::recipe_id.eq($recipe_id))).execute($conn)
    };
}

macro_rules! recipes_with_ingredient {
    ($pattern:expr) => {
        ingredients::table
            .filter(ingredients::is_header.eq(false))
            .filter(ingredients::name.ilike($pattern))
            .select(ingredients::recipe_id)
    };
}

macro_rules! recipes_with_nationality {
    ($term:expr) => {
        recipe_nationalities::table
            .inner_join(nationalities::table)
            .filter(
                nationalities::name
                    .ilike(&$term.name)
                    .or(nationalities::id.eq_any(&$term.ids)),
            )
            .select(recipe_nationalities::recipe_id)
    };
}

macro_rules! list_entries {
    ($link:ident, $entries:ident, $fk:ident, $conn:expr) => {
        $entries::table
            .order($entries::name.asc())
            .select(($entries::id, $entries::name))
            .load::<(Uuid, String)>($conn)
    };
}

/// Postgres-backed recipe store.
pub struct PgRecipeStore {
    pool: Arc<DbPool>,
}

impl PgRecipeStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// A nationality term matches an entry by exact name (any case) or by id.
struct NationalityTerm {
    name: String,
    ids: Vec<Uuid>,
}

impl NationalityTerm {
    fn new(term: &str) -> Self {
        Self {
            name: escape_like(term),
            ids: Uuid::parse_str(term).ok().into_iter().collect(),
        }
    }
}

fn into_image(row: Option<MainImageRow>) -> Result<MainImage, ImageStateError> {
    let Some(row) = row else {
        return MainImage::from_parts(None, None, None);
    };
    let metadata = row
        .metadata
        .map(|(key, name, size, mime_type)| ImageMetadata {
            key,
            name,
            size,
            mime_type,
        });
    MainImage::from_parts(Some(&row.image_type), row.url, metadata)
}

fn load_images(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, MainImageRow>> {
    let rows: Vec<MainImageRow> = main_images::table
        .left_join(url_images::table)
        .left_join(metadata_images::table)
        .filter(main_images::recipe_id.eq_any(ids))
        .select((
            main_images::recipe_id,
            main_images::image_type,
            url_images::url.nullable(),
            (
                metadata_images::storage_key,
                metadata_images::name,
                metadata_images::size,
                metadata_images::mime_type,
            )
                .nullable(),
        ))
        .load(conn)?;

    Ok(rows.into_iter().map(|row| (row.recipe_id, row)).collect())
}

fn group_list_rows(rows: Vec<ListRow>) -> HashMap<Uuid, Vec<ListItem>> {
    let mut grouped: HashMap<Uuid, Vec<ListItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.recipe_id).or_default().push(ListItem {
            position: row.position,
            name: row.name,
            is_header: row.is_header,
        });
    }
    grouped
}

fn load_taxonomy(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, RecipeTaxonomy>> {
    let mut taxonomy: HashMap<Uuid, RecipeTaxonomy> = HashMap::new();
    for kind in TaxonomyKind::ALL {
        let links = for_kind!(kind, load_links!(conn, ids))?;
        for (recipe_id, id, name) in links {
            taxonomy
                .entry(recipe_id)
                .or_default()
                .entries_mut(kind)
                .push(TaxonomyEntry { id, name });
        }
    }
    Ok(taxonomy)
}

/// Load every child of `rows` in one query per table and build aggregates,
/// keeping the order of `rows`.
fn assemble(conn: &mut PgConnection, rows: Vec<Recipe>) -> Result<Vec<StoredRecipe>, StoreError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let mut site_infos: HashMap<Uuid, ParsedSiteInfo> = parsed_site_infos::table
        .filter(parsed_site_infos::recipe_id.eq_any(&ids))
        .select(ParsedSiteInfo::as_select())
        .load::<ParsedSiteInfo>(conn)?
        .into_iter()
        .map(|info| (info.recipe_id, info))
        .collect();

    let mut images = load_images(conn, &ids)?;

    let mut ingredient_lists = group_list_rows(
        ingredients::table
            .filter(ingredients::recipe_id.eq_any(&ids))
            .order((ingredients::recipe_id, ingredients::position))
            .select((
                ingredients::recipe_id,
                ingredients::position,
                ingredients::name,
                ingredients::is_header,
            ))
            .load(conn)?,
    );

    let mut step_lists = group_list_rows(
        steps::table
            .filter(steps::recipe_id.eq_any(&ids))
            .order((steps::recipe_id, steps::position))
            .select((steps::recipe_id, steps::position, steps::name, steps::is_header))
            .load(conn)?,
    );

    let mut taxonomy = load_taxonomy(conn, &ids)?;

    rows.into_iter()
        .map(|row| {
            let main_image = into_image(images.remove(&row.id))?;
            Ok(StoredRecipe {
                site_info: site_infos.remove(&row.id).map(|info| SiteInfo {
                    url: info.url,
                    author: info.author,
                }),
                main_image,
                taxonomy: taxonomy.remove(&row.id).unwrap_or_default(),
                ingredients: ingredient_lists.remove(&row.id).unwrap_or_default(),
                steps: step_lists.remove(&row.id).unwrap_or_default(),
                id: row.id,
                author_id: row.author_id,
                name: row.name,
                description: row.description,
                prep_time: row.prep_time,
                cook_time: row.cook_time,
                is_public: row.is_public,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .collect()
}

fn write_lists(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    draft: &RecipeDraft,
) -> QueryResult<()> {
    let new_ingredients: Vec<NewIngredient> = draft
        .ingredients
        .iter()
        .map(|item| NewIngredient {
            recipe_id,
            position: item.position,
            name: &item.name,
            is_header: item.is_header,
        })
        .collect();
    if !new_ingredients.is_empty() {
        diesel::insert_into(ingredients::table)
            .values(&new_ingredients)
            .execute(conn)?;
    }

    let new_steps: Vec<NewStep> = draft
        .steps
        .iter()
        .map(|item| NewStep {
            recipe_id,
            position: item.position,
            name: &item.name,
            is_header: item.is_header,
        })
        .collect();
    if !new_steps.is_empty() {
        diesel::insert_into(steps::table)
            .values(&new_steps)
            .execute(conn)?;
    }

    Ok(())
}

fn write_image(conn: &mut PgConnection, recipe_id: Uuid, image: &MainImage) -> QueryResult<()> {
    let Some(image_type) = image.tag() else {
        return Ok(());
    };

    let main_image_id: Uuid = diesel::insert_into(main_images::table)
        .values(&NewMainImage {
            recipe_id,
            image_type,
        })
        .returning(main_images::id)
        .get_result(conn)?;

    match image {
        MainImage::None => {}
        MainImage::External { url } => {
            diesel::insert_into(url_images::table)
                .values(&NewUrlImage { main_image_id, url })
                .execute(conn)?;
        }
        MainImage::Stored(metadata) => {
            diesel::insert_into(metadata_images::table)
                .values(&NewMetadataImage {
                    main_image_id,
                    storage_key: &metadata.key,
                    name: &metadata.name,
                    size: metadata.size,
                    mime_type: &metadata.mime_type,
                })
                .execute(conn)?;
        }
    }
    Ok(())
}

/// Swap the image for `image`. Sub-records go with their parent row.
fn replace_image(conn: &mut PgConnection, recipe_id: Uuid, image: &MainImage) -> QueryResult<()> {
    diesel::delete(main_images::table.filter(main_images::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    write_image(conn, recipe_id, image)
}

fn check_taxonomy(
    conn: &mut PgConnection,
    kind: TaxonomyKind,
    ids: &[Uuid],
) -> Result<(), StoreError> {
    let known = for_kind!(kind, known_ids!(conn, ids))?;
    match ids.iter().find(|id| !known.contains(id)) {
        Some(id) => Err(StoreError::UnknownTaxonomy { kind, id: *id }),
        None => Ok(()),
    }
}

fn link_taxonomy(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    draft: &RecipeDraft,
) -> Result<(), StoreError> {
    for kind in TaxonomyKind::ALL {
        let ids = unique_ids(kind.ids_in(draft));
        if ids.is_empty() {
            continue;
        }
        check_taxonomy(conn, kind, &ids)?;
        for_kind!(kind, insert_links!(conn, recipe_id, ids))?;
    }
    Ok(())
}

fn unlink_taxonomy(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<()> {
    for kind in TaxonomyKind::ALL {
        for_kind!(kind, delete_links!(conn, recipe_id))?;
    }
    Ok(())
}

impl RecipeStore for PgRecipeStore {
    fn list_recipes(
        &self,
        user_id: &str,
        query: &RecipeQuery,
    ) -> Result<Vec<StoredRecipe>, StoreError> {
        let filters = &query.filters;

        // Pre-compute patterns so they live long enough for the boxed query
        let name_pattern = query.search.as_deref().map(like_pattern);
        let include_ingredients: Vec<String> = filters
            .ingredients_include
            .iter()
            .map(|term| like_pattern(term))
            .collect();
        let exclude_ingredients: Vec<String> = filters
            .ingredients_exclude
            .iter()
            .map(|term| like_pattern(term))
            .collect();
        let include_nationalities: Vec<NationalityTerm> = filters
            .nationalities_include
            .iter()
            .map(|term| NationalityTerm::new(term))
            .collect();
        let exclude_nationalities: Vec<NationalityTerm> = filters
            .nationalities_exclude
            .iter()
            .map(|term| NationalityTerm::new(term))
            .collect();

        let mut conn = self.conn()?;

        let mut sql = recipes::table.into_boxed();
        sql = match query.scope {
            ViewScope::Mine => sql.filter(recipes::author_id.eq(user_id)),
            ViewScope::Public => sql
                .filter(recipes::is_public.eq(true))
                .filter(recipes::author_id.ne(user_id)),
        };

        if let Some(ref pattern) = name_pattern {
            sql = sql.filter(recipes::name.ilike(pattern));
        }

        // AND logic: one subquery per term
        for pattern in &include_ingredients {
            sql = sql.filter(recipes::id.eq_any(recipes_with_ingredient!(pattern)));
        }
        for pattern in &exclude_ingredients {
            sql = sql.filter(recipes::id.ne_all(recipes_with_ingredient!(pattern)));
        }
        for term in &include_nationalities {
            sql = sql.filter(recipes::id.eq_any(recipes_with_nationality!(term)));
        }
        for term in &exclude_nationalities {
            sql = sql.filter(recipes::id.ne_all(recipes_with_nationality!(term)));
        }

        let rows: Vec<Recipe> = sql
            .order(recipes::updated_at.desc())
            .select(Recipe::as_select())
            .load(&mut conn)?;

        assemble(&mut conn, rows)
    }

    fn get_recipe(&self, id: Uuid) -> Result<Option<StoredRecipe>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<Recipe> = recipes::table
            .find(id)
            .select(Recipe::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(assemble(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn get_main_image(&self, id: Uuid) -> Result<Option<ImageOwner>, StoreError> {
        let mut conn = self.conn()?;

        let author_id: Option<String> = recipes::table
            .find(id)
            .select(recipes::author_id)
            .first(&mut conn)
            .optional()?;
        let Some(author_id) = author_id else {
            return Ok(None);
        };

        let image = into_image(load_images(&mut conn, &[id])?.remove(&id))?;
        Ok(Some(ImageOwner { author_id, image }))
    }

    fn create_recipe(
        &self,
        author_id: &str,
        draft: &RecipeDraft,
        site_info: Option<&SiteInfo>,
        image: &MainImage,
    ) -> Result<Uuid, StoreError> {
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let recipe_id: Uuid = diesel::insert_into(recipes::table)
                .values(&NewRecipe {
                    author_id,
                    name: &draft.name,
                    description: &draft.description,
                    prep_time: draft.prep_time,
                    cook_time: draft.cook_time,
                    is_public: draft.is_public,
                })
                .returning(recipes::id)
                .get_result(conn)?;

            if let Some(info) = site_info {
                diesel::insert_into(parsed_site_infos::table)
                    .values((
                        parsed_site_infos::recipe_id.eq(recipe_id),
                        parsed_site_infos::url.eq(&info.url),
                        parsed_site_infos::author.eq(info.author.as_deref()),
                    ))
                    .execute(conn)?;
            }

            write_lists(conn, recipe_id, draft)?;
            write_image(conn, recipe_id, image)?;
            link_taxonomy(conn, recipe_id, draft)?;

            Ok(recipe_id)
        })
    }

    fn update_recipe(
        &self,
        id: Uuid,
        draft: &RecipeDraft,
        image: Option<&MainImage>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let updated = diesel::update(recipes::table.find(id))
                .set(&RecipeChanges {
                    name: &draft.name,
                    description: &draft.description,
                    prep_time: draft.prep_time,
                    cook_time: draft.cook_time,
                    is_public: draft.is_public,
                    updated_at: Utc::now(),
                })
                .execute(conn)?;
            if updated == 0 {
                return Err(StoreError::NotFound(id));
            }

            diesel::delete(ingredients::table.filter(ingredients::recipe_id.eq(id)))
                .execute(conn)?;
            diesel::delete(steps::table.filter(steps::recipe_id.eq(id))).execute(conn)?;
            write_lists(conn, id, draft)?;

            if let Some(image) = image {
                replace_image(conn, id, image)?;
            }

            unlink_taxonomy(conn, id)?;
            link_taxonomy(conn, id, draft)?;

            Ok(())
        })
    }

    fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(recipes::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, StoreError> {
        let mut conn = self.conn()?;

        let rows = for_kind!(kind, list_entries!(&mut conn))?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| TaxonomyEntry { id, name })
            .collect())
    }
}
