use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: String,
    pub name: String,
    pub description: String,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub is_public: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeChanges<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::parsed_site_infos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParsedSiteInfo {
    pub recipe_id: Uuid,
    pub url: String,
    pub author: Option<String>,
}

/// Row shape shared by `ingredients` and `steps`.
#[derive(Queryable, Debug)]
pub struct ListRow {
    pub recipe_id: Uuid,
    pub position: i32,
    pub name: String,
    pub is_header: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub recipe_id: Uuid,
    pub position: i32,
    pub name: &'a str,
    pub is_header: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::steps)]
pub struct NewStep<'a> {
    pub recipe_id: Uuid,
    pub position: i32,
    pub name: &'a str,
    pub is_header: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::main_images)]
pub struct NewMainImage<'a> {
    pub recipe_id: Uuid,
    pub image_type: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::url_images)]
pub struct NewUrlImage<'a> {
    pub main_image_id: Uuid,
    pub url: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::metadata_images)]
pub struct NewMetadataImage<'a> {
    pub main_image_id: Uuid,
    pub storage_key: &'a str,
    pub name: &'a str,
    pub size: i64,
    pub mime_type: &'a str,
}

/// `main_images` left-joined with both sub-records.
#[derive(Queryable, Debug)]
pub struct MainImageRow {
    pub recipe_id: Uuid,
    pub image_type: String,
    pub url: Option<String>,
    pub metadata: Option<(String, String, i64, String)>,
}
