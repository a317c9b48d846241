pub mod cache_bucket;
pub mod error;
pub mod image;
pub mod parser;
pub mod query;
pub mod transition;
pub mod types;

pub use cache_bucket::{cache_bucket_date, parse_cache_bucket, week_bucket};
pub use error::{DraftError, ImageStateError, ImageValidationError, ParseError};
pub use image::{
    validate_image_url, DisplayImage, DisplayImageType, ImageMetadata, ImageUpload, MainImage,
    MAX_IMAGE_SIZE,
};
pub use parser::{
    parse_for_form, FakeParser, HttpRecipeParser, InitialData, ParsedRecipe, ParsedRecipeForm,
    RecipeParser,
};
pub use query::{parse_query, FilterSubject, RecipeFilters, RecipeQuery, ViewScope};
pub use transition::{plan_transition, state_name, ImageChange, ImagePlan};
pub use types::{numbered, ListItem, RecipeDraft, SiteInfo};
