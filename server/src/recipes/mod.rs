//! Recipe reads and writes: store access, image resolution and image
//! lifecycle side effects.

pub mod images;
mod service;
mod views;

pub use service::RecipeService;
pub use views::{FormImage, RecipeFormView, RecipeView};
