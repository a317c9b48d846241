use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::DraftError;

/// One ingredient or step line. Header rows label a group of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListItem {
    #[serde(rename = "order")]
    pub position: i32,
    pub name: String,
    #[serde(default)]
    pub is_header: bool,
}

/// Where a parsed recipe came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SiteInfo {
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Editable recipe fields, as submitted by the create and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Minutes
    #[serde(default)]
    pub prep_time: Option<f64>,
    /// Minutes
    #[serde(default)]
    pub cook_time: Option<f64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub ingredients: Vec<ListItem>,
    #[serde(default)]
    pub steps: Vec<ListItem>,
    #[serde(default)]
    pub meal_types: Vec<Uuid>,
    #[serde(default)]
    pub nationalities: Vec<Uuid>,
    #[serde(default)]
    pub cooking_methods: Vec<Uuid>,
    #[serde(default)]
    pub utensils: Vec<Uuid>,
}

impl RecipeDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::EmptyName);
        }
        for (label, time) in [("Prep time", self.prep_time), ("Cook time", self.cook_time)] {
            if time.is_some_and(|t| t < 0.0) {
                return Err(DraftError::NegativeTime(label));
            }
        }
        check_positions("ingredient", &self.ingredients)?;
        check_positions("step", &self.steps)?;
        Ok(())
    }
}

fn check_positions(list: &'static str, items: &[ListItem]) -> Result<(), DraftError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.position) {
            return Err(DraftError::DuplicatePosition {
                list,
                position: item.position,
            });
        }
    }
    Ok(())
}

/// Number lines 0..n in the order given.
pub fn numbered(lines: impl IntoIterator<Item = String>) -> Vec<ListItem> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, name)| ListItem {
            position: i as i32,
            name,
            is_header: false,
        })
        .collect()
}
