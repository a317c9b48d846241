//! Recipe listing queries: scope, name search and ingredient/nationality filters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which recipes a listing draws from. One or the other, never both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ViewScope {
    /// Recipes authored by the caller.
    #[default]
    Mine,
    /// Public recipes authored by anyone but the caller.
    Public,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilters {
    /// Every term must be contained in some ingredient.
    pub ingredients_include: Vec<String>,
    /// No ingredient may contain any of these terms.
    pub ingredients_exclude: Vec<String>,
    /// Every term must name (or be the id of) one of the recipe's nationalities.
    pub nationalities_include: Vec<String>,
    /// None of the recipe's nationalities may match these terms.
    pub nationalities_exclude: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    pub scope: ViewScope,
    pub search: Option<String>,
    pub filters: RecipeFilters,
}

/// The parts of a recipe that filters look at.
#[derive(Debug, Clone, Default)]
pub struct FilterSubject<'a> {
    pub name: &'a str,
    /// Ingredient lines, excluding header rows.
    pub ingredients: Vec<&'a str>,
    pub nationalities: Vec<(Uuid, &'a str)>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn nationality_matches(term: &str, id: &Uuid, name: &str) -> bool {
    name.eq_ignore_ascii_case(term) || id.to_string().eq_ignore_ascii_case(term)
}

impl RecipeFilters {
    pub fn is_empty(&self) -> bool {
        self.ingredients_include.is_empty()
            && self.ingredients_exclude.is_empty()
            && self.nationalities_include.is_empty()
            && self.nationalities_exclude.is_empty()
    }

    pub fn matches(&self, subject: &FilterSubject<'_>) -> bool {
        let excluded_ingredient = self.ingredients_exclude.iter().any(|term| {
            subject
                .ingredients
                .iter()
                .any(|ingredient| contains_ci(ingredient, term))
        });
        if excluded_ingredient {
            return false;
        }

        let all_ingredients = self.ingredients_include.iter().all(|term| {
            subject
                .ingredients
                .iter()
                .any(|ingredient| contains_ci(ingredient, term))
        });
        if !all_ingredients {
            return false;
        }

        let excluded_nationality = self.nationalities_exclude.iter().any(|term| {
            subject
                .nationalities
                .iter()
                .any(|(id, name)| nationality_matches(term, id, name))
        });
        if excluded_nationality {
            return false;
        }

        self.nationalities_include.iter().all(|term| {
            subject
                .nationalities
                .iter()
                .any(|(id, name)| nationality_matches(term, id, name))
        })
    }
}

impl RecipeQuery {
    /// Build a query from a scope and an optional `q` string (see [`parse_query`]).
    pub fn new(scope: ViewScope, q: Option<&str>) -> Self {
        let mut query = q.map(parse_query).unwrap_or_default();
        query.scope = scope;
        query
    }

    pub fn matches(&self, subject: &FilterSubject<'_>) -> bool {
        if let Some(search) = &self.search {
            if !contains_ci(subject.name, search) {
                return false;
            }
        }
        self.filters.matches(subject)
    }
}

/// Parse a search string into a query. Supports:
/// - Plain text: substring match on the recipe name
/// - ingredient:value / -ingredient:value: require / forbid an ingredient
/// - nationality:value / -nationality:value: require / forbid a nationality
///
/// Example: `"pancakes ingredient:egg ingredient:milk -ingredient:nut"`
pub fn parse_query(q: &str) -> RecipeQuery {
    let mut query = RecipeQuery::default();
    let mut text = Vec::new();

    for token in tokenize(q) {
        if let Some(term) = token.strip_prefix("-ingredient:") {
            push_term(&mut query.filters.ingredients_exclude, term);
        } else if let Some(term) = token.strip_prefix("ingredient:") {
            push_term(&mut query.filters.ingredients_include, term);
        } else if let Some(term) = token.strip_prefix("-nationality:") {
            push_term(&mut query.filters.nationalities_exclude, term);
        } else if let Some(term) = token.strip_prefix("nationality:") {
            push_term(&mut query.filters.nationalities_include, term);
        } else if !token.is_empty() {
            text.push(token);
        }
    }

    if !text.is_empty() {
        query.search = Some(text.join(" "));
    }

    query
}

fn push_term(terms: &mut Vec<String>, term: &str) {
    if !term.is_empty() {
        terms.push(term.to_string());
    }
}

// Split on whitespace, keeping double-quoted runs together
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
