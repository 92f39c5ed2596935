use chrono::{DateTime, Utc};
use sea_orm::prelude::Decimal;
use uuid::Uuid;

use crate::error::RecipeServiceError;

/// Maximum length of titles, names, emails and links (characters).
pub const MAX_TEXT_LEN: usize = 255;

/// Minimum accepted password length (characters).
pub const MIN_PASSWORD_LEN: usize = 5;

/// Account that owns recipes, tags and ingredients.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields of a profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// The two owner-scoped lookup tables a recipe links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Tag,
    Ingredient,
}

impl AttrKind {
    pub fn not_found(self) -> RecipeServiceError {
        match self {
            Self::Tag => RecipeServiceError::TagNotFound,
            Self::Ingredient => RecipeServiceError::IngredientNotFound,
        }
    }
}

/// A tag or an ingredient: a named row owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeAttr {
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
}

/// A recipe with its linked tags and ingredients.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub tags: Vec<RecipeAttr>,
    pub ingredients: Vec<RecipeAttr>,
}

/// Validated input for a new recipe. Tag and ingredient names are resolved
/// get-or-create within the owner's rows.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
}

/// Partial recipe update. A present `tags`/`ingredients` list replaces the
/// current links; an empty list clears them.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

/// Recipe list filter. Empty lists mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tag_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
}

pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_TEXT_LEN
}

pub fn validate_time_minutes(minutes: i32) -> bool {
    minutes >= 0
}

/// Price must fit `decimal(5, 2)`: at most two fractional digits, magnitude below 1000.
pub fn validate_price(price: Decimal) -> bool {
    price.normalize().scale() <= 2 && price.abs() < Decimal::from(1000)
}

pub fn validate_link(link: &str) -> bool {
    link.chars().count() <= MAX_TEXT_LEN
}

/// Extensions accepted for recipe images, compared case-insensitively.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

pub fn is_allowed_image(filename: &str) -> bool {
    recipe_domain::upload::file_extension(filename).is_some_and(|ext| {
        ALLOWED_IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    })
}

/// Trim names and drop repeats, keeping first-seen order.
pub fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim().to_owned();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
