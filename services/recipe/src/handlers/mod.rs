pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

use crate::error::RecipeServiceError;

/// Parse a row id taken from the URL. An id that cannot name a row is reported
/// as that resource missing.
pub fn parse_id(raw: &str, not_found: RecipeServiceError) -> Result<i32, RecipeServiceError> {
    raw.trim().parse().map_err(|_| not_found)
}
