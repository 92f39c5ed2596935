//! Storage paths for uploaded files.

use std::path::Path;

use uuid::Uuid;

/// Directory (relative to the media root) that holds recipe images.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// Generate a collision-free storage path for a recipe image.
///
/// Only the extension of `filename` is kept; the stem is replaced by a fresh UUID v4.
pub fn recipe_image_file_path(filename: &str) -> String {
    recipe_image_file_path_with_id(Uuid::new_v4(), filename)
}

/// Same as [`recipe_image_file_path`] with a caller-supplied identifier.
///
/// ```
/// use recipe_domain::upload::recipe_image_file_path_with_id;
/// use uuid::Uuid;
///
/// let id = Uuid::nil();
/// assert_eq!(
///     recipe_image_file_path_with_id(id, "example.jpg"),
///     format!("uploads/recipe/{id}.jpg"),
/// );
/// ```
pub fn recipe_image_file_path_with_id(id: Uuid, filename: &str) -> String {
    match file_extension(filename) {
        Some(ext) => format!("{RECIPE_IMAGE_DIR}/{id}.{ext}"),
        None => format!("{RECIPE_IMAGE_DIR}/{id}"),
    }
}

/// Extension of the final path component, without the leading dot.
///
/// Dot-files such as `.profile` have no extension.
pub fn file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}
