#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    AttrKind, NewRecipe, Recipe, RecipeAttr, RecipeFilter, RecipePatch, User, UserPatch,
};
use crate::error::RecipeServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipeServiceError>;
    /// Lookup by the already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RecipeServiceError>;
    async fn create(&self, user: &User) -> Result<(), RecipeServiceError>;
    /// Apply a patch. Returns `None` if the user does not exist.
    async fn update(&self, id: Uuid, patch: &UserPatch)
    -> Result<Option<User>, RecipeServiceError>;
}

/// Repository for recipes and their tag/ingredient links.
///
/// Every method is scoped to `user_id`; a recipe owned by someone else is
/// indistinguishable from a missing one.
pub trait RecipeRepository: Send + Sync {
    /// Recipes ordered by id descending, each at most once.
    async fn list(
        &self,
        user_id: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeServiceError>;

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Recipe>, RecipeServiceError>;

    /// Insert a recipe, resolving tag and ingredient names get-or-create.
    async fn create(&self, user_id: Uuid, recipe: &NewRecipe)
    -> Result<Recipe, RecipeServiceError>;

    /// Returns `None` if the recipe does not exist for this user.
    async fn update(
        &self,
        user_id: Uuid,
        id: i32,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>, RecipeServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeServiceError>;

    /// Store the image path. Returns `false` if the recipe does not exist for this user.
    async fn set_image(
        &self,
        user_id: Uuid,
        id: i32,
        image: &str,
    ) -> Result<bool, RecipeServiceError>;
}

/// Repository shared by tags and ingredients.
pub trait RecipeAttrRepository: Send + Sync {
    const KIND: AttrKind;

    /// Rows ordered by name descending. With `assigned_only`, only rows linked
    /// to at least one of the user's recipes, each once.
    async fn list(
        &self,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<RecipeAttr>, RecipeServiceError>;

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<RecipeAttr>, RecipeServiceError>;

    /// Returns `None` if the row does not exist for this user.
    async fn rename(
        &self,
        user_id: Uuid,
        id: i32,
        name: &str,
    ) -> Result<Option<RecipeAttr>, RecipeServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeServiceError>;
}

/// Storage for uploaded recipe images.
pub trait ImageStore: Send + Sync {
    /// Write `data` at `path`, relative to the media root.
    async fn save(&self, path: &str, data: &[u8]) -> Result<(), RecipeServiceError>;
    async fn remove(&self, path: &str) -> Result<(), RecipeServiceError>;
}
