use uuid::Uuid;

use recipe_domain::upload::recipe_image_file_path;

use crate::domain::repository::{ImageStore, RecipeRepository};
use crate::domain::types::{
    NewRecipe, Recipe, RecipeFilter, RecipePatch, is_allowed_image, unique_names, validate_link,
    validate_name, validate_price, validate_time_minutes,
};
use crate::error::RecipeServiceError;

fn check_title(title: &str) -> Result<(), RecipeServiceError> {
    if !validate_name(title) {
        return Err(RecipeServiceError::InvalidName);
    }
    Ok(())
}

fn check_names(names: &[String]) -> Result<(), RecipeServiceError> {
    if names.iter().all(|n| validate_name(n)) {
        Ok(())
    } else {
        Err(RecipeServiceError::InvalidName)
    }
}

fn check_link(link: &str) -> Result<(), RecipeServiceError> {
    if !validate_link(link) {
        return Err(RecipeServiceError::MissingData);
    }
    Ok(())
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeServiceError> {
        self.repo.list(user_id, &filter).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<Recipe, RecipeServiceError> {
        self.repo
            .get(user_id, id)
            .await?
            .ok_or(RecipeServiceError::RecipeNotFound)
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> CreateRecipeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: NewRecipe,
    ) -> Result<Recipe, RecipeServiceError> {
        check_title(&input.title)?;
        if !validate_time_minutes(input.time_minutes) {
            return Err(RecipeServiceError::InvalidTimeMinutes);
        }
        if !validate_price(input.price) {
            return Err(RecipeServiceError::InvalidPrice);
        }
        check_link(&input.link)?;
        check_names(&input.tags)?;
        check_names(&input.ingredients)?;

        let recipe = NewRecipe {
            title: input.title.trim().to_owned(),
            tags: unique_names(input.tags),
            ingredients: unique_names(input.ingredients),
            ..input
        };
        let created = self.repo.create(user_id, &recipe).await?;
        tracing::info!(user_id = %user_id, recipe_id = created.id, "recipe created");
        Ok(created)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

/// Backs both PATCH and PUT; PUT callers fill every required field.
pub struct UpdateRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> UpdateRecipeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: i32,
        patch: RecipePatch,
    ) -> Result<Recipe, RecipeServiceError> {
        if let Some(ref title) = patch.title {
            check_title(title)?;
        }
        if patch.time_minutes.is_some_and(|m| !validate_time_minutes(m)) {
            return Err(RecipeServiceError::InvalidTimeMinutes);
        }
        if patch.price.is_some_and(|p| !validate_price(p)) {
            return Err(RecipeServiceError::InvalidPrice);
        }
        if let Some(ref link) = patch.link {
            check_link(link)?;
        }
        if let Some(ref tags) = patch.tags {
            check_names(tags)?;
        }
        if let Some(ref ingredients) = patch.ingredients {
            check_names(ingredients)?;
        }

        let patch = RecipePatch {
            title: patch.title.map(|t| t.trim().to_owned()),
            tags: patch.tags.map(unique_names),
            ingredients: patch.ingredients.map(unique_names),
            ..patch
        };
        self.repo
            .update(user_id, id, &patch)
            .await?
            .ok_or(RecipeServiceError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<(), RecipeServiceError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(RecipeServiceError::RecipeNotFound);
        }
        Ok(())
    }
}

// ── UploadRecipeImage ────────────────────────────────────────────────────────

pub struct UploadRecipeImageInput {
    pub filename: String,
    pub data: Vec<u8>,
}

pub struct UploadRecipeImageUseCase<R: RecipeRepository, S: ImageStore> {
    pub repo: R,
    pub store: S,
}

impl<R: RecipeRepository, S: ImageStore> UploadRecipeImageUseCase<R, S> {
    /// Returns the stored path, relative to the media root.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: i32,
        input: UploadRecipeImageInput,
    ) -> Result<String, RecipeServiceError> {
        if self.repo.get(user_id, id).await?.is_none() {
            return Err(RecipeServiceError::RecipeNotFound);
        }
        if input.data.is_empty() || !is_allowed_image(&input.filename) {
            return Err(RecipeServiceError::InvalidImage);
        }

        let path = recipe_image_file_path(&input.filename);
        self.store.save(&path, &input.data).await?;
        if !self.repo.set_image(user_id, id, &path).await? {
            // The recipe went away while the file was being written.
            if let Err(e) = self.store.remove(&path).await {
                tracing::warn!(error = %e, image = %path, "failed to remove orphaned image");
            }
            return Err(RecipeServiceError::RecipeNotFound);
        }
        tracing::info!(recipe_id = id, image = %path, "recipe image stored");
        Ok(path)
    }
}
