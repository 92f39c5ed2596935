//! Use cases shared by tags and ingredients. The repository's `KIND` picks
//! which not-found error is reported.

use uuid::Uuid;

use crate::domain::repository::RecipeAttrRepository;
use crate::domain::types::{RecipeAttr, validate_name};
use crate::error::RecipeServiceError;

// ── ListRecipeAttrs ──────────────────────────────────────────────────────────

pub struct ListRecipeAttrsUseCase<R: RecipeAttrRepository> {
    pub repo: R,
}

impl<R: RecipeAttrRepository> ListRecipeAttrsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<RecipeAttr>, RecipeServiceError> {
        self.repo.list(user_id, assigned_only).await
    }
}

// ── GetRecipeAttr ────────────────────────────────────────────────────────────

pub struct GetRecipeAttrUseCase<R: RecipeAttrRepository> {
    pub repo: R,
}

impl<R: RecipeAttrRepository> GetRecipeAttrUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<RecipeAttr, RecipeServiceError> {
        self.repo
            .get(user_id, id)
            .await?
            .ok_or_else(|| R::KIND.not_found())
    }
}

// ── UpdateRecipeAttr ─────────────────────────────────────────────────────────

pub struct UpdateRecipeAttrUseCase<R: RecipeAttrRepository> {
    pub repo: R,
}

impl<R: RecipeAttrRepository> UpdateRecipeAttrUseCase<R> {
    /// `name` is the only writable field; `None` (an empty PATCH body) is a
    /// no-op that returns the current row.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: i32,
        name: Option<String>,
    ) -> Result<RecipeAttr, RecipeServiceError> {
        let Some(name) = name else {
            return self
                .repo
                .get(user_id, id)
                .await?
                .ok_or_else(|| R::KIND.not_found());
        };
        if !validate_name(&name) {
            return Err(RecipeServiceError::InvalidName);
        }
        self.repo
            .rename(user_id, id, name.trim())
            .await?
            .ok_or_else(|| R::KIND.not_found())
    }
}

// ── DeleteRecipeAttr ─────────────────────────────────────────────────────────

pub struct DeleteRecipeAttrUseCase<R: RecipeAttrRepository> {
    pub repo: R,
}

impl<R: RecipeAttrRepository> DeleteRecipeAttrUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<(), RecipeServiceError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(R::KIND.not_found());
        }
        Ok(())
    }
}
