use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};

use recipe_auth_types::identity::Identity;

use crate::domain::types::AttrKind;
use crate::error::RecipeServiceError;
use crate::handlers::parse_id;
use crate::handlers::recipe::RecipeAttrResponse;
use crate::handlers::tag::{AssignedOnlyQuery, PatchNameRequest, PutNameRequest};
use crate::state::AppState;
use crate::usecase::recipe_attr::{
    DeleteRecipeAttrUseCase, GetRecipeAttrUseCase, ListRecipeAttrsUseCase,
    UpdateRecipeAttrUseCase,
};

// ── GET /recipe/ingredients/ ─────────────────────────────────────────────────

pub async fn list_ingredients(
    identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeAttrResponse>>, RecipeServiceError> {
    let assigned_only = AssignedOnlyQuery::parse(raw_query.as_deref())?;
    let usecase = ListRecipeAttrsUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredients = usecase.execute(identity.user_id, assigned_only).await?;
    Ok(Json(ingredients.into_iter().map(Into::into).collect()))
}

// ── GET /recipe/ingredients/{id}/ ────────────────────────────────────────────

pub async fn get_ingredient(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeAttrResponse>, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Ingredient.not_found())?;
    let usecase = GetRecipeAttrUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredient = usecase.execute(identity.user_id, id).await?;
    Ok(Json(ingredient.into()))
}

// ── PATCH /recipe/ingredients/{id}/ ──────────────────────────────────────────

pub async fn patch_ingredient(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PatchNameRequest>,
) -> Result<Json<RecipeAttrResponse>, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Ingredient.not_found())?;
    let usecase = UpdateRecipeAttrUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredient = usecase.execute(identity.user_id, id, body.name).await?;
    Ok(Json(ingredient.into()))
}

// ── PUT /recipe/ingredients/{id}/ ────────────────────────────────────────────

pub async fn put_ingredient(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PutNameRequest>,
) -> Result<Json<RecipeAttrResponse>, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Ingredient.not_found())?;
    let usecase = UpdateRecipeAttrUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredient = usecase
        .execute(identity.user_id, id, Some(body.name))
        .await?;
    Ok(Json(ingredient.into()))
}

// ── DELETE /recipe/ingredients/{id}/ ─────────────────────────────────────────

pub async fn delete_ingredient(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Ingredient.not_found())?;
    let usecase = DeleteRecipeAttrUseCase {
        repo: state.ingredient_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
