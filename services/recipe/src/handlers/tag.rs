use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::Deserialize;

use recipe_auth_types::identity::Identity;

use crate::domain::types::AttrKind;
use crate::error::RecipeServiceError;
use crate::handlers::parse_id;
use crate::handlers::recipe::RecipeAttrResponse;
use crate::state::AppState;
use crate::usecase::recipe_attr::{
    DeleteRecipeAttrUseCase, GetRecipeAttrUseCase, ListRecipeAttrsUseCase,
    UpdateRecipeAttrUseCase,
};

/// `?assigned_only=<n>`; any non-zero value enables the filter.
#[derive(Deserialize, Default)]
pub struct AssignedOnlyQuery {
    pub assigned_only: Option<i64>,
}

impl AssignedOnlyQuery {
    pub fn parse(raw_query: Option<&str>) -> Result<bool, RecipeServiceError> {
        let query: Self = raw_query
            .map(serde_qs::from_str)
            .transpose()
            .map_err(|_| RecipeServiceError::InvalidQuery)?
            .unwrap_or_default();
        Ok(query.assigned_only.unwrap_or(0) != 0)
    }
}

#[derive(Deserialize)]
pub struct PatchNameRequest {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct PutNameRequest {
    pub name: String,
}

// ── GET /recipe/tags/ ────────────────────────────────────────────────────────

pub async fn list_tags(
    identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeAttrResponse>>, RecipeServiceError> {
    let assigned_only = AssignedOnlyQuery::parse(raw_query.as_deref())?;
    let usecase = ListRecipeAttrsUseCase {
        repo: state.tag_repo(),
    };
    let tags = usecase.execute(identity.user_id, assigned_only).await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

// ── GET /recipe/tags/{id}/ ───────────────────────────────────────────────────

pub async fn get_tag(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeAttrResponse>, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Tag.not_found())?;
    let usecase = GetRecipeAttrUseCase {
        repo: state.tag_repo(),
    };
    let tag = usecase.execute(identity.user_id, id).await?;
    Ok(Json(tag.into()))
}

// ── PATCH /recipe/tags/{id}/ ─────────────────────────────────────────────────

pub async fn patch_tag(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PatchNameRequest>,
) -> Result<Json<RecipeAttrResponse>, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Tag.not_found())?;
    let usecase = UpdateRecipeAttrUseCase {
        repo: state.tag_repo(),
    };
    let tag = usecase.execute(identity.user_id, id, body.name).await?;
    Ok(Json(tag.into()))
}

// ── PUT /recipe/tags/{id}/ ───────────────────────────────────────────────────

pub async fn put_tag(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PutNameRequest>,
) -> Result<Json<RecipeAttrResponse>, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Tag.not_found())?;
    let usecase = UpdateRecipeAttrUseCase {
        repo: state.tag_repo(),
    };
    let tag = usecase.execute(identity.user_id, id, Some(body.name)).await?;
    Ok(Json(tag.into()))
}

// ── DELETE /recipe/tags/{id}/ ────────────────────────────────────────────────

pub async fn delete_tag(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, RecipeServiceError> {
    let id = parse_id(&id, AttrKind::Tag.not_found())?;
    let usecase = DeleteRecipeAttrUseCase {
        repo: state.tag_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
