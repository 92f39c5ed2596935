use axum::{
    Json,
    extract::{Multipart, Path, RawQuery, State, multipart::MultipartError},
    http::StatusCode,
};
use sea_orm::prelude::Decimal;
use serde::{Deserialize, Serialize};

use recipe_auth_types::identity::Identity;

use crate::domain::types::{NewRecipe, Recipe, RecipeAttr, RecipeFilter, RecipePatch};
use crate::error::RecipeServiceError;
use crate::handlers::parse_id;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase,
    UpdateRecipeUseCase, UploadRecipeImageInput, UploadRecipeImageUseCase,
};

/// URL prefix uploaded files are served under.
pub const MEDIA_URL: &str = "/media";

// ── Response types ───────────────────────────────────────────────────────────

/// Wire shape shared by tags and ingredients.
#[derive(Serialize)]
pub struct RecipeAttrResponse {
    pub id: i32,
    pub name: String,
}

impl From<RecipeAttr> for RecipeAttrResponse {
    fn from(attr: RecipeAttr) -> Self {
        Self {
            id: attr.id,
            name: attr.name,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    #[serde(serialize_with = "recipe_core::serde::to_decimal_2dp")]
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<RecipeAttrResponse>,
    pub ingredients: Vec<RecipeAttrResponse>,
}

#[derive(Serialize)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub description: String,
    pub image: Option<String>,
}

fn image_url(path: &str) -> String {
    format!("{MEDIA_URL}/{path}")
}

impl From<Recipe> for RecipeDetailResponse {
    fn from(r: Recipe) -> Self {
        Self {
            description: r.description,
            image: r.image.as_deref().map(image_url),
            recipe: RecipeResponse {
                id: r.id,
                title: r.title,
                time_minutes: r.time_minutes,
                price: r.price,
                link: r.link,
                tags: r.tags.into_iter().map(Into::into).collect(),
                ingredients: r.ingredients.into_iter().map(Into::into).collect(),
            },
        }
    }
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        RecipeDetailResponse::from(r).recipe
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

fn names(items: Vec<NameRequest>) -> Vec<String> {
    items.into_iter().map(|i| i.name).collect()
}

#[derive(Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub time_minutes: i32,
    #[serde(deserialize_with = "recipe_core::serde::from_decimal_str")]
    pub price: Decimal,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<NameRequest>,
    #[serde(default)]
    pub ingredients: Vec<NameRequest>,
}

/// PUT body: required fields as on create; absent link arrays keep the current links.
#[derive(Deserialize)]
pub struct PutRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub time_minutes: i32,
    #[serde(deserialize_with = "recipe_core::serde::from_decimal_str")]
    pub price: Decimal,
    #[serde(default)]
    pub link: String,
    pub tags: Option<Vec<NameRequest>>,
    pub ingredients: Option<Vec<NameRequest>>,
}

#[derive(Deserialize)]
pub struct PatchRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    #[serde(default, deserialize_with = "recipe_core::serde::from_optional_decimal_str")]
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<NameRequest>>,
    pub ingredients: Option<Vec<NameRequest>>,
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    /// Comma-separated tag ids.
    pub tags: Option<String>,
    /// Comma-separated ingredient ids.
    pub ingredients: Option<String>,
}

/// Parse `"1,2,3"` into ids. Empty segments are skipped.
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, RecipeServiceError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| RecipeServiceError::InvalidQuery))
        .collect()
}

// ── GET /recipe/recipes/ ─────────────────────────────────────────────────────

pub async fn list_recipes(
    identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeResponse>>, RecipeServiceError> {
    let query: RecipeListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| RecipeServiceError::InvalidQuery)?
        .unwrap_or_default();

    let filter = RecipeFilter {
        tag_ids: query
            .tags
            .as_deref()
            .map(parse_id_list)
            .transpose()?
            .unwrap_or_default(),
        ingredient_ids: query
            .ingredients
            .as_deref()
            .map(parse_id_list)
            .transpose()?
            .unwrap_or_default(),
    };

    let usecase = ListRecipesUseCase {
        repo: state.recipe_repo(),
    };
    let recipes = usecase.execute(identity.user_id, filter).await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

// ── POST /recipe/recipes/ ────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetailResponse>), RecipeServiceError> {
    let usecase = CreateRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase
        .execute(
            identity.user_id,
            NewRecipe {
                title: body.title,
                description: body.description,
                time_minutes: body.time_minutes,
                price: body.price,
                link: body.link,
                tags: names(body.tags),
                ingredients: names(body.ingredients),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

// ── GET /recipe/recipes/{id}/ ────────────────────────────────────────────────

pub async fn get_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    let id = parse_id(&id, RecipeServiceError::RecipeNotFound)?;
    let usecase = GetRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(identity.user_id, id).await?;
    Ok(Json(recipe.into()))
}

// ── PATCH /recipe/recipes/{id}/ ──────────────────────────────────────────────

pub async fn patch_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PatchRecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    let id = parse_id(&id, RecipeServiceError::RecipeNotFound)?;
    let patch = RecipePatch {
        title: body.title,
        description: body.description,
        time_minutes: body.time_minutes,
        price: body.price,
        link: body.link,
        tags: body.tags.map(names),
        ingredients: body.ingredients.map(names),
    };
    update_recipe(&state, identity, id, patch).await
}

// ── PUT /recipe/recipes/{id}/ ────────────────────────────────────────────────

pub async fn put_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PutRecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    let id = parse_id(&id, RecipeServiceError::RecipeNotFound)?;
    let patch = RecipePatch {
        title: Some(body.title),
        description: Some(body.description),
        time_minutes: Some(body.time_minutes),
        price: Some(body.price),
        link: Some(body.link),
        tags: body.tags.map(names),
        ingredients: body.ingredients.map(names),
    };
    update_recipe(&state, identity, id, patch).await
}

async fn update_recipe(
    state: &AppState,
    identity: Identity,
    id: i32,
    patch: RecipePatch,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    let usecase = UpdateRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(identity.user_id, id, patch).await?;
    Ok(Json(recipe.into()))
}

// ── DELETE /recipe/recipes/{id}/ ─────────────────────────────────────────────

pub async fn delete_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, RecipeServiceError> {
    let id = parse_id(&id, RecipeServiceError::RecipeNotFound)?;
    let usecase = DeleteRecipeUseCase {
        repo: state.recipe_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /recipe/recipes/{id}/upload-image/ ──────────────────────────────────

fn multipart_error(e: MultipartError) -> RecipeServiceError {
    tracing::debug!(error = %e, "unreadable multipart body");
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RecipeServiceError::ImageTooLarge
    } else {
        RecipeServiceError::InvalidImage
    }
}

#[derive(Serialize)]
pub struct RecipeImageResponse {
    pub id: i32,
    pub image: String,
}

pub async fn upload_recipe_image(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<RecipeImageResponse>, RecipeServiceError> {
    let id = parse_id(&id, RecipeServiceError::RecipeNotFound)?;
    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_owned();
        let data = field.bytes().await.map_err(multipart_error)?;
        image = Some(UploadRecipeImageInput {
            filename,
            data: data.to_vec(),
        });
    }
    let input = image.ok_or(RecipeServiceError::InvalidImage)?;

    let usecase = UploadRecipeImageUseCase {
        repo: state.recipe_repo(),
        store: state.image_store(),
    };
    let path = usecase.execute(identity.user_id, id, input).await?;
    Ok(Json(RecipeImageResponse {
        id,
        image: image_url(&path),
    }))
}
