use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use recipe_auth_types::identity::Identity;

use crate::domain::types::User;
use crate::error::RecipeServiceError;
use crate::state::AppState;
use crate::usecase::token::{ObtainTokenInput, ObtainTokenUseCase};
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, GetUserUseCase, UpdateUserInput, UpdateUserUseCase,
};

#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

// ── POST /user/create/ ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), RecipeServiceError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            email: body.email,
            password: body.password,
            name: body.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /user/token/ ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: u64,
}

pub async fn create_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, RecipeServiceError> {
    let usecase = ObtainTokenUseCase {
        repo: state.user_repo(),
        jwt_secret: state.token_secret.0.to_string(),
        ttl_secs: state.token_ttl_secs,
    };
    let output = usecase
        .execute(ObtainTokenInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(TokenResponse {
        token: output.token,
        expires_at: output.exp,
    }))
}

// ── GET /user/me/ ────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, RecipeServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /user/me/ ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PatchMeRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

pub async fn patch_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<PatchMeRequest>,
) -> Result<Json<UserResponse>, RecipeServiceError> {
    update_me(
        &state,
        identity,
        UpdateUserInput {
            email: body.email,
            password: body.password,
            name: body.name,
        },
    )
    .await
}

// ── PUT /user/me/ ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PutMeRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

pub async fn put_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<PutMeRequest>,
) -> Result<Json<UserResponse>, RecipeServiceError> {
    update_me(
        &state,
        identity,
        UpdateUserInput {
            email: Some(body.email),
            password: Some(body.password),
            name: Some(body.name),
        },
    )
    .await
}

async fn update_me(
    state: &AppState,
    identity: Identity,
    input: UpdateUserInput,
) -> Result<Json<UserResponse>, RecipeServiceError> {
    // Reject tokens of deactivated or removed accounts before writing.
    GetUserUseCase {
        repo: state.user_repo(),
    }
    .execute(identity.user_id)
    .await?;

    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id, input).await?;
    Ok(Json(user.into()))
}
