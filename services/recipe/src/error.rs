use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Recipe service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipeServiceError {
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("invalid email")]
    InvalidEmail,
    #[error("password too short")]
    PasswordTooShort,
    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,
    #[error("invalid name")]
    InvalidName,
    #[error("invalid time_minutes")]
    InvalidTimeMinutes,
    #[error("invalid price")]
    InvalidPrice,
    #[error("invalid image")]
    InvalidImage,
    #[error("image too large")]
    ImageTooLarge,
    #[error("missing data")]
    MissingData,
    #[error("invalid query parameter")]
    InvalidQuery,
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipeServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidTimeMinutes => "INVALID_TIME_MINUTES",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::ImageTooLarge => "IMAGE_TOO_LARGE",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for RecipeServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RecipeNotFound | Self::TagNotFound | Self::IngredientNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidEmail
            | Self::PasswordTooShort
            | Self::InvalidCredentials
            | Self::InvalidName
            | Self::InvalidTimeMinutes
            | Self::InvalidPrice
            | Self::InvalidImage
            | Self::MissingData
            | Self::InvalidQuery => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
