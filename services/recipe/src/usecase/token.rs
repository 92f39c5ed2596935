use recipe_auth_types::token::issue_token;
use recipe_domain::email::normalize_email;

use crate::domain::repository::UserRepository;
use crate::error::RecipeServiceError;
use crate::infra::password::verify_password;

// ── ObtainToken (login) ──────────────────────────────────────────────────────

pub struct ObtainTokenInput {
    pub email: String,
    pub password: String,
}

pub struct ObtainTokenOutput {
    pub token: String,
    pub exp: u64,
}

pub struct ObtainTokenUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
    pub ttl_secs: u64,
}

impl<R: UserRepository> ObtainTokenUseCase<R> {
    /// Unknown email, wrong password and inactive account all fail the same way.
    pub async fn execute(
        &self,
        input: ObtainTokenInput,
    ) -> Result<ObtainTokenOutput, RecipeServiceError> {
        let email =
            normalize_email(&input.email).map_err(|_| RecipeServiceError::InvalidCredentials)?;
        if input.password.is_empty() {
            return Err(RecipeServiceError::InvalidCredentials);
        }

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(RecipeServiceError::InvalidCredentials)?;
        if !user.is_active || !verify_password(&input.password, &user.password_hash) {
            return Err(RecipeServiceError::InvalidCredentials);
        }

        let (token, exp) = issue_token(user.id, &self.jwt_secret, self.ttl_secs)
            .map_err(|e| RecipeServiceError::Internal(e.into()))?;
        tracing::debug!(user_id = %user.id, "token issued");
        Ok(ObtainTokenOutput { token, exp })
    }
}
