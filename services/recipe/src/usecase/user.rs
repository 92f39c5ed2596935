use chrono::Utc;
use uuid::Uuid;

use recipe_domain::email::{is_valid_email, normalize_email};

use crate::domain::repository::UserRepository;
use crate::domain::types::{MAX_TEXT_LEN, MIN_PASSWORD_LEN, User, UserPatch};
use crate::error::RecipeServiceError;
use crate::infra::password::hash_password;

/// Normalize then shape-check an email.
fn clean_email(raw: &str) -> Result<String, RecipeServiceError> {
    let email = normalize_email(raw).map_err(|_| RecipeServiceError::InvalidEmail)?;
    if !is_valid_email(&email) || email.chars().count() > MAX_TEXT_LEN {
        return Err(RecipeServiceError::InvalidEmail);
    }
    Ok(email)
}

fn check_password(password: &str) -> Result<(), RecipeServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RecipeServiceError::PasswordTooShort);
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), RecipeServiceError> {
    if name.chars().count() > MAX_TEXT_LEN {
        return Err(RecipeServiceError::InvalidName);
    }
    Ok(())
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, RecipeServiceError> {
        create_account(&self.repo, input, false).await
    }
}

// ── CreateSuperuser ──────────────────────────────────────────────────────────

/// Same checks as [`CreateUserUseCase`]; the account gets staff and superuser flags.
pub struct CreateSuperuserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateSuperuserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, RecipeServiceError> {
        create_account(&self.repo, input, true).await
    }
}

async fn create_account<R: UserRepository>(
    repo: &R,
    input: CreateUserInput,
    superuser: bool,
) -> Result<User, RecipeServiceError> {
    let email = clean_email(&input.email)?;
    check_password(&input.password)?;
    check_name(&input.name)?;
    if repo.find_by_email(&email).await?.is_some() {
        return Err(RecipeServiceError::UserAlreadyExists);
    }

    let user = User {
        id: Uuid::now_v7(),
        email,
        name: input.name.trim().to_owned(),
        password_hash: hash_password(&input.password)?,
        is_active: true,
        is_staff: superuser,
        is_superuser: superuser,
        created_at: Utc::now(),
    };
    repo.create(&user).await?;
    tracing::info!(user_id = %user.id, superuser, "user created");
    Ok(user)
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    /// A valid token whose user has since disappeared or been deactivated is
    /// treated as unauthenticated.
    pub async fn execute(&self, user_id: Uuid) -> Result<User, RecipeServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(RecipeServiceError::Unauthorized)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, RecipeServiceError> {
        if input.email.is_none() && input.password.is_none() && input.name.is_none() {
            return Err(RecipeServiceError::MissingData);
        }

        let mut patch = UserPatch::default();
        if let Some(ref raw) = input.email {
            let email = clean_email(raw)?;
            if let Some(other) = self.repo.find_by_email(&email).await? {
                if other.id != user_id {
                    return Err(RecipeServiceError::UserAlreadyExists);
                }
            }
            patch.email = Some(email);
        }
        if let Some(ref name) = input.name {
            check_name(name)?;
            patch.name = Some(name.trim().to_owned());
        }
        if let Some(ref password) = input.password {
            check_password(password)?;
            patch.password_hash = Some(hash_password(password)?);
        }

        self.repo
            .update(user_id, &patch)
            .await?
            .ok_or(RecipeServiceError::Unauthorized)
    }
}
