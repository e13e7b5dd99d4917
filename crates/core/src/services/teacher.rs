//! Teacher accounts and sessions.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use gradebook_common::{AppError, AppResult, IdGenerator};
use gradebook_db::{entities::teacher, repositories::TeacherRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Teacher service for registration and authentication.
#[derive(Clone)]
pub struct TeacherService {
    teacher_repo: TeacherRepository,
    id_gen: IdGenerator,
}

/// Input for registering a teacher.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

/// Input for signing in.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninInput {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// An authenticated teacher and their session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub teacher: teacher::Model,
    pub token: String,
}

impl TeacherService {
    /// Create a new teacher service.
    #[must_use]
    pub const fn new(teacher_repo: TeacherRepository) -> Self {
        Self {
            teacher_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a teacher and open a session.
    pub async fn signup(&self, input: SignupInput) -> AppResult<Session> {
        input.validate()?;
        check_username(&input.username)?;
        check_password(&input.password, &input.password_confirmation)?;

        if self
            .teacher_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();

        let model = teacher::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            email: Set(input.email),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            password_hash: Set(password_hash),
            token: Set(Some(token.clone())),
            is_admin: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let teacher = self.teacher_repo.create(model).await?;
        tracing::info!(teacher_id = %teacher.id, username = %teacher.username, "Teacher registered");

        Ok(Session { teacher, token })
    }

    /// Authenticate by username and password.
    ///
    /// Returns the current session token, issuing one if the teacher has none.
    pub async fn signin(&self, input: SigninInput) -> AppResult<Session> {
        input.validate()?;

        let teacher = self
            .teacher_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &teacher.password_hash)? {
            tracing::debug!(username = %input.username, "Sign-in rejected");
            return Err(AppError::Unauthorized);
        }

        if let Some(token) = teacher.token.clone() {
            return Ok(Session { teacher, token });
        }

        let token = self.id_gen.generate_token();
        let teacher = self
            .teacher_repo
            .set_token(&teacher.id, Some(token.clone()))
            .await?;

        Ok(Session { teacher, token })
    }

    /// End the current session by rotating the token.
    pub async fn signout(&self, teacher_id: &str) -> AppResult<()> {
        let token = self.id_gen.generate_token();
        self.teacher_repo.set_token(teacher_id, Some(token)).await?;
        tracing::debug!(%teacher_id, "Session token rotated");
        Ok(())
    }

    /// Resolve a session token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<teacher::Model> {
        self.teacher_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Letters, digits and `@ . + - _` only.
pub(crate) fn check_username(username: &str) -> AppResult<()> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".to_string(),
        ))
    }
}

pub(crate) fn check_password(password: &str, confirmation: &str) -> AppResult<()> {
    if password != confirmation {
        return Err(AppError::Validation(
            "Password confirmation does not match".to_string(),
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password cannot be entirely numeric".to_string(),
        ));
    }
    Ok(())
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
