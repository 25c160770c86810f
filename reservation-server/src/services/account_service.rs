//! Account Service - registration and login

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AuthPayload, LoginRequest, RegisterRequest, User, UserId, UserSummary};

use crate::auth::JwtService;
use crate::auth::password::{hash_password, verify_password};
use crate::db::{RepoError, Store};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, validate_email, validate_required_text,
};

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    jwt: Arc<JwtService>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("backend", &self.store.backend())
            .finish_non_exhaustive()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, jwt: Arc<JwtService>) -> Self {
        Self { store, jwt }
    }

    fn issue(&self, user: &User) -> AppResult<AuthPayload> {
        let token = self.jwt.generate_token(user).map_err(|e| {
            tracing::error!(error = %e, "Token generation failed");
            AppError::internal("Failed to issue token")
        })?;
        Ok(AuthPayload {
            token,
            user: user.summary(),
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthPayload> {
        validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
        let email = normalize_email(&req.email);
        validate_email(&email)?;
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::with_message(
                ErrorCode::PasswordTooShort,
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if req.password.len() > MAX_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "password is too long (max {MAX_PASSWORD_LEN})"
            )));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::internal("Failed to hash password")
        })?;

        let user = User {
            id: UserId::generate(),
            name: req.name.trim().to_string(),
            email,
            password_hash,
            created_at: shared::util::now_millis(),
        };
        let user = match self.store.insert_user(user).await {
            Ok(user) => user,
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, "User registered");
        self.issue(&user)
    }

    /// Unknown email and wrong password fail the same way
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthPayload> {
        let email = normalize_email(&req.email);
        let user = self.store.find_user_by_email(&email).await?;

        match user {
            Some(user) if verify_password(&req.password, &user.password_hash) => {
                tracing::info!(user_id = %user.id, "User logged in");
                self.issue(&user)
            }
            _ => {
                security_log!("WARN", "login_failed", email = email.as_str());
                Err(AppError::invalid_credentials())
            }
        }
    }

    pub async fn me(&self, id: UserId) -> AppResult<UserSummary> {
        self.store
            .find_user(id)
            .await?
            .map(|u| u.summary())
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
    }
}
