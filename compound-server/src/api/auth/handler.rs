//! Authentication Handlers
//!
//! Handles login, registration and current-user lookup

use std::time::Duration;

use axum::{Json, extract::State};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{AccountRepository, RepoError};
use crate::utils::ids::missing_id;
use shared::Role;

// Re-use shared DTOs for API consistency
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - 登录，返回 JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = AccountRepository::new(state.get_db());

    let account = repo
        .find_by_username(&req.username)
        .await
        .map_err(AppError::from)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let account = match account {
        Some(a) => {
            if !a.is_active {
                return Err(AppError::with_message(
                    shared::ErrorCode::AccountDisabled,
                    "Account has been disabled",
                ));
            }

            let password_valid = a
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            a
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = account.id.as_ref().ok_or_else(missing_id)?.to_string();

    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &account.username, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = %user_id,
        username = %account.username,
        role = %account.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: account.username,
            role: account.role.to_string(),
        },
    }))
}

/// POST /api/auth/register - 注册普通用户账号
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.username.len() < 3 || req.username.len() > 64 {
        return Err(AppError::validation(
            "Username must be between 3 and 64 characters",
        ));
    }
    if req.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let repo = AccountRepository::new(state.get_db());
    let account = match repo.create(&req.username, &req.password, Role::User).await {
        Ok(a) => a,
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::new(shared::ErrorCode::UsernameExists));
        }
        Err(e) => return Err(e.into()),
    };

    let user_id = account.id.as_ref().ok_or_else(missing_id)?.to_string();

    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &account.username, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user_id, username = %account.username, "User registered");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: account.username,
            role: account.role.to_string(),
        },
    }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(user: CurrentUser) -> Result<Json<UserInfo>, AppError> {
    Ok(Json(UserInfo {
        id: user.id,
        username: user.username,
        role: user.role.to_string(),
    }))
}

/// POST /api/auth/logout - 登出（JWT 无状态，只记录事件）
pub async fn logout(user: CurrentUser) -> Result<Json<()>, AppError> {
    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        "User logged out"
    );

    Ok(Json(()))
}
