use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AccountUpdateKind, AuthResponse, LoginRequest, LogoutRequest, PublicUser,
            RefreshRequest, RefreshResponse, RegisterRequest, UpdateAccountRequest, UserInfo,
        },
        extractors::AuthUser,
        repo_types::{RevokedToken, User},
        services::{
            hash_password, is_valid_email, is_valid_username, validate_password_strength,
            verify_password, JwtKeys,
        },
    },
    error::ApiError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account/register", post(register))
        .route("/account/login", post(login))
        .route("/account/logout", post(logout))
        .route("/account/update", patch(update_account).put(update_account))
}

pub fn token_routes() -> Router<AppState> {
    Router::new().route("/token/refresh", post(refresh))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user/info", get(user_info))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_username(&payload.username) {
        warn!(username = %payload.username, "invalid username");
        return Err(ApiError::BadRequest("Invalid username".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.password != payload.password2 {
        return Err(ApiError::BadRequest("Passwords do not match".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::BadRequest("Password too short".into()));
    }

    // Ensure email and username are not taken
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email is already used".into()));
    }
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(ApiError::Conflict("Username is already used".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.username, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            refresh_token,
            user: PublicUser {
                id: user.id,
                username: user.username,
                email: user.email,
            },
            last_login: None,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = match User::find_by_username(&state.db, payload.username.trim()).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::Unauthorized("Invalid login credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid login credentials".into()));
    }

    let last_login = User::touch_last_login(&state.db, user.id).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        },
        last_login: Some(last_login),
    }))
}

/// Blacklists the submitted refresh token. Idempotent; responds with
/// 205 Reset Content on success, 400 on any invalid token.
#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::BadRequest("Invalid refresh token".into()))?;

    let expires_at = JwtKeys::expires_at(&claims)?;
    RevokedToken::insert(&state.db, claims.jti, claims.sub, expires_at).await?;

    info!(user_id = %user_id, jti = %claims.jti, "refresh token blacklisted");
    Ok(StatusCode::RESET_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    if RevokedToken::is_revoked(&state.db, claims.jti).await? {
        warn!(user_id = %claims.sub, jti = %claims.jti, "blacklisted refresh token");
        return Err(ApiError::Unauthorized("Token is blacklisted".into()));
    }

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    let access_token = keys.sign_access(user.id)?;
    Ok(Json(RefreshResponse { access_token }))
}

/// One route, two shapes: username/email changes and password changes
/// arrive through the same endpoint, disambiguated by which fields are
/// present in the body.
#[instrument(skip(state, payload))]
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    match payload.kind() {
        AccountUpdateKind::Empty => {
            return Err(ApiError::BadRequest("No valid fields provided.".into()));
        }
        AccountUpdateKind::Profile => {
            let username = payload.username.as_deref().map(str::trim);
            let email = payload.email.map(|e| e.trim().to_lowercase());

            if let Some(username) = username {
                if !is_valid_username(username) {
                    return Err(ApiError::BadRequest("Invalid username".into()));
                }
                if user.username == username {
                    return Err(ApiError::BadRequest(
                        "You are using the same username.".into(),
                    ));
                }
                if User::username_taken(&state.db, username, user.id).await? {
                    return Err(ApiError::BadRequest("Username is already used.".into()));
                }
            }
            if let Some(email) = email.as_deref() {
                if !is_valid_email(email) {
                    return Err(ApiError::BadRequest("Invalid email".into()));
                }
                if user.email == email {
                    return Err(ApiError::BadRequest(
                        "You are using the same email address.".into(),
                    ));
                }
                if User::email_taken(&state.db, email, user.id).await? {
                    return Err(ApiError::BadRequest("Email is already used.".into()));
                }
            }

            User::update_profile(&state.db, user.id, username, email.as_deref()).await?;
        }
        AccountUpdateKind::Password => {
            let old_password = payload.old_password.as_deref().unwrap_or_default();
            let (new_password, confirm_password) = match (
                payload.new_password.as_deref(),
                payload.confirm_password.as_deref(),
            ) {
                (Some(n), Some(c)) => (n, c),
                _ => {
                    return Err(ApiError::BadRequest("Password fields didn't match.".into()));
                }
            };

            if new_password != confirm_password {
                return Err(ApiError::BadRequest("Password fields didn't match.".into()));
            }
            validate_password_strength(new_password, &user.username)
                .map_err(ApiError::BadRequest)?;
            if !verify_password(old_password, &user.password_hash)? {
                return Err(ApiError::BadRequest("Old password is incorrect.".into()));
            }

            let hash = hash_password(new_password)?;
            User::set_password_hash(&state.db, user.id, &hash).await?;
        }
    }

    info!(user_id = %user.id, "account updated");
    Ok(Json(json!({ "detail": "Account updated successfully." })))
}

#[instrument(skip(state))]
pub async fn user_info(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserInfo>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        is_superuser: user.is_superuser,
        last_login: user.last_login,
    }))
}

#[cfg(test)]
mod user_info_tests {
    use super::*;

    #[test]
    fn test_user_info_serialization() {
        let response = UserInfo {
            id: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            email: "test@example.com".to_string(),
            is_superuser: false,
            last_login: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("is_superuser"));
        assert!(json.contains("id"));
    }
}
