use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Token type used to distinguish Access and Refresh JWTs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[serde(alias = "Access")]
    Access,
    #[serde(alias = "Refresh")]
    Refresh,
}

/// Standard JWT claims used in the app.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,       // user ID
    pub exp: usize,      // expiration time
    pub iat: usize,      // issued at
    pub iss: String,     // issuer
    pub aud: String,     // audience
    pub jti: Uuid,       // token ID, referenced by the blacklist
    pub kind: TokenKind, // access or refresh
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for logout; the refresh token is blacklisted.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<OffsetDateTime>,
}

/// Response returned after a token refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Full account view for the authenticated user.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub last_login: Option<OffsetDateTime>,
}

/// Request body for account update. The endpoint handles two distinct
/// shapes through the same route; see [`UpdateAccountRequest::kind`].
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountUpdateKind {
    Profile,
    Password,
    Empty,
}

impl UpdateAccountRequest {
    /// Profile fields win over password fields when both are present.
    pub fn kind(&self) -> AccountUpdateKind {
        if self.username.is_some() || self.email.is_some() {
            AccountUpdateKind::Profile
        } else if self.old_password.is_some() {
            AccountUpdateKind::Password
        } else {
            AccountUpdateKind::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_kind_prefers_profile_fields() {
        let req = UpdateAccountRequest {
            username: Some("alice".into()),
            old_password: Some("secret".into()),
            ..Default::default()
        };
        assert_eq!(req.kind(), AccountUpdateKind::Profile);
    }

    #[test]
    fn update_kind_selects_password_branch() {
        let req = UpdateAccountRequest {
            old_password: Some("secret".into()),
            new_password: Some("new-secret".into()),
            confirm_password: Some("new-secret".into()),
            ..Default::default()
        };
        assert_eq!(req.kind(), AccountUpdateKind::Password);
    }

    #[test]
    fn update_kind_empty_when_no_fields() {
        let req = UpdateAccountRequest::default();
        assert_eq!(req.kind(), AccountUpdateKind::Empty);
        // new/confirm without old_password is not a valid password update
        let req = UpdateAccountRequest {
            new_password: Some("x".into()),
            confirm_password: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(req.kind(), AccountUpdateKind::Empty);
    }

    #[test]
    fn auth_response_omits_null_last_login() {
        let response = AuthResponse {
            access_token: "a".into(),
            refresh_token: "r".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                username: "alice".into(),
                email: "alice@example.com".into(),
            },
            last_login: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("last_login"));
    }

    #[test]
    fn token_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TokenKind::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenKind::Refresh).unwrap(), "\"refresh\"");
    }
}
