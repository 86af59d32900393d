use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub is_superuser: bool,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Blacklisted refresh token. A row here means the `jti` can no longer
/// mint access tokens, regardless of the JWT's own expiry.
#[derive(Debug, Clone, FromRow)]
pub struct RevokedToken {
    pub jti: Uuid,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub revoked_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serialization_skips_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            is_superuser: false,
            last_login: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }
}
