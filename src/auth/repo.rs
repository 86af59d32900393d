use crate::auth::repo_types::{RevokedToken, User};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_superuser, last_login, created_at";

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// True if another user (id excluded) already holds this username.
    pub async fn username_taken(db: &PgPool, username: &str, exclude: Uuid) -> anyhow::Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND id <> $2)",
        )
        .bind(username)
        .bind(exclude)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    /// True if another user (id excluded) already holds this email.
    pub async fn email_taken(db: &PgPool, email: &str, exclude: Uuid) -> anyhow::Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(db)
        .await?;
        Ok(taken)
    }

    /// Stamp a successful login, returning the new timestamp.
    pub async fn touch_last_login(db: &PgPool, id: Uuid) -> anyhow::Result<OffsetDateTime> {
        let ts: OffsetDateTime = sqlx::query_scalar(
            "UPDATE users SET last_login = now() WHERE id = $1 RETURNING last_login",
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(ts)
    }

    /// Apply username/email changes; fields passed as None keep their value.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        username: Option<&str>,
        email: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(username)
        .bind(email)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn set_password_hash(db: &PgPool, id: Uuid, hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl RevokedToken {
    /// Blacklist a refresh token. Re-blacklisting the same jti is a no-op.
    pub async fn insert(
        db: &PgPool,
        jti: Uuid,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn is_revoked(db: &PgPool, jti: Uuid) -> anyhow::Result<bool> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(db)
                .await?;
        Ok(revoked)
    }

    /// Drop blacklist rows whose token has expired anyway.
    pub async fn purge_expired(db: &PgPool) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < now()")
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
