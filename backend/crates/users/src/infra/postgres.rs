//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, public_id::PublicId, user_role::UserRole, wallet_address::WalletAddress,
};
use crate::error::{UsersError, UsersResult};

const USER_COLUMNS: &str = r#"
    user_id,
    public_id,
    email,
    password_hash,
    api_key,
    user_role,
    banned_until,
    wallet_address,
    baraka_points,
    language,
    preferences,
    last_login_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUsersRepository {
    pool: PgPool,
}

impl PgUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_column(&self, filter: &str, value: &str) -> UsersResult<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {filter} = $1",
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(UserRow::into_user).transpose()
    }
}

impl UserRepository for PgUsersRepository {
    async fn create(&self, user: &User) -> UsersResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                public_id,
                email,
                password_hash,
                api_key,
                user_role,
                banned_until,
                wallet_address,
                baraka_points,
                language,
                preferences,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.api_key)
        .bind(user.role.id())
        .bind(user.banned_until)
        .bind(user.wallet_address.as_ref().map(|w| w.as_str().to_string()))
        .bind(user.baraka_points)
        .bind(&user.language)
        .bind(user.preferences.to_string())
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> UsersResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_public_id(&self, public_id: &str) -> UsersResult<Option<User>> {
        self.find_by_column("public_id", public_id).await
    }

    async fn find_by_email(&self, email: &str) -> UsersResult<Option<User>> {
        self.find_by_column("email", email).await
    }

    async fn find_by_api_key(&self, api_key: &str) -> UsersResult<Option<User>> {
        self.find_by_column("api_key", api_key).await
    }

    async fn find_by_wallet(&self, wallet_address: &str) -> UsersResult<Option<User>> {
        self.find_by_column("wallet_address", wallet_address).await
    }

    async fn list(&self, skip: i64, limit: i64) -> UsersResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at OFFSET $1 LIMIT $2"
        );
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let users = rows
            .into_iter()
            .map(UserRow::into_user)
            .collect::<UsersResult<Vec<_>>>()?;
        Ok((users, total))
    }

    async fn update(&self, user: &User) -> UsersResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                api_key = $4,
                user_role = $5,
                banned_until = $6,
                wallet_address = $7,
                baraka_points = $8,
                language = $9,
                preferences = $10,
                last_login_at = $11,
                updated_at = $12
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.api_key)
        .bind(user.role.id())
        .bind(user.banned_until)
        .bind(user.wallet_address.as_ref().map(|w| w.as_str().to_string()))
        .bind(user.baraka_points)
        .bind(&user.language)
        .bind(user.preferences.to_string())
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> UsersResult<()> {
        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = %user_id, "User row deleted");
        Ok(())
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    email: String,
    password_hash: String,
    api_key: String,
    user_role: i16,
    banned_until: Option<DateTime<Utc>>,
    wallet_address: Option<String>,
    baraka_points: i64,
    language: String,
    preferences: String,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> UsersResult<User> {
        let corrupt = |what: &str| UsersError::Internal(format!("Corrupt {what} in users row"));

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id: PublicId::parse(&self.public_id).map_err(|_| corrupt("public_id"))?,
            email: Email::new(self.email).map_err(|_| corrupt("email"))?,
            password_hash: self.password_hash,
            api_key: self.api_key,
            role: UserRole::from_id(self.user_role),
            banned_until: self.banned_until,
            wallet_address: self
                .wallet_address
                .map(|w| WalletAddress::new(w).map_err(|_| corrupt("wallet_address")))
                .transpose()?,
            baraka_points: self.baraka_points,
            language: self.language,
            preferences: serde_json::from_str(&self.preferences)
                .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new())),
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
