use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use kuri_core::admin::AdminAccount;
use kuri_core::repository::AdminDirectory;
use kuri_core::{CoreError, CoreResult};

pub struct PgAdminDirectory {
    pool: PgPool,
}

impl PgAdminDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: i64,
    username: String,
    email: Option<String>,
    password_hash: String,
    full_name: Option<String>,
    role: String,
    is_active: bool,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<AdminRow> for AdminAccount {
    fn from(row: AdminRow) -> Self {
        AdminAccount {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            role: row.role,
            is_active: row.is_active,
            last_login: row.last_login,
            created_at: row.created_at,
        }
    }
}

fn db_err(err: sqlx::Error) -> CoreError {
    CoreError::PersistenceError(err.to_string())
}

#[async_trait]
impl AdminDirectory for PgAdminDirectory {
    async fn find_by_username(&self, username: &str) -> CoreResult<Option<AdminAccount>> {
        let row: Option<AdminRow> = sqlx::query_as(
            "SELECT id, username, email, password_hash, full_name, role, is_active, last_login, created_at \
             FROM admin_users WHERE username = $1 AND is_active = TRUE",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(AdminAccount::from))
    }

    async fn touch_last_login(&self, id: i64) -> CoreResult<()> {
        sqlx::query("UPDATE admin_users SET last_login = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn change_password(&self, id: i64, new_password_hash: &str) -> CoreResult<()> {
        sqlx::query(
            "UPDATE admin_users SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(new_password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> CoreResult<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        if existing > 0 {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO admin_users (username, password_hash, role) VALUES ($1, $2, 'admin')",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        info!("Bootstrapped initial admin account '{}'", username);
        Ok(())
    }
}
