use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use kuri_core::catalog::{CoffeeOption, CoffeeOptionUpdate, NewCoffeeOption};
use kuri_core::repository::CoffeeCatalog;
use kuri_core::{CoreError, CoreResult};

pub struct PgCoffeeCatalog {
    pool: PgPool,
}

impl PgCoffeeCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, name, price, description, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CoffeeRow {
    id: String,
    name: String,
    price: i64,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CoffeeRow> for CoffeeOption {
    fn from(row: CoffeeRow) -> Self {
        CoffeeOption {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn db_err(err: sqlx::Error) -> CoreError {
    CoreError::PersistenceError(err.to_string())
}

#[async_trait]
impl CoffeeCatalog for PgCoffeeCatalog {
    async fn list_active(&self) -> CoreResult<Vec<CoffeeOption>> {
        let rows: Vec<CoffeeRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM coffee_options WHERE is_active = TRUE ORDER BY price ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(CoffeeOption::from).collect())
    }

    async fn find_active(&self, id: &str) -> CoreResult<Option<CoffeeOption>> {
        let row: Option<CoffeeRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM coffee_options WHERE id = $1 AND is_active = TRUE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(CoffeeOption::from))
    }

    async fn create(&self, new: &NewCoffeeOption) -> CoreResult<CoffeeOption> {
        let row: CoffeeRow = sqlx::query_as(&format!(
            "INSERT INTO coffee_options (id, name, price, description) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(&new.id)
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err.as_database_error() {
            Some(db) if db.is_unique_violation() => CoreError::ValidationError(
                "A coffee option with this name already exists".to_string(),
            ),
            _ => db_err(err),
        })?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: &str,
        update: &CoffeeOptionUpdate,
    ) -> CoreResult<Option<CoffeeOption>> {
        let row: Option<CoffeeRow> = sqlx::query_as(&format!(
            "UPDATE coffee_options \
             SET name = $1, price = $2, description = $3, is_active = $4, updated_at = NOW() \
             WHERE id = $5 RETURNING {COLUMNS}"
        ))
        .bind(&update.name)
        .bind(update.price)
        .bind(&update.description)
        .bind(update.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(CoffeeOption::from))
    }

    async fn soft_delete(&self, id: &str) -> CoreResult<bool> {
        let result = sqlx::query(
            "UPDATE coffee_options SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
