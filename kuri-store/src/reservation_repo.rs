use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use kuri_core::repository::ReservationLedger;
use kuri_core::reservation::{NewReservation, Reservation, ReservationStats, ReservationStatus};
use kuri_core::{CoreError, CoreResult};

pub struct PgReservationLedger {
    pool: PgPool,
}

impl PgReservationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, name, phone, email, date, time, people, coffee_id, coffee_name, \
                       coffee_price, total_amount, notes, status, payment_time, created_at, \
                       updated_at";

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    name: String,
    phone: String,
    email: Option<String>,
    date: NaiveDate,
    time: String,
    people: i32,
    coffee_id: String,
    coffee_name: String,
    coffee_price: i64,
    total_amount: i64,
    notes: Option<String>,
    status: String,
    payment_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReservationRow {
    fn into_domain(self) -> CoreResult<Reservation> {
        let status = ReservationStatus::parse(&self.status).ok_or_else(|| {
            CoreError::PersistenceError(format!(
                "Unknown reservation status '{}' for id {}",
                self.status, self.id
            ))
        })?;
        Ok(Reservation {
            id: self.id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            date: self.date,
            time: self.time,
            people: self.people,
            coffee_id: self.coffee_id,
            coffee_name: self.coffee_name,
            coffee_price: self.coffee_price,
            total_amount: self.total_amount,
            notes: self.notes,
            status,
            payment_time: self.payment_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn db_err(err: sqlx::Error) -> CoreError {
    CoreError::PersistenceError(err.to_string())
}

#[async_trait]
impl ReservationLedger for PgReservationLedger {
    async fn insert_admitted(
        &self,
        new: &NewReservation,
        capacity: i32,
    ) -> CoreResult<Reservation> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Serialize concurrent bookings for the same (date, time) pair.
        // The lock is transaction-scoped and released on commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("{}|{}", new.date, new.time))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let booked: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(people), 0) FROM reservations \
             WHERE date = $1 AND time = $2 AND status != 'cancelled'",
        )
        .bind(new.date)
        .bind(&new.time)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        if new.people as i64 > capacity as i64 - booked {
            let available_spots = (capacity as i64 - booked).max(0) as i32;
            let reason = if available_spots == 0 {
                "This time slot is fully booked".to_string()
            } else {
                format!("Only {} spots available for this time slot", available_spots)
            };
            return Err(CoreError::AdmissionError {
                reason,
                available_spots,
            });
        }

        let row: ReservationRow = sqlx::query_as(&format!(
            "INSERT INTO reservations \
             (name, phone, email, date, time, people, coffee_id, coffee_name, coffee_price, total_amount, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(new.date)
        .bind(&new.time)
        .bind(new.people)
        .bind(&new.coffee_id)
        .bind(&new.coffee_name)
        .bind(new.coffee_price)
        .bind(new.total_amount)
        .bind(&new.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        row.into_domain()
    }

    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(ReservationRow::into_domain).transpose()
    }

    async fn find_by_contact(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> CoreResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE ($1::TEXT IS NOT NULL AND phone = $1) \
                OR ($2::TEXT IS NOT NULL AND email = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(phone)
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(ReservationRow::into_domain).collect()
    }

    async fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> CoreResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "UPDATE reservations SET status = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(ReservationRow::into_domain).transpose()
    }

    async fn confirm_payment(&self, id: i64) -> CoreResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "UPDATE reservations \
             SET status = 'confirmed', payment_time = NOW(), updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(ReservationRow::into_domain).transpose()
    }

    async fn delete(&self, id: i64) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recent(&self, limit: i64) -> CoreResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM reservations ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(ReservationRow::into_domain).collect()
    }

    async fn stats(&self) -> CoreResult<ReservationStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let today: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE date = CURRENT_DATE")
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        let revenue: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0)::BIGINT FROM reservations \
             WHERE status IN ('confirmed', 'completed')",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let pending: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(ReservationStats {
            total,
            today,
            revenue,
            pending,
        })
    }

    async fn booked_by_slot(&self, date: NaiveDate) -> CoreResult<Vec<(String, i64)>> {
        // Served by the (date, time, status) index; this is the hot path
        // of every availability query and booking attempt.
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT time, COALESCE(SUM(people), 0) FROM reservations \
             WHERE date = $1 AND status != 'cancelled' GROUP BY time",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows)
    }
}
