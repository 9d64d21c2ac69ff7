use async_trait::async_trait;
use chrono::NaiveDate;

use crate::admin::AdminAccount;
use crate::catalog::{CoffeeOption, CoffeeOptionUpdate, NewCoffeeOption};
use crate::reservation::{NewReservation, Reservation, ReservationStats, ReservationStatus};
use crate::CoreResult;

/// Durable reservation store, source of truth for all capacity accounting.
#[async_trait]
pub trait ReservationLedger: Send + Sync {
    /// Atomic check-and-reserve: re-verifies the non-cancelled headcount
    /// for the slot while holding a per-(date, time) lock, then inserts
    /// with pending status. Rejects with `AdmissionError` carrying the
    /// actual remaining spots when the party no longer fits.
    async fn insert_admitted(
        &self,
        new: &NewReservation,
        capacity: i32,
    ) -> CoreResult<Reservation>;

    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Reservation>>;

    /// Match by phone or email, newest first. Caller guarantees at least
    /// one of the two is present.
    async fn find_by_contact(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> CoreResult<Vec<Reservation>>;

    /// Unconditional status overwrite plus updated_at touch. Transition
    /// legality is the workflow's responsibility, not the ledger's.
    async fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> CoreResult<Option<Reservation>>;

    /// Status to confirmed plus payment_time stamp in one write.
    async fn confirm_payment(&self, id: i64) -> CoreResult<Option<Reservation>>;

    /// Hard delete; removes the row from all future capacity sums.
    async fn delete(&self, id: i64) -> CoreResult<bool>;

    async fn list_recent(&self, limit: i64) -> CoreResult<Vec<Reservation>>;

    async fn stats(&self) -> CoreResult<ReservationStats>;

    /// Non-cancelled headcount per slot label for a date, for the
    /// availability engine. Slots with no reservations are absent.
    async fn booked_by_slot(&self, date: NaiveDate) -> CoreResult<Vec<(String, i64)>>;
}

/// Menu item store. Soft-delete only.
#[async_trait]
pub trait CoffeeCatalog: Send + Sync {
    /// Active items, cheapest first.
    async fn list_active(&self) -> CoreResult<Vec<CoffeeOption>>;

    async fn find_active(&self, id: &str) -> CoreResult<Option<CoffeeOption>>;

    async fn create(&self, new: &NewCoffeeOption) -> CoreResult<CoffeeOption>;

    async fn update(
        &self,
        id: &str,
        update: &CoffeeOptionUpdate,
    ) -> CoreResult<Option<CoffeeOption>>;

    async fn soft_delete(&self, id: &str) -> CoreResult<bool>;
}

/// Staff account lookup backing the session gate.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Active accounts only.
    async fn find_by_username(&self, username: &str) -> CoreResult<Option<AdminAccount>>;

    async fn touch_last_login(&self, id: i64) -> CoreResult<()>;

    async fn change_password(&self, id: i64, new_password_hash: &str) -> CoreResult<()>;

    /// Creates the configured initial admin when the directory is empty.
    async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> CoreResult<()>;
}
