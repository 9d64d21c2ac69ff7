//! In-memory implementations of the repository traits, backing workflow
//! and API tests without a running Postgres. `MemoryLedger` honors the
//! same check-and-reserve contract as the Postgres ledger: the capacity
//! re-check and the insert happen under one lock.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use kuri_core::admin::AdminAccount;
use kuri_core::catalog::{CoffeeOption, CoffeeOptionUpdate, NewCoffeeOption};
use kuri_core::repository::{AdminDirectory, CoffeeCatalog, ReservationLedger};
use kuri_core::reservation::{NewReservation, Reservation, ReservationStats, ReservationStatus};
use kuri_core::{CoreError, CoreResult};

#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<LedgerInner>,
}

#[derive(Default)]
struct LedgerInner {
    next_id: i64,
    rows: Vec<Reservation>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationLedger for MemoryLedger {
    async fn insert_admitted(
        &self,
        new: &NewReservation,
        capacity: i32,
    ) -> CoreResult<Reservation> {
        let mut inner = self.inner.lock().unwrap();

        let booked: i64 = inner
            .rows
            .iter()
            .filter(|r| {
                r.date == new.date
                    && r.time == new.time
                    && r.status != ReservationStatus::Cancelled
            })
            .map(|r| r.people as i64)
            .sum();

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

        inner.next_id += 1;
        let now = Utc::now();
        let reservation = Reservation {
            id: inner.next_id,
            name: new.name.clone(),
            phone: new.phone.clone(),
            email: new.email.clone(),
            date: new.date,
            time: new.time.clone(),
            people: new.people,
            coffee_id: new.coffee_id.clone(),
            coffee_name: new.coffee_name.clone(),
            coffee_price: new.coffee_price,
            total_amount: new.total_amount,
            notes: new.notes.clone(),
            status: ReservationStatus::Pending,
            payment_time: None,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Reservation>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_contact(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> CoreResult<Vec<Reservation>> {
        let inner = self.inner.lock().unwrap();
        let mut matches: Vec<Reservation> = inner
            .rows
            .iter()
            .filter(|r| {
                phone.is_some_and(|p| r.phone == p)
                    || email.is_some_and(|e| r.email.as_deref() == Some(e))
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(matches)
    }

    async fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> CoreResult<Option<Reservation>> {
        let mut inner = self.inner.lock().unwrap();
        match inner.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.status = status;
                row.updated_at = Utc::now();
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn confirm_payment(&self, id: i64) -> CoreResult<Option<Reservation>> {
        let mut inner = self.inner.lock().unwrap();
        match inner.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                let now = Utc::now();
                row.status = ReservationStatus::Confirmed;
                row.payment_time = Some(now);
                row.updated_at = now;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> CoreResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.rows.len();
        inner.rows.retain(|r| r.id != id);
        Ok(inner.rows.len() < before)
    }

    async fn list_recent(&self, limit: i64) -> CoreResult<Vec<Reservation>> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Reservation> = inner.rows.clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn stats(&self) -> CoreResult<ReservationStats> {
        let inner = self.inner.lock().unwrap();
        let today = Utc::now().date_naive();
        Ok(ReservationStats {
            total: inner.rows.len() as i64,
            today: inner.rows.iter().filter(|r| r.date == today).count() as i64,
            revenue: inner
                .rows
                .iter()
                .filter(|r| {
                    matches!(
                        r.status,
                        ReservationStatus::Confirmed | ReservationStatus::Completed
                    )
                })
                .map(|r| r.total_amount)
                .sum(),
            pending: inner
                .rows
                .iter()
                .filter(|r| r.status == ReservationStatus::Pending)
                .count() as i64,
        })
    }

    async fn booked_by_slot(&self, date: NaiveDate) -> CoreResult<Vec<(String, i64)>> {
        let inner = self.inner.lock().unwrap();
        let mut counts: Vec<(String, i64)> = Vec::new();
        for row in inner
            .rows
            .iter()
            .filter(|r| r.date == date && r.status != ReservationStatus::Cancelled)
        {
            match counts.iter_mut().find(|(time, _)| *time == row.time) {
                Some((_, n)) => *n += row.people as i64,
                None => counts.push((row.time.clone(), row.people as i64)),
            }
        }
        Ok(counts)
    }
}

#[derive(Default)]
pub struct MemoryCatalog {
    options: Mutex<Vec<CoffeeOption>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoffeeCatalog for MemoryCatalog {
    async fn list_active(&self) -> CoreResult<Vec<CoffeeOption>> {
        let options = self.options.lock().unwrap();
        let mut active: Vec<CoffeeOption> =
            options.iter().filter(|o| o.is_active).cloned().collect();
        active.sort_by_key(|o| o.price);
        Ok(active)
    }

    async fn find_active(&self, id: &str) -> CoreResult<Option<CoffeeOption>> {
        let options = self.options.lock().unwrap();
        Ok(options.iter().find(|o| o.id == id && o.is_active).cloned())
    }

    async fn create(&self, new: &NewCoffeeOption) -> CoreResult<CoffeeOption> {
        let mut options = self.options.lock().unwrap();
        if options.iter().any(|o| o.id == new.id) {
            return Err(CoreError::ValidationError(
                "A coffee option with this name already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let option = CoffeeOption {
            id: new.id.clone(),
            name: new.name.clone(),
            price: new.price,
            description: new.description.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        options.push(option.clone());
        Ok(option)
    }

    async fn update(
        &self,
        id: &str,
        update: &CoffeeOptionUpdate,
    ) -> CoreResult<Option<CoffeeOption>> {
        let mut options = self.options.lock().unwrap();
        match options.iter_mut().find(|o| o.id == id) {
            Some(option) => {
                option.name = update.name.clone();
                option.price = update.price;
                option.description = update.description.clone();
                option.is_active = update.is_active;
                option.updated_at = Utc::now();
                Ok(Some(option.clone()))
            }
            None => Ok(None),
        }
    }

    async fn soft_delete(&self, id: &str) -> CoreResult<bool> {
        let mut options = self.options.lock().unwrap();
        match options.iter_mut().find(|o| o.id == id) {
            Some(option) => {
                option.is_active = false;
                option.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryAdminDirectory {
    accounts: Mutex<Vec<AdminAccount>>,
}

impl MemoryAdminDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminDirectory for MemoryAdminDirectory {
    async fn find_by_username(&self, username: &str) -> CoreResult<Option<AdminAccount>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| a.username == username && a.is_active)
            .cloned())
    }

    async fn touch_last_login(&self, id: i64) -> CoreResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.id == id) {
            account.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn change_password(&self, id: i64, new_password_hash: &str) -> CoreResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.password_hash = new_password_hash.to_string();
                Ok(())
            }
            None => Err(CoreError::NotFoundError(format!(
                "Admin account {} not found",
                id
            ))),
        }
    }

    async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> CoreResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        if !accounts.is_empty() {
            return Ok(());
        }
        accounts.push(AdminAccount {
            id: 1,
            username: username.to_string(),
            email: None,
            password_hash: password_hash.to_string(),
            full_name: None,
            role: "admin".to_string(),
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        });
        Ok(())
    }
}
