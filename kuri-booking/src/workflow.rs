use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use kuri_core::notify::{EmailMessage, Mailer};
use kuri_core::repository::{CoffeeCatalog, ReservationLedger};
use kuri_core::reservation::{NewReservation, Reservation, ReservationStats, ReservationStatus};
use kuri_core::slots::TimeSlotAvailability;
use kuri_core::{CoreError, CoreResult};

use crate::availability::{parse_date, AvailabilityEngine};

/// Booking intake payload. `coffee` carries the menu item id.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub people: i32,
    #[serde(default)]
    pub coffee: String,
    pub notes: Option<String>,
}

/// Orchestrates reservation creation and the status lifecycle. The ledger
/// stays a dumb store; admission and transition legality live here.
pub struct BookingService {
    ledger: Arc<dyn ReservationLedger>,
    catalog: Arc<dyn CoffeeCatalog>,
    mailer: Arc<dyn Mailer>,
    availability: AvailabilityEngine,
}

impl BookingService {
    pub fn new(
        ledger: Arc<dyn ReservationLedger>,
        catalog: Arc<dyn CoffeeCatalog>,
        mailer: Arc<dyn Mailer>,
        capacity: i32,
    ) -> Self {
        let availability = AvailabilityEngine::new(Arc::clone(&ledger), capacity);
        Self {
            ledger,
            catalog,
            mailer,
            availability,
        }
    }

    pub async fn slot_availability(&self, date: NaiveDate) -> CoreResult<Vec<TimeSlotAvailability>> {
        self.availability.slot_availability(date).await
    }

    pub async fn create_reservation(&self, req: BookingRequest) -> CoreResult<Reservation> {
        // 1. Required fields
        if req.name.trim().is_empty()
            || req.phone.trim().is_empty()
            || req.date.is_empty()
            || req.time.is_empty()
            || req.coffee.is_empty()
        {
            return Err(CoreError::ValidationError(
                "Missing required fields".to_string(),
            ));
        }
        if req.people < 1 {
            return Err(CoreError::ValidationError(
                "Party size must be at least 1".to_string(),
            ));
        }
        let date = parse_date(&req.date)?;

        // 2. Resolve the coffee selection against the active catalog
        let coffee = self
            .catalog
            .find_active(&req.coffee)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("Invalid coffee selection".to_string()))?;

        // 3. Advisory admission check, for an early rejection with a
        //    friendly reason. The ledger re-checks under the slot lock.
        let check = self.availability.can_admit(date, &req.time, req.people).await?;
        if !check.can_book {
            return Err(CoreError::AdmissionError {
                reason: check
                    .message
                    .unwrap_or_else(|| "Cannot make reservation for this time slot".to_string()),
                available_spots: check.available_spots,
            });
        }

        // 4. Totals are frozen at booking time
        let total_amount = coffee.price * req.people as i64;
        let new = NewReservation {
            name: req.name.trim().to_string(),
            phone: req.phone.trim().to_string(),
            email: req.email.clone(),
            date,
            time: req.time.clone(),
            people: req.people,
            coffee_id: coffee.id.clone(),
            coffee_name: coffee.name.clone(),
            coffee_price: coffee.price,
            total_amount,
            notes: req.notes.clone(),
        };

        // 5. Atomic check-and-reserve
        let reservation = self
            .ledger
            .insert_admitted(&new, self.availability.capacity())
            .await?;
        info!(
            "Reservation RES-{} created for {} people at {} on {}",
            reservation.id, reservation.people, reservation.time, reservation.date
        );

        // 6. Best-effort confirmation email; never fails the booking
        match reservation.email.as_deref() {
            Some(to) => {
                let message = confirmation_email(to, &reservation);
                if let Err(err) = self.mailer.send(&message).await {
                    warn!(
                        "Failed to send confirmation email for RES-{}: {}",
                        reservation.id, err
                    );
                }
            }
            None => debug!(
                "Reservation RES-{} has no email address, skipping confirmation",
                reservation.id
            ),
        }

        Ok(reservation)
    }

    pub async fn find_reservation(&self, id: i64) -> CoreResult<Reservation> {
        self.ledger
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFoundError(format!("Reservation {} not found", id)))
    }

    /// Contact lookup. At least one of phone/email is required.
    pub async fn find_by_contact(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> CoreResult<Vec<Reservation>> {
        let phone = phone.map(str::trim).filter(|p| !p.is_empty());
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        if phone.is_none() && email.is_none() {
            return Err(CoreError::ValidationError(
                "Either phone or email is required".to_string(),
            ));
        }
        self.ledger.find_by_contact(phone, email).await
    }

    /// Customer-asserted payment confirmation. Re-confirming an already
    /// confirmed reservation is a no-op success; terminal records reject.
    pub async fn confirm_payment(&self, id: i64) -> CoreResult<Reservation> {
        let existing = self.find_reservation(id).await?;

        if !existing
            .status
            .can_transition_to(ReservationStatus::Confirmed)
        {
            return Err(CoreError::InvalidTransition {
                from: existing.status,
                to: ReservationStatus::Confirmed,
            });
        }
        if existing.status == ReservationStatus::Confirmed {
            return Ok(existing);
        }

        self.ledger
            .confirm_payment(id)
            .await?
            .ok_or_else(|| CoreError::NotFoundError(format!("Reservation {} not found", id)))
    }

    /// Staff-driven status change. Illegal transitions are rejected here
    /// rather than silently overwritten in the store. Cancelling frees the
    /// slot implicitly because cancelled rows leave the availability sum.
    pub async fn set_status(
        &self,
        id: i64,
        new_status: ReservationStatus,
    ) -> CoreResult<Reservation> {
        let existing = self.find_reservation(id).await?;

        if !existing.status.can_transition_to(new_status) {
            return Err(CoreError::InvalidTransition {
                from: existing.status,
                to: new_status,
            });
        }
        if existing.status == new_status {
            return Ok(existing);
        }

        let updated = self
            .ledger
            .update_status(id, new_status)
            .await?
            .ok_or_else(|| CoreError::NotFoundError(format!("Reservation {} not found", id)))?;
        info!("Reservation RES-{} status set to {}", id, new_status);
        Ok(updated)
    }

    /// Staff-only hard delete; removes all trace, capacity history included.
    pub async fn delete_reservation(&self, id: i64) -> CoreResult<()> {
        let deleted = self.ledger.delete(id).await?;
        if !deleted {
            return Err(CoreError::NotFoundError(format!(
                "Reservation {} not found",
                id
            )));
        }
        info!("Reservation RES-{} deleted", id);
        Ok(())
    }

    /// Admin dashboard projection: recent bookings plus aggregates.
    pub async fn recent_with_stats(&self) -> CoreResult<(Vec<Reservation>, ReservationStats)> {
        let reservations = self.ledger.list_recent(50).await?;
        let stats = self.ledger.stats().await?;
        Ok((reservations, stats))
    }
}

/// id-ID style thousands grouping, e.g. 90000 -> "90.000".
fn format_rupiah(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn confirmation_email(to: &str, reservation: &Reservation) -> EmailMessage {
    let mut body = format!(
        "<h1>Reservation Confirmation for Kuri Coffee Slowbar 195</h1>\
         <p>Dear {},</p>\
         <p>Your reservation has been successfully confirmed!</p>\
         <p><strong>Reservation ID:</strong> RES-{}</p>\
         <p><strong>Date:</strong> {}</p>\
         <p><strong>Time:</strong> {}</p>\
         <p><strong>Number of People:</strong> {}</p>\
         <p><strong>Coffee Selection:</strong> {}</p>\
         <p><strong>Total Amount:</strong> Rp {}</p>",
        reservation.name,
        reservation.id,
        reservation.date,
        reservation.time,
        reservation.people,
        reservation.coffee_name,
        format_rupiah(reservation.total_amount),
    );
    if let Some(notes) = &reservation.notes {
        body.push_str(&format!("<p><strong>Special Notes:</strong> {}</p>", notes));
    }
    body.push_str(
        "<p>We look forward to seeing you!</p>\
         <p>Best regards,</p>\
         <p>The Kuri Coffee Slowbar 195 Team</p>",
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("Kuri Coffee Reservation Confirmed: RES-{}", reservation.id),
        body,
    }
}
