use std::sync::Arc;

use chrono::NaiveDate;

use kuri_core::repository::ReservationLedger;
use kuri_core::slots::{availability_from_counts, check_admission, AdmissionCheck, TimeSlotAvailability};
use kuri_core::{CoreError, CoreResult};

/// Answers "can N people book slot T on date D?" and "what is the slot map
/// for date D?". Always computed from ledger truth, never from a cached
/// counter, so it cannot drift out of sync with the reservation rows.
pub struct AvailabilityEngine {
    ledger: Arc<dyn ReservationLedger>,
    capacity: i32,
}

impl AvailabilityEngine {
    pub fn new(ledger: Arc<dyn ReservationLedger>, capacity: i32) -> Self {
        Self { ledger, capacity }
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Full slot map for a date. Pure read, no side effects.
    pub async fn slot_availability(&self, date: NaiveDate) -> CoreResult<Vec<TimeSlotAvailability>> {
        let booked = self.ledger.booked_by_slot(date).await?;
        Ok(availability_from_counts(&booked, self.capacity))
    }

    /// Admission check only; nothing here reserves the slot. The ledger's
    /// insert re-verifies under a per-slot lock, so a stale answer here
    /// costs a late rejection, never an overbooked slot.
    pub async fn can_admit(
        &self,
        date: NaiveDate,
        time: &str,
        people: i32,
    ) -> CoreResult<AdmissionCheck> {
        let availability = self.slot_availability(date).await?;
        Ok(check_admission(&availability, time, people))
    }
}

pub fn parse_date(raw: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::ValidationError("Invalid date".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuri_core::reservation::NewReservation;
    use kuri_store::memory::MemoryLedger;

    fn booking(date: NaiveDate, time: &str, people: i32) -> NewReservation {
        NewReservation {
            name: "Sari".to_string(),
            phone: "0811111111".to_string(),
            email: None,
            date,
            time: time.to_string(),
            people,
            coffee_id: "house-blend".to_string(),
            coffee_name: "House Blend".to_string(),
            coffee_price: 35000,
            total_amount: 35000 * people as i64,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_slot_map_is_idempotent_without_writes() {
        let ledger = Arc::new(MemoryLedger::new());
        let engine = AvailabilityEngine::new(ledger.clone(), 5);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        ledger.insert_admitted(&booking(date, "10:00", 3), 5).await.unwrap();

        let first = engine.slot_availability(date).await.unwrap();
        let second = engine.slot_availability(date).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_can_admit_reads_ledger_truth() {
        let ledger = Arc::new(MemoryLedger::new());
        let engine = AvailabilityEngine::new(ledger.clone(), 5);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        ledger.insert_admitted(&booking(date, "10:00", 4), 5).await.unwrap();

        let check = engine.can_admit(date, "10:00", 2).await.unwrap();
        assert!(!check.can_book);
        assert_eq!(check.available_spots, 1);

        let check = engine.can_admit(date, "10:00", 1).await.unwrap();
        assert!(check.can_book);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("").is_err());
    }
}
