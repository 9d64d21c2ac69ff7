use serde::Serialize;

/// Bookable slot labels, opening to closing, hourly.
pub const TIME_SLOTS: [&str; 12] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00",
    "19:00", "20:00",
];

/// Maximum aggregate party size per (date, slot) pair.
pub const DEFAULT_SLOT_CAPACITY: i32 = 5;

/// Derived view over the reservation ledger. Never persisted; recomputed
/// from the non-cancelled reservation sum on every query.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimeSlotAvailability {
    pub time: String,
    pub available_spots: i32,
    pub is_available: bool,
}

pub fn is_valid_slot(time: &str) -> bool {
    TIME_SLOTS.contains(&time)
}

/// Fold per-slot booked headcounts into the full slot map for a date.
/// `booked` pairs come straight from the ledger's GROUP BY projection;
/// slots with no reservations are simply absent from it.
pub fn availability_from_counts(booked: &[(String, i64)], capacity: i32) -> Vec<TimeSlotAvailability> {
    TIME_SLOTS
        .iter()
        .map(|&time| {
            let booked_people = booked
                .iter()
                .find(|(t, _)| t == time)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            let available_spots = (capacity as i64 - booked_people).max(0) as i32;
            TimeSlotAvailability {
                time: time.to_string(),
                available_spots,
                is_available: available_spots > 0,
            }
        })
        .collect()
}

/// Admission decision for a proposed (time, party size) against a slot map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionCheck {
    pub can_book: bool,
    pub available_spots: i32,
    pub message: Option<String>,
}

pub fn check_admission(
    availability: &[TimeSlotAvailability],
    time: &str,
    people: i32,
) -> AdmissionCheck {
    let slot = match availability.iter().find(|slot| slot.time == time) {
        Some(slot) => slot,
        None => {
            return AdmissionCheck {
                can_book: false,
                available_spots: 0,
                message: Some("Invalid time slot".to_string()),
            }
        }
    };

    if !slot.is_available {
        return AdmissionCheck {
            can_book: false,
            available_spots: slot.available_spots,
            message: Some("This time slot is fully booked".to_string()),
        };
    }

    if people > slot.available_spots {
        return AdmissionCheck {
            can_book: false,
            available_spots: slot.available_spots,
            message: Some(format!(
                "Only {} spots available for this time slot",
                slot.available_spots
            )),
        };
    }

    AdmissionCheck {
        can_book: true,
        available_spots: slot.available_spots,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger_means_full_capacity() {
        let slots = availability_from_counts(&[], 5);
        assert_eq!(slots.len(), TIME_SLOTS.len());
        assert!(slots.iter().all(|s| s.available_spots == 5 && s.is_available));
    }

    #[test]
    fn test_booked_counts_reduce_spots() {
        let booked = vec![("10:00".to_string(), 3), ("12:00".to_string(), 5)];
        let slots = availability_from_counts(&booked, 5);

        let ten = slots.iter().find(|s| s.time == "10:00").unwrap();
        assert_eq!(ten.available_spots, 2);
        assert!(ten.is_available);

        let noon = slots.iter().find(|s| s.time == "12:00").unwrap();
        assert_eq!(noon.available_spots, 0);
        assert!(!noon.is_available);
    }

    #[test]
    fn test_overbooked_slot_clamps_to_zero() {
        // Hard-deleted capacity history can leave a slot beyond capacity;
        // the derived view never reports negative spots.
        let booked = vec![("10:00".to_string(), 9)];
        let slots = availability_from_counts(&booked, 5);
        let ten = slots.iter().find(|s| s.time == "10:00").unwrap();
        assert_eq!(ten.available_spots, 0);
        assert!(!ten.is_available);
    }

    #[test]
    fn test_admit_exact_boundary() {
        let slots = availability_from_counts(&[("10:00".to_string(), 3)], 5);

        let exact = check_admission(&slots, "10:00", 2);
        assert!(exact.can_book);
        assert_eq!(exact.available_spots, 2);

        let over = check_admission(&slots, "10:00", 3);
        assert!(!over.can_book);
        assert_eq!(over.available_spots, 2);
        assert_eq!(
            over.message.as_deref(),
            Some("Only 2 spots available for this time slot")
        );
    }

    #[test]
    fn test_reject_unknown_slot_label() {
        let slots = availability_from_counts(&[], 5);
        let check = check_admission(&slots, "09:30", 1);
        assert!(!check.can_book);
        assert_eq!(check.message.as_deref(), Some("Invalid time slot"));
    }

    #[test]
    fn test_reject_fully_booked() {
        let slots = availability_from_counts(&[("14:00".to_string(), 5)], 5);
        let check = check_admission(&slots, "14:00", 1);
        assert!(!check.can_book);
        assert_eq!(check.available_spots, 0);
        assert_eq!(
            check.message.as_deref(),
            Some("This time slot is fully booked")
        );
    }
}
