use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reservation status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "completed" => Some(ReservationStatus::Completed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    /// Completed and Cancelled accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// Transition table consulted before every status write. Writing the
    /// current status again is allowed and treated as a no-op upstream.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            ReservationStatus::Pending => matches!(
                next,
                ReservationStatus::Confirmed | ReservationStatus::Cancelled
            ),
            ReservationStatus::Confirmed => matches!(
                next,
                ReservationStatus::Completed | ReservationStatus::Cancelled
            ),
            ReservationStatus::Completed | ReservationStatus::Cancelled => false,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One booking. Coffee name and price are copied from the catalog at
/// booking time so later menu edits never change historical records;
/// total_amount is frozen at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub people: i32,
    pub coffee_id: String,
    pub coffee_name: String,
    pub coffee_price: i64,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    pub payment_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload handed to the ledger by the booking workflow.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub people: i32,
    pub coffee_id: String,
    pub coffee_name: String,
    pub coffee_price: i64,
    pub total_amount: i64,
    pub notes: Option<String>,
}

/// Dashboard aggregates. Revenue counts confirmed and completed bookings.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationStats {
    pub total: i64,
    pub today: i64,
    pub revenue: i64,
    pub pending: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Completed));
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Cancelled));
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_accept_nothing_new() {
        assert!(!ReservationStatus::Completed.can_transition_to(ReservationStatus::Pending));
        assert!(!ReservationStatus::Completed.can_transition_to(ReservationStatus::Cancelled));
        assert!(!ReservationStatus::Cancelled.can_transition_to(ReservationStatus::Confirmed));
        assert!(!ReservationStatus::Cancelled.can_transition_to(ReservationStatus::Completed));
    }

    #[test]
    fn test_no_backwards_transitions() {
        assert!(!ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Pending));
        assert!(!ReservationStatus::Pending.can_transition_to(ReservationStatus::Completed));
    }

    #[test]
    fn test_same_status_is_allowed() {
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Confirmed));
        assert!(ReservationStatus::Cancelled.can_transition_to(ReservationStatus::Cancelled));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("archived"), None);
    }
}
