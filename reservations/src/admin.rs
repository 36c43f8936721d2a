//! Admin view: password gate and reservation filtering.

use crate::error::ReservationError;
use crate::types::{Reservation, ReservationStatus};
use std::str::FromStr;

/// Password used when none is configured
pub const DEFAULT_PASSWORD: &str = "admin123";

/// Shared-password gate in front of the admin operations
///
/// A placeholder compared in plaintext, not real authentication.
#[derive(Clone, Debug)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    /// Gate accepting `password`
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Check a candidate password
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Unauthorized`] when it does not match.
    pub fn verify(&self, candidate: &str) -> Result<(), ReservationError> {
        if candidate == self.password {
            Ok(())
        } else {
            Err(ReservationError::Unauthorized)
        }
    }

    /// Whether the gate still uses [`DEFAULT_PASSWORD`]
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.password == DEFAULT_PASSWORD
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD)
    }
}

/// Status part of the admin filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status
    #[default]
    All,
    /// Exactly this status
    Only(ReservationStatus),
}

impl StatusFilter {
    fn matches(self, status: ReservationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Status filter and search text, combined with AND
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Status to keep
    pub status: StatusFilter,
    /// Substring of name, email or phone
    pub search: String,
}

impl ReservationFilter {
    /// Whether `reservation` passes the filter
    #[must_use]
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.status.matches(reservation.status) && matches_search(reservation, &self.search)
    }
}

/// Reservations passing `filter`, in store order
#[must_use]
pub fn filter_reservations<'a>(
    reservations: &'a [Reservation],
    filter: &ReservationFilter,
) -> Vec<&'a Reservation> {
    reservations.iter().filter(|r| filter.matches(r)).collect()
}

fn matches_search(reservation: &Reservation, search: &str) -> bool {
    let search = search.trim();
    if search.is_empty() {
        return true;
    }

    let lowered = search.to_lowercase();
    reservation.name.to_lowercase().contains(&lowered)
        || reservation.email.to_lowercase().contains(&lowered)
        || reservation.phone.contains(search)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::seed;
    use chrono::FixedOffset;

    fn reservations() -> Vec<Reservation> {
        seed::reservations(FixedOffset::east_opt(3600).unwrap())
    }

    fn ids(found: &[&Reservation]) -> Vec<String> {
        found.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn gate_checks_password() {
        let gate = AdminGate::default();
        assert!(gate.is_default());
        assert!(gate.verify("admin123").is_ok());
        assert_eq!(gate.verify("Admin123"), Err(ReservationError::Unauthorized));

        let gate = AdminGate::new("s3cret");
        assert!(!gate.is_default());
        assert!(gate.verify("admin123").is_err());
    }

    #[test]
    fn status_filter_parses() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "pending".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(ReservationStatus::Pending)
        );
        assert!("archived".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn empty_filter_matches_everything() {
        let all = reservations();
        let found = filter_reservations(&all, &ReservationFilter::default());
        assert_eq!(ids(&found), ["1", "2", "3"]);
    }

    #[test]
    fn search_is_case_insensitive_on_name_and_email() {
        let all = reservations();
        let filter = ReservationFilter {
            status: StatusFilter::All,
            search: "GARCÍA".to_string(),
        };
        assert_eq!(ids(&filter_reservations(&all, &filter)), ["2"]);

        let filter = ReservationFilter {
            status: StatusFilter::All,
            search: "MIGUEL@".to_string(),
        };
        assert_eq!(ids(&filter_reservations(&all, &filter)), ["3"]);
    }

    #[test]
    fn search_matches_phone_substring() {
        let all = reservations();
        let filter = ReservationFilter {
            status: StatusFilter::All,
            search: "654".to_string(),
        };
        assert_eq!(ids(&filter_reservations(&all, &filter)), ["2", "3"]);
    }

    #[test]
    fn status_and_search_combine() {
        let all = reservations();
        let filter = ReservationFilter {
            status: StatusFilter::Only(ReservationStatus::Confirmed),
            search: "example.com".to_string(),
        };
        assert_eq!(ids(&filter_reservations(&all, &filter)), ["1", "3"]);
    }
}
