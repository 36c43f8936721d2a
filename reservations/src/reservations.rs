//! Reservation store: every reservation ever made, in creation order.

use crate::cancellation::append_reason;
use crate::error::ReservationError;
use crate::types::{Reservation, ReservationId, ReservationStatus, TableId};

/// Owns the reservation list. Reservations are never deleted.
#[derive(Clone, Debug, Default)]
pub struct ReservationStore {
    reservations: Vec<Reservation>,
}

impl ReservationStore {
    /// Build a store from existing reservations
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Validation`] when two reservations share an id.
    pub fn new(reservations: Vec<Reservation>) -> Result<Self, ReservationError> {
        for (index, reservation) in reservations.iter().enumerate() {
            if reservations[..index].iter().any(|r| r.id == reservation.id) {
                return Err(ReservationError::validation(
                    "id",
                    format!("duplicate reservation id {}", reservation.id),
                ));
            }
        }
        Ok(Self { reservations })
    }

    /// All reservations in creation order
    #[must_use]
    pub fn list(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Find a reservation by id
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NotFound`] for an unknown id.
    pub fn get(&self, id: &ReservationId) -> Result<&Reservation, ReservationError> {
        self.reservations
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| ReservationError::not_found("Reservation", id))
    }

    /// Find the single reservation identified by an email, id or phone
    ///
    /// Email compares case-insensitively; id and phone must match exactly.
    /// The term is trimmed first.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::Validation`] for an empty term
    /// - [`ReservationError::NotFound`] when nothing matches
    /// - [`ReservationError::Ambiguous`] when several reservations match
    pub fn find_by_term(&self, term: &str) -> Result<&Reservation, ReservationError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ReservationError::validation(
                "term",
                "enter an email, phone number or reservation id",
            ));
        }

        let email = term.to_lowercase();
        let mut matches = self.reservations.iter().filter(|r| {
            r.email.to_lowercase() == email || r.id.as_str() == term || r.phone == term
        });

        let Some(first) = matches.next() else {
            return Err(ReservationError::not_found("Reservation", term));
        };

        let extra = matches.count();
        if extra > 0 {
            return Err(ReservationError::Ambiguous {
                term: term.to_string(),
                matches: extra + 1,
            });
        }

        Ok(first)
    }

    /// Whether an active reservation other than `excluding` holds `table_id`
    #[must_use]
    pub fn table_claimed_by_other(&self, table_id: &TableId, excluding: &ReservationId) -> bool {
        self.reservations.iter().any(|r| {
            &r.id != excluding && r.status.is_active() && r.table_id.as_ref() == Some(table_id)
        })
    }

    pub(crate) fn insert(&mut self, reservation: Reservation) {
        self.reservations.push(reservation);
    }

    /// Overwrite a reservation's status; any transition is allowed
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NotFound`] for an unknown id.
    pub(crate) fn update_status(
        &mut self,
        id: &ReservationId,
        status: ReservationStatus,
    ) -> Result<&Reservation, ReservationError> {
        let reservation = self.get_mut(id)?;
        reservation.status = status;
        Ok(reservation)
    }

    /// Mark a reservation cancelled and append the reason to its notes
    ///
    /// # Errors
    ///
    /// - [`ReservationError::NotFound`] for an unknown id
    /// - [`ReservationError::InvalidState`] if it is already cancelled
    pub(crate) fn cancel(
        &mut self,
        id: &ReservationId,
        reason: &str,
    ) -> Result<&Reservation, ReservationError> {
        let reservation = self.get_mut(id)?;
        if reservation.status == ReservationStatus::Cancelled {
            return Err(ReservationError::InvalidState(format!(
                "reservation {id} is already cancelled"
            )));
        }

        reservation.status = ReservationStatus::Cancelled;
        reservation.notes = Some(append_reason(reservation.notes.as_deref(), reason));
        Ok(reservation)
    }

    fn get_mut(&mut self, id: &ReservationId) -> Result<&mut Reservation, ReservationError> {
        self.reservations
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| ReservationError::not_found("Reservation", id))
    }
}
