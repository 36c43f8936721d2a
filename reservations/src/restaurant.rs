//! The restaurant aggregate.
//!
//! [`Restaurant`] owns the table registry and the reservation store. Every
//! operation touching both entities is a single method that validates first
//! and mutates second, so a failed call leaves state untouched.

use crate::availability::available_tables;
use crate::cancellation::{CancellationCharge, CancellationReason};
use crate::error::ReservationError;
use crate::reservations::ReservationStore;
use crate::seed;
use crate::tables::{TableCounts, TableRegistry};
use crate::types::{
    PartySize, Reservation, ReservationId, ReservationStatus, Table, TableId, TableStatus,
    TimeSlot,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to create a reservation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    /// Calendar date of the visit
    pub date: NaiveDate,
    /// Time slot
    pub time: TimeSlot,
    /// Number of guests
    pub guests: PartySize,
    /// Guest name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Table to hold, if any
    #[serde(default)]
    pub table_id: Option<TableId>,
}

/// A newly created reservation and the table it now holds
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatedReservation {
    /// The pending reservation
    pub reservation: Reservation,
    /// The table, now reserved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

/// Result of a cancellation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationOutcome {
    /// The reservation, now cancelled
    pub reservation: Reservation,
    /// The table released back to available, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_table: Option<Table>,
    /// Late-cancellation charge, for information
    pub charge: CancellationCharge,
}

/// Figures for the admin dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Tables per status
    pub tables: TableCounts,
    /// Percentage of tables occupied or reserved, rounded
    pub occupancy_rate: u32,
    /// Every reservation on record
    pub total_reservations: usize,
    /// Reservations for today's date
    pub today_reservations: usize,
    /// Reservations awaiting confirmation
    pub pending_reservations: usize,
    /// Confirmed reservations
    pub confirmed_reservations: usize,
}

/// Tables and reservations of one restaurant
#[derive(Clone, Debug, Default)]
pub struct Restaurant {
    tables: TableRegistry,
    reservations: ReservationStore,
}

impl Restaurant {
    /// Combine a registry and a store
    #[must_use]
    pub const fn new(tables: TableRegistry, reservations: ReservationStore) -> Self {
        Self {
            tables,
            reservations,
        }
    }

    /// The restaurant as it opens, with seed times in the given offset
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Validation`] if the seed data is inconsistent.
    pub fn seeded(offset: FixedOffset) -> Result<Self, ReservationError> {
        Ok(Self::new(
            TableRegistry::new(seed::tables(offset))?,
            ReservationStore::new(seed::reservations(offset))?,
        ))
    }

    /// The table registry
    #[must_use]
    pub const fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    /// The reservation store
    #[must_use]
    pub const fn reservations(&self) -> &ReservationStore {
        &self.reservations
    }

    /// Tables a party of this size may book
    #[must_use]
    pub fn available_tables(&self, party_size: PartySize) -> Vec<&Table> {
        available_tables(self.tables.list(), party_size)
    }

    /// Create a pending reservation and hold its table until `now + hold`
    ///
    /// # Errors
    ///
    /// - [`ReservationError::Validation`] for a blank name, phone or email
    /// - [`ReservationError::NotFound`] for an unknown table
    /// - [`ReservationError::InvalidState`] if the table is no longer available
    ///   or too small for the party, or if `hold` does not end after `now`
    pub fn create_reservation(
        &mut self,
        new: NewReservation,
        now: DateTime<Utc>,
        hold: Duration,
    ) -> Result<CreatedReservation, ReservationError> {
        let name = required("name", &new.name)?;
        let phone = required("phone", &new.phone)?;
        let email = required("email", &new.email)?;

        let held_until = now
            .checked_add_signed(hold)
            .filter(|until| *until > now)
            .ok_or_else(|| {
                ReservationError::InvalidState(format!("a table hold of {hold} does not end after {now}"))
            })?;

        if let Some(table_id) = &new.table_id {
            let table = self.tables.find(table_id)?;
            if !table.is_available_for(new.guests) {
                return Err(ReservationError::InvalidState(format!(
                    "table {} is no longer available for {} guests",
                    table.number, new.guests
                )));
            }
        }

        let table = match &new.table_id {
            Some(table_id) => Some(
                self.tables
                    .set_status(table_id, TableStatus::Reserved, Some(held_until))?
                    .clone(),
            ),
            None => None,
        };

        let reservation = Reservation {
            id: ReservationId::new(),
            date: new.date,
            time: new.time,
            guests: new.guests,
            name,
            phone,
            email,
            notes: new.notes.filter(|n| !n.trim().is_empty()),
            status: ReservationStatus::Pending,
            created_at: now,
            table_id: new.table_id,
        };
        self.reservations.insert(reservation.clone());

        tracing::info!(
            reservation_id = %reservation.id,
            table_id = ?reservation.table_id,
            guests = %reservation.guests,
            "Reservation created"
        );

        Ok(CreatedReservation { reservation, table })
    }

    /// Cancel a reservation and release its table
    ///
    /// The table goes back to available only if it is currently reserved and
    /// no other pending or confirmed reservation holds it.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::NotFound`] for an unknown reservation
    /// - [`ReservationError::InvalidState`] if it is already cancelled
    pub fn cancel_reservation(
        &mut self,
        id: &ReservationId,
        reason: &CancellationReason,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Result<CancellationOutcome, ReservationError> {
        let reservation = self.reservations.cancel(id, reason.text())?.clone();

        let releasable = reservation.table_id.as_ref().filter(|table_id| {
            self.tables
                .find(table_id)
                .is_ok_and(|t| t.status == TableStatus::Reserved)
                && !self.reservations.table_claimed_by_other(table_id, id)
        });

        let released_table = match releasable.cloned() {
            Some(table_id) => Some(
                self.tables
                    .set_status(&table_id, TableStatus::Available, None)?
                    .clone(),
            ),
            None => None,
        };

        let charge = CancellationCharge::at(reservation.starts_at(offset), now);

        tracing::info!(
            reservation_id = %id,
            reason = reason.text(),
            released_table = ?released_table.as_ref().map(|t| t.number),
            charge = charge.as_str(),
            "Reservation cancelled"
        );

        Ok(CancellationOutcome {
            reservation,
            released_table,
            charge,
        })
    }

    /// Admin override of a reservation's status; tables are not touched
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NotFound`] for an unknown id.
    pub fn update_reservation_status(
        &mut self,
        id: &ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation, ReservationError> {
        let reservation = self.reservations.update_status(id, status)?;
        tracing::info!(reservation_id = %id, %status, "Reservation status updated");
        Ok(reservation.clone())
    }

    /// Admin change of a table's status
    ///
    /// # Errors
    ///
    /// See [`TableRegistry::set_status`].
    pub fn set_table_status(
        &mut self,
        id: &TableId,
        status: TableStatus,
        reserved_until: Option<DateTime<Utc>>,
    ) -> Result<Table, ReservationError> {
        self.tables
            .set_status(id, status, reserved_until)
            .cloned()
    }

    /// Dashboard figures, counting reservations dated `today`
    #[must_use]
    pub fn stats(&self, today: NaiveDate) -> DashboardStats {
        let tables = self.tables.counts();
        let busy = tables.occupied + tables.reserved;
        let occupancy_rate = if tables.total == 0 {
            0
        } else {
            (busy * 100 + tables.total / 2) / tables.total
        };

        let reservations = self.reservations.list();
        let count = |status: ReservationStatus| {
            reservations.iter().filter(|r| r.status == status).count()
        };

        DashboardStats {
            tables,
            occupancy_rate: u32::try_from(occupancy_rate).unwrap_or(100),
            total_reservations: reservations.len(),
            today_reservations: reservations.iter().filter(|r| r.date == today).count(),
            pending_reservations: count(ReservationStatus::Pending),
            confirmed_reservations: count(ReservationStatus::Confirmed),
        }
    }
}

fn required(field: &str, value: &str) -> Result<String, ReservationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReservationError::validation(field, format!("{field} is required")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use alrock_core::environment::Clock;
    use alrock_testing::test_clock;

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn restaurant() -> Restaurant {
        Restaurant::seeded(cet()).unwrap()
    }

    fn new_reservation(table: &str, guests: u8) -> NewReservation {
        NewReservation {
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            time: TimeSlot::new(19, 0).unwrap(),
            guests: PartySize::new(guests).unwrap(),
            name: "Lucía Pérez".to_string(),
            phone: "+34 600 000 000".to_string(),
            email: "lucia@example.com".to_string(),
            notes: None,
            table_id: Some(TableId::new(table)),
        }
    }

    #[test]
    fn create_reserves_only_selected_table() {
        let mut restaurant = restaurant();
        let before = restaurant.tables().list().to_vec();
        let now = test_clock().now();

        let created = restaurant
            .create_reservation(new_reservation("8", 4), now, Duration::hours(2))
            .unwrap();

        assert_eq!(created.reservation.status, ReservationStatus::Pending);
        assert_eq!(created.reservation.table_id, Some(TableId::new("8")));
        assert_eq!(created.table.as_ref().unwrap().reserved_until, Some(now + Duration::hours(2)));

        for (old, new) in before.iter().zip(restaurant.tables().list()) {
            if new.number == 8 {
                assert_eq!(new.status, TableStatus::Reserved);
            } else {
                assert_eq!(old, new);
            }
        }
        assert_eq!(restaurant.reservations().list().len(), 4);
    }

    #[test]
    fn create_rejects_taken_table_without_changes() {
        let mut restaurant = restaurant();
        let err = restaurant
            .create_reservation(new_reservation("9", 2), test_clock().now(), Duration::hours(2))
            .unwrap_err();

        assert!(matches!(err, ReservationError::InvalidState(_)));
        assert_eq!(restaurant.reservations().list().len(), 3);
    }

    #[test]
    fn create_rejects_holds_that_do_not_end_later() {
        let now = test_clock().now();

        for hold in [Duration::zero(), Duration::hours(-2), Duration::days(100_000_000)] {
            let mut restaurant = restaurant();
            let before = restaurant.tables().list().to_vec();

            let err = restaurant
                .create_reservation(new_reservation("8", 4), now, hold)
                .unwrap_err();

            assert!(matches!(err, ReservationError::InvalidState(_)), "{hold}: {err:?}");
            assert_eq!(restaurant.tables().list(), before.as_slice());
            assert_eq!(restaurant.reservations().list().len(), 3);
        }
    }

    #[test]
    fn create_rejects_too_small_table() {
        let mut restaurant = restaurant();
        let err = restaurant
            .create_reservation(new_reservation("1", 4), test_clock().now(), Duration::hours(2))
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidState(_)));
    }

    #[test]
    fn create_requires_contact_fields() {
        let mut restaurant = restaurant();
        let mut new = new_reservation("8", 2);
        new.email = "  ".to_string();

        let err = restaurant
            .create_reservation(new, test_clock().now(), Duration::hours(2))
            .unwrap_err();
        assert!(matches!(err, ReservationError::Validation { ref field, .. } if field == "email"));
        assert_eq!(
            restaurant.tables().find(&TableId::new("8")).unwrap().status,
            TableStatus::Available
        );
    }

    #[test]
    fn cancel_releases_own_table_only() {
        let mut restaurant = restaurant();
        let now = test_clock().now();
        let created = restaurant
            .create_reservation(new_reservation("10", 4), now, Duration::hours(2))
            .unwrap();

        let outcome = restaurant
            .cancel_reservation(&created.reservation.id, &CancellationReason::ChangeOfPlans, now, cet())
            .unwrap();

        assert_eq!(outcome.released_table.unwrap().number, 10);
        let tables = restaurant.tables();
        assert_eq!(tables.find(&TableId::new("10")).unwrap().status, TableStatus::Available);
        assert_eq!(tables.find(&TableId::new("9")).unwrap().status, TableStatus::Reserved);
        assert_eq!(tables.find(&TableId::new("16")).unwrap().status, TableStatus::Reserved);
    }

    #[test]
    fn cancel_keeps_table_claimed_by_another_reservation() {
        let mut restaurant = restaurant();
        let now = test_clock().now();
        let first = restaurant
            .create_reservation(new_reservation("11", 4), now, Duration::hours(2))
            .unwrap();
        restaurant
            .reservations
            .insert(Reservation {
                id: ReservationId::from_string("walk-in"),
                ..first.reservation.clone()
            });

        let outcome = restaurant
            .cancel_reservation(&first.reservation.id, &CancellationReason::HealthIssue, now, cet())
            .unwrap();

        assert!(outcome.released_table.is_none());
        assert_eq!(
            restaurant.tables().find(&TableId::new("11")).unwrap().status,
            TableStatus::Reserved
        );
    }

    #[test]
    fn cancel_seeded_reservation_without_table() {
        let mut restaurant = restaurant();
        let outcome = restaurant
            .cancel_reservation(
                &ReservationId::from_string("2"),
                &CancellationReason::ChangeOfPlans,
                test_clock().now(),
                cet(),
            )
            .unwrap();

        assert_eq!(outcome.reservation.status, ReservationStatus::Cancelled);
        assert!(outcome.released_table.is_none());
        assert_eq!(restaurant.tables().counts().reserved, 3);
    }

    #[test]
    fn charge_depends_on_notice() {
        let mut restaurant = restaurant();
        let slot_start = ReservationId::from_string("1");
        let starts_at = restaurant.reservations().get(&slot_start).unwrap().starts_at(cet());

        let outcome = restaurant
            .cancel_reservation(&slot_start, &CancellationReason::BookingMistake, starts_at - Duration::hours(3), cet())
            .unwrap();
        assert_eq!(outcome.charge, CancellationCharge::Half);
    }

    #[test]
    fn status_update_leaves_tables_alone() {
        let mut restaurant = restaurant();
        let before = restaurant.tables().list().to_vec();

        let updated = restaurant
            .update_reservation_status(&ReservationId::from_string("1"), ReservationStatus::Completed)
            .unwrap();

        assert_eq!(updated.status, ReservationStatus::Completed);
        assert_eq!(restaurant.tables().list(), before.as_slice());
    }

    #[test]
    fn stats_for_seed() {
        let restaurant = restaurant();
        let stats = restaurant.stats(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());

        assert_eq!(stats.tables.total, 20);
        assert_eq!(stats.tables.available, 14);
        assert_eq!(stats.occupancy_rate, 30);
        assert_eq!(stats.total_reservations, 3);
        assert_eq!(stats.today_reservations, 2);
        assert_eq!(stats.pending_reservations, 1);
        assert_eq!(stats.confirmed_reservations, 2);
    }
}
