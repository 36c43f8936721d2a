//! Property tests over the table and reservation model.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use alrock_reservations::{
    Restaurant,
    admin::{ReservationFilter, StatusFilter, filter_reservations},
    availability::available_tables,
    cancellation::CancellationReason,
    restaurant::NewReservation,
    seed,
    tables::TableRegistry,
    types::{Location, PartySize, ReservationStatus, Table, TableStatus, TimeSlot},
};
use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

fn cet() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap()
}

fn status() -> impl Strategy<Value = TableStatus> {
    prop_oneof![
        Just(TableStatus::Available),
        Just(TableStatus::Occupied),
        Just(TableStatus::Reserved),
    ]
}

fn tables() -> impl Strategy<Value = Vec<Table>> {
    prop::collection::vec((1u32..=8, status()), 1..30).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (capacity, status))| {
                let number = u32::try_from(i).unwrap() + 1;
                let mut table = Table::new(number, capacity, Location::Indoor);
                table.status = status;
                if status == TableStatus::Reserved {
                    table.reserved_until = Some(Utc.with_ymd_and_hms(2025, 1, 1, 22, 0, 0).unwrap());
                }
                table
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn available_tables_are_exactly_the_free_ones_that_fit(tables in tables(), guests in 1u8..=8) {
        let party = PartySize::new(guests).unwrap();
        let result = available_tables(&tables, party);

        let expected: Vec<&Table> = tables
            .iter()
            .filter(|t| t.status == TableStatus::Available && t.capacity >= u32::from(guests))
            .collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn table_changes_keep_hold_consistent(
        changes in prop::collection::vec((1u32..=20, status(), any::<bool>()), 0..40)
    ) {
        let mut registry = TableRegistry::new(seed::tables(cet())).unwrap();
        let until = Utc.with_ymd_and_hms(2025, 1, 1, 23, 0, 0).unwrap();

        for (number, status, with_hold) in changes {
            let id = registry.find_by_number(number).unwrap().id.clone();
            let before = registry.find(&id).unwrap().clone();

            let result = registry.set_status(&id, status, with_hold.then_some(until));
            if status == TableStatus::Reserved && !with_hold {
                prop_assert!(result.is_err());
                prop_assert_eq!(registry.find(&id).unwrap(), &before);
            } else {
                prop_assert!(result.is_ok());
            }
        }

        prop_assert!(registry.list().iter().all(Table::is_consistent));
    }

    #[test]
    fn booking_then_cancelling_restores_the_table(table_number in 1u32..=20, guests in 1u8..=8) {
        let mut restaurant = Restaurant::seeded(cet()).unwrap();
        let party = PartySize::new(guests).unwrap();
        let table = restaurant.tables().find_by_number(table_number).unwrap().clone();
        prop_assume!(table.is_available_for(party));

        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let created = restaurant
            .create_reservation(
                NewReservation {
                    date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
                    time: TimeSlot::new(14, 0).unwrap(),
                    guests: party,
                    name: "Guest".to_string(),
                    phone: "600000000".to_string(),
                    email: "guest@example.com".to_string(),
                    notes: None,
                    table_id: Some(table.id.clone()),
                },
                now,
                Duration::hours(2),
            )
            .unwrap();
        prop_assert_eq!(
            restaurant.tables().find(&table.id).unwrap().status,
            TableStatus::Reserved
        );

        restaurant
            .cancel_reservation(
                &created.reservation.id,
                &CancellationReason::ChangeOfPlans,
                now,
                cet(),
            )
            .unwrap();
        prop_assert_eq!(restaurant.tables().find(&table.id).unwrap(), &table);
    }

    #[test]
    fn filtering_is_idempotent(search in "[a-zA-Z0-9@. ]{0,6}", pick in 0usize..5) {
        let reservations = seed::reservations(cet());
        let status = [
            StatusFilter::All,
            StatusFilter::Only(ReservationStatus::Pending),
            StatusFilter::Only(ReservationStatus::Confirmed),
            StatusFilter::Only(ReservationStatus::Cancelled),
            StatusFilter::Only(ReservationStatus::Completed),
        ][pick];
        let filter = ReservationFilter { status, search };

        let once: Vec<_> = filter_reservations(&reservations, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<_> = filter_reservations(&once, &filter)
            .into_iter()
            .cloned()
            .collect();
        prop_assert_eq!(&once, &twice);

        let unfiltered = filter_reservations(&reservations, &ReservationFilter::default());
        prop_assert_eq!(unfiltered.len(), reservations.len());
    }
}
