//! Opening-day data for Alrock Burger.
//!
//! Times in the seed are restaurant-local; callers pass the restaurant's UTC
//! offset so they can be stored in UTC.

use crate::types::{
    Location, PartySize, Reservation, ReservationId, ReservationStatus, Table, TableStatus,
    TimeSlot,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

/// The twenty tables of the restaurant
///
/// Tables 2, 9 and 16 are held for the evening of 2025-01-15; tables 3, 6 and
/// 12 are occupied.
#[must_use]
pub fn tables(offset: FixedOffset) -> Vec<Table> {
    let held_until = |hour, minute| local(offset, 2025, 1, 15, hour, minute);

    (1..=20)
        .map(|number| {
            let (capacity, location) = match number {
                1..=7 => (2, Location::Indoor),
                8..=13 => (4, Location::Indoor),
                14..=18 => (4, Location::Outdoor),
                _ => (8, Location::Private),
            };
            let mut table = Table::new(number, capacity, location);

            match number {
                2 => hold(&mut table, held_until(21, 0)),
                9 => hold(&mut table, held_until(19, 30)),
                16 => hold(&mut table, held_until(20, 0)),
                3 | 6 | 12 => table.status = TableStatus::Occupied,
                _ => {},
            }
            table
        })
        .collect()
}

/// The three reservations already on the books
#[must_use]
pub fn reservations(offset: FixedOffset) -> Vec<Reservation> {
    vec![
        reservation(
            "1",
            (2025, 1, 15, 19, 0),
            4,
            ("Carlos Mendoza", "carlos@example.com", "+34 612 345 678"),
            Some("Mesa junto a la ventana si es posible"),
            ReservationStatus::Confirmed,
            local(offset, 2025, 1, 10, 14, 30),
        ),
        reservation(
            "2",
            (2025, 1, 15, 20, 30),
            2,
            ("Ana García", "ana@example.com", "+34 687 654 321"),
            None,
            ReservationStatus::Pending,
            local(offset, 2025, 1, 11, 10, 15),
        ),
        reservation(
            "3",
            (2025, 1, 16, 18, 30),
            6,
            ("Miguel Torres", "miguel@example.com", "+34 654 987 321"),
            Some("Celebración de aniversario"),
            ReservationStatus::Confirmed,
            local(offset, 2025, 1, 9, 16, 45),
        ),
    ]
}

fn hold(table: &mut Table, until: DateTime<Utc>) {
    table.status = TableStatus::Reserved;
    table.reserved_until = Some(until);
}

fn reservation(
    id: &str,
    (year, month, day, hour, minute): (i32, u32, u32, u32, u32),
    guests: u8,
    (name, email, phone): (&str, &str, &str),
    notes: Option<&str>,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
) -> Reservation {
    Reservation {
        id: ReservationId::from_string(id),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        time: TimeSlot::new(hour, minute).unwrap_or_else(|_| TimeSlot::booking_slots()[0]),
        guests: PartySize::new(guests).unwrap_or_default(),
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        notes: notes.map(str::to_string),
        status,
        created_at,
        table_id: None,
    }
}

fn local(offset: FixedOffset, year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| Some(date.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?)))
        .unwrap_or_default();
    (naive - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[test]
    fn twenty_consistent_tables() {
        let tables = tables(cet());
        assert_eq!(tables.len(), 20);
        assert!(tables.iter().all(Table::is_consistent));

        let reserved: Vec<u32> = tables
            .iter()
            .filter(|t| t.status == TableStatus::Reserved)
            .map(|t| t.number)
            .collect();
        assert_eq!(reserved, [2, 9, 16]);

        let occupied: Vec<u32> = tables
            .iter()
            .filter(|t| t.status == TableStatus::Occupied)
            .map(|t| t.number)
            .collect();
        assert_eq!(occupied, [3, 6, 12]);
    }

    #[test]
    fn hold_times_are_local() {
        let tables = tables(cet());
        assert_eq!(
            tables[1].reserved_until.unwrap().to_rfc3339(),
            "2025-01-15T20:00:00+00:00"
        );
    }

    #[test]
    fn capacities_by_group() {
        let tables = tables(cet());
        assert_eq!(tables[0].capacity, 2);
        assert_eq!(tables[7].capacity, 4);
        assert_eq!(tables[13].location, Location::Outdoor);
        assert_eq!(tables[19].capacity, 8);
        assert_eq!(tables[19].location, Location::Private);
    }

    #[test]
    fn seeded_reservations_have_no_table() {
        let reservations = reservations(cet());
        assert_eq!(reservations.len(), 3);
        assert!(reservations.iter().all(|r| r.table_id.is_none()));
        assert_eq!(reservations[1].time.to_string(), "20:30");
        assert_eq!(reservations[1].notes, None);
    }
}
