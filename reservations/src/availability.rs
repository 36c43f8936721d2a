//! Availability filter.

use crate::types::{PartySize, Table};

/// Tables a party of `party_size` may choose from
///
/// Every available table with enough seats, in registry order. There is no
/// best-fit sorting: the guest picks from the floor plan.
#[must_use]
pub fn available_tables(tables: &[Table], party_size: PartySize) -> Vec<&Table> {
    tables
        .iter()
        .filter(|table| table.is_available_for(party_size))
        .collect()
}
