//! Table registry: the fixed set of tables and their status.

use crate::error::ReservationError;
use crate::types::{Table, TableId, TableStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of tables per status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCounts {
    /// All tables
    pub total: usize,
    /// Free tables
    pub available: usize,
    /// Tables with seated guests
    pub occupied: usize,
    /// Tables held for a reservation
    pub reserved: usize,
}

/// Owns every table; tables are never added or removed after construction.
#[derive(Clone, Debug, Default)]
pub struct TableRegistry {
    tables: Vec<Table>,
}

impl TableRegistry {
    /// Build a registry, checking ids are unique and holds are consistent
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Validation`] for duplicate ids, a zero
    /// capacity, or a table whose `reserved_until` disagrees with its status.
    pub fn new(tables: Vec<Table>) -> Result<Self, ReservationError> {
        for (index, table) in tables.iter().enumerate() {
            if tables[..index].iter().any(|t| t.id == table.id) {
                return Err(ReservationError::validation(
                    "id",
                    format!("duplicate table id {}", table.id),
                ));
            }
            if table.capacity == 0 {
                return Err(ReservationError::validation(
                    "capacity",
                    format!("table {} has no seats", table.id),
                ));
            }
            if !table.is_consistent() {
                return Err(ReservationError::validation(
                    "reservedUntil",
                    format!("table {} must have a hold time exactly when reserved", table.id),
                ));
            }
        }
        Ok(Self { tables })
    }

    /// All tables in insertion order
    #[must_use]
    pub fn list(&self) -> &[Table] {
        &self.tables
    }

    /// Find a table by id
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NotFound`] for an unknown id.
    pub fn find(&self, id: &TableId) -> Result<&Table, ReservationError> {
        self.tables
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| ReservationError::not_found("Table", id))
    }

    /// Find a table by the number shown on the floor plan
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NotFound`] when no table has that number.
    pub fn find_by_number(&self, number: u32) -> Result<&Table, ReservationError> {
        self.tables
            .iter()
            .find(|t| t.number == number)
            .ok_or_else(|| ReservationError::not_found("Table number", number))
    }

    /// Change a table's status
    ///
    /// `reserved_until` is kept only for [`TableStatus::Reserved`] and cleared
    /// for every other status.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::NotFound`] for an unknown id
    /// - [`ReservationError::Validation`] when reserving without a hold time
    pub fn set_status(
        &mut self,
        id: &TableId,
        status: TableStatus,
        reserved_until: Option<DateTime<Utc>>,
    ) -> Result<&Table, ReservationError> {
        let reserved_until = match (status, reserved_until) {
            (TableStatus::Reserved, None) => {
                return Err(ReservationError::validation(
                    "reservedUntil",
                    "a reserved table needs a hold end time",
                ));
            },
            (TableStatus::Reserved, until) => until,
            _ => None,
        };

        let table = self
            .tables
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| ReservationError::not_found("Table", id))?;

        table.status = status;
        table.reserved_until = reserved_until;
        tracing::debug!(table_id = %id, %status, "Table status changed");

        Ok(table)
    }

    /// Count tables per status
    #[must_use]
    pub fn counts(&self) -> TableCounts {
        self.tables.iter().fold(
            TableCounts {
                total: self.tables.len(),
                ..TableCounts::default()
            },
            |mut counts, table| {
                match table.status {
                    TableStatus::Available => counts.available += 1,
                    TableStatus::Occupied => counts.occupied += 1,
                    TableStatus::Reserved => counts.reserved += 1,
                }
                counts
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::types::Location;
    use chrono::Duration;

    fn registry() -> TableRegistry {
        TableRegistry::new(vec![
            Table::new(1, 2, Location::Indoor),
            Table::new(2, 4, Location::Outdoor),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = TableRegistry::new(vec![
            Table::new(1, 2, Location::Indoor),
            Table::new(1, 4, Location::Indoor),
        ]);
        assert!(matches!(result, Err(ReservationError::Validation { .. })));
    }

    #[test]
    fn rejects_inconsistent_seed() {
        let mut table = Table::new(1, 2, Location::Indoor);
        table.status = TableStatus::Reserved;
        assert!(TableRegistry::new(vec![table]).is_err());
    }

    #[test]
    fn find_by_id_and_number() {
        let registry = registry();
        assert_eq!(registry.find(&TableId::new("2")).unwrap().capacity, 4);
        assert_eq!(registry.find_by_number(1).unwrap().id.as_str(), "1");
        assert!(matches!(
            registry.find(&TableId::new("99")),
            Err(ReservationError::NotFound { .. })
        ));
    }

    #[test]
    fn reserve_requires_hold_time() {
        let mut registry = registry();
        let err = registry
            .set_status(&TableId::new("1"), TableStatus::Reserved, None)
            .unwrap_err();
        assert!(matches!(err, ReservationError::Validation { .. }));
        assert_eq!(registry.find(&TableId::new("1")).unwrap().status, TableStatus::Available);
    }

    #[test]
    fn non_reserved_status_clears_hold() {
        let mut registry = registry();
        let until = Utc::now() + Duration::hours(2);
        registry
            .set_status(&TableId::new("1"), TableStatus::Reserved, Some(until))
            .unwrap();
        let table = registry
            .set_status(&TableId::new("1"), TableStatus::Occupied, Some(until))
            .unwrap();

        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.reserved_until, None);
    }

    #[test]
    fn unknown_table_is_not_found() {
        let mut registry = registry();
        let result = registry.set_status(&TableId::new("42"), TableStatus::Available, None);
        assert!(matches!(result, Err(ReservationError::NotFound { .. })));
    }

    #[test]
    fn counts_per_status() {
        let mut registry = registry();
        registry
            .set_status(&TableId::new("2"), TableStatus::Occupied, None)
            .unwrap();

        let counts = registry.counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.available, 1);
        assert_eq!(counts.occupied, 1);
        assert_eq!(counts.reserved, 0);
    }
}
