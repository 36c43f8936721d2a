//! Static floor plan used to draw the table map.
//!
//! Positions are keyed by table number, in map units. Four columns: two-seat
//! tables at x=15, indoor four-seat tables at x=120, terrace tables at x=220
//! and the private room at x=320.

use crate::types::Table;
use serde::Serialize;

/// Rectangle occupied by a table on the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TablePosition {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl TablePosition {
    const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

const POSITIONS: [(u32, TablePosition); 20] = [
    (1, TablePosition::new(15, 20, 60, 40)),
    (2, TablePosition::new(15, 70, 60, 40)),
    (3, TablePosition::new(15, 120, 60, 40)),
    (4, TablePosition::new(15, 170, 60, 40)),
    (5, TablePosition::new(15, 220, 60, 40)),
    (6, TablePosition::new(15, 270, 60, 40)),
    (7, TablePosition::new(15, 320, 60, 40)),
    (8, TablePosition::new(120, 50, 50, 35)),
    (9, TablePosition::new(120, 100, 50, 35)),
    (10, TablePosition::new(120, 150, 50, 35)),
    (11, TablePosition::new(120, 200, 50, 35)),
    (12, TablePosition::new(120, 250, 50, 35)),
    (13, TablePosition::new(120, 300, 50, 35)),
    (14, TablePosition::new(220, 30, 55, 40)),
    (15, TablePosition::new(220, 80, 55, 40)),
    (16, TablePosition::new(220, 130, 55, 40)),
    (17, TablePosition::new(220, 180, 55, 40)),
    (18, TablePosition::new(220, 230, 55, 40)),
    (19, TablePosition::new(320, 60, 70, 50)),
    (20, TablePosition::new(320, 140, 70, 50)),
];

/// Map position of a table number, if the plan has one
#[must_use]
pub fn position_of(number: u32) -> Option<TablePosition> {
    POSITIONS
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, position)| *position)
}

/// A table together with where to draw it
#[derive(Clone, Debug, Serialize)]
pub struct PositionedTable<'a> {
    /// The table
    #[serde(flatten)]
    pub table: &'a Table,
    /// Where it sits on the map
    pub position: TablePosition,
}

/// Place tables on the map, silently leaving out tables without a position
#[must_use]
pub fn layout(tables: &[Table]) -> Vec<PositionedTable<'_>> {
    tables
        .iter()
        .filter_map(|table| {
            position_of(table.number).map(|position| PositionedTable { table, position })
        })
        .collect()
}
