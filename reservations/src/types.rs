//! Domain types for the reservation system.
//!
//! Identifiers are newtypes, statuses and locations are closed enums, and the
//! two bounded values of the booking flow ([`PartySize`], [`TimeSlot`]) can
//! only be constructed through validating constructors.

use crate::error::ReservationError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a table ("1" to "20" in the seeded restaurant)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Create a `TableId` from any string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a reservation
///
/// Seeded reservations use short numeric ids; new ones get a UUID v4.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a booking wizard session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlates a command with the outcome event it produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random `RequestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Occupancy status of a table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// Free to be booked
    Available,
    /// Guests are seated
    Occupied,
    /// Held for a reservation until `reserved_until`
    Reserved,
}

impl TableStatus {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dining area a table belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Main dining room
    Indoor,
    /// Terrace
    Outdoor,
    /// Private room for large groups
    Private,
}

/// Lifecycle status of a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Created by a guest, awaiting confirmation
    Pending,
    /// Confirmed by the restaurant
    Confirmed,
    /// Cancelled by the guest
    Cancelled,
    /// The visit took place
    Completed,
}

impl ReservationStatus {
    /// Pending and confirmed reservations still hold their table
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(ReservationError::validation(
                "status",
                format!("unknown reservation status '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Bounded values
// ============================================================================

/// Number of guests in a booking, between 1 and 8
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PartySize(u8);

impl PartySize {
    /// Smallest bookable party
    pub const MIN: u8 = 1;
    /// Largest party the online booking accepts
    pub const MAX: u8 = 8;

    /// Validate a party size
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Validation`] on `party_size` outside 1..=8.
    pub fn new(guests: u8) -> Result<Self, ReservationError> {
        if guests < Self::MIN {
            return Err(ReservationError::validation(
                "partySize",
                "party size must be at least 1",
            ));
        }
        if guests > Self::MAX {
            return Err(ReservationError::validation(
                "partySize",
                "parties larger than 8 must call the restaurant to book",
            ));
        }
        Ok(Self(guests))
    }

    /// Number of guests
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for PartySize {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for PartySize {
    type Error = ReservationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PartySize> for u8 {
    fn from(value: PartySize) -> Self {
        value.0
    }
}

impl fmt::Display for PartySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time of day of a reservation, serialized as `HH:MM`
///
/// Stored reservations may use any minute; the booking flow only accepts the
/// hourly slots returned by [`TimeSlot::booking_slots`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    const FIRST_HOUR: u32 = 11;
    const LAST_HOUR: u32 = 22;

    /// Build a slot from hour and minute
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Validation`] for an impossible time.
    pub fn new(hour: u32, minute: u32) -> Result<Self, ReservationError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| ReservationError::validation("time", format!("invalid time {hour:02}:{minute:02}")))
    }

    /// The twelve hourly slots offered by the booking flow, 11:00 to 22:00
    #[must_use]
    pub fn booking_slots() -> Vec<Self> {
        (Self::FIRST_HOUR..=Self::LAST_HOUR)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .map(Self)
            .collect()
    }

    /// Whether the booking flow offers this slot
    #[must_use]
    pub fn is_bookable(self) -> bool {
        self.0.minute() == 0
            && self.0.second() == 0
            && (Self::FIRST_HOUR..=Self::LAST_HOUR).contains(&self.0.hour())
    }

    /// Time of day
    #[must_use]
    pub const fn time(self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeSlot {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ReservationError::validation("time", format!("'{s}' is not a HH:MM time")))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ReservationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A table in the restaurant
///
/// `reserved_until` is set exactly when `status` is [`TableStatus::Reserved`];
/// the registry is the only place that changes either field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Unique identifier
    pub id: TableId,
    /// Number shown on the floor plan
    pub number: u32,
    /// Seats at the table
    pub capacity: u32,
    /// Current occupancy
    pub status: TableStatus,
    /// Dining area
    pub location: Location,
    /// End of the hold, present only while reserved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_until: Option<DateTime<Utc>>,
}

impl Table {
    /// Create an available table
    #[must_use]
    pub fn new(number: u32, capacity: u32, location: Location) -> Self {
        Self {
            id: TableId::new(number.to_string()),
            number,
            capacity,
            status: TableStatus::Available,
            location,
            reserved_until: None,
        }
    }

    /// Whether the table can be offered to a party of this size
    #[must_use]
    pub fn is_available_for(&self, party: PartySize) -> bool {
        self.status == TableStatus::Available && self.capacity >= u32::from(party.get())
    }

    /// Whether `status` and `reserved_until` agree
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        matches!(self.status, TableStatus::Reserved) == self.reserved_until.is_some()
    }
}

/// A booking made by a guest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Unique identifier
    pub id: ReservationId,
    /// Calendar date of the visit
    pub date: NaiveDate,
    /// Time of the visit
    pub time: TimeSlot,
    /// Number of guests
    pub guests: PartySize,
    /// Guest name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Free-text notes; cancellation reasons are appended here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Lifecycle status
    pub status: ReservationStatus,
    /// When the reservation was made
    pub created_at: DateTime<Utc>,
    /// Table held for this reservation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<TableId>,
}

impl Reservation {
    /// Start of the booked slot in UTC, given the restaurant's UTC offset
    #[must_use]
    pub fn starts_at(&self, offset: FixedOffset) -> DateTime<Utc> {
        let local = self.date.and_time(self.time.time());
        (local - chrono::Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
    }
}
