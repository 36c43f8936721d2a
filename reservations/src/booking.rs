//! Three-stage booking wizard.
//!
//! ```text
//! CollectingDateTime → CollectingTable → CollectingContactInfo → Submitted
//!         ↑_________________Back__________________|                 |
//!         ↑______________________reset after delay__________________|
//! ```
//!
//! Only forward moves are gated. Going back never clears anything, except that
//! changing the party size drops the selected table.

use crate::availability::available_tables;
use crate::error::ReservationError;
use crate::restaurant::NewReservation;
use crate::types::{PartySize, ReservationId, Table, TableId, TimeSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where the guest is in the booking flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingStage {
    /// Choosing date, time and party size
    #[default]
    CollectingDateTime,
    /// Choosing a table on the floor plan
    CollectingTable,
    /// Entering name, phone and email
    CollectingContactInfo,
    /// Booking sent; shown until the wizard resets
    Submitted,
}

/// Contact details typed by the guest
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    /// Guest name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Optional notes
    pub notes: Option<String>,
}

/// One interaction with the wizard
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BookingInput {
    /// Pick the visit date
    SetDate {
        /// Calendar date
        date: NaiveDate,
    },
    /// Pick an hourly slot
    SetTime {
        /// Slot, `HH:MM`
        time: TimeSlot,
    },
    /// Change the number of guests
    SetPartySize {
        /// Guests, validated against 1..=8
        party_size: u8,
    },
    /// Choose a table from the available ones
    SelectTable {
        /// Table to hold
        table_id: TableId,
    },
    /// Enter the guest name
    SetName {
        /// Name
        name: String,
    },
    /// Enter the contact phone
    SetPhone {
        /// Phone
        phone: String,
    },
    /// Enter the contact email
    SetEmail {
        /// Email
        email: String,
    },
    /// Enter or clear the notes
    SetNotes {
        /// Notes
        notes: Option<String>,
    },
    /// Advance to the next stage
    Next,
    /// Return to the previous stage
    Back,
}

/// A complete booking submitted in one call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Visit date
    pub date: NaiveDate,
    /// Hourly slot
    pub time: TimeSlot,
    /// Number of guests
    pub party_size: u8,
    /// Chosen table
    pub table_id: TableId,
    /// Guest name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// The wizard inputs equivalent to this request, in order
    #[must_use]
    pub fn inputs(&self) -> Vec<BookingInput> {
        vec![
            BookingInput::SetDate { date: self.date },
            BookingInput::SetTime { time: self.time },
            BookingInput::SetPartySize {
                party_size: self.party_size,
            },
            BookingInput::Next,
            BookingInput::SelectTable {
                table_id: self.table_id.clone(),
            },
            BookingInput::Next,
            BookingInput::SetName {
                name: self.name.clone(),
            },
            BookingInput::SetPhone {
                phone: self.phone.clone(),
            },
            BookingInput::SetEmail {
                email: self.email.clone(),
            },
            BookingInput::SetNotes {
                notes: self.notes.clone(),
            },
        ]
    }
}

/// State of one guest's booking flow
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWizard {
    stage: BookingStage,
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,
    party_size: PartySize,
    table_id: Option<TableId>,
    contact: ContactInfo,
    confirmation: Option<ReservationId>,
}

impl BookingWizard {
    /// A fresh wizard: no date, no time, two guests
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage
    #[must_use]
    pub const fn stage(&self) -> BookingStage {
        self.stage
    }

    /// Chosen party size
    #[must_use]
    pub const fn party_size(&self) -> PartySize {
        self.party_size
    }

    /// Chosen table, if any
    #[must_use]
    pub const fn table_id(&self) -> Option<&TableId> {
        self.table_id.as_ref()
    }

    /// Reservation created on submit
    #[must_use]
    pub const fn confirmation(&self) -> Option<&ReservationId> {
        self.confirmation.as_ref()
    }

    /// Apply one input
    ///
    /// `tables` is the current registry content; `today` is the restaurant's
    /// local date.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::InvalidState`] once submitted, or on `Next` from
    ///   the contact stage (use submit instead)
    /// - [`ReservationError::Validation`] naming the field that blocks the input
    pub fn apply(
        &mut self,
        input: BookingInput,
        tables: &[Table],
        today: NaiveDate,
    ) -> Result<(), ReservationError> {
        if self.stage == BookingStage::Submitted {
            return Err(ReservationError::InvalidState(
                "booking already submitted".to_string(),
            ));
        }

        match input {
            BookingInput::SetDate { date } => {
                check_not_past(date, today)?;
                self.date = Some(date);
            },
            BookingInput::SetTime { time } => {
                if !time.is_bookable() {
                    return Err(ReservationError::validation(
                        "time",
                        "choose an hourly slot between 11:00 and 22:00",
                    ));
                }
                self.time = Some(time);
            },
            BookingInput::SetPartySize { party_size } => {
                let party_size = PartySize::new(party_size)?;
                if party_size != self.party_size {
                    self.table_id = None;
                }
                self.party_size = party_size;
            },
            BookingInput::SelectTable { table_id } => {
                self.check_table(&table_id, tables)?;
                self.table_id = Some(table_id);
            },
            BookingInput::SetName { name } => self.contact.name = name,
            BookingInput::SetPhone { phone } => self.contact.phone = phone,
            BookingInput::SetEmail { email } => self.contact.email = email,
            BookingInput::SetNotes { notes } => self.contact.notes = notes,
            BookingInput::Next => self.advance(tables, today)?,
            BookingInput::Back => self.go_back(),
        }
        Ok(())
    }

    /// The reservation to create from the contact stage
    ///
    /// # Errors
    ///
    /// - [`ReservationError::InvalidState`] outside the contact stage
    /// - [`ReservationError::Validation`] for a blank name, phone or email
    pub fn submission(&self) -> Result<NewReservation, ReservationError> {
        if self.stage != BookingStage::CollectingContactInfo {
            return Err(ReservationError::InvalidState(
                "booking is not ready to submit".to_string(),
            ));
        }

        let (Some(date), Some(time), Some(table_id)) = (self.date, self.time, self.table_id.clone())
        else {
            return Err(ReservationError::InvalidState(
                "booking is missing its date, time or table".to_string(),
            ));
        };

        for (field, value) in [
            ("name", &self.contact.name),
            ("phone", &self.contact.phone),
            ("email", &self.contact.email),
        ] {
            if value.trim().is_empty() {
                return Err(ReservationError::validation(field, format!("{field} is required")));
            }
        }

        Ok(NewReservation {
            date,
            time,
            guests: self.party_size,
            name: self.contact.name.trim().to_string(),
            phone: self.contact.phone.trim().to_string(),
            email: self.contact.email.trim().to_string(),
            notes: self.contact.notes.clone(),
            table_id: Some(table_id),
        })
    }

    /// Record the created reservation and move to [`BookingStage::Submitted`]
    pub fn mark_submitted(&mut self, reservation_id: ReservationId) {
        self.stage = BookingStage::Submitted;
        self.confirmation = Some(reservation_id);
    }

    /// Clear every field and return to the first stage
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drive a fresh wizard through `request` and return the reservation to create
    ///
    /// # Errors
    ///
    /// The first error any stage would raise for the same inputs.
    pub fn complete(
        request: &BookingRequest,
        tables: &[Table],
        today: NaiveDate,
    ) -> Result<NewReservation, ReservationError> {
        let mut wizard = Self::new();
        for input in request.inputs() {
            wizard.apply(input, tables, today)?;
        }
        wizard.submission()
    }

    fn advance(&mut self, tables: &[Table], today: NaiveDate) -> Result<(), ReservationError> {
        self.stage = match self.stage {
            BookingStage::CollectingDateTime => {
                let date = self
                    .date
                    .ok_or_else(|| ReservationError::validation("date", "select a date"))?;
                check_not_past(date, today)?;
                if self.time.is_none() {
                    return Err(ReservationError::validation("time", "select a time"));
                }
                BookingStage::CollectingTable
            },
            BookingStage::CollectingTable => {
                let table_id = self
                    .table_id
                    .as_ref()
                    .ok_or_else(|| ReservationError::validation("tableId", "select a table"))?;
                self.check_table(table_id, tables)?;
                BookingStage::CollectingContactInfo
            },
            BookingStage::CollectingContactInfo => {
                return Err(ReservationError::InvalidState(
                    "contact details are the last step; submit the booking".to_string(),
                ));
            },
            BookingStage::Submitted => BookingStage::Submitted,
        };
        Ok(())
    }

    fn go_back(&mut self) {
        self.stage = match self.stage {
            BookingStage::CollectingDateTime | BookingStage::CollectingTable => {
                BookingStage::CollectingDateTime
            },
            BookingStage::CollectingContactInfo => BookingStage::CollectingTable,
            BookingStage::Submitted => BookingStage::Submitted,
        };
    }

    fn check_table(&self, table_id: &TableId, tables: &[Table]) -> Result<(), ReservationError> {
        if available_tables(tables, self.party_size)
            .iter()
            .any(|t| &t.id == table_id)
        {
            Ok(())
        } else {
            Err(ReservationError::validation(
                "tableId",
                format!("table {table_id} is not available for {} guests", self.party_size),
            ))
        }
    }
}

fn check_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), ReservationError> {
    if date < today {
        return Err(ReservationError::validation("date", "date cannot be in the past"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::seed;
    use chrono::FixedOffset;

    fn tables() -> Vec<Table> {
        seed::tables(FixedOffset::east_opt(3600).unwrap())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn run(wizard: &mut BookingWizard, inputs: Vec<BookingInput>) -> Result<(), ReservationError> {
        let tables = tables();
        inputs
            .into_iter()
            .try_for_each(|input| wizard.apply(input, &tables, today()))
    }

    fn at_table_stage(party_size: u8) -> BookingWizard {
        let mut wizard = BookingWizard::new();
        run(
            &mut wizard,
            vec![
                BookingInput::SetDate { date: date(1) },
                BookingInput::SetTime {
                    time: TimeSlot::new(19, 0).unwrap(),
                },
                BookingInput::SetPartySize { party_size },
                BookingInput::Next,
            ],
        )
        .unwrap();
        wizard
    }

    #[test]
    fn starts_with_two_guests() {
        let wizard = BookingWizard::new();
        assert_eq!(wizard.stage(), BookingStage::CollectingDateTime);
        assert_eq!(wizard.party_size().get(), 2);
    }

    #[test]
    fn next_requires_date_and_time() {
        let mut wizard = BookingWizard::new();
        let err = run(&mut wizard, vec![BookingInput::Next]).unwrap_err();
        assert_eq!(err, ReservationError::validation("date", "select a date"));

        let err = run(
            &mut wizard,
            vec![BookingInput::SetDate { date: date(1) }, BookingInput::Next],
        )
        .unwrap_err();
        assert!(matches!(err, ReservationError::Validation { ref field, .. } if field == "time"));
        assert_eq!(wizard.stage(), BookingStage::CollectingDateTime);
    }

    #[test]
    fn past_dates_are_rejected() {
        let mut wizard = BookingWizard::new();
        let past = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let err = run(&mut wizard, vec![BookingInput::SetDate { date: past }]).unwrap_err();
        assert!(matches!(err, ReservationError::Validation { ref field, .. } if field == "date"));
    }

    #[test]
    fn off_grid_time_is_rejected() {
        let mut wizard = BookingWizard::new();
        let err = run(
            &mut wizard,
            vec![BookingInput::SetTime {
                time: "20:30".parse().unwrap(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, ReservationError::Validation { ref field, .. } if field == "time"));
    }

    #[test]
    fn party_size_above_eight_asks_to_call() {
        let mut wizard = BookingWizard::new();
        let err = run(&mut wizard, vec![BookingInput::SetPartySize { party_size: 9 }]).unwrap_err();
        assert!(err.to_string().contains("call the restaurant"));
    }

    #[test]
    fn table_must_be_available_and_large_enough() {
        let mut wizard = at_table_stage(4);

        for taken in ["1", "9", "12"] {
            let err = run(
                &mut wizard,
                vec![BookingInput::SelectTable {
                    table_id: TableId::new(taken),
                }],
            )
            .unwrap_err();
            assert!(matches!(err, ReservationError::Validation { ref field, .. } if field == "tableId"));
        }

        run(
            &mut wizard,
            vec![
                BookingInput::SelectTable {
                    table_id: TableId::new("8"),
                },
                BookingInput::Next,
            ],
        )
        .unwrap();
        assert_eq!(wizard.stage(), BookingStage::CollectingContactInfo);
    }

    #[test]
    fn next_without_table_is_blocked() {
        let mut wizard = at_table_stage(2);
        let err = run(&mut wizard, vec![BookingInput::Next]).unwrap_err();
        assert_eq!(err, ReservationError::validation("tableId", "select a table"));
    }

    #[test]
    fn changing_party_size_clears_table() {
        let mut wizard = at_table_stage(2);
        run(
            &mut wizard,
            vec![
                BookingInput::SelectTable {
                    table_id: TableId::new("1"),
                },
                BookingInput::Back,
                BookingInput::SetPartySize { party_size: 6 },
            ],
        )
        .unwrap();

        assert_eq!(wizard.table_id(), None);
        assert_eq!(wizard.stage(), BookingStage::CollectingDateTime);
    }

    #[test]
    fn same_party_size_keeps_table() {
        let mut wizard = at_table_stage(2);
        run(
            &mut wizard,
            vec![
                BookingInput::SelectTable {
                    table_id: TableId::new("1"),
                },
                BookingInput::SetPartySize { party_size: 2 },
            ],
        )
        .unwrap();
        assert_eq!(wizard.table_id(), Some(&TableId::new("1")));
    }

    #[test]
    fn back_keeps_fields() {
        let mut wizard = at_table_stage(4);
        run(&mut wizard, vec![BookingInput::Back, BookingInput::Back]).unwrap();

        assert_eq!(wizard.stage(), BookingStage::CollectingDateTime);
        run(&mut wizard, vec![BookingInput::Next]).unwrap();
        assert_eq!(wizard.stage(), BookingStage::CollectingTable);
    }

    #[test]
    fn submission_requires_contact_details() {
        let mut wizard = at_table_stage(4);
        run(
            &mut wizard,
            vec![
                BookingInput::SelectTable {
                    table_id: TableId::new("8"),
                },
                BookingInput::Next,
                BookingInput::SetName {
                    name: "Lucía".to_string(),
                },
                BookingInput::SetPhone {
                    phone: " ".to_string(),
                },
            ],
        )
        .unwrap();

        let err = wizard.submission().unwrap_err();
        assert!(matches!(err, ReservationError::Validation { ref field, .. } if field == "phone"));
    }

    #[test]
    fn submitted_wizard_rejects_input_until_reset() {
        let mut wizard = BookingWizard::new();
        wizard.mark_submitted(ReservationId::from_string("r-1"));

        let err = run(&mut wizard, vec![BookingInput::Back]).unwrap_err();
        assert!(matches!(err, ReservationError::InvalidState(_)));

        wizard.reset();
        assert_eq!(wizard, BookingWizard::new());
    }

    #[test]
    fn complete_builds_reservation() {
        let request = BookingRequest {
            date: date(1),
            time: TimeSlot::new(19, 0).unwrap(),
            party_size: 4,
            table_id: TableId::new("8"),
            name: " Lucía Pérez ".to_string(),
            phone: "+34 600 000 000".to_string(),
            email: "lucia@example.com".to_string(),
            notes: None,
        };

        let new = BookingWizard::complete(&request, &tables(), today()).unwrap();
        assert_eq!(new.name, "Lucía Pérez");
        assert_eq!(new.guests.get(), 4);
        assert_eq!(new.table_id, Some(TableId::new("8")));
    }

    #[test]
    fn inputs_deserialize_from_tagged_json() {
        let input: BookingInput =
            serde_json::from_str(r#"{"type":"setPartySize","partySize":4}"#).unwrap();
        assert_eq!(input, BookingInput::SetPartySize { party_size: 4 });

        let input: BookingInput = serde_json::from_str(r#"{"type":"next"}"#).unwrap();
        assert_eq!(input, BookingInput::Next);
    }
}
