//! Cancellation reasons, notes and charges.

use crate::error::ReservationError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Prefix written before the reason when it is appended to the notes
pub const REASON_PREFIX: &str = "Motivo de cancelación: ";

/// Why a guest cancelled
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancellationReason {
    /// "Cambio de planes"
    ChangeOfPlans,
    /// "Error en la reserva"
    BookingMistake,
    /// "Prefiero otra fecha/hora"
    PreferAnotherTime,
    /// "Emergencia personal"
    PersonalEmergency,
    /// "Problema de salud"
    HealthIssue,
    /// "Otro", with the guest's own explanation
    Other(String),
}

impl CancellationReason {
    /// Labels shown to guests, in display order
    pub const LABELS: [&'static str; 6] = [
        "Cambio de planes",
        "Error en la reserva",
        "Prefiero otra fecha/hora",
        "Emergencia personal",
        "Problema de salud",
        "Otro",
    ];

    /// Parse a reason from its label and optional free text
    ///
    /// `Otro` requires non-empty `details`, which become the stored reason.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Validation`] for an unknown label or an
    /// empty explanation for `Otro`.
    pub fn from_parts(label: &str, details: Option<&str>) -> Result<Self, ReservationError> {
        let reason = match label.trim() {
            "Cambio de planes" => Self::ChangeOfPlans,
            "Error en la reserva" => Self::BookingMistake,
            "Prefiero otra fecha/hora" => Self::PreferAnotherTime,
            "Emergencia personal" => Self::PersonalEmergency,
            "Problema de salud" => Self::HealthIssue,
            "Otro" => {
                let text = details.map(str::trim).unwrap_or_default();
                if text.is_empty() {
                    return Err(ReservationError::validation(
                        "details",
                        "please describe the reason for cancelling",
                    ));
                }
                Self::Other(text.to_string())
            },
            other => {
                return Err(ReservationError::validation(
                    "reason",
                    format!("unknown cancellation reason '{other}'"),
                ));
            },
        };
        Ok(reason)
    }

    /// Text stored in the reservation notes
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::ChangeOfPlans => Self::LABELS[0],
            Self::BookingMistake => Self::LABELS[1],
            Self::PreferAnotherTime => Self::LABELS[2],
            Self::PersonalEmergency => Self::LABELS[3],
            Self::HealthIssue => Self::LABELS[4],
            Self::Other(text) => text,
        }
    }
}

/// Notes after appending a cancellation reason
#[must_use]
pub fn append_reason(notes: Option<&str>, reason: &str) -> String {
    match notes {
        Some(existing) if !existing.is_empty() => format!("{existing}\n{REASON_PREFIX}{reason}"),
        _ => format!("{REASON_PREFIX}{reason}"),
    }
}

/// Share of the minimum menu charged for a late cancellation
///
/// Informational only: no payment is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancellationCharge {
    /// Four hours or more before the slot
    Free,
    /// Between two and four hours before: half the minimum menu
    Half,
    /// Less than two hours before, or after the slot started
    Full,
}

impl CancellationCharge {
    /// Charge for cancelling at `now` a reservation starting at `starts_at`
    #[must_use]
    pub fn at(starts_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let notice = starts_at - now;
        if notice >= Duration::hours(4) {
            Self::Free
        } else if notice >= Duration::hours(2) {
            Self::Half
        } else {
            Self::Full
        }
    }

    /// Percentage of the minimum menu charged
    #[must_use]
    pub const fn percent(self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Half => 50,
            Self::Full => 100,
        }
    }

    /// Metric label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Half => "half",
            Self::Full => "full",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn parses_every_label() {
        for label in &CancellationReason::LABELS[..5] {
            let reason = CancellationReason::from_parts(label, None).unwrap();
            assert_eq!(reason.text(), *label);
        }
    }

    #[test]
    fn other_requires_details() {
        assert!(CancellationReason::from_parts("Otro", None).is_err());
        assert!(CancellationReason::from_parts("Otro", Some("   ")).is_err());

        let reason = CancellationReason::from_parts("Otro", Some(" Viaje de trabajo ")).unwrap();
        assert_eq!(reason.text(), "Viaje de trabajo");
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = CancellationReason::from_parts("Aburrimiento", None).unwrap_err();
        assert!(matches!(err, ReservationError::Validation { ref field, .. } if field == "reason"));
    }

    #[test]
    fn append_reason_without_notes_has_no_leading_newline() {
        assert_eq!(
            append_reason(None, "Cambio de planes"),
            "Motivo de cancelación: Cambio de planes"
        );
        assert_eq!(
            append_reason(Some("Mesa junto a la ventana"), "Otro motivo"),
            "Mesa junto a la ventana\nMotivo de cancelación: Otro motivo"
        );
    }

    #[test]
    fn charge_thresholds() {
        let start = Utc::now();
        assert_eq!(CancellationCharge::at(start, start - Duration::hours(4)), CancellationCharge::Free);
        assert_eq!(CancellationCharge::at(start, start - Duration::hours(3)), CancellationCharge::Half);
        assert_eq!(CancellationCharge::at(start, start - Duration::hours(2)), CancellationCharge::Half);
        assert_eq!(CancellationCharge::at(start, start - Duration::minutes(90)), CancellationCharge::Full);
        assert_eq!(CancellationCharge::at(start, start + Duration::hours(1)), CancellationCharge::Full);
        assert_eq!(CancellationCharge::Half.percent(), 50);
    }
}
