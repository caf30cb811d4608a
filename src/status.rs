use std::fmt;
use std::str::FromStr;
use serde::Serialize;

/// Outcome of a visit at an address.
///
/// The declaration order is the order of the dropdown and of the summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[default]
    #[serde(rename = "Nicht angetroffen")]
    NotEncountered,
    #[serde(rename = "Kein Interesse")]
    NoInterest,
    #[serde(rename = "Abgeschlossen")]
    Completed,
    #[serde(rename = "Bestandskunde")]
    ExistingCustomer,
    #[serde(rename = "Termin")]
    Appointment,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::NotEncountered,
        Status::NoInterest,
        Status::Completed,
        Status::ExistingCustomer,
        Status::Appointment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Status::NotEncountered => "Nicht angetroffen",
            Status::NoInterest => "Kein Interesse",
            Status::Completed => "Abgeschlossen",
            Status::ExistingCustomer => "Bestandskunde",
            Status::Appointment => "Termin",
        }
    }

    /// marker fill color on the map
    pub fn color(&self) -> &'static str {
        match self {
            Status::NotEncountered => "#e5e7eb",
            Status::NoInterest => "#fbbf24",
            Status::Completed => "#22c55e",
            Status::ExistingCustomer => "#3b82f6",
            Status::Appointment => "#0ea5e9",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Accepts a label (case-insensitive) or the 1-based position in [`Status::ALL`].
impl FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(pos) = value.parse::<usize>() {
            return pos.checked_sub(1)
                .and_then(|idx| Status::ALL.get(idx).copied())
                .ok_or_else(|| value.to_string());
        }
        Status::ALL.iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
            .copied()
            .ok_or_else(|| value.to_string())
    }
}
