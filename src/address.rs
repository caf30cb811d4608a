use crate::status::Status;

/// A resolved position. Latitude and longitude are always set together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One imported row plus its tracking fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddressRecord {
    pub postal_code: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
    pub status: Status,
    pub note: String,
    pub coordinates: Option<Coordinates>,
}

impl AddressRecord {
    pub fn new(
        postal_code: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
        house_number: impl Into<String>,
    ) -> Self {
        Self {
            postal_code: postal_code.into(),
            city: city.into(),
            street: street.into(),
            house_number: house_number.into(),
            ..Default::default()
        }
    }

    /// free-text lookup query, i.e. `Hauptstraße 5, 10115 Berlin, Deutschland`
    pub fn lookup_query(&self, country: &str) -> String {
        format!("{}, {}", self.formatted(), country)
    }

    /// `street number, postal code city`
    pub fn formatted(&self) -> String {
        format!("{} {}, {} {}", self.street, self.house_number, self.postal_code, self.city)
    }

    /// text shown in the marker popup
    pub fn popup(&self) -> String {
        let note = if self.note.is_empty() { "—" } else { self.note.as_str() };
        format!("{}\nStatus: {}\nNotiz: {}", self.formatted(), self.status, note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_orders_street_before_postal_code() {
        let record = AddressRecord::new("10115", "Berlin", "Invalidenstraße", "117");
        assert_eq!(record.lookup_query("Deutschland"), "Invalidenstraße 117, 10115 Berlin, Deutschland");
    }

    #[test]
    fn popup_uses_dash_for_empty_note() {
        let mut record = AddressRecord::new("80331", "München", "Marienplatz", "8");
        assert_eq!(record.popup(), "Marienplatz 8, 80331 München\nStatus: Nicht angetroffen\nNotiz: —");

        record.note = "kommt Dienstag wieder".to_string();
        record.status = Status::Appointment;
        assert!(record.popup().ends_with("Status: Termin\nNotiz: kommt Dienstag wieder"));
    }
}
