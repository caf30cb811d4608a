use std::path::Path;
use serde::Serialize;
use crate::address::AddressRecord;
use crate::status::Status;

/// One line of the exported snapshot
#[derive(Debug, Serialize)]
struct Row<'a> {
    #[serde(rename = "PLZ")]
    postal_code: &'a str,
    #[serde(rename = "Ort")]
    city: &'a str,
    #[serde(rename = "Straße")]
    street: &'a str,
    #[serde(rename = "Hausnummer")]
    house_number: &'a str,
    #[serde(rename = "Status")]
    status: Status,
    #[serde(rename = "Notiz")]
    note: &'a str,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl<'a> From<&'a AddressRecord> for Row<'a> {
    fn from(record: &'a AddressRecord) -> Self {
        Self {
            postal_code: &record.postal_code,
            city: &record.city,
            street: &record.street,
            house_number: &record.house_number,
            status: record.status,
            note: &record.note,
            lat: record.coordinates.map(|c| c.lat),
            lng: record.coordinates.map(|c| c.lng),
        }
    }
}

/// write the current table to a CSV file, in table order
pub fn save_records(records: &[AddressRecord], save_path: impl AsRef<Path>) -> color_eyre::Result<()> {
    if let Some(parent) = save_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(save_path)?;
    for record in records {
        wtr.serialize(Row::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}
