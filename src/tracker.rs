use log::info;
use crate::address::{AddressRecord, Coordinates};
use crate::csv_import::parse_addresses;
use crate::geocode::{Geocoder, GeocodingPipeline};
use crate::status::Status;

/// map center used when no address has coordinates (center of Germany)
pub const DEFAULT_CENTER: Coordinates = Coordinates { lat: 51.1657, lng: 10.4515 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// index of the record in the table
    pub row: usize,
    pub position: Coordinates,
    pub color: &'static str,
    pub popup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub resolved: usize,
    pub unmatched: usize,
    pub failed: usize,
}

/// Owns the current address collection.
#[derive(Debug, Default)]
pub struct Tracker {
    records: Vec<AddressRecord>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    /// Parse and geocode an upload, then replace the whole collection with it.
    ///
    /// The current collection stays untouched until geocoding has finished,
    /// and is kept as is when the pipeline refuses the run.
    pub async fn import<G: Geocoder>(
        &mut self,
        text: &str,
        pipeline: &GeocodingPipeline<G>,
    ) -> color_eyre::Result<ImportSummary> {
        let parsed = parse_addresses(text);
        info!("parsed [{}] addresses, begin to geocode...", parsed.len());

        let report = pipeline.resolve(parsed).await?;
        let summary = ImportSummary {
            total: report.records.len(),
            resolved: report.resolved(),
            unmatched: report.unmatched(),
            failed: report.failed(),
        };
        self.replace(report.records);
        Ok(summary)
    }

    pub fn replace(&mut self, records: Vec<AddressRecord>) {
        self.records = records;
    }

    /// Returns `false` and changes nothing when `index` is out of range.
    pub fn set_status(&mut self, index: usize, status: Status) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    /// Returns `false` and changes nothing when `index` is out of range.
    pub fn set_note(&mut self, index: usize, note: impl Into<String>) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.note = note.into();
                true
            }
            None => false,
        }
    }

    /// Count of records per status, one entry per status in declared order.
    pub fn summarize(&self) -> Vec<StatusCount> {
        Status::ALL.iter()
            .map(|&status| StatusCount {
                status,
                count: self.records.iter().filter(|record| record.status == status).count(),
            })
            .collect()
    }

    /// one marker per record with coordinates
    pub fn markers(&self) -> Vec<Marker> {
        self.records.iter()
            .enumerate()
            .filter_map(|(row, record)| {
                record.coordinates.map(|position| Marker {
                    row,
                    position,
                    color: record.status.color(),
                    popup: record.popup(),
                })
            })
            .collect()
    }

    pub fn map_center(&self) -> Coordinates {
        self.records.iter()
            .find_map(|record| record.coordinates)
            .unwrap_or(DEFAULT_CENTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::tests::ScriptedGeocoder;

    fn tracker() -> Tracker {
        let mut located = AddressRecord::new("10115", "Berlin", "Invalidenstraße", "117");
        located.coordinates = Some(Coordinates { lat: 52.53, lng: 13.37 });
        let mut tracker = Tracker::new();
        tracker.replace(vec![
            located,
            AddressRecord::new("20095", "Hamburg", "Nirgendweg", "1"),
            AddressRecord::new("80331", "München", "Marienplatz", "8"),
        ]);
        tracker
    }

    fn statuses(tracker: &Tracker) -> Vec<Status> {
        tracker.records().iter().map(|record| record.status).collect()
    }

    #[test]
    fn summary_has_every_status_in_order() {
        let summary = Tracker::new().summarize();
        assert_eq!(summary.iter().map(|entry| entry.status).collect::<Vec<_>>(), Status::ALL);
        assert!(summary.iter().all(|entry| entry.count == 0));

        let tracker = tracker();
        let summary = tracker.summarize();
        assert_eq!(summary.len(), Status::ALL.len());
        assert_eq!(summary[0], StatusCount { status: Status::NotEncountered, count: 3 });
        assert_eq!(summary.iter().map(|entry| entry.count).sum::<usize>(), tracker.records().len());
    }

    #[test]
    fn set_status_changes_only_that_row() {
        let mut tracker = tracker();
        assert!(tracker.set_status(1, Status::Completed));

        assert_eq!(statuses(&tracker), vec![Status::NotEncountered, Status::Completed, Status::NotEncountered]);
        let summary = tracker.summarize();
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[2], StatusCount { status: Status::Completed, count: 1 });
    }

    #[test]
    fn set_note_leaves_status_and_coordinates() {
        let mut tracker = tracker();
        tracker.set_status(0, Status::Appointment);
        let before = tracker.records().to_vec();

        assert!(tracker.set_note(0, "Termin Donnerstag 18 Uhr"));

        let after = tracker.records();
        assert_eq!(after[0].note, "Termin Donnerstag 18 Uhr");
        assert_eq!(after[0].status, before[0].status);
        assert_eq!(after[0].coordinates, before[0].coordinates);
        assert_eq!(&after[1..], &before[1..]);
    }

    #[test]
    fn out_of_range_edits_are_ignored() {
        let mut tracker = tracker();
        let before = tracker.records().to_vec();
        assert!(!tracker.set_status(3, Status::NoInterest));
        assert!(!tracker.set_note(99, "x"));
        assert_eq!(tracker.records(), before.as_slice());
    }

    #[test]
    fn unresolved_records_have_no_marker() {
        let mut tracker = tracker();
        tracker.set_status(0, Status::Completed);

        let markers = tracker.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].row, 0);
        assert_eq!(markers[0].color, Status::Completed.color());
        assert!(markers[0].popup.starts_with("Invalidenstraße 117, 10115 Berlin"));
        assert_eq!(tracker.records().len(), 3);
    }

    #[test]
    fn map_center_falls_back_without_markers() {
        assert_eq!(Tracker::new().map_center(), DEFAULT_CENTER);
        assert_eq!(tracker().map_center(), Coordinates { lat: 52.53, lng: 13.37 });
    }

    #[tokio::test]
    async fn import_replaces_collection() {
        let pipeline = GeocodingPipeline::new(
            ScriptedGeocoder::default()
                .answer("Domkloster", Some((50.94, 6.96)))
                .fail("Theaterplatz", "connection reset"),
            "Deutschland",
        );
        let mut tracker = tracker();
        tracker.set_status(0, Status::Completed);

        let text = "PLZ,Ort,Straße,Hausnummer\n50667,Köln,Domkloster,4\n01067,Dresden,Theaterplatz,2\n04109,Leipzig,Markt,1\n";
        let summary = tracker.import(text, &pipeline).await.unwrap();

        assert_eq!(summary, ImportSummary { total: 3, resolved: 1, unmatched: 1, failed: 1 });
        assert_eq!(tracker.records().len(), 3);
        assert_eq!(tracker.records()[0].city, "Köln");
        assert_eq!(tracker.summarize()[0].count, 3);
        assert_eq!(tracker.markers().len(), 1);
    }
}
