use csv::{ReaderBuilder, StringRecord, Trim};
use log::{error, warn};
use crate::address::AddressRecord;

const COLUMNS: usize = 4;

/// Parse an uploaded CSV into address records.
///
/// Columns are positional: postal code, city, street, house number. The first
/// non-blank line is a header and is never looked at. Quoting is not supported,
/// so a comma inside a field shifts the remaining columns. Short rows are kept
/// with the missing fields left empty.
pub fn parse_addresses(text: &str) -> Vec<AddressRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    reader.records()
        .filter_map(|row| match row {
            Ok(row) => Some(row),
            Err(e) => {
                error!("cannot read csv row: {:?}", e);
                None
            }
        })
        .filter(|row| !is_blank(row))
        // header
        .skip(1)
        .enumerate()
        .map(|(idx, row)| to_address(idx, &row))
        .collect()
}

/// a whitespace-only line trims down to a single empty field
fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row[0].is_empty()
}

fn to_address(idx: usize, row: &StringRecord) -> AddressRecord {
    if row.len() < COLUMNS {
        warn!("csv row [{}] has {} of {} columns, keeping it partially filled", idx + 1, row.len(), COLUMNS);
    }
    let field = |pos: usize| row.get(pos).unwrap_or_default();
    AddressRecord::new(field(0), field(1), field(2), field(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn single_row_maps_positionally() {
        let records = parse_addresses("h1,h2,h3,h4\nA,B,C,D");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.postal_code, "A");
        assert_eq!(record.city, "B");
        assert_eq!(record.street, "C");
        assert_eq!(record.house_number, "D");
        assert_eq!(record.status, Status::default());
        assert_eq!(record.note, "");
        assert_eq!(record.coordinates, None);
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse_addresses("PLZ,Ort,Straße,Hausnummer").is_empty());
        assert!(parse_addresses("PLZ,Ort,Straße,Hausnummer\n").is_empty());
        assert!(parse_addresses("").is_empty());
    }

    #[test]
    fn fields_are_trimmed_and_crlf_accepted() {
        let records = parse_addresses("PLZ,Ort,Straße,Hausnummer\r\n 10115 , Berlin ,Invalidenstraße, 117 \r\n");
        assert_eq!(records, vec![AddressRecord::new("10115", "Berlin", "Invalidenstraße", "117")]);
    }

    #[test]
    fn short_rows_are_kept_partially() {
        let records = parse_addresses("PLZ,Ort,Straße,Hausnummer\n20095,Hamburg");
        assert_eq!(records, vec![AddressRecord::new("20095", "Hamburg", "", "")]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "PLZ,Ort,Straße,Hausnummer\n\n50667,Köln,Domkloster,4\n   \n01067,Dresden,Theaterplatz,2\n";
        let records = parse_addresses(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].city, "Dresden");
    }

    #[test]
    fn row_of_empty_fields_is_kept() {
        let records = parse_addresses("h1,h2,h3,h4\n,,,\nA,B,C,D");
        assert_eq!(records, vec![
            AddressRecord::new("", "", "", ""),
            AddressRecord::new("A", "B", "C", "D"),
        ]);
    }

    #[test]
    fn leading_whitespace_line_does_not_become_header() {
        let records = parse_addresses("   \nh1,h2,h3,h4\nA,B,C,D");
        assert_eq!(records, vec![AddressRecord::new("A", "B", "C", "D")]);
    }

    #[test]
    fn embedded_comma_shifts_columns() {
        let records = parse_addresses("PLZ,Ort,Straße,Hausnummer\n\"60311\",\"Frankfurt, Main\",Römerberg,1");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].postal_code, "\"60311\"");
        assert_eq!(records[0].city, "\"Frankfurt");
        assert_eq!(records[0].street, "Main\"");
        assert_eq!(records[0].house_number, "Römerberg");
    }
}
