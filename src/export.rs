use crate::models::Arrival;
use chrono::SecondsFormat;
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const EXPORT_LIMIT: usize = 2000;
pub const CSV_HEADER: &str = "id,timestamp,note,source";

/// Renders arrivals as CSV. The header is written bare; every row field is
/// quoted with embedded quotes doubled. Lines are joined with `\n`, so there
/// is no trailing newline.
pub fn to_csv(arrivals: &[Arrival]) -> Result<String, csv::Error> {
    let mut buffer = Vec::with_capacity(64 * (arrivals.len() + 1));
    buffer.extend_from_slice(CSV_HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    for arrival in arrivals {
        let id = arrival.id.to_string();
        let timestamp = arrival
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        writer.write_record([
            id.as_str(),
            timestamp.as_str(),
            arrival.note.as_deref().unwrap_or_default(),
            arrival.source.as_deref().unwrap_or_default(),
        ])?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn arrival(note: Option<&str>, source: Option<&str>) -> Arrival {
        Arrival {
            id: Uuid::nil(),
            timestamp: "2025-01-01T10:00:00Z".parse().unwrap(),
            note: note.map(str::to_string),
            source: source.map(str::to_string),
            arrival_time: Some(10),
            time_tag: None,
            day_of_week: None,
        }
    }

    #[test]
    fn one_line_per_record_plus_header() {
        let csv = to_csv(&[arrival(Some("x"), None), arrival(None, Some("manual"))]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            r#""00000000-0000-0000-0000-000000000000","2025-01-01T10:00:00.000Z","x","""#
        );
        assert_eq!(
            lines[2],
            r#""00000000-0000-0000-0000-000000000000","2025-01-01T10:00:00.000Z","","manual""#
        );
    }

    #[test]
    fn empty_export_is_just_the_header() {
        assert_eq!(to_csv(&[]).unwrap(), CSV_HEADER);
    }

    #[test]
    fn no_trailing_newline() {
        let records = [arrival(None, None), arrival(Some("a"), None), arrival(None, None)];
        let csv = to_csv(&records).unwrap();
        assert!(!csv.ends_with('\n'));
        assert_eq!(csv.split('\n').count(), records.len() + 1);
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = to_csv(&[arrival(Some(r#"said "hi", left"#), None)]).unwrap();
        assert!(csv.contains(r#""said ""hi"", left""#));
    }
}
