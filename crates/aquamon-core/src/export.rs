//! Measurement history export.
//!
//! Produces a comma-delimited text file: one header row, one row per
//! measurement. Every cell is JSON-stringified before joining, so
//! embedded commas and quotes are escaped by JSON quoting rather than
//! CSV quoting. The column set is the fixed columns plus one column
//! per custom field of the FIRST measurement; rows lacking a column
//! leave the cell empty. Neither quirk is accidental — both match the
//! established file format consumers already parse.

use chrono::{SecondsFormat, Utc};

use crate::models::{CustomField, Measurement, Well};

/// Fixed columns present in every export, in order.
const FIXED_HEADERS: [&str; 6] = [
    "Timestamp",
    "Water Level (m)",
    "Pressure (PSI)",
    "Flow Rate (m³/h)",
    "Observations",
    "Measured By",
];

/// A rendered export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

/// Column header for a custom field: name plus unit in parentheses.
fn custom_header(field: &CustomField) -> String {
    format!("{} ({})", field.name, field.unit)
}

/// A custom field's cell: the value rendered to text, then
/// JSON-quoted like every other cell.
fn custom_cell(field: &CustomField) -> String {
    let text = match &field.value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    serde_json::Value::String(text).to_string()
}

fn json_cell(value: serde_json::Value) -> String {
    value.to_string()
}

/// Flatten a well's measurement history into delimited text.
///
/// The filename combines the well's name with the current timestamp.
pub fn export_well_history(well: &Well, measurements: &[Measurement]) -> ExportFile {
    let mut headers: Vec<String> = FIXED_HEADERS.iter().map(|h| h.to_string()).collect();
    if let Some(first) = measurements.first() {
        for field in &first.custom_fields {
            let header = custom_header(field);
            // Duplicate name+unit pairs collapse into one column.
            if !headers.contains(&header) {
                headers.push(header);
            }
        }
    }

    let mut lines = Vec::with_capacity(measurements.len() + 1);
    lines.push(headers.join(","));

    for m in measurements {
        let mut cells: Vec<String> = vec![
            json_cell(m.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true).into()),
            json_cell(m.water_level.into()),
            json_cell(m.pressure.into()),
            json_cell(m.flow_rate.into()),
            json_cell(m.observations.clone().into()),
            json_cell(m.measured_by.clone().into()),
        ];

        for header in headers.iter().skip(FIXED_HEADERS.len()) {
            let cell = m
                .custom_fields
                .iter()
                .find(|f| &custom_header(f) == header)
                .map(custom_cell)
                .unwrap_or_default();
            cells.push(cell);
        }

        lines.push(cells.join(","));
    }

    ExportFile {
        filename: format!(
            "well-{}-{}.csv",
            well.name,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        contents: lines.join("\n"),
    }
}

impl ExportFile {
    /// Write the export into the given directory.
    pub fn write_to(&self, dir: &std::path::Path) -> std::io::Result<std::path::PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentReading, WellStatus};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn well() -> Well {
        Well {
            id: Uuid::new_v4(),
            name: "W-7".into(),
            pole_id: Uuid::new_v4(),
            status: WellStatus::Active,
            reading: CurrentReading {
                water_level: 0.0,
                pressure: 0.0,
                flow_rate: 0.0,
                observations: String::new(),
                last_measurement_at: Utc::now(),
            },
            created_by: "alice".into(),
            updated_by: "alice".into(),
            is_password_protected: false,
            protecting_secret: None,
            protected_at: None,
            protected_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn measurement(water_level: f64, custom_fields: Vec<CustomField>) -> Measurement {
        Measurement {
            id: Uuid::new_v4(),
            well_id: Uuid::new_v4(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            water_level,
            pressure: 2.5,
            flow_rate: 1.25,
            observations: "ok".into(),
            measured_by: "bob".into(),
            custom_fields,
        }
    }

    #[test]
    fn custom_field_column_is_sparse() {
        let ph = CustomField {
            name: "pH".into(),
            value: serde_json::json!(7),
            unit: String::new(),
        };
        let m1 = measurement(5.0, vec![ph]);
        let m2 = measurement(6.0, vec![]);

        let file = export_well_history(&well(), &[m1, m2]);
        let lines: Vec<&str> = file.contents.lines().collect();
        assert_eq!(lines.len(), 3);

        assert!(lines[0].ends_with(",pH ()"), "header: {}", lines[0]);
        // First row carries the value; second leaves the cell empty.
        assert!(lines[1].ends_with(",\"7\""), "row 1: {}", lines[1]);
        assert!(lines[2].ends_with(","), "row 2: {}", lines[2]);
    }

    #[test]
    fn cells_are_json_quoted() {
        let m = measurement(
            5.0,
            vec![CustomField {
                name: "turbidity".into(),
                value: serde_json::json!("low, stable"),
                unit: "NTU".into(),
            }],
        );
        let file = export_well_history(&well(), &[m]);
        let row = file.contents.lines().nth(1).unwrap();

        // Embedded comma survives inside JSON quotes.
        assert!(row.contains("\"low, stable\""));
        assert!(row.contains("\"ok\""));
        assert!(row.contains("\"bob\""));
    }

    #[test]
    fn empty_history_yields_header_only() {
        let file = export_well_history(&well(), &[]);
        assert_eq!(file.contents.lines().count(), 1);
        assert!(file.contents.starts_with("Timestamp,"));
        assert!(file.filename.starts_with("well-W-7-"));
        assert!(file.filename.ends_with(".csv"));
    }

    #[test]
    fn duplicate_custom_field_names_collapse_into_one_column() {
        let ph = |v: i64| CustomField {
            name: "pH".into(),
            value: serde_json::json!(v),
            unit: String::new(),
        };
        let m = measurement(5.0, vec![ph(7), ph(8)]);

        let file = export_well_history(&well(), &[m]);
        let lines: Vec<&str> = file.contents.lines().collect();

        assert_eq!(lines[0].matches("pH ()").count(), 1);
        // The first occurrence supplies the cell.
        assert!(lines[1].ends_with(",\"7\""), "row: {}", lines[1]);
    }

    #[test]
    fn numeric_cells_render_unquoted() {
        let m = measurement(5.5, vec![]);
        let file = export_well_history(&well(), &[m]);
        let row = file.contents.lines().nth(1).unwrap();
        assert!(row.contains(",5.5,"));
        assert!(row.contains(",2.5,"));
    }
}
