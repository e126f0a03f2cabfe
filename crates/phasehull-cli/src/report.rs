use crate::error::Result;
use phasehull::engine::diagram::EntryStability;
use phasehull::workflows::stability::StabilityReport;
use serde::Serialize;
use std::io;
use std::path::Path;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    formation_energy: String,
    energy_above_hull: String,
    is_stable: bool,
}

/// Fixed-precision rendering; unavailable values print as an empty string.
fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => String::new(),
    }
}

fn selected_rows(report: &StabilityReport, stable_only: bool) -> Vec<&EntryStability> {
    report
        .rows
        .iter()
        .filter(|row| !stable_only || row.is_stable)
        .collect()
}

pub fn write_table<W: io::Write>(
    mut writer: W,
    report: &StabilityReport,
    precision: usize,
    stable_only: bool,
) -> Result<()> {
    let rows = selected_rows(report, stable_only);
    let id_width = rows
        .iter()
        .map(|row| row.id.chars().count())
        .chain(std::iter::once(2))
        .max()
        .unwrap_or(2);
    let value_width = (precision + 8).max(10);

    writeln!(writer, "System: {}", report.elements.join("-"))?;
    writeln!(
        writer,
        "{:<id_width$}  {:>value_width$}  {:>value_width$}  {}",
        "id", "E_form", "E_hull", "stable"
    )?;
    for row in rows {
        let formation = format_optional(row.formation_energy, precision);
        let above = format_optional(row.energy_above_hull, precision);
        writeln!(
            writer,
            "{:<id_width$}  {:>value_width$}  {:>value_width$}  {}",
            row.id,
            if formation.is_empty() { "n/a" } else { formation.as_str() },
            if above.is_empty() { "n/a" } else { above.as_str() },
            if row.is_stable { "yes" } else { "no" }
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv<W: io::Write>(
    writer: W,
    report: &StabilityReport,
    precision: usize,
    stable_only: bool,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in selected_rows(report, stable_only) {
        csv_writer.serialize(CsvRow {
            id: &row.id,
            formation_energy: format_optional(row.formation_energy, precision),
            energy_above_hull: format_optional(row.energy_above_hull, precision),
            is_stable: row.is_stable,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(
    path: &Path,
    report: &StabilityReport,
    precision: usize,
    stable_only: bool,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(io::BufWriter::new(file), report, precision, stable_only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn sample_report() -> StabilityReport {
        StabilityReport {
            elements: vec!["Al".into(), "Ni".into()],
            rows: vec![
                EntryStability {
                    id: "AlNi".into(),
                    formation_energy: Some(-0.6),
                    energy_above_hull: Some(0.0),
                    is_stable: true,
                },
                EntryStability {
                    id: "Al3Ni".into(),
                    formation_energy: Some(-0.25),
                    energy_above_hull: Some(0.05),
                    is_stable: false,
                },
                EntryStability {
                    id: "#2".into(),
                    formation_energy: None,
                    energy_above_hull: None,
                    is_stable: false,
                },
            ],
            stable_references: vec!["AlNi".into()],
        }
    }

    #[test]
    fn csv_has_header_and_formatted_rows() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_report(), 3, false).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "id,formation_energy,energy_above_hull,is_stable",
                "AlNi,-0.600,0.000,true",
                "Al3Ni,-0.250,0.050,false",
                "#2,,,false",
            ]
        );
    }

    #[test]
    fn stable_only_filters_rows() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_report(), 2, true).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("AlNi,-0.60,0.00,true"));
    }

    #[test]
    fn table_marks_unavailable_values() {
        let mut buffer = Vec::new();
        write_table(&mut buffer, &sample_report(), 4, false).unwrap();
        let table = String::from_utf8(buffer).unwrap();
        assert!(table.starts_with("System: Al-Ni\n"));
        assert!(table.contains("0.0500"));
        let last = table.lines().last().unwrap();
        assert!(last.starts_with("#2"));
        assert!(last.contains("n/a"));
        assert!(last.ends_with("no"));
    }

    #[test]
    fn table_write_failure_is_reported() {
        struct Closed;

        impl io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let result = write_table(Closed, &sample_report(), 4, false);
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn csv_file_is_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv_file(&path, &sample_report(), 4, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,formation_energy,energy_above_hull,is_stable\n"));
        assert!(text.contains("Al3Ni,-0.2500,0.0500,false"));
    }
}
