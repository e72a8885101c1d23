use crate::error::LoadError;
use crate::types::{ImportRecord, RawRow};
use crate::util::{clean_text, parse_units_safe, parse_year_month};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    /// Missing brand/model, or a unit count that is zero or unparseable.
    pub invalid_rows: usize,
    /// Rows whose date could not be turned into a year and month.
    pub undated_rows: usize,
    /// Rows the CSV reader could not deserialize at all.
    pub parse_errors: usize,
}

pub fn load_records(path: &str) -> Result<(Vec<ImportRecord>, LoadReport), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    info!(path, "loading import records");
    load_from_reader(file, path)
}

/// Read and validate records from any CSV source. `source` only labels
/// log lines and errors.
pub fn load_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<(Vec<ImportRecord>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Surface an unreadable header as a hard error instead of N row errors.
    rdr.headers().map_err(|source_err| LoadError::Csv {
        path: source.to_string(),
        source: source_err,
    })?;

    let mut report = LoadReport::default();
    let mut records: Vec<ImportRecord> = Vec::new();

    for (index, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = index + 1, error = %e, "skipping undecodable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let brand = clean_text(row.brand.as_deref());
        let model = clean_text(row.model.as_deref());
        let units = parse_units_safe(row.units.as_deref()).filter(|u| *u > 0);
        let (Some(brand), Some(model), Some(units)) = (brand, model, units) else {
            report.invalid_rows += 1;
            continue;
        };

        let Some((year, month)) = parse_year_month(row.date.as_deref()) else {
            debug!(row = index + 1, date = ?row.date, "skipping row without a usable date");
            report.undated_rows += 1;
            continue;
        };

        records.push(ImportRecord {
            id: (index + 1).to_string(),
            date: row.date.unwrap_or_default().trim().to_string(),
            brand,
            model,
            vehicle_type: clean_text(row.vehicle_type.as_deref())
                .unwrap_or_else(|| "Unspecified".to_string()),
            units,
            year,
            month,
        });
    }

    report.valid_rows = records.len();
    if records.is_empty() {
        return Err(LoadError::NoValidRows {
            path: source.to_string(),
        });
    }

    let skipped = report.total_rows - report.valid_rows;
    if skipped > 0 {
        warn!(skipped, source, "some rows were skipped during load");
    }
    info!(rows = report.valid_rows, source, "records loaded");
    Ok((records, report))
}
