use crate::data::bar::Bar;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

//row layout of a coinmarketcap daily export
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "timeOpen")]
    time_open: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

//loads daily bars from a csv file, sorted oldest first
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        //parse timestamp
        let date = DateTime::parse_from_rfc3339(record.time_open.trim_matches('"'))
            .context(format!(
                "Failed to parse timestamp '{}' at line {}",
                record.time_open,
                index + 2
            ))?
            .with_timezone(&Utc);

        //create bar with validation
        let bar = Bar::new(
            date,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        )
        .context(format!("Invalid bar at line {}", index + 2))?;

        bars.push(bar);
    }

    //sort by date to ensure chronological order
    bars.sort_by(|a, b| a.date.cmp(&b.date));

    //reject duplicate dates, the engine requires strictly increasing days
    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            anyhow::bail!("Duplicate bar date: {}", pair[0].date);
        }
    }

    Ok(bars)
}
