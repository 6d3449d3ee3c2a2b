use crate::data::sample::{EquitySample, EquitySeries};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

//extra columns (drawdown, returns, ...) are ignored
#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    equity: f64,
}

//loads an equity curve from a csv file with `timestamp,equity` columns
pub fn load_equity_csv<P: AsRef<Path>>(path: P) -> Result<EquitySeries> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    read_equity_csv(reader).context(format!("Failed to load equity curve from {:?}", path))
}

//parses equity rows from any csv reader and sorts them by timestamp
pub fn read_equity_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<EquitySeries> {
    let mut samples = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        //parse timestamp, normalising any offset to utc
        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .context(format!(
                "Failed to parse timestamp '{}' at line {}",
                record.timestamp,
                index + 2
            ))?
            .with_timezone(&Utc);

        let sample = EquitySample::new(timestamp, record.equity)
            .context(format!("Invalid equity at line {}", index + 2))?;

        samples.push(sample);
    }

    //stable sort keeps duplicate timestamps in file order
    samples.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    debug!(samples = samples.len(), "loaded equity curve");

    Ok(EquitySeries::new(samples))
}

//anything that can hand over an equity curve
pub trait EquitySource {
    //short label used in logs and errors
    fn name(&self) -> &str;

    fn equity_series(&self) -> Result<EquitySeries>;
}

impl EquitySource for EquitySeries {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn equity_series(&self) -> Result<EquitySeries> {
        Ok(self.clone())
    }
}

//equity curve backed by a csv file on disk
#[derive(Debug, Clone)]
pub struct CsvEquitySource {
    path: PathBuf,
    label: String,
}

impl CsvEquitySource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        CsvEquitySource { path, label }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EquitySource for CsvEquitySource {
    fn name(&self) -> &str {
        &self.label
    }

    fn equity_series(&self) -> Result<EquitySeries> {
        load_equity_csv(&self.path)
    }
}
