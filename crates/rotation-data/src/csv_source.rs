//! CSV history source.
//!
//! One file per instrument, named `{instrument}.csv`, with a header row of
//! `Date,Open,High,Low,Close[,Volume]`. Everything is loaded into memory up
//! front and served as point-in-time windows.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use csv::ReaderBuilder;
use rotation_core::error::DataError;
use rotation_core::traits::DataSource;
use rotation_core::types::{Instrument, PriceBar, Resolution};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: String,
    #[serde(alias = "High", alias = "high")]
    high: String,
    #[serde(alias = "Low", alias = "low")]
    low: String,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: String,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<String>,
}

/// In-memory history loaded from CSV files.
///
/// Date-only rows are stamped at `session_close` on their date, so a cycle
/// earlier that day never sees the day's own bar.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    bars: BTreeMap<Instrument, Vec<PriceBar>>,
    session_close: NaiveTime,
}

impl Default for CsvDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvDataSource {
    /// Create an empty source with a 16:00 session close.
    pub fn new() -> Self {
        Self {
            bars: BTreeMap::new(),
            session_close: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    /// Set the time date-only rows are stamped at.
    pub fn with_session_close(mut self, session_close: NaiveTime) -> Self {
        self.session_close = session_close;
        self
    }

    /// Load `{instrument}.csv` from `dir` for each instrument.
    ///
    /// A missing file is logged and skipped; fetching that instrument later
    /// fails with `UnknownInstrument`.
    pub fn load_dir(
        mut self,
        dir: impl AsRef<Path>,
        instruments: &[Instrument],
    ) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        for instrument in instruments {
            let path = dir.join(format!("{}.csv", instrument));
            if !path.exists() {
                warn!(%instrument, path = %path.display(), "No history file");
                continue;
            }
            let count = self.load_file(instrument.clone(), &path)?;
            info!(%instrument, bars = count, "Loaded history");
        }
        Ok(self)
    }

    /// Load one file for `instrument`. Returns the number of bars read.
    pub fn load_file(
        &mut self,
        instrument: Instrument,
        path: impl AsRef<Path>,
    ) -> Result<usize, DataError> {
        let file = std::fs::File::open(path)?;
        let bars = self.parse(file)?;
        let count = bars.len();
        self.insert(instrument, bars);
        Ok(count)
    }

    /// Parse CSV rows from any reader, sorted by timestamp.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Vec<PriceBar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

            let bar = PriceBar::new(
                self.parse_timestamp(&record.date)?,
                parse_decimal(&record.open)?,
                parse_decimal(&record.high)?,
                parse_decimal(&record.low)?,
                parse_decimal(&record.close)?,
            );
            let bar = match record.volume.as_deref().filter(|v| !v.is_empty()) {
                Some(volume) => bar.with_volume(parse_decimal(volume)?),
                None => bar,
            };
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    /// Add bars for an instrument, replacing any it had.
    pub fn insert(&mut self, instrument: Instrument, mut bars: Vec<PriceBar>) {
        bars.sort_by_key(|b| b.timestamp);
        self.bars.insert(instrument, bars);
    }

    /// Instruments with history, sorted.
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.bars.keys()
    }

    /// All bars of an instrument.
    pub fn bars(&self, instrument: &Instrument) -> Option<&[PriceBar]> {
        self.bars.get(instrument).map(Vec::as_slice)
    }

    /// Every date on which at least one instrument has a bar, ascending.
    pub fn trading_days(&self) -> Vec<NaiveDate> {
        let days: BTreeSet<NaiveDate> = self
            .bars
            .values()
            .flatten()
            .map(|b| b.timestamp.date_naive())
            .collect();
        days.into_iter().collect()
    }

    /// The bar of an instrument on `date`, if it traded.
    pub fn bar_on(&self, instrument: &Instrument, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .get(instrument)?
            .iter()
            .find(|b| b.timestamp.date_naive() == date)
    }

    /// Parse various timestamp formats.
    fn parse_timestamp(&self, date_str: &str) -> Result<DateTime<Utc>, DataError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
            return Ok(dt.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
                return Ok(dt.and_utc());
            }
        }

        for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"] {
            if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
                return Ok(d.and_time(self.session_close).and_utc());
            }
        }

        Err(DataError::ParseError(format!(
            "Could not parse date: {}",
            date_str
        )))
    }
}

fn parse_decimal(value: &str) -> Result<Decimal, DataError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| DataError::ParseError(format!("{}: {}", value, e)))
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn fetch_history(
        &self,
        instrument: &Instrument,
        as_of: DateTime<Utc>,
        span: Duration,
        resolution: Resolution,
    ) -> Result<Vec<PriceBar>, DataError> {
        if resolution.is_intraday() {
            return Err(DataError::UnsupportedResolution(resolution));
        }
        let bars = self
            .bars
            .get(instrument)
            .ok_or_else(|| DataError::UnknownInstrument(instrument.clone()))?;
        let start = as_of - span;

        Ok(bars
            .iter()
            .filter(|b| b.timestamp > start && b.timestamp <= as_of)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "CSV"
    }
}
