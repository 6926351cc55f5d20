//! Startup loading of the observation and station datasets.
//!
//! Both datasets are read once from CSV files in the configured data
//! directory and held in memory for the process lifetime. Nothing mutates
//! them after load.

use csv::ReaderBuilder;
use log::info;
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration};

/// Date format used by the dataset files and the API surface
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Length of the trailing window behind the reference date for "recent" queries
pub const RECENT_WINDOW_DAYS: i64 = 365;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to open dataset file {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("failed to parse dataset csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid date {0:?}: {1}")]
    Date(String, #[source] time::error::Parse),
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    Date::parse(raw, DATE_FORMAT).map_err(|e| Error::Date(raw.to_owned(), e))
}

/// A single precipitation/temperature reading at a station on a date.
/// Either measurement may be absent; duplicates pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station_id: String,
    pub date: Date,
    pub precipitation: Option<f64>,
    pub temperature: Option<f64>,
}

/// A named weather-data collection point
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub name: String,
}

/// Raw CSV row; the date is parsed into `time::Date` before the row is
/// admitted to the store, so all later filtering compares parsed dates
/// rather than strings.
#[derive(Debug, Deserialize)]
struct ObservationRow {
    station_id: String,
    date: String,
    precipitation: Option<f64>,
    temperature: Option<f64>,
}

impl TryFrom<ObservationRow> for Observation {
    type Error = Error;

    fn try_from(row: ObservationRow) -> Result<Self, Self::Error> {
        Ok(Observation {
            station_id: row.station_id,
            date: parse_date(&row.date)?,
            precipitation: row.precipitation,
            temperature: row.temperature,
        })
    }
}

/// The immutable dataset: every observation and station record, plus the
/// reference date anchoring the trailing recent window.
pub struct ClimateStore {
    observations: Vec<Observation>,
    stations: Vec<Station>,
    reference_date: Option<Date>,
}

impl ClimateStore {
    /// Load `observations.csv` and `stations.csv` from the data directory.
    /// Any unreadable file, malformed row, or unparseable date is fatal.
    pub fn load(data_dir: &str, as_of: Option<Date>) -> Result<Self, Error> {
        let observations_path = Path::new(data_dir).join("observations.csv");
        let stations_path = Path::new(data_dir).join("stations.csv");

        let observations = File::open(&observations_path)
            .map_err(|e| Error::Io(observations_path.display().to_string(), e))?;
        let stations = File::open(&stations_path)
            .map_err(|e| Error::Io(stations_path.display().to_string(), e))?;

        let store = Self::from_readers(observations, stations, as_of)?;
        info!(
            "loaded {} observations across {} stations",
            store.observations.len(),
            store.stations.len()
        );
        Ok(store)
    }

    /// Build a store from raw CSV readers
    pub fn from_readers(
        observations: impl Read,
        stations: impl Read,
        as_of: Option<Date>,
    ) -> Result<Self, Error> {
        let mut observation_rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(observations);
        let observations = observation_rdr
            .deserialize::<ObservationRow>()
            .map(|row| row.map_err(Error::from).and_then(Observation::try_from))
            .collect::<Result<Vec<_>, _>>()?;

        let mut station_rdr = ReaderBuilder::new().has_headers(true).from_reader(stations);
        let stations = station_rdr
            .deserialize::<Station>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_records(observations, stations, as_of))
    }

    /// Build a store from already-parsed records. The reference date is the
    /// `as_of` override when given, otherwise the latest observation date;
    /// an empty observation set has no reference date.
    pub fn from_records(
        observations: Vec<Observation>,
        stations: Vec<Station>,
        as_of: Option<Date>,
    ) -> Self {
        let reference_date = as_of.or_else(|| observations.iter().map(|obs| obs.date).max());
        Self {
            observations,
            stations,
            reference_date,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn reference_date(&self) -> Option<Date> {
        self.reference_date
    }

    /// Exclusive lower bound of the recent window: reference date minus the
    /// window length. Observations dated ON the cutoff fall outside the
    /// window; only later dates are "recent".
    pub fn recent_cutoff(&self) -> Option<Date> {
        self.reference_date.map(|reference| {
            reference
                .checked_sub(Duration::days(RECENT_WINDOW_DAYS))
                .unwrap_or(Date::MIN)
        })
    }
}
