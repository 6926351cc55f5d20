//! The query service: every endpoint's data shape, answered by scanning the
//! in-memory dataset. All operations are pure functions of the immutable
//! store plus request parameters.

use async_trait::async_trait;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;
use utoipa::ToSchema;

use super::store::{self, ClimateStore, Observation, DATE_FORMAT};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read climate dataset: {0}")]
    Store(#[from] store::Error),
    #[error("failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
}

/// Precipitation keyed by date, chronological. Duplicate dates in the
/// dataset resolve last-write-wins.
pub type PrecipitationByDate = BTreeMap<String, Option<f64>>;

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// All (date, precipitation) pairs inside the trailing window behind the
    /// reference date
    async fn recent_precipitation(&self) -> Result<PrecipitationByDate, Error>;
    /// Every station in the dataset, in dataset order
    async fn stations(&self) -> Result<Vec<StationRecord>, Error>;
    /// Temperature readings inside the trailing window for the most active
    /// station
    async fn most_active_temperatures(&self) -> Result<Vec<TemperatureReading>, Error>;
    /// Min/avg/max temperature over observations dated between start and end
    /// (both inclusive); no end means unbounded above
    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error>;
}

pub struct ClimateAccess {
    store: ClimateStore,
}

impl ClimateAccess {
    pub fn new(store: ClimateStore) -> Self {
        Self { store }
    }

    /// Observations dated strictly after the recent cutoff. With a reference
    /// of 2017-08-23 an observation on 2016-08-23 falls outside the window.
    fn recent_observations(&self) -> impl Iterator<Item = &Observation> {
        let cutoff = self.store.recent_cutoff();
        self.store
            .observations()
            .iter()
            .filter(move |obs| match cutoff {
                Some(cutoff) => obs.date > cutoff,
                None => false,
            })
    }

    /// Station id with the most observation records; ties break to the
    /// lowest id so the answer never depends on dataset ordering
    fn most_active_station(&self) -> Option<&str> {
        self.store
            .observations()
            .iter()
            .map(|obs| obs.station_id.as_str())
            .counts()
            .into_iter()
            .max_by(|(id_a, count_a), (id_b, count_b)| {
                count_a.cmp(count_b).then_with(|| id_b.cmp(id_a))
            })
            .map(|(id, _)| id)
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn recent_precipitation(&self) -> Result<PrecipitationByDate, Error> {
        let mut by_date = PrecipitationByDate::new();
        for obs in self.recent_observations() {
            by_date.insert(obs.date.format(DATE_FORMAT)?, obs.precipitation);
        }
        Ok(by_date)
    }

    async fn stations(&self) -> Result<Vec<StationRecord>, Error> {
        Ok(self
            .store
            .stations()
            .iter()
            .map(|station| StationRecord {
                station_id: station.station_id.clone(),
                name: station.name.clone(),
            })
            .collect())
    }

    async fn most_active_temperatures(&self) -> Result<Vec<TemperatureReading>, Error> {
        let Some(station) = self.most_active_station() else {
            return Ok(vec![]);
        };

        self.recent_observations()
            .filter(|obs| obs.station_id == station)
            .filter_map(|obs| obs.temperature.map(|temperature| (obs.date, temperature)))
            .map(|(date, temperature)| {
                Ok(TemperatureReading {
                    date: date.format(DATE_FORMAT)?,
                    temperature,
                })
            })
            .collect()
    }

    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error> {
        let temperatures = self
            .store
            .observations()
            .iter()
            .filter(|obs| obs.date >= start)
            .filter(|obs| end.map_or(true, |end| obs.date <= end))
            .filter_map(|obs| obs.temperature);

        let mut count: usize = 0;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for temperature in temperatures {
            count += 1;
            sum += temperature;
            min = min.min(temperature);
            max = max.max(temperature);
        }

        if count == 0 {
            return Ok(TemperatureStats::default());
        }

        Ok(TemperatureStats {
            min: Some(min),
            avg: Some(sum / count as f64),
            max: Some(max),
        })
    }
}

/// One row of the station listing
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct StationRecord {
    #[serde(rename = "Station ID")]
    pub station_id: String,
    #[serde(rename = "Station Name")]
    pub name: String,
}

/// A dated temperature reading
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureReading {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
}

/// Aggregate temperature statistics over a date window. Every field is null
/// when no observation falls inside the window.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct TemperatureStats {
    #[serde(rename = "Minimum Temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Average Temperature")]
    pub avg: Option<f64>,
    #[serde(rename = "Maximum Temperature")]
    pub max: Option<f64>,
}
