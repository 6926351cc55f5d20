pub mod climate_data;
pub mod store;

pub use climate_data::{
    ClimateAccess, ClimateData, PrecipitationByDate, StationRecord, TemperatureReading,
    TemperatureStats,
};
pub use store::{parse_date, ClimateStore, Observation, Station, RECENT_WINDOW_DAYS};
