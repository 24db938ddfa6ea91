//! Feature Engineering Engine
//!
//! Derives temporal features from raw flight timestamps and projects
//! categorical flight attributes onto the fixed one-hot feature space the
//! classifier is trained on.

mod error;
mod projector;
mod record;
mod temporal;

pub use error::DerivationError;
pub use projector::{
    FeatureSpaceProjector, FeatureVector, FeatureWhitelist, LearnedFeatureSpace,
    AIRLINE_PREFIX, FLIGHT_TYPE_PREFIX, MONTH_PREFIX,
};
pub use record::{FlightQuery, FlightType, RawFlightRecord};
pub use temporal::{
    delay_label, derive, is_high_season, minutes_late, parse_timestamp, period_day, EngineeredFeatures,
    PeriodOfDay, DELAY_THRESHOLD_MINUTES, TIMESTAMP_FORMAT,
};
