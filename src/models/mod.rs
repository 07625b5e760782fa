pub mod compiled;
pub mod comparison;
pub mod radiation;
pub mod station;

pub use compiled::CompiledRecord;
pub use comparison::{Component, ComparisonRecord};
pub use radiation::{IrradianceSample, ModelSample, RawRow, RawTimeSeries};
pub use station::{parse_utc_offset, Station, StationIndex};
