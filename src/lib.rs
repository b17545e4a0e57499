// Library interface for pitwall
// This allows integration tests and benches to access internal modules

pub mod charts;
pub mod errors;
pub mod session;
pub mod strategy;
pub mod writer;

// Re-export commonly used types
pub use charts::{ChartSet, StintBar};
pub use errors::PitwallError;
pub use session::{
    Compound, DriverSession, LapArchive, LapRecord, LapSource, SessionInfo, SessionKey,
    SessionType, SpeedSample, load_lap_archive,
};
pub use strategy::{CompoundColor, Stint, segment, segment_records};
