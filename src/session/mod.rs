pub mod loader;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::PitwallError;

pub use loader::{ArchiveLine, LapArchive, load_lap_archive};

/// Tire compound fitted for a lap.
///
/// Anything the provider reports outside the five known compounds (including a missing
/// value) decodes as `Unknown`. `Unknown` is a compound in its own right: it is never
/// merged into a neighbouring stint and never dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    #[default]
    Unknown,
}

impl Compound {
    pub const ALL: [Compound; 6] = [
        Compound::Soft,
        Compound::Medium,
        Compound::Hard,
        Compound::Intermediate,
        Compound::Wet,
        Compound::Unknown,
    ];

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Compound::Soft,
            "MEDIUM" => Compound::Medium,
            "HARD" => Compound::Hard,
            "INTERMEDIATE" => Compound::Intermediate,
            "WET" => Compound::Wet,
            _ => Compound::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Intermediate => "INTERMEDIATE",
            Compound::Wet => "WET",
            Compound::Unknown => "UNKNOWN",
        }
    }

    /// Row of this compound on the tire strategy chart
    pub fn row(&self) -> usize {
        Compound::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(Compound::ALL.len() - 1)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Compound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .map(Compound::from_label)
            .unwrap_or_default())
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SessionType {
    Practice1,
    Practice2,
    Practice3,
    Qualifying,
    Sprint,
    #[default]
    Race,
}

impl SessionType {
    pub const ALL: [SessionType; 6] = [
        SessionType::Practice1,
        SessionType::Practice2,
        SessionType::Practice3,
        SessionType::Qualifying,
        SessionType::Sprint,
        SessionType::Race,
    ];

    pub fn from_label(label: &str) -> Result<Self, PitwallError> {
        SessionType::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| PitwallError::InvalidUserInput {
                field: "session".to_string(),
                reason: format!("unknown session type '{}'", label),
            })
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionType::Practice1 => "Practice1",
            SessionType::Practice2 => "Practice2",
            SessionType::Practice3 => "Practice3",
            SessionType::Qualifying => "Qualifying",
            SessionType::Sprint => "Sprint",
            SessionType::Race => "Race",
        };
        f.write_str(name)
    }
}

/// One lap of one driver, as reported by the session provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// Driver abbreviation, e.g. `VER`
    pub driver: String,
    /// Lap number, strictly increasing within a driver's laps
    pub lap_number: u32,
    #[serde(default)]
    pub compound: Compound,
    /// Lap time in seconds, absent for laps without a valid timing
    #[serde(default)]
    pub lap_time_s: Option<f32>,
    /// Running position at the end of the lap
    #[serde(default)]
    pub position: Option<u32>,
}

impl LapRecord {
    pub fn new(driver: &str, lap_number: u32, compound: Compound) -> Self {
        Self {
            driver: driver.to_string(),
            lap_number,
            compound,
            lap_time_s: None,
            position: None,
        }
    }
}

/// Speed telemetry sample of a single lap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub driver: String,
    pub lap_number: u32,
    /// Meters traveled from S/F this lap
    pub distance_m: f32,
    pub speed_kph: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub year: u16,
    pub round_number: u32,
    pub event_name: String,
    #[serde(default)]
    pub session_type: SessionType,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            year: 0,
            round_number: 0,
            event_name: "Unknown".to_string(),
            session_type: SessionType::Race,
        }
    }
}

impl SessionInfo {
    pub fn key(&self) -> SessionKey {
        SessionKey {
            year: self.year,
            event_name: self.event_name.clone(),
            session_type: self.session_type,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub year: u16,
    pub event_name: String,
    pub session_type: SessionType,
}

/// Everything the charts need for one driver in one session
#[derive(Clone, Debug, Default)]
pub struct DriverSession {
    pub info: SessionInfo,
    pub driver: String,
    /// Laps sorted by lap number
    pub laps: Vec<LapRecord>,
    pub speed: Vec<SpeedSample>,
}

/// Boundary to the telemetry/session provider.
///
/// The provider owns season, event and driver enumeration and returns laps already
/// filtered to one driver and one session.
pub trait LapSource {
    /// Available seasons, most recent first
    fn seasons(&self) -> Vec<u16>;

    /// Sessions of a season ordered by round number
    fn events(&self, year: u16) -> Vec<SessionInfo>;

    /// Driver abbreviations that took part in a season
    fn drivers(&self, year: u16) -> Vec<String>;

    /// Laps and speed samples of a driver for one session
    fn driver_laps(&self, key: &SessionKey, driver: &str) -> Result<DriverSession, PitwallError>;
}
