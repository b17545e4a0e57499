use std::path::Path;

use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{DriverSession, LapRecord, LapSource, SessionInfo, SessionKey, SpeedSample};
use crate::errors::PitwallError;

/// One line of a lap archive file.
///
/// Lap and speed lines belong to the closest preceding `SessionChange`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ArchiveLine {
    SessionChange(SessionInfo),
    Lap(LapRecord),
    Speed(SpeedSample),
}

#[derive(Clone, Debug, Default)]
pub struct ArchivedSession {
    pub info: SessionInfo,
    pub laps: Vec<LapRecord>,
    pub speed: Vec<SpeedSample>,
}

/// Lap data of one or more sessions, loaded from a JSON lines archive.
#[derive(Clone, Debug, Default)]
pub struct LapArchive {
    pub sessions: Vec<ArchivedSession>,
}

pub fn load_lap_archive(source_file: &Path) -> Result<LapArchive, PitwallError> {
    let path = source_file.display().to_string();
    let archive_lines = serde_jsonlines::json_lines(source_file)
        .map_err(|e| PitwallError::LapArchiveLoadError {
            path: path.clone(),
            source: e,
        })?
        .collect::<Result<Vec<ArchiveLine>, std::io::Error>>()
        .map_err(|e| PitwallError::LapArchiveLoadError {
            path: path.clone(),
            source: e,
        })?;

    let archive = LapArchive::from_lines(archive_lines).map_err(|line_no| {
        PitwallError::OrphanRecord {
            path: path.clone(),
            line_no,
        }
    })?;
    info!(
        "Loaded {}, found {} sessions with a total of {} laps",
        path,
        archive.sessions.len(),
        archive.sessions.iter().map(|s| s.laps.len()).sum::<usize>()
    );
    Ok(archive)
}

impl LapArchive {
    /// Groups archive lines into sessions. Fails with the 1-based line number of the
    /// first lap or speed line that appears before any session.
    pub fn from_lines(lines: impl IntoIterator<Item = ArchiveLine>) -> Result<Self, usize> {
        let mut archive = LapArchive::default();
        for (idx, line) in lines.into_iter().enumerate() {
            match line {
                ArchiveLine::SessionChange(info) => {
                    archive.sessions.push(ArchivedSession {
                        info,
                        ..Default::default()
                    });
                }
                ArchiveLine::Lap(lap) => match archive.sessions.last_mut() {
                    Some(session) => session.laps.push(lap),
                    None => return Err(idx + 1),
                },
                ArchiveLine::Speed(sample) => match archive.sessions.last_mut() {
                    Some(session) => session.speed.push(sample),
                    None => return Err(idx + 1),
                },
            }
        }
        Ok(archive)
    }

    fn find_session(&self, key: &SessionKey) -> Option<&ArchivedSession> {
        self.sessions.iter().find(|s| &s.info.key() == key)
    }
}

impl LapSource for LapArchive {
    fn seasons(&self) -> Vec<u16> {
        self.sessions
            .iter()
            .map(|s| s.info.year)
            .unique()
            .sorted_by(|a, b| b.cmp(a))
            .collect()
    }

    fn events(&self, year: u16) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .filter(|s| s.info.year == year)
            .map(|s| s.info.clone())
            .sorted_by_key(|info| (info.round_number, info.session_type))
            .collect()
    }

    fn drivers(&self, year: u16) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|s| s.info.year == year)
            .flat_map(|s| s.laps.iter().map(|l| l.driver.clone()))
            .unique()
            .sorted()
            .collect()
    }

    fn driver_laps(&self, key: &SessionKey, driver: &str) -> Result<DriverSession, PitwallError> {
        let session = self
            .find_session(key)
            .ok_or_else(|| PitwallError::SessionNotFound {
                year: key.year,
                event: key.event_name.clone(),
                session_type: key.session_type.to_string(),
            })?;

        // stable sort, duplicate lap numbers keep their archive order
        let laps = session
            .laps
            .iter()
            .filter(|l| l.driver == driver)
            .cloned()
            .sorted_by_key(|l| l.lap_number)
            .collect_vec();
        if laps.is_empty() {
            return Err(PitwallError::DriverNotFound {
                driver: driver.to_string(),
                event: key.event_name.clone(),
                year: key.year,
            });
        }

        let speed = session
            .speed
            .iter()
            .filter(|s| s.driver == driver)
            .cloned()
            .collect_vec();
        debug!(
            "Selected {} laps and {} speed samples for {} at {}",
            laps.len(),
            speed.len(),
            driver,
            key.event_name
        );

        Ok(DriverSession {
            info: session.info.clone(),
            driver: driver.to_string(),
            laps,
            speed,
        })
    }
}
