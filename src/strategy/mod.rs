pub mod palette;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::session::{Compound, LapRecord};

pub use palette::CompoundColor;

/// A maximal run of consecutive laps on one compound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub compound: Compound,
    pub start_lap: u32,
    pub end_lap: u32,
    /// `end_lap - start_lap + 1`, counting any lap missing from the input
    pub length: u32,
}

impl Stint {
    fn open(lap_number: u32, compound: Compound) -> Self {
        Self {
            compound,
            start_lap: lap_number,
            end_lap: lap_number,
            length: 1,
        }
    }

    fn extend_to(&mut self, lap_number: u32) {
        self.end_lap = lap_number;
        self.length = self.end_lap.saturating_sub(self.start_lap) + 1;
    }

    pub fn color(&self) -> CompoundColor {
        CompoundColor::from(self.compound)
    }
}

/// Splits an ordered sequence of `(lap_number, compound)` pairs into stints.
///
/// Only a compound change closes a stint. A gap in lap numbers is absorbed into the
/// running stint, and `Unknown` is kept as its own compound rather than merged with
/// its neighbours. Laps are taken in input order, duplicates included.
pub fn segment(laps: impl IntoIterator<Item = (u32, Compound)>) -> Vec<Stint> {
    let mut stints = Vec::new();
    let mut current: Option<Stint> = None;

    for (lap_number, compound) in laps {
        match current.as_mut() {
            Some(run) if run.compound == compound => run.extend_to(lap_number),
            _ => {
                stints.extend(current.take());
                current = Some(Stint::open(lap_number, compound));
            }
        }
    }
    stints.extend(current);

    debug!("Segmented laps into {} stints", stints.len());
    stints
}

/// Segments the laps of a single driver in a single session.
pub fn segment_records(laps: &[LapRecord]) -> Vec<Stint> {
    segment(laps.iter().map(|l| (l.lap_number, l.compound)))
}
