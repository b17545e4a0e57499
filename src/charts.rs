// Chart series derived from a driver's laps

use simple_moving_average::{SMA, SumTreeSMA};

use crate::session::{Compound, DriverSession, LapRecord};
use crate::strategy::{self, CompoundColor, Stint};

/// Number of laps averaged by the rolling pace line
pub const PACE_WINDOW: usize = 5;

/// Horizontal bar of the tire strategy chart
#[derive(Clone, Debug, PartialEq)]
pub struct StintBar {
    /// First lap of the stint, left edge of the bar
    pub start: f64,
    pub width: f64,
    pub row: usize,
    pub compound: Compound,
    pub color: CompoundColor,
}

impl StintBar {
    pub fn label(&self) -> &'static str {
        self.compound.label()
    }
}

/// All series shown on the dashboard for one driver in one session
#[derive(Clone, Debug, Default)]
pub struct ChartSet {
    pub lap_times: Vec<[f64; 2]>,
    pub pace: Vec<[f64; 2]>,
    pub positions: Vec<[f64; 2]>,
    pub fastest_lap: Option<u32>,
    pub speed_trace: Vec<[f64; 2]>,
    pub stints: Vec<Stint>,
    pub strategy: Vec<StintBar>,
}

impl ChartSet {
    pub fn from_session(session: &DriverSession) -> Self {
        let stints = strategy::segment_records(&session.laps);
        let strategy = strategy_bars(&stints);
        Self {
            lap_times: lap_time_series(&session.laps),
            pace: rolling_pace(&session.laps),
            positions: position_series(&session.laps),
            fastest_lap: fastest_lap(&session.laps).map(|l| l.lap_number),
            speed_trace: speed_trace(session),
            stints,
            strategy,
        }
    }
}

pub fn lap_time_series(laps: &[LapRecord]) -> Vec<[f64; 2]> {
    laps.iter()
        .filter_map(|l| l.lap_time_s.map(|t| [l.lap_number as f64, t as f64]))
        .collect()
}

/// Moving average of lap times over the last `PACE_WINDOW` timed laps
pub fn rolling_pace(laps: &[LapRecord]) -> Vec<[f64; 2]> {
    let mut window = SumTreeSMA::<f32, f32, PACE_WINDOW>::new();
    laps.iter()
        .filter_map(|l| {
            let lap_time = l.lap_time_s?;
            window.add_sample(lap_time);
            Some([l.lap_number as f64, window.get_average() as f64])
        })
        .collect()
}

pub fn position_series(laps: &[LapRecord]) -> Vec<[f64; 2]> {
    laps.iter()
        .filter_map(|l| l.position.map(|p| [l.lap_number as f64, p as f64]))
        .collect()
}

/// Quickest timed lap; the earliest one wins a tie
pub fn fastest_lap(laps: &[LapRecord]) -> Option<&LapRecord> {
    laps.iter()
        .filter(|l| l.lap_time_s.is_some_and(|t| t.is_finite()))
        .min_by(|a, b| {
            a.lap_time_s
                .unwrap_or(f32::MAX)
                .total_cmp(&b.lap_time_s.unwrap_or(f32::MAX))
        })
}

/// Speed over distance for the fastest lap of the session
pub fn speed_trace(session: &DriverSession) -> Vec<[f64; 2]> {
    let Some(fastest) = fastest_lap(&session.laps) else {
        return Vec::new();
    };
    session
        .speed
        .iter()
        .filter(|s| s.lap_number == fastest.lap_number)
        .map(|s| [s.distance_m as f64, s.speed_kph as f64])
        .collect()
}

pub fn strategy_bars(stints: &[Stint]) -> Vec<StintBar> {
    stints
        .iter()
        .map(|s| StintBar {
            start: s.start_lap as f64,
            width: s.length as f64,
            row: s.compound.row(),
            compound: s.compound,
            color: s.color(),
        })
        .collect()
}
