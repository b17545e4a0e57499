use std::path::PathBuf;

use egui::{Color32, Frame, Layout, Margin, RichText, Ui};
use egui_dropdown::DropDownBox;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use itertools::Itertools;
use log::{debug, error, warn};

use pitwall::{
    ChartSet, Compound, LapArchive, LapSource, SessionKey, SessionType, load_lap_archive,
};

use super::{PALETTE_LAP_TIME, PALETTE_PACE, compound_color, config::AppConfig};

const CHART_SPACING: f32 = 8.;

/// Season, race, session and driver picked in the selectors
#[derive(Clone, Debug, Default, PartialEq)]
struct Selection {
    year: String,
    event: String,
    session: String,
    driver: String,
}

impl Selection {
    fn from_config(app_config: &AppConfig) -> Self {
        Self {
            year: app_config.selected_year.clone(),
            event: app_config.selected_event.clone(),
            session: app_config.selected_session.clone(),
            driver: app_config.selected_driver.clone(),
        }
    }

    /// Session key for a complete selection, `None` while any selector is empty
    fn session_key(&self) -> Option<SessionKey> {
        if self.event.is_empty() || self.driver.is_empty() {
            return None;
        }
        let year = self.year.parse::<u16>().ok()?;
        let session_type = if self.session.is_empty() {
            SessionType::Race
        } else {
            SessionType::from_label(&self.session).ok()?
        };
        Some(SessionKey {
            year,
            event_name: self.event.clone(),
            session_type,
        })
    }
}

/// Desktop race analysis dashboard: lap times, speed trace, position changes and tire
/// strategy for one driver in one session.
pub(crate) struct DashboardApp {
    archive: Option<LapArchive>,
    selection: Selection,
    charted_selection: Option<Selection>,
    charts: ChartSet,
    status_message: Option<String>,
    app_config: AppConfig,
    config_path: Option<PathBuf>,
}

impl DashboardApp {
    pub(crate) fn new(
        input: Option<PathBuf>,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let config_path = AppConfig::local_path()
            .map_err(|e| warn!("Selection will not be saved: {}", e))
            .ok();
        Self::with_config(input, app_config, config_path)
    }

    fn with_config(
        input: Option<PathBuf>,
        app_config: AppConfig,
        config_path: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            archive: None,
            selection: Selection::from_config(&app_config),
            charted_selection: None,
            charts: ChartSet::default(),
            status_message: None,
            app_config,
            config_path,
        };
        if let Some(path) = input.or_else(|| app.app_config.last_archive.clone()) {
            app.open_archive(path);
        }
        app
    }

    fn open_archive(&mut self, path: PathBuf) {
        match load_lap_archive(&path) {
            Ok(archive) => {
                let seasons = archive.seasons();
                let has_year = self
                    .selection
                    .year
                    .parse::<u16>()
                    .is_ok_and(|year| seasons.contains(&year));
                if !has_year && let Some(year) = seasons.first() {
                    debug!(
                        "Season '{}' not in archive, selecting {}",
                        self.selection.year, year
                    );
                    self.selection.year = year.to_string();
                    self.selection.event.clear();
                    self.selection.session.clear();
                }
                self.archive = Some(archive);
                self.charted_selection = None;
                self.status_message = None;
                self.app_config.last_archive = Some(path);
            }
            Err(e) => {
                error!("Could not load lap archive: {}", e);
                self.status_message = Some(format!("Could not load lap archive: {}", e));
                // keep the message until the selection changes
                self.charted_selection = Some(self.selection.clone());
            }
        }
    }

    /// Recomputes the charts when the selection changed since the last frame
    fn refresh_charts(&mut self) {
        if self.charted_selection.as_ref() == Some(&self.selection) {
            return;
        }
        self.charted_selection = Some(self.selection.clone());
        self.charts = ChartSet::default();
        self.status_message = None;

        let (Some(archive), Some(key)) = (self.archive.as_ref(), self.selection.session_key())
        else {
            return;
        };
        debug!(
            "Selection changed to {} {} {} {}",
            key.year, key.event_name, key.session_type, self.selection.driver
        );
        match archive.driver_laps(&key, &self.selection.driver) {
            Ok(session) => self.charts = ChartSet::from_session(&session),
            Err(e) => {
                warn!("No chart data for selection: {}", e);
                self.status_message = Some(e.to_string());
            }
        }

        self.app_config.selected_year = self.selection.year.clone();
        self.app_config.selected_event = self.selection.event.clone();
        self.app_config.selected_session = self.selection.session.clone();
        self.app_config.selected_driver = self.selection.driver.clone();
        if let Some(config_path) = &self.config_path
            && let Err(e) = self.app_config.save_to(config_path)
        {
            warn!("Could not save config: {}", e);
        }
    }

    /// Heading of a chart, naming the charted driver, race and year once there is one
    fn chart_title(&self, chart: &str) -> String {
        match &self.charted_selection {
            Some(selection) if selection.session_key().is_some() => format!(
                "{} for {} - {} {}",
                chart, selection.driver, selection.event, selection.year
            ),
            _ => chart.to_string(),
        }
    }

    fn speed_title(&self) -> String {
        let driver = self
            .charted_selection
            .as_ref()
            .filter(|s| s.session_key().is_some())
            .map(|s| s.driver.as_str());
        match (driver, self.charts.fastest_lap) {
            (Some(driver), Some(lap)) => {
                format!("Speed Analysis - Fastest Lap for {} (lap {})", driver, lap)
            }
            (Some(driver), None) => format!("Speed Analysis - Fastest Lap for {}", driver),
            _ => "Speed Analysis".to_string(),
        }
    }

    fn show_selectors(&mut self, ui: &mut Ui) {
        let Some(archive) = self.archive.as_ref() else {
            ui.label(RichText::new("Load a lap archive to start").color(Color32::WHITE));
            return;
        };

        ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
            let years = archive.seasons().iter().map(|y| y.to_string()).collect_vec();
            ui.label(RichText::new("Year: ").color(Color32::WHITE));
            ui.add(
                DropDownBox::from_iter(
                    years,
                    "year_dropbox",
                    &mut self.selection.year,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(false),
            );

            let Ok(year) = self.selection.year.parse::<u16>() else {
                return;
            };
            let events = archive.events(year);

            ui.separator();
            ui.label(RichText::new("Race: ").color(Color32::WHITE));
            let event_names = events.iter().map(|e| e.event_name.clone()).unique().collect_vec();
            ui.add(
                DropDownBox::from_iter(
                    event_names,
                    "race_dropbox",
                    &mut self.selection.event,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(false),
            );

            ui.separator();
            ui.label(RichText::new("Session: ").color(Color32::WHITE));
            let session_types = events
                .iter()
                .filter(|e| e.event_name == self.selection.event)
                .map(|e| e.session_type.to_string())
                .collect_vec();
            ui.add(
                DropDownBox::from_iter(
                    session_types,
                    "session_dropbox",
                    &mut self.selection.session,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(false),
            );

            ui.separator();
            ui.label(RichText::new("Driver: ").color(Color32::WHITE));
            ui.add(
                DropDownBox::from_iter(
                    archive.drivers(year),
                    "driver_dropbox",
                    &mut self.selection.driver,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(false),
            );
        });
    }

    fn show_lap_times(&self, ui: &mut Ui, height: f32) {
        ui.label(RichText::new(self.chart_title("Lap Times")).strong());
        Plot::new("lap_times")
            .legend(Legend::default())
            .height(height)
            .x_axis_label("Lap Number")
            .y_axis_label("Lap Time (seconds)")
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Lap Times", PlotPoints::new(self.charts.lap_times.clone()))
                        .color(PALETTE_LAP_TIME),
                );
                plot_ui.points(
                    Points::new("Lap", PlotPoints::new(self.charts.lap_times.clone()))
                        .color(PALETTE_LAP_TIME)
                        .radius(3.),
                );
                plot_ui.line(
                    Line::new("Rolling Pace", PlotPoints::new(self.charts.pace.clone()))
                        .color(PALETTE_PACE),
                );
            });
    }

    fn show_speed_trace(&self, ui: &mut Ui, height: f32) {
        ui.label(RichText::new(self.speed_title()).strong());
        Plot::new("speed_trace")
            .legend(Legend::default())
            .height(height)
            .x_axis_label("Distance (meters)")
            .y_axis_label("Speed (km/h)")
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Speed", PlotPoints::new(self.charts.speed_trace.clone()))
                        .color(Color32::LIGHT_BLUE),
                );
            });
    }

    fn show_positions(&self, ui: &mut Ui, height: f32) {
        ui.label(RichText::new(self.chart_title("Position Changes")).strong());
        // plotted negated so that P1 sits at the top
        let positions = self
            .charts
            .positions
            .iter()
            .map(|[lap, position]| [*lap, -*position])
            .collect_vec();
        Plot::new("positions")
            .legend(Legend::default())
            .height(height)
            .x_axis_label("Lap Number")
            .y_axis_label("Position")
            .y_axis_formatter(|mark, _range| format!("{}", -mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Position", PlotPoints::new(positions.clone()))
                        .color(Color32::LIGHT_GREEN),
                );
                plot_ui.points(
                    Points::new("Lap", PlotPoints::new(positions))
                        .color(Color32::LIGHT_GREEN)
                        .radius(3.),
                );
            });
    }

    fn show_tire_strategy(&self, ui: &mut Ui, height: f32) {
        ui.label(RichText::new(self.chart_title("Tire Strategy")).strong());
        Plot::new("tire_strategy")
            .legend(Legend::default())
            .height(height)
            .x_axis_label("Lap Number")
            .y_axis_label("Compound")
            .y_axis_formatter(|mark, _range| {
                if mark.value.fract() != 0. || mark.value < 0. {
                    return String::new();
                }
                Compound::ALL
                    .get(mark.value as usize)
                    .map(|c| c.label().to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                // one chart per compound so the legend lists each compound once
                let by_compound = self
                    .charts
                    .strategy
                    .iter()
                    .into_group_map_by(|bar| bar.compound);
                for compound in Compound::ALL {
                    let Some(bars) = by_compound.get(&compound) else {
                        continue;
                    };
                    let color = compound_color(compound.into());
                    let bars = bars
                        .iter()
                        .map(|bar| {
                            Bar::new(bar.row as f64, bar.width)
                                .base_offset(bar.start)
                                .width(0.6)
                                .fill(color)
                                .name(format!("{} laps {}", bar.label(), bar.width))
                        })
                        .collect_vec();
                    plot_ui.bar_chart(
                        BarChart::new(compound.label(), bars)
                            .horizontal()
                            .color(color),
                    );
                }
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("Selectors")
            .frame(
                Frame::default()
                    .fill(Color32::TRANSPARENT)
                    .inner_margin(Margin::same(5)),
            )
            .resizable(false)
            .min_height(40.0)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    if ui.button("📂 Load Lap Archive").clicked()
                        && let Some(path) = rfd::FileDialog::new()
                            .add_filter("Lap archive", &["jsonl", "json"])
                            .pick_file()
                    {
                        self.open_archive(path);
                    }
                    ui.separator();
                    ui.heading("Formula 1 Race Analysis Dashboard");
                });
                ui.separator();
                self.show_selectors(ui);
                if let Some(message) = &self.status_message {
                    ui.label(RichText::new(message).color(Color32::RED).strong());
                }
            });

        self.refresh_charts();

        egui::CentralPanel::default()
            .frame(Frame::default().inner_margin(Margin::same(5)))
            .show(ctx, |ui| {
                let chart_height =
                    ((ui.available_height() - 4. * CHART_SPACING) / 2. - 20.).max(100.);
                ui.columns(2, |columns| {
                    self.show_lap_times(&mut columns[0], chart_height);
                    self.show_speed_trace(&mut columns[1], chart_height);
                });
                ui.add_space(CHART_SPACING);
                ui.columns(2, |columns| {
                    self.show_positions(&mut columns[0], chart_height);
                    self.show_tire_strategy(&mut columns[1], chart_height);
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_selection() -> Selection {
        Selection {
            year: "2023".to_string(),
            event: "Bahrain Grand Prix".to_string(),
            session: "".to_string(),
            driver: "VER".to_string(),
        }
    }

    #[test]
    fn test_complete_selection_defaults_to_race() {
        let key = complete_selection().session_key().unwrap();
        assert_eq!(key.year, 2023);
        assert_eq!(key.event_name, "Bahrain Grand Prix");
        assert_eq!(key.session_type, SessionType::Race);
    }

    #[test]
    fn test_incomplete_selection_has_no_key() {
        let mut selection = complete_selection();
        selection.driver.clear();
        assert!(selection.session_key().is_none());

        let mut selection = complete_selection();
        selection.year = "not a year".to_string();
        assert!(selection.session_key().is_none());

        let mut selection = complete_selection();
        selection.session = "Warmup".to_string();
        assert!(selection.session_key().is_none());
    }

    #[test]
    fn test_selection_from_config() {
        let app_config = AppConfig {
            selected_year: "2022".to_string(),
            selected_event: "Monaco Grand Prix".to_string(),
            selected_session: "Qualifying".to_string(),
            selected_driver: "LEC".to_string(),
            ..Default::default()
        };
        let key = Selection::from_config(&app_config).session_key().unwrap();
        assert_eq!(key.session_type, SessionType::Qualifying);
        assert_eq!(key.year, 2022);
    }

    const SAMPLE_ARCHIVE: &str = "lap_samples/season_2023.jsonl";

    fn app_with_config(
        app_config: AppConfig,
        config_dir: &tempfile::TempDir,
    ) -> DashboardApp {
        DashboardApp::with_config(
            None,
            app_config,
            Some(config_dir.path().join("config.json")),
        )
    }

    fn sample_app(config_dir: &tempfile::TempDir) -> DashboardApp {
        let mut app = app_with_config(AppConfig::default(), config_dir);
        app.open_archive(PathBuf::from(SAMPLE_ARCHIVE));
        app
    }

    #[test]
    fn test_failed_archive_load_message_survives_refresh() {
        let config_dir = tempfile::tempdir().unwrap();
        let mut app = app_with_config(AppConfig::default(), &config_dir);

        app.open_archive(config_dir.path().join("missing.jsonl"));
        app.refresh_charts();
        app.refresh_charts();

        let message = app.status_message.clone().unwrap();
        assert!(message.starts_with("Could not load lap archive"));
        assert!(app.archive.is_none());
    }

    #[test]
    fn test_missing_last_archive_reported_at_startup() {
        let config_dir = tempfile::tempdir().unwrap();
        let app_config = AppConfig {
            last_archive: Some(config_dir.path().join("moved.jsonl")),
            ..Default::default()
        };
        let mut app = app_with_config(app_config, &config_dir);

        // first two frames
        app.refresh_charts();
        app.refresh_charts();

        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_load_after_failed_load_clears_message() {
        let config_dir = tempfile::tempdir().unwrap();
        let mut app = app_with_config(AppConfig::default(), &config_dir);
        app.open_archive(config_dir.path().join("missing.jsonl"));
        app.refresh_charts();

        app.open_archive(PathBuf::from(SAMPLE_ARCHIVE));
        app.refresh_charts();

        assert!(app.status_message.is_none());
        assert_eq!(app.selection.year, "2023");
        assert_eq!(
            app.app_config.last_archive,
            Some(PathBuf::from(SAMPLE_ARCHIVE))
        );
    }

    #[test]
    fn test_selection_change_recomputes_charts_and_saves_config() {
        let config_dir = tempfile::tempdir().unwrap();
        let mut app = sample_app(&config_dir);
        app.selection.event = "Bahrain Grand Prix".to_string();
        app.selection.driver = "VER".to_string();

        app.refresh_charts();
        assert!(app.status_message.is_none());
        assert_eq!(app.charts.stints.len(), 3);

        let saved = AppConfig::load_from(&config_dir.path().join("config.json"))
            .unwrap()
            .unwrap();
        assert_eq!(saved.selected_year, "2023");
        assert_eq!(saved.selected_event, "Bahrain Grand Prix");
        assert_eq!(saved.selected_driver, "VER");
        assert_eq!(saved.last_archive, Some(PathBuf::from(SAMPLE_ARCHIVE)));

        app.selection.driver = "HUL".to_string();
        app.refresh_charts();
        assert_eq!(app.charts.stints.len(), 4);
    }

    #[test]
    fn test_unchanged_selection_is_not_recomputed() {
        let config_dir = tempfile::tempdir().unwrap();
        let mut app = sample_app(&config_dir);
        app.selection.event = "Bahrain Grand Prix".to_string();
        app.selection.driver = "ALO".to_string();
        app.refresh_charts();
        assert_eq!(app.charts.stints.len(), 2);

        app.charts = ChartSet::default();
        app.refresh_charts();
        assert!(app.charts.stints.is_empty());
    }

    #[test]
    fn test_driver_without_laps_keeps_message() {
        let config_dir = tempfile::tempdir().unwrap();
        let mut app = sample_app(&config_dir);
        app.selection.event = "Bahrain Grand Prix".to_string();
        app.selection.driver = "PER".to_string();

        app.refresh_charts();
        app.refresh_charts();

        assert!(app.status_message.as_ref().unwrap().contains("PER"));
        assert!(app.charts.strategy.is_empty());
    }

    #[test]
    fn test_restored_year_missing_from_archive_falls_back() {
        let config_dir = tempfile::tempdir().unwrap();
        let app_config = AppConfig {
            selected_year: "1999".to_string(),
            selected_event: "Malaysian Grand Prix".to_string(),
            selected_driver: "VER".to_string(),
            ..Default::default()
        };
        let mut app = app_with_config(app_config, &config_dir);
        app.open_archive(PathBuf::from(SAMPLE_ARCHIVE));

        assert_eq!(app.selection.year, "2023");
        assert!(app.selection.event.is_empty());
        assert_eq!(app.selection.driver, "VER");
    }

    #[test]
    fn test_restored_year_in_archive_is_kept() {
        let config_dir = tempfile::tempdir().unwrap();
        let app_config = AppConfig {
            selected_year: "2023".to_string(),
            selected_event: "Saudi Arabian Grand Prix".to_string(),
            ..Default::default()
        };
        let mut app = app_with_config(app_config, &config_dir);
        app.open_archive(PathBuf::from(SAMPLE_ARCHIVE));

        assert_eq!(app.selection.event, "Saudi Arabian Grand Prix");
    }

    #[test]
    fn test_chart_titles_name_the_selection() {
        let config_dir = tempfile::tempdir().unwrap();
        let mut app = sample_app(&config_dir);
        assert_eq!(app.chart_title("Lap Times"), "Lap Times");
        assert_eq!(app.speed_title(), "Speed Analysis");

        app.selection.event = "Bahrain Grand Prix".to_string();
        app.selection.driver = "VER".to_string();
        app.refresh_charts();

        assert_eq!(
            app.chart_title("Lap Times"),
            "Lap Times for VER - Bahrain Grand Prix 2023"
        );
        assert_eq!(
            app.chart_title("Tire Strategy"),
            "Tire Strategy for VER - Bahrain Grand Prix 2023"
        );
        assert_eq!(
            app.speed_title(),
            "Speed Analysis - Fastest Lap for VER (lap 15)"
        );
    }
}
