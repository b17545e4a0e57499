use std::path::PathBuf;

use egui::Color32;
use log::warn;

use pitwall::{CompoundColor, PitwallError};

pub(crate) mod config;
mod dashboard;

use config::AppConfig;
use dashboard::DashboardApp;

pub(crate) const PALETTE_LAP_TIME: Color32 = Color32::from_rgb(242, 97, 63);
pub(crate) const PALETTE_PACE: Color32 = Color32::from_rgb(155, 57, 34);

pub(crate) fn compound_color(color: CompoundColor) -> Color32 {
    let (r, g, b) = color.rgb();
    Color32::from_rgb(r, g, b)
}

pub(crate) fn run_dashboard(input: Option<PathBuf>) -> Result<(), PitwallError> {
    let app_config = AppConfig::from_local_file()
        .unwrap_or_else(|e| {
            warn!("Ignoring config file: {}", e);
            None
        })
        .unwrap_or_default();

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(egui::Vec2::new(1280., 860.));

    eframe::run_native(
        "Pitwall",
        native_options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(input, app_config, cc)))),
    )
    .map_err(|e| PitwallError::DashboardError {
        description: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_color_conversion() {
        assert_eq!(compound_color(CompoundColor::Red), Color32::from_rgb(255, 0, 0));
        assert_eq!(
            compound_color(CompoundColor::Gray),
            Color32::from_rgb(128, 128, 128)
        );
    }
}
