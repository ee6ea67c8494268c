// src/main.rs
use eframe::egui;
use squat_tracker::app::SquatTrackerApp;
use squat_tracker::config::ExerciseConfig;
use squat_tracker::session::WorkoutSession;
use squat_tracker::ui::Theme;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(ExerciseConfig::default_path);
    let config = ExerciseConfig::load_or_default(&config_path)?;
    tracing::info!(
        down = config.thresholds.down(),
        up = config.thresholds.up(),
        joint = ?config.joint.vertex,
        "Loaded exercise config"
    );

    let session = WorkoutSession::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Squat Tracker",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(create_visuals());
            Box::new(SquatTrackerApp::new(cc, session))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Error running application: {}", e))?;

    Ok(())
}

fn create_visuals() -> egui::Visuals {
    let theme = Theme::default();
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = theme.background;

    visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(30, 30, 35);
    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(45, 45, 52);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(55, 55, 65);
    visuals.widgets.active.bg_fill = theme.primary;

    visuals.widgets.noninteractive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.inactive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(8.0);
    visuals.widgets.active.rounding = egui::Rounding::same(8.0);
    visuals.window_rounding = egui::Rounding::same(12.0);

    visuals
}
