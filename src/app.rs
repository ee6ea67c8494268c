// src/app.rs
use crate::pose_source::{PoseSource, SimulatedSquatter};
use crate::session::{FrameOutcome, WorkoutSession};
use crate::ui::UIComponents;

use eframe::egui;
use std::time::Instant;

pub struct SquatTrackerApp {
    session: WorkoutSession,
    source: Box<dyn PoseSource>,
    clock: Instant,
    last_outcome: Option<FrameOutcome>,
    show_about: bool,
    ui_components: UIComponents,
}

impl SquatTrackerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, session: WorkoutSession) -> Self {
        // No pose engine is linked in, run against the synthetic squatter.
        let source = Box::new(SimulatedSquatter::new().with_jitter(4.0).with_dropout(45));
        Self::with_source(session, source)
    }

    pub fn with_source(session: WorkoutSession, source: Box<dyn PoseSource>) -> Self {
        Self {
            session,
            source,
            clock: Instant::now(),
            last_outcome: None,
            show_about: false,
            ui_components: UIComponents::new(),
        }
    }

    /// Pulls at most one pose result and runs it through the session.
    fn pump_frame(&mut self) {
        if !self.session.is_running() {
            return;
        }

        let now = self.clock.elapsed().as_secs_f64();
        match self.source.next_frame(now) {
            Ok(Some(frame)) => {
                self.last_outcome = Some(self.session.process_frame(&frame));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(source = self.source.name(), "Pose source error: {:#}", e);
                self.session.note_dropped_frame();
            }
        }
    }

    fn toggle_workout(&mut self) {
        if self.session.is_running() {
            self.session.stop();
        } else {
            self.session.start();
            self.last_outcome = None;
        }
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.heading("Squat Tracker");
                ui.separator();
                ui.label(format!("Exercise: {}", self.session.config().name));
                ui.label(format!("Source: {}", self.source.name()));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("ℹ About").clicked() {
                        self.show_about = !self.show_about;
                    }
                });
            });
            ui.add_space(10.0);
        });
    }

    fn render_workout_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                if !self.session.is_running() && self.session.display().is_none() {
                    ui.add_space(120.0);
                    let start = ui.add_sized(
                        [200.0, 50.0],
                        egui::Button::new(egui::RichText::new("Start Workout").size(18.0))
                            .fill(egui::Color32::from_rgb(0, 184, 148)),
                    );
                    if start.clicked() {
                        self.toggle_workout();
                    }
                    return;
                }

                let output = self.session.display().cloned();
                let feedback = output.as_ref().and_then(|o| o.feedback);
                let angle = output.as_ref().and_then(|o| o.angle).map(|a| a.degrees());

                ui.add_space(20.0);
                self.ui_components.draw_feedback_banner(ui, feedback);
                ui.add_space(20.0);
                self.ui_components.draw_rep_counter(ui, self.session.rep_count());
                ui.label(format!("Phase: {}", self.session.phase().name()));
                ui.add_space(10.0);
                self.ui_components
                    .draw_angle_bar(ui, angle, &self.session.config().thresholds);

                if let Some(FrameOutcome::Skipped(reason)) = self.last_outcome {
                    ui.colored_label(egui::Color32::GRAY, format!("Last frame skipped: {}", reason));
                }
            });
        });
    }

    fn render_control_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let button = if self.session.is_running() {
                    egui::Button::new("⏹ Stop").fill(egui::Color32::from_rgb(244, 67, 54))
                } else {
                    egui::Button::new("▶ Start").fill(egui::Color32::from_rgb(76, 175, 80))
                };
                if ui.add_sized([120.0, 40.0], button).clicked() {
                    self.toggle_workout();
                }

                ui.separator();

                let metrics = self.session.metrics();
                self.ui_components
                    .draw_confidence_bar(ui, "Tracking:", metrics.tracking_confidence);
                ui.label(format!(
                    "{:.2} ms/frame ({:.0} fps)",
                    metrics.avg_processing_time * 1000.0,
                    metrics.avg_fps
                ));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let summary = self.session.summary();
                    ui.label(format!(
                        "Frames: {} ok / {} skipped | {:02}:{:02}",
                        summary.frames_processed,
                        summary.frames_skipped,
                        summary.elapsed_secs as u64 / 60,
                        summary.elapsed_secs as u64 % 60,
                    ));
                });
            });
            ui.add_space(10.0);
        });
    }

    fn render_about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .resizable(false)
            .default_size([400.0, 300.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Squat Tracker");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(20.0);
                    ui.label("Counts squats from the knee angle and");
                    ui.label("tells you when to go lower or stand up.");
                });
            });
    }
}

impl eframe::App for SquatTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_frame();

        self.render_header(ctx);
        self.render_control_panel(ctx);

        if self.show_about {
            self.render_about_window(ctx);
        }

        self.render_workout_panel(ctx);

        // Keep frames flowing while a workout is live
        if self.session.is_running() {
            ctx.request_repaint();
        }
    }
}
