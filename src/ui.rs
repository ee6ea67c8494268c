// src/ui.rs - Theme and small custom widgets for the workout view
use crate::rep_counter::{Feedback, Thresholds, Tone};
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color32,
    pub background: Color32,
    pub surface: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(70, 130, 240),
            background: Color32::from_rgb(20, 20, 25),
            surface: Color32::from_rgb(30, 30, 35),
            error: Color32::from_rgb(244, 67, 54),
            warning: Color32::from_rgb(255, 152, 0),
            success: Color32::from_rgb(76, 175, 80),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(200, 200, 200),
        }
    }
}

impl Theme {
    /// Green for a good rep, red for anything that needs correcting.
    pub fn tone_color(&self, tone: Tone) -> Color32 {
        match tone {
            Tone::Affirmative => self.success,
            Tone::Corrective => self.error,
        }
    }
}

pub struct UIComponents {
    pub theme: Theme,
}

impl UIComponents {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
        }
    }

    pub fn draw_feedback_banner(&self, ui: &mut egui::Ui, feedback: Option<Feedback>) {
        let (text, color) = match feedback {
            Some(f) => (f.label(), self.theme.tone_color(f.tone())),
            None => ("", self.theme.text_secondary),
        };

        ui.allocate_ui(egui::vec2(ui.available_width(), 60.0), |ui| {
            let rect = ui.available_rect_before_wrap();
            ui.painter().rect_filled(rect, egui::Rounding::same(8.0), self.theme.surface);
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(text).size(32.0).strong().color(color));
            });
        });
    }

    pub fn draw_rep_counter(&self, ui: &mut egui::Ui, reps: u32) {
        ui.label(
            egui::RichText::new(format!("Reps: {}", reps))
                .size(28.0)
                .color(self.theme.primary),
        );
    }

    /// Horizontal 0-360° bar with the hysteresis band marked. Readings past
    /// the 180° tick are reflex angles, usually a mirrored subject.
    pub fn draw_angle_bar(&self, ui: &mut egui::Ui, angle: Option<u16>, thresholds: &Thresholds) {
        let bar_width = ui.available_width().min(400.0);
        let bar_height = 24.0;
        let rect = ui.allocate_space(Vec2::new(bar_width, bar_height)).1;
        let painter = ui.painter();

        painter.rect_filled(rect, egui::Rounding::same(4.0), self.theme.surface);

        let x_for = |deg: u16| rect.left() + bar_width * angle_fraction(deg);

        let band = Rect::from_min_max(
            Pos2::new(x_for(thresholds.down()), rect.top()),
            Pos2::new(x_for(thresholds.up()), rect.bottom()),
        );
        painter.rect_filled(band, egui::Rounding::same(0.0), Color32::from_rgb(45, 45, 52));

        for deg in [thresholds.down(), thresholds.up()] {
            let x = x_for(deg);
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(2.0, self.theme.warning),
            );
        }

        let straight = x_for(180);
        painter.line_segment(
            [Pos2::new(straight, rect.top()), Pos2::new(straight, rect.bottom())],
            Stroke::new(1.0, self.theme.text_secondary),
        );

        if let Some(deg) = angle {
            let x = x_for(deg);
            let color = if deg > 180 { self.theme.warning } else { self.theme.primary };
            painter.circle_filled(Pos2::new(x, rect.center().y), 7.0, color);
        }

        let label = angle.map(|d| format!("{}°", d)).unwrap_or_else(|| "--".to_string());
        painter.text(
            rect.right_center() + Vec2::new(8.0, 0.0),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(14.0),
            self.theme.text_primary,
        );
    }

    pub fn draw_confidence_bar(&self, ui: &mut egui::Ui, label: &str, value: f32) {
        ui.horizontal(|ui| {
            ui.label(label);

            let bar_width = 200.0;
            let bar_height = 20.0;
            let rect = ui.allocate_space(Vec2::new(bar_width, bar_height)).1;

            let painter = ui.painter();
            painter.rect_filled(rect, egui::Rounding::same(4.0), self.theme.surface);

            let value = value.clamp(0.0, 1.0);
            let fill_rect = Rect::from_min_size(rect.min, Vec2::new(bar_width * value, bar_height));
            let color = if value > 0.7 {
                self.theme.success
            } else if value > 0.4 {
                self.theme.warning
            } else {
                self.theme.error
            };
            painter.rect_filled(fill_rect, egui::Rounding::same(4.0), color);

            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("{:.0}%", value * 100.0),
                egui::FontId::proportional(12.0),
                self.theme.text_primary,
            );
        });
    }
}

/// Position of `deg` along a full-turn bar, in `[0, 1)`.
fn angle_fraction(deg: u16) -> f32 {
    (deg % 360) as f32 / 360.0
}

impl Default for UIComponents {
    fn default() -> Self {
        Self::new()
    }
}
