use client_core::BadgeTone;
use eframe::egui;

pub const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
pub const SAFE_TEXT: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);
pub const RESULT_FILL: egui::Color32 = egui::Color32::from_rgb(240, 253, 244);
pub const BANNER_FILL: egui::Color32 = egui::Color32::from_rgb(111, 53, 53);
pub const BANNER_STROKE: egui::Color32 = egui::Color32::from_rgb(175, 96, 96);
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(99, 102, 241);

pub fn badge_color(tone: BadgeTone) -> egui::Color32 {
    match tone {
        BadgeTone::Safe => SAFE_TEXT,
        BadgeTone::Alert => ERROR_TEXT,
    }
}

pub fn lighten_color(c: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    egui::Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}

/// Light visuals with roomier inputs; applied once at startup.
pub fn apply_form_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::light();

    // Make text inputs reliably clickable and visible:
    style.visuals.widgets.inactive.bg_stroke =
        egui::Stroke::new(1.0, style.visuals.widgets.noninteractive.bg_stroke.color);
    style.visuals.widgets.active.bg_stroke =
        egui::Stroke::new(1.2, style.visuals.selection.bg_fill.gamma_multiply(0.9));

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.spacing.interact_size = egui::vec2(40.0, 30.0);
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_moves_towards_white_and_keeps_alpha() {
        let base = egui::Color32::from_rgba_unmultiplied(100, 0, 200, 255);
        assert_eq!(lighten_color(base, 0.0), base);
        assert_eq!(
            lighten_color(base, 1.0),
            egui::Color32::from_rgba_unmultiplied(255, 255, 255, 255)
        );
        assert_eq!(lighten_color(base, 0.5).r(), 178);
    }

    #[test]
    fn badge_colors_follow_tone() {
        assert_eq!(badge_color(BadgeTone::Safe), SAFE_TEXT);
        assert_eq!(badge_color(BadgeTone::Alert), ERROR_TEXT);
    }
}
