use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Bar chart colours
// ---------------------------------------------------------------------------

/// Hue of the first bar; the rest are spread evenly around the wheel from here.
const START_HUE: f32 = 210.0;

/// `n` visually distinct bar colours. Lightness alternates so neighbouring bars stay
/// distinguishable when `n` is large.
pub fn bar_colors(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (START_HUE + i as f32 / n as f32 * 360.0) % 360.0;
            let lightness = if i % 2 == 0 { 0.55 } else { 0.45 };
            to_color32(Hsl::new(hue, 0.65, lightness))
        })
        .collect()
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}
