// UI components: the bar visualizer (the loop's render target) and the
// transport line. Shared color helpers live here too.

pub mod spectrum_bars;
pub mod transport;

use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::Frame;

use crate::action::Action;

pub trait Component {
    /// Handle an action dispatched by App. Return optional follow-up actions.
    fn update(&mut self, action: &Action) -> anyhow::Result<Vec<Action>> {
        let _ = action;
        Ok(vec![])
    }

    /// Render this component into the given area.
    fn draw(&self, frame: &mut Frame, area: Rect);
}

/// Linear interpolation between two ratatui colors in RGB space.
pub fn blend_colors(c1: Color, c2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let (r1, g1, b1) = color_to_rgb(c1);
    let (r2, g2, b2) = color_to_rgb(c2);
    Color::Rgb(
        (r1 as f32 * (1.0 - t) + r2 as f32 * t) as u8,
        (g1 as f32 * (1.0 - t) + g2 as f32 * t) as u8,
        (b1 as f32 * (1.0 - t) + b2 as f32 * t) as u8,
    )
}

/// Approximate RGB for the named colors the bars use.
pub fn color_to_rgb(c: Color) -> (u8, u8, u8) {
    match c {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Magenta => (188, 63, 188),
        Color::LightMagenta => (214, 112, 214),
        Color::Blue => (36, 114, 200),
        Color::Cyan => (17, 168, 205),
        Color::White => (229, 229, 229),
        _ => (180, 180, 180),
    }
}
