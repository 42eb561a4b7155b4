// Spectrum bars: the visualizer loop's render target. Keeps its own copy of
// the last emitted bars plus peak-hold markers, and draws them as braille
// columns with a purple -> indigo -> violet gradient.

use ratatui::{layout::Rect, style::Color, Frame};

use super::{blend_colors, Component};
use crate::visualizer::RenderAdapter;

// Braille cell: 2 dots wide, 4 dots tall. Bit for (dx, dy).
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

const GRADIENT: [Color; 3] = [
    Color::Rgb(147, 51, 234),
    Color::Rgb(99, 102, 241),
    Color::Rgb(192, 132, 252),
];

pub struct SpectrumBars {
    bars: Vec<f32>,
    peaks: Vec<f32>,
    peak_fall: Vec<f32>,
    frames_rendered: u64,
}

impl SpectrumBars {
    pub fn new(bar_count: usize) -> Self {
        Self {
            bars: vec![0.0; bar_count],
            peaks: vec![0.0; bar_count],
            peak_fall: vec![0.0; bar_count],
            frames_rendered: 0,
        }
    }

    pub fn bars(&self) -> &[f32] {
        &self.bars
    }

    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    /// Drop bars and peak markers at once, e.g. when the source goes away.
    pub fn clear(&mut self) {
        self.bars.fill(0.0);
        self.peaks.fill(0.0);
        self.peak_fall.fill(0.0);
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn color_at(height: f32) -> Color {
        if height < 0.5 {
            blend_colors(GRADIENT[0], GRADIENT[1], height * 2.0)
        } else {
            blend_colors(GRADIENT[1], GRADIENT[2], (height - 0.5) * 2.0)
        }
    }
}

impl RenderAdapter for SpectrumBars {
    fn render(&mut self, bars: &[f32]) {
        if bars.len() != self.bars.len() {
            self.bars.resize(bars.len(), 0.0);
            self.peaks.resize(bars.len(), 0.0);
            self.peak_fall.resize(bars.len(), 0.0);
        }
        self.bars.copy_from_slice(bars);

        // Peak hold: jumps up with the bar, then falls with growing speed.
        for ((peak, fall), &bar) in self
            .peaks
            .iter_mut()
            .zip(self.peak_fall.iter_mut())
            .zip(self.bars.iter())
        {
            if bar >= *peak {
                *peak = bar;
                *fall = 0.0;
            } else {
                *fall += 0.002;
                *peak = (*peak - *fall).max(bar);
            }
        }
        self.frames_rendered += 1;
    }
}

impl Component for SpectrumBars {
    fn draw(&self, frame: &mut Frame, area: Rect) {
        let bar_count = self.bars.len();
        if area.width == 0 || area.height == 0 || bar_count == 0 {
            return;
        }

        let cols = area.width as usize;
        let rows = area.height as usize;
        let dot_rows = rows * 4;
        let buf = frame.buffer_mut();

        for col in 0..cols {
            // Wide areas give each bar several columns with a one-column gap;
            // narrow ones sample every nth bar.
            let (bar_idx, is_gap) = if cols >= bar_count * 2 {
                let width = cols / bar_count;
                (col / width, col % width == width - 1)
            } else {
                (col * bar_count / cols, false)
            };
            if bar_idx >= bar_count || is_gap {
                continue;
            }

            let bar_h = self.bars[bar_idx] * dot_rows as f32;
            let peak_dot = (self.peaks[bar_idx] * dot_rows as f32).round() as usize;

            for row in 0..rows {
                let mut dots: u8 = 0;
                let mut is_peak = false;
                for dy in 0..4 {
                    let y_from_bottom = dot_rows - 1 - (row * 4 + dy);
                    let lit = (y_from_bottom as f32) < bar_h;
                    let peak_here = peak_dot > 0 && y_from_bottom + 1 == peak_dot;
                    if lit || peak_here {
                        dots |= DOT_BITS[0][dy] | DOT_BITS[1][dy];
                        is_peak |= peak_here && !lit;
                    }
                }
                if dots == 0 {
                    continue;
                }

                let ch = char::from_u32(0x2800 + dots as u32).unwrap_or(' ');
                let height = 1.0 - row as f32 / rows as f32;
                let color = if is_peak {
                    Color::White
                } else {
                    Self::color_at(height)
                };
                let x = area.x + col as u16;
                let y = area.y + row as u16;
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(ch);
                    cell.set_fg(color);
                }
            }
        }
    }
}
