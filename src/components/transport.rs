// Transport line: playback status, title, position, gain and a peak meter,
// followed by the visualizer's own diagnostics.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::visualizer::{LoopState, LoopStats};

const METER_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

pub struct Transport {
    pub status: PlaybackStatus,
    pub title: Option<String>,
    pub position_secs: f64,
    pub gain: f32,
    pub peak: f32,
    loop_state: LoopState,
    loop_stats: LoopStats,
}

impl Transport {
    pub fn new(gain: f32) -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            title: None,
            position_secs: 0.0,
            gain,
            peak: 0.0,
            loop_state: LoopState::Idle,
            loop_stats: LoopStats::default(),
        }
    }

    pub fn set_diagnostics(&mut self, state: LoopState, stats: LoopStats) {
        self.loop_state = state;
        self.loop_stats = stats;
    }

    fn meter(&self) -> String {
        let filled = (self.peak.clamp(0.0, 1.0) * METER_WIDTH as f32).round() as usize;
        format!("{}{}", "█".repeat(filled), "░".repeat(METER_WIDTH - filled))
    }
}

impl Component for Transport {
    fn update(&mut self, action: &Action) -> anyhow::Result<Vec<Action>> {
        match action {
            Action::PlaybackStarted { title } => {
                self.status = PlaybackStatus::Playing;
                self.title = Some(title.clone());
                self.position_secs = 0.0;
            }
            Action::PlaybackPaused => self.status = PlaybackStatus::Paused,
            Action::PlaybackResumed => self.status = PlaybackStatus::Playing,
            Action::PlaybackStopped => {
                self.status = PlaybackStatus::Stopped;
                self.title = None;
                self.position_secs = 0.0;
                self.peak = 0.0;
            }
            Action::PlaybackProgress {
                position_secs,
                peak,
            } => {
                self.position_secs = *position_secs;
                self.peak = *peak;
            }
            Action::GainChanged(gain) => self.gain = *gain,
            _ => {}
        }
        Ok(vec![])
    }

    fn draw(&self, frame: &mut Frame, area: Rect) {
        let (icon, color) = match self.status {
            PlaybackStatus::Playing => ("▶", Color::Cyan),
            PlaybackStatus::Paused => ("⏸", Color::Yellow),
            PlaybackStatus::Stopped => ("■", Color::DarkGray),
        };
        let title = self.title.as_deref().unwrap_or("Nothing playing");
        let mins = self.position_secs as u64 / 60;
        let secs = self.position_secs as u64 % 60;

        let status_line = Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(color)),
            Span::styled(
                title.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}:{:02}", mins, secs)),
            Span::styled(
                format!("  gain {:.2}  ", self.gain),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(self.meter(), Style::default().fg(Color::Magenta)),
        ]);

        let stats = &self.loop_stats;
        let diag_line = Line::from(Span::styled(
            format!(
                " {:?} · frames {} · decays {} · faults {}",
                self.loop_state, stats.frames_reduced, stats.decay_steps, stats.source_faults
            ),
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(Paragraph::new(vec![status_line, diag_line]), area);
    }
}
