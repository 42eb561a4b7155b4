// Layout and rendering: bars panel on top, transport below, and the help
// overlay / error line composited over them.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::components::spectrum_bars::SpectrumBars;
use crate::components::transport::Transport;
use crate::components::Component;

pub struct DrawState<'a> {
    pub spectrum_bars: &'a SpectrumBars,
    pub transport: &'a Transport,
    pub error_message: &'a Option<String>,
    pub show_help: bool,
}

pub fn draw(frame: &mut Frame, state: &DrawState) {
    let error_height = if state.error_message.is_some() { 1 } else { 0 };
    let outer = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(error_height),
        Constraint::Length(2),
    ])
    .split(frame.area());

    let bars_block = Block::default()
        .borders(Borders::ALL)
        .title(" pulsebars ")
        .border_style(Style::default().fg(Color::DarkGray));
    let bars_area = bars_block.inner(outer[0]);
    frame.render_widget(bars_block, outer[0]);
    state.spectrum_bars.draw(frame, bars_area);

    if let Some(ref msg) = state.error_message {
        let error_line = Line::from(vec![
            Span::styled(" ⚠ ", Style::default().fg(Color::Red)),
            Span::styled(msg.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(Paragraph::new(error_line), outer[1]);
    }

    state.transport.draw(frame, outer[2]);

    if state.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let overlay_width = 40u16;
    let overlay_height = 13u16;
    let x = area.width.saturating_sub(overlay_width) / 2;
    let y = area.height.saturating_sub(overlay_height) / 2;
    let overlay_area = Rect::new(
        x,
        y,
        overlay_width.min(area.width),
        overlay_height.min(area.height),
    );

    frame.render_widget(Clear, overlay_area);

    let keybindings = [
        ("Space", "Play / pause"),
        ("n", "Next track"),
        ("s", "Stop"),
        ("← / →", "Seek -/+ 5s"),
        ("[ ]", "Gain down/up"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (key, desc) in &keybindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:10}", key), Style::default().fg(Color::Yellow)),
            Span::raw(*desc),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Keybindings ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
