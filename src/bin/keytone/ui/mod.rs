//! TUI module for keytone
//!
//! Status panel on top, output oscilloscope below, key help at the bottom.

mod status;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub use status::Status;

use status::render_status;
use waveform::render_waveform;

const HELP: &str = concat!(
    " [z..m q..u] Play  [←/→] Octave  [F1-F4] Wave  [F5-F7] FX",
    "  [↑/↓] Volume  [Space] All off  [Esc] Quit",
);

pub fn render(frame: &mut Frame, status: &Status, scope: &[f32]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status
            Constraint::Min(8),    // Scope
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status(frame, chunks[0], status, scope);
    render_waveform(frame, chunks[1], scope);

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
