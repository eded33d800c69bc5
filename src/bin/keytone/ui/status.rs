//! Status panel - waveform, volume, envelope, effects and voices

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use keytone::{Effect, SynthParams};

/// Snapshot of everything the panel shows, taken once per frame.
pub struct Status {
    pub params: SynthParams,
    pub active_voices: usize,
    pub octave_shift: i32,
    pub keyboard_range: String,
    pub held: Vec<String>,
    pub device: String,
    pub key_release: bool,
}

/// Peak and RMS of the scope buffer
struct AudioStats {
    peak: f32,
    rms: f32,
}

impl AudioStats {
    fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{text} "), Style::default().fg(Color::DarkGray))
}

fn effect_span(name: &str, enabled: bool, detail: String) -> Span<'static> {
    let (mark, color) = if enabled {
        ("●", Color::Green)
    } else {
        ("○", Color::DarkGray)
    };
    Span::styled(format!("{mark} {name} {detail}   "), Style::default().fg(color))
}

pub fn render_status(frame: &mut Frame, area: Rect, status: &Status, scope: &[f32]) {
    let block = Block::default().title(" keytone ").borders(Borders::ALL);
    let params = &status.params;
    let env = &params.envelope;
    let fx = &params.effects;
    let stats = AudioStats::from_buffer(scope);

    let sound = Line::from(vec![
        label("Wave"),
        Span::styled(
            format!("{:<10}", params.waveform.to_string()),
            Style::default().fg(Color::Cyan),
        ),
        label("Volume"),
        Span::styled(
            format!("{:.2}   ", params.master_volume),
            Style::default().fg(Color::Cyan),
        ),
        label("ADSR"),
        Span::styled(
            format!(
                "{:.2}s {:.2}s {:.2} {:.2}s",
                env.attack, env.decay, env.sustain, env.release
            ),
            Style::default().fg(Color::White),
        ),
    ]);

    let effects = Line::from(vec![
        effect_span(
            Effect::Tremolo.name(),
            fx.tremolo.enabled,
            format!("{:.1}Hz/{:.2}", fx.tremolo.rate, fx.tremolo.depth),
        ),
        effect_span(
            Effect::Delay.name(),
            fx.delay.enabled,
            format!("{:.2}s/{:.2}", fx.delay.time, fx.delay.feedback),
        ),
        effect_span(
            Effect::Reverb.name(),
            fx.reverb.enabled,
            format!("{:.2}", fx.reverb.room_size),
        ),
    ]);

    let voices = Line::from(vec![
        label("Voices"),
        Span::styled(
            format!("{:<4}", status.active_voices),
            Style::default().fg(Color::Yellow),
        ),
        label("Octave"),
        Span::styled(
            format!("{:+} ({})   ", status.octave_shift, status.keyboard_range),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let held = if status.held.is_empty() {
        "-".to_string()
    } else {
        status.held.join(" ")
    };
    let notes = Line::from(vec![
        label("Held"),
        Span::styled(held, Style::default().fg(Color::Green)),
    ]);

    let mode = if status.key_release {
        "key release"
    } else {
        "gated"
    };
    let device = Line::from(vec![
        label("Output"),
        Span::styled(
            format!("{}  ({mode})", status.device),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(vec![sound, effects, voices, notes, device]).block(block);
    frame.render_widget(paragraph, area);
}
