//! Keyboard handling and the main loop

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use rtrb::Consumer;

use keytone::{
    io::{key_to_note, midi_note_to_freq, note_name},
    Effect, Synthesizer, VoiceId, Waveform,
};

use crate::ui::{self, Status};

/// How long a note sounds after its last key press when the terminal
/// cannot report key releases. Longer than a typical key-repeat delay so a
/// held key keeps its note.
const GATE: Duration = Duration::from_millis(600);
const VELOCITY: f32 = 0.8;
const VOLUME_STEP: f32 = 0.05;
const MAX_OCTAVE_SHIFT: i32 = 3;
/// Samples kept for the scope
const SCOPE_SIZE: usize = 1024;

struct HeldKey {
    id: VoiceId,
    note: u8,
    last_press: Instant,
}

pub struct App {
    synth: Synthesizer,
    monitor: Option<Consumer<f32>>,
    key_release: bool,
    octave_shift: i32,
    held: HashMap<char, HeldKey>,
    scope: Vec<f32>,
    should_quit: bool,
}

impl App {
    pub fn new(mut synth: Synthesizer, key_release: bool) -> Self {
        let monitor = synth.take_monitor();
        Self {
            synth,
            monitor,
            key_release,
            octave_shift: 0,
            held: HashMap::new(),
            scope: vec![0.0; SCOPE_SIZE],
            should_quit: false,
        }
    }

    /// Run until Esc, then stop the stream.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_monitor();
            if !self.key_release {
                self.release_expired();
            }

            let status = self.status();
            terminal.draw(|frame| ui::render(frame, &status, &self.scope))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        self.synth.all_notes_off();
        self.synth.stop()
    }

    fn poll_monitor(&mut self) {
        let Some(monitor) = self.monitor.as_mut() else {
            return;
        };

        let mut received = false;
        while let Ok(sample) = monitor.pop() {
            self.scope.push(sample);
            received = true;
        }

        if received && self.scope.len() > SCOPE_SIZE {
            let excess = self.scope.len() - SCOPE_SIZE;
            self.scope.drain(0..excess);
        }
    }

    fn release_expired(&mut self) {
        let now = Instant::now();
        let synth = &mut self.synth;
        self.held.retain(|_, held| {
            let sounding = now.duration_since(held.last_press) < GATE;
            if !sounding {
                synth.note_off(held.id);
            }
            sounding
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Release => {
                if let KeyCode::Char(c) = key.code {
                    self.release_key(c);
                }
                return;
            }
            // with release events a held key has already started its note
            KeyEventKind::Repeat => return,
            KeyEventKind::Press => {}
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Left => self.shift_octave(-1),
            KeyCode::Right => self.shift_octave(1),
            KeyCode::Up => self.nudge_volume(VOLUME_STEP),
            KeyCode::Down => self.nudge_volume(-VOLUME_STEP),
            KeyCode::F(n @ 1..=4) => {
                let waveform = Waveform::ALL[usize::from(n - 1)];
                self.synth.set_waveform(waveform);
            }
            KeyCode::F(n @ 5..=7) => {
                let effect = Effect::CHAIN[usize::from(n - 5)];
                let enabled = !self.synth.params().effects.is_enabled(effect);
                self.synth.toggle_effect(effect, enabled);
            }
            KeyCode::Char(' ') => {
                self.held.clear();
                self.synth.all_notes_off();
            }
            KeyCode::Char(c) => self.press_key(c),
            _ => {}
        }
    }

    fn press_key(&mut self, c: char) {
        let c = c.to_ascii_lowercase();
        if let Some(held) = self.held.get_mut(&c) {
            // key repeat while the gate is open
            held.last_press = Instant::now();
            return;
        }

        let Some(note) = key_to_note(c, self.octave_shift) else {
            return;
        };
        if let Some(id) = self
            .synth
            .note_event(midi_note_to_freq(note), true, VELOCITY)
        {
            self.held.insert(
                c,
                HeldKey {
                    id,
                    note,
                    last_press: Instant::now(),
                },
            );
        }
    }

    fn release_key(&mut self, c: char) {
        if let Some(held) = self.held.remove(&c.to_ascii_lowercase()) {
            self.synth.note_off(held.id);
        }
    }

    fn shift_octave(&mut self, delta: i32) {
        self.octave_shift = (self.octave_shift + delta).clamp(-MAX_OCTAVE_SHIFT, MAX_OCTAVE_SHIFT);
    }

    fn nudge_volume(&mut self, delta: f32) {
        let volume = self.synth.params().master_volume + delta;
        self.synth.set_master_volume(volume);
    }

    fn status(&self) -> Status {
        let mut held: Vec<u8> = self.held.values().map(|h| h.note).collect();
        held.sort_unstable();

        let lowest = key_to_note('z', self.octave_shift);
        let highest = key_to_note('u', self.octave_shift);
        let range = match (lowest, highest) {
            (Some(low), Some(high)) => format!("{}-{}", note_name(low), note_name(high)),
            _ => "-".to_string(),
        };

        Status {
            params: *self.synth.params(),
            active_voices: self.synth.active_voice_count(),
            octave_shift: self.octave_shift,
            keyboard_range: range,
            held: held.into_iter().map(note_name).collect(),
            device: self.synth.device_name().unwrap_or("stopped").to_string(),
            key_release: self.key_release,
        }
    }
}
