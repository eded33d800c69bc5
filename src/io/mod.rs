// Purpose - note naming, MIDI number conversions, computer keyboard layout

pub mod converter;
pub mod keyboard;
pub mod notes;

pub use converter::{freq_to_midi_note, midi_note_to_freq};
pub use keyboard::{key_to_note, KEYBOARD_BASE_NOTE};
pub use notes::{note_name, parse_note, transpose};
