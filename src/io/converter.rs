/// A4, the tuning reference.
pub const A4_NOTE: u8 = 69;
pub const A4_FREQ: f32 = 440.0;

/// Equal-tempered frequency of a MIDI note.
pub fn midi_note_to_freq(note: u8) -> f32 {
    A4_FREQ * 2.0_f32.powf((note as f32 - A4_NOTE as f32) / 12.0)
}

/// Nearest MIDI note for `freq`, or `None` outside 0..=127.
pub fn freq_to_midi_note(freq: f32) -> Option<u8> {
    if !(freq.is_finite() && freq > 0.0) {
        return None;
    }
    let note = (A4_NOTE as f32 + 12.0 * (freq / A4_FREQ).log2()).round();
    (0.0..=127.0).contains(&note).then_some(note as u8)
}
