/// MIDI note played by `z` with no octave shift (C4).
pub const KEYBOARD_BASE_NOTE: u8 = 60;

/// Two piano octaves on a QWERTY keyboard. The bottom letter row plus the
/// home row play C4..B4, the top letter row plus the digits C5..B5.
const LAYOUT: [(char, u8); 24] = [
    ('z', 0),
    ('s', 1),
    ('x', 2),
    ('d', 3),
    ('c', 4),
    ('v', 5),
    ('g', 6),
    ('b', 7),
    ('h', 8),
    ('n', 9),
    ('j', 10),
    ('m', 11),
    ('q', 12),
    ('2', 13),
    ('w', 14),
    ('3', 15),
    ('e', 16),
    ('r', 17),
    ('5', 18),
    ('t', 19),
    ('6', 20),
    ('y', 21),
    ('7', 22),
    ('u', 23),
];

/// Semitones above the base note for a key, ignoring case.
pub fn key_offset(key: char) -> Option<u8> {
    let key = key.to_ascii_lowercase();
    LAYOUT
        .iter()
        .find(|&&(k, _)| k == key)
        .map(|&(_, offset)| offset)
}

/// MIDI note for a key after shifting the layout by `octave_shift` octaves.
pub fn key_to_note(key: char, octave_shift: i32) -> Option<u8> {
    let offset = key_offset(key)?;
    let note = KEYBOARD_BASE_NOTE as i32 + offset as i32 + 12 * octave_shift;
    u8::try_from(note).ok().filter(|&n| n <= 127)
}
