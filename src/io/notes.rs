/*
Note Names
==========

    name   = letter [accidental] octave
    letter = C D E F G A B         (case-insensitive)
    accidental = # | b
    octave = -1 ..= 9

    MIDI number = 12 * (octave + 1) + semitone(letter) + accidental

Middle C is C4 = 60, A4 = 69. Names are formatted with sharps; "Db4" parses
to the same number as "C#4" but prints back as "C#4".
*/

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

fn letter_semitone(letter: char) -> Option<i32> {
    let semitone = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    Some(semitone)
}

/// Parse a note name such as `"A4"`, `"C#5"` or `"Db3"` into a MIDI number.
pub fn parse_note(name: &str) -> Option<u8> {
    let name = name.trim();
    let mut chars = name.chars();
    let semitone = letter_semitone(chars.next()?)?;

    let rest = chars.as_str();
    let (accidental, octave) = match rest.as_bytes().first() {
        Some(b'#') => (1, &rest[1..]),
        Some(b'b') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    let octave: i32 = octave.parse().ok()?;
    if !(-1..=9).contains(&octave) {
        return None;
    }

    let note = 12 * (octave + 1) + semitone + accidental;
    u8::try_from(note).ok().filter(|&n| n <= 127)
}

/// Sharp-spelled name of a MIDI note, e.g. `61` -> `"C#4"`.
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", SHARP_NAMES[note as usize % 12], octave)
}

/// Shift by `semitones`, or `None` when the result leaves 0..=127.
pub fn transpose(note: u8, semitones: i32) -> Option<u8> {
    let shifted = note as i32 + semitones;
    u8::try_from(shifted).ok().filter(|&n| n <= 127)
}
