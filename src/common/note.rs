use micromath::F32Ext;

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number (with a fractional part).
/// A4 at 440 Hz is note 69.
pub fn freq_to_midi_note(freq: f32) -> f32 {
    12.0 * F32Ext::log2(freq) - 36.376316562295926
}

/// The equal tempered note closest to a detected frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEstimate {
    /// The MIDI note number of the nearest semitone.
    pub note_number: u8,
    /// Deviation from the nearest semitone in cents, in `[-50, 50]`.
    pub cents: f32,
}

impl NoteEstimate {
    /// Returns `None` for non-positive frequencies, including the `0.0`
    /// "no pitch" value, and for frequencies outside the MIDI note range.
    pub fn from_frequency(freq: f32) -> Option<NoteEstimate> {
        if !(freq > 0.0) {
            return None;
        }
        let note = freq_to_midi_note(freq);
        let nearest = F32Ext::floor(note + 0.5);
        if !(0.0..=127.0).contains(&nearest) {
            return None;
        }
        Some(NoteEstimate {
            note_number: nearest as u8,
            cents: 100.0 * (note - nearest),
        })
    }
}
