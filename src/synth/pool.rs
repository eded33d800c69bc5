use crate::dsp::{EnvelopeParams, Waveform};

use super::voice::{Voice, VoiceId};

/// Append `id` unless `removed` is at its reserved capacity.
///
/// Reporting never grows the vector; ids past the reservation are dropped.
#[inline]
pub fn report_removed(removed: &mut Vec<VoiceId>, id: VoiceId) {
    if removed.len() < removed.capacity() {
        removed.push(id);
    }
}

/// Owns every sounding voice.
///
/// Storage is reserved up front for `max_voices` voices and one block of
/// scratch, so nothing here allocates on the audio thread. Voices keep
/// insertion order; mixing is a plain sum so order does not change the
/// result.
pub struct VoicePool {
    voices: Vec<Voice>,
    max_voices: usize,
    osc_scratch: Vec<f32>,
    gain_scratch: Vec<f32>,
}

impl VoicePool {
    pub fn new(max_voices: usize, max_block: usize) -> Self {
        let max_voices = max_voices.max(1);
        Self {
            voices: Vec::with_capacity(max_voices),
            max_voices,
            osc_scratch: vec![0.0; max_block],
            gain_scratch: vec![0.0; max_block],
        }
    }

    /// Start a voice. Returns the id of a voice stolen to make room.
    ///
    /// When the pool is full the oldest releasing voice is replaced; if
    /// nothing is releasing, the oldest voice overall. An id that is already
    /// sounding is ignored.
    pub fn note_on(
        &mut self,
        id: VoiceId,
        frequency: f32,
        velocity: f32,
        params: EnvelopeParams,
        sample_rate: f32,
        frame: u64,
    ) -> Option<VoiceId> {
        if self.contains(id) {
            return None;
        }

        let stolen = if self.voices.len() >= self.max_voices {
            self.steal_index().map(|idx| self.voices.remove(idx).id())
        } else {
            None
        };

        self.voices
            .push(Voice::new(id, frequency, velocity, params, sample_rate, frame));
        stolen
    }

    fn steal_index(&self) -> Option<usize> {
        let releasing = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_releasing())
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx);

        releasing.or_else(|| {
            self.voices
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| v.age())
                .map(|(idx, _)| idx)
        })
    }

    /// Request release. Unknown ids are ignored.
    pub fn note_off(&mut self, id: VoiceId) {
        if let Some(voice) = self.voices.iter_mut().find(|v| v.id() == id) {
            voice.release();
        }
    }

    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Drop every voice immediately, reporting their ids.
    pub fn clear(&mut self, removed: &mut Vec<VoiceId>) {
        for voice in &self.voices {
            report_removed(removed, voice.id());
        }
        self.voices.clear();
    }

    /// Mix one block of every voice into `mix` (overwritten).
    ///
    /// Voices whose envelope finished during this block are removed and
    /// their ids appended to `removed` (see `report_removed`). `mix` must not
    /// be longer than the scratch reserved at construction.
    pub fn render(
        &mut self,
        mix: &mut [f32],
        waveform: Waveform,
        sample_rate: f32,
        removed: &mut Vec<VoiceId>,
    ) {
        mix.fill(0.0);
        let len = mix.len().min(self.osc_scratch.len());
        let mix = &mut mix[..len];
        let osc = &mut self.osc_scratch[..len];
        let gain = &mut self.gain_scratch[..len];

        for voice in &mut self.voices {
            voice.render(mix, osc, gain, waveform, sample_rate);
        }

        self.voices.retain(|voice| {
            if voice.is_finished() {
                report_removed(removed, voice.id());
                false
            } else {
                true
            }
        });
    }

    pub fn contains(&self, id: VoiceId) -> bool {
        self.voices.iter().any(|v| v.id() == id)
    }

    pub fn get(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id() == id)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
