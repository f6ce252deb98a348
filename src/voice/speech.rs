//! Streaming speech requests.
//!
//! Audio is fed chunk by chunk while the user speaks. The session decides when
//! the utterance is over (speech followed by a stretch of silence, or the
//! length cap) and then ships the whole recording to the assistant.

use std::time::Duration;
use tracing::debug;

use super::{VoiceApi, VoiceResponse};
use crate::audio::encode_wav;
use crate::constants::{MAX_UTTERANCE_SECS, SPEECH_THRESHOLD, TRAILING_SILENCE_MS};
use crate::error::VoiceApiError;

/// Sample rate Houndify expects for 16-bit PCM input.
pub const SAMPLE_RATE: u32 = 16_000;

/// Defaults come from `CARCHAT_SPEECH_THRESHOLD`, `CARCHAT_TRAILING_SILENCE_MS`
/// and `CARCHAT_MAX_UTTERANCE_SECS` when set.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    pub sample_rate: u32,
    /// RMS level above which a chunk counts as speech.
    pub speech_threshold: f64,
    /// Silence after speech that ends the utterance.
    pub trailing_silence: Duration,
    pub max_utterance: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            speech_threshold: *SPEECH_THRESHOLD,
            trailing_silence: Duration::from_millis(*TRAILING_SILENCE_MS),
            max_utterance: Duration::from_secs(*MAX_UTTERANCE_SECS),
        }
    }
}

impl SpeechConfig {
    fn samples_for(&self, duration: Duration) -> usize {
        (duration.as_millis() * self.sample_rate as u128 / 1000) as usize
    }
}

pub struct SpeechSession {
    config: SpeechConfig,
    samples: Vec<i16>,
    heard_speech: bool,
    silent_samples: usize,
    done: bool,
}

fn rms(chunk: &[i16]) -> f64 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum: f64 = chunk.iter().map(|s| (*s as f64) * (*s as f64)).sum();
    (sum / chunk.len() as f64).sqrt()
}

impl SpeechSession {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            config,
            samples: Vec::new(),
            heard_speech: false,
            silent_samples: 0,
            done: false,
        }
    }

    /// Adds a chunk of mono 16-bit samples. Returns `true` once the utterance
    /// is complete; later chunks are dropped.
    pub fn fill(&mut self, chunk: &[i16]) -> bool {
        if self.done {
            return true;
        }
        self.samples.extend_from_slice(chunk);

        if rms(chunk) >= self.config.speech_threshold {
            self.heard_speech = true;
            self.silent_samples = 0;
        } else if self.heard_speech {
            self.silent_samples += chunk.len();
        }

        let silence_over = self.heard_speech
            && self.silent_samples >= self.config.samples_for(self.config.trailing_silence);
        let too_long = self.samples.len() >= self.config.samples_for(self.config.max_utterance);
        if silence_over || too_long {
            debug!(
                samples = self.samples.len(),
                silence_over, too_long, "End of utterance"
            );
            self.done = true;
        }
        self.done
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn heard_speech(&self) -> bool {
        self.heard_speech
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Recording so far as a WAV file.
    pub fn to_wav(&self) -> Vec<u8> {
        encode_wav(&self.samples, self.config.sample_rate)
    }

    /// Sends the recording to the assistant.
    pub async fn finish(self, voice: &dyn VoiceApi) -> Result<VoiceResponse, VoiceApiError> {
        debug!(samples = self.samples.len(), "Sending utterance");
        voice.query_audio(self.to_wav()).await
    }
}
