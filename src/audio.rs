//! Audio sources feeding a [`SpeechSession`].
//!
//! Everything here speaks 16-bit mono PCM at [`SAMPLE_RATE`]. Recordings can
//! come from a WAV file or, with the `microphone` feature, from the default
//! input device.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{debug, info};

use crate::error::AudioError;
use crate::voice::speech::{SpeechSession, SAMPLE_RATE};

/// Samples handed to the speech session per read.
pub const CHUNK_SAMPLES: usize = 1024;

/// Something that produces audio in chunks. An empty chunk means the source
/// is exhausted.
pub trait AudioSource {
    fn read_chunk(&mut self, max_samples: usize) -> Result<Vec<i16>, AudioError>;
}

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Wraps mono samples in an in-memory WAV file.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        // Writing into a Vec cannot fail.
        let mut writer = WavWriter::new(&mut cursor, wav_spec(sample_rate))
            .expect("in-memory WAV header");
        for &sample in samples {
            writer.write_sample(sample).expect("in-memory WAV sample");
        }
        writer.finalize().expect("in-memory WAV finalize");
    }
    cursor.into_inner()
}

/// Writes mono samples to a WAV file on disk.
pub fn save_wav(path: impl AsRef<Path>, samples: &[i16], sample_rate: u32) -> Result<(), AudioError> {
    let mut writer = WavWriter::create(path, wav_spec(sample_rate)).map_err(wav_error)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)
}

fn wav_error(err: hound::Error) -> AudioError {
    match err {
        hound::Error::IoError(io) => AudioError::Io(io),
        other => AudioError::UnsupportedWav(other.to_string()),
    }
}

/// Plays back a recorded WAV file.
pub struct WavFileSource {
    samples: Vec<i16>,
    position: usize,
}

impl WavFileSource {
    /// Loads a 16-bit mono file recorded at [`SAMPLE_RATE`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let reader = WavReader::open(path).map_err(wav_error)?;
        let spec = reader.spec();
        if spec.channels != 1
            || spec.bits_per_sample != 16
            || spec.sample_format != SampleFormat::Int
        {
            return Err(AudioError::UnsupportedWav(format!(
                "{}: expected 16-bit mono PCM, got {} channel(s) at {} bits",
                path.display(),
                spec.channels,
                spec.bits_per_sample
            )));
        }
        if spec.sample_rate != SAMPLE_RATE {
            return Err(AudioError::UnsupportedWav(format!(
                "{}: expected {} Hz, got {} Hz",
                path.display(),
                SAMPLE_RATE,
                spec.sample_rate
            )));
        }

        let samples = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wav_error)?;
        debug!(path = %path.display(), samples = samples.len(), "Loaded WAV file");
        Ok(Self {
            samples,
            position: 0,
        })
    }

    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }
}

impl AudioSource for WavFileSource {
    fn read_chunk(&mut self, max_samples: usize) -> Result<Vec<i16>, AudioError> {
        let end = (self.position + max_samples).min(self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;
        Ok(chunk)
    }
}

/// Feeds `source` into `session` until the session has heard a complete
/// utterance or the source runs dry. Blocks for the whole utterance.
pub fn capture_utterance(
    source: &mut dyn AudioSource,
    session: &mut SpeechSession,
) -> Result<(), AudioError> {
    info!("Listening...");
    loop {
        let chunk = source.read_chunk(CHUNK_SAMPLES)?;
        if chunk.is_empty() {
            debug!("Audio source exhausted");
            break;
        }
        if session.fill(&chunk) {
            break;
        }
    }
    Ok(())
}

#[cfg(feature = "microphone")]
pub use microphone::MicrophoneSource;

#[cfg(feature = "microphone")]
mod microphone {
    use std::sync::mpsc::{channel, Receiver};

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{Stream, StreamConfig};
    use tracing::warn;

    use super::{AudioSource, SAMPLE_RATE};
    use crate::error::AudioError;

    /// Live capture from the default input device.
    pub struct MicrophoneSource {
        // Capture stops when the stream is dropped.
        _stream: Stream,
        receiver: Receiver<Vec<i16>>,
        pending: Vec<i16>,
    }

    impl MicrophoneSource {
        pub fn open_default() -> Result<Self, AudioError> {
            let device = cpal::default_host()
                .default_input_device()
                .ok_or_else(|| AudioError::Device("No input device".to_string()))?;
            let config = StreamConfig {
                channels: 1,
                sample_rate: cpal::SampleRate(SAMPLE_RATE),
                buffer_size: cpal::BufferSize::Default,
            };

            let (sender, receiver) = channel();
            let stream = device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let samples = data
                            .iter()
                            .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                            .collect();
                        // The receiver is gone once the source is dropped.
                        let _ = sender.send(samples);
                    },
                    |err| warn!("Audio stream error: {}", err),
                    None,
                )
                .map_err(|e| AudioError::Device(e.to_string()))?;
            stream
                .play()
                .map_err(|e| AudioError::Device(e.to_string()))?;

            Ok(Self {
                _stream: stream,
                receiver,
                pending: Vec::new(),
            })
        }
    }

    impl AudioSource for MicrophoneSource {
        fn read_chunk(&mut self, max_samples: usize) -> Result<Vec<i16>, AudioError> {
            while self.pending.len() < max_samples {
                match self.receiver.recv() {
                    Ok(samples) => self.pending.extend(samples),
                    Err(_) => break,
                }
            }
            let take = max_samples.min(self.pending.len());
            Ok(self.pending.drain(..take).collect())
        }
    }
}
