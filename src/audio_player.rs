use crossbeam::channel::Sender;
use rodio::Source;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use crate::error::{InitFailureCode, PlayerError, Result};

pub type SampleRate = u32;

/// What the player screen needs from an audio backend.
///
/// Positions are in seconds. `duration` is fixed for the lifetime of the player.
pub trait AudioPlayer {
    fn play(&mut self);
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn duration(&self) -> f64;
}

/// Notifications sent from the audio thread to the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    Finished { successfully: bool },
}

// Decoded samples of the whole asset, interleaved
pub type Samples = Arc<[f32]>;

#[derive(Clone)]
pub struct AudioFile {
    samples: Samples,
    sample_rate: SampleRate,
    channels: u16,
    // Index into `samples`, shared between the appended source and the player
    cursor: Arc<AtomicUsize>,
    events_tx: Sender<PlayerEvent>,
    // Samples this source has handed to the mixer, for channel alignment
    emitted: usize,
    finished: bool,
}

impl Iterator for AudioFile {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let channels = usize::from(self.channels);
        let slot = self.emitted % channels;
        let mut pos = self.cursor.fetch_add(1, Ordering::Relaxed);
        if pos % channels != slot {
            // a seek landed mid-frame, keep feeding the channel the mixer expects
            pos = pos - pos % channels + slot;
            self.cursor.store(pos + 1, Ordering::Relaxed);
        }
        self.emitted += 1;
        if let Some(sample) = self.samples.get(pos) {
            return Some(*sample);
        }
        self.finished = true;
        self.cursor.store(0, Ordering::Relaxed);
        // the screen may already be gone
        let _ = self.events_tx.send(PlayerEvent::Finished { successfully: true });
        None
    }
}

impl Source for AudioFile {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> rodio::ChannelCount {
        self.channels
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(self.duration_secs()))
    }
}

impl AudioFile {
    pub fn decode(bytes: &'static [u8], events_tx: Sender<PlayerEvent>) -> Result<Self> {
        let (samples, sample_rate, channels) = Self::decode_samples(bytes)?;
        Self::from_samples(samples, sample_rate, channels, events_tx)
    }

    /// Wraps interleaved samples. Fails on empty audio or a zero rate/channel count.
    pub fn from_samples(
        samples: Vec<f32>,
        sample_rate: SampleRate,
        channels: u16,
        events_tx: Sender<PlayerEvent>,
    ) -> Result<Self> {
        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            return Err(PlayerError::init_failed(
                InitFailureCode::Decode,
                "asset decoded to no audio",
            ));
        }
        Ok(AudioFile {
            samples: samples.into(),
            sample_rate,
            channels,
            cursor: Arc::new(AtomicUsize::new(0)),
            events_tx,
            emitted: 0,
            finished: false,
        })
    }

    fn decode_samples(bytes: &'static [u8]) -> Result<(Vec<f32>, SampleRate, u16)> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        // No extension to hint with, the probe sniffs the container.
        let hint = Hint::new();
        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
        let mut format = probed.format;

        // First audio track with a known (decodeable) codec.
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| {
                PlayerError::init_failed(InitFailureCode::NoTrack, "no supported audio tracks found")
            })?;

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &dec_opts)?;
        let track_id = track.id;

        let mut all_samples = Vec::<f32>::new();
        let mut sample_buf = None;
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(0);

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                // End of stream
                Err(Error::IoError(_)) => break,
                Err(err) => return Err(err.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(audio_buf) => {
                    if sample_buf.is_none() {
                        let spec = *audio_buf.spec();
                        sample_rate = spec.rate;
                        channels = spec.channels.count() as u16;
                        // capacity, not length
                        let capacity = audio_buf.capacity() as u64;
                        sample_buf = Some(SampleBuffer::<f32>::new(capacity, spec));
                    }

                    if let Some(buf) = &mut sample_buf {
                        buf.copy_interleaved_ref(audio_buf);
                        all_samples.extend_from_slice(buf.samples());
                    }
                }
                // a corrupt packet is skipped, not fatal
                Err(Error::DecodeError(msg)) => debug!("skipping undecodable packet: {msg}"),
                Err(err) => return Err(err.into()),
            }
        }

        Ok((all_samples, sample_rate, channels))
    }

    fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    pub fn position_secs(&self) -> f64 {
        let pos = self.cursor.load(Ordering::Relaxed).min(self.samples.len());
        (pos / usize::from(self.channels)) as f64 / f64::from(self.sample_rate)
    }

    /// Moves the shared cursor to the frame at `seconds`, clamped to the file.
    pub fn seek(&self, seconds: f64) {
        let frame = (seconds.max(0.0) * f64::from(self.sample_rate)) as usize;
        let frame = frame.min(self.frames());
        self.cursor
            .store(frame * usize::from(self.channels), Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels
    }
}

/// [`AudioPlayer`] backed by the default output device.
pub struct RodioPlayer {
    audio_file: AudioFile,
    _stream_handle: rodio::OutputStream,
    sink: rodio::Sink,
    duration: f64,
}

impl RodioPlayer {
    pub fn open(audio_file: AudioFile) -> Result<Self> {
        let _stream_handle = rodio::OutputStreamBuilder::open_default_stream()?;
        let sink = rodio::Sink::connect_new(_stream_handle.mixer());
        sink.pause();
        sink.append(audio_file.clone());
        let duration = audio_file.duration_secs();
        info!(
            duration,
            sample_rate = audio_file.sample_rate(),
            channels = audio_file.channel_count(),
            "audio player ready"
        );
        Ok(Self {
            audio_file,
            _stream_handle,
            sink,
            duration,
        })
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&mut self) {
        // the previous source ended, queue a fresh one on the shared cursor
        if self.sink.empty() {
            self.sink.append(self.audio_file.clone());
        }
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn current_time(&self) -> f64 {
        self.audio_file.position_secs().min(self.duration)
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.audio_file.seek(seconds.clamp(0.0, self.duration));
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    fn bundled() -> (AudioFile, crossbeam::channel::Receiver<PlayerEvent>) {
        let (tx, rx) = unbounded();
        let bytes = crate::assets::lookup("sound").unwrap();
        (AudioFile::decode(bytes, tx).unwrap(), rx)
    }

    #[test]
    fn decodes_bundled_asset() {
        let (file, _rx) = bundled();
        assert_eq!(file.sample_rate(), 11025);
        assert_eq!(file.channel_count(), 1);
        assert!((file.duration_secs() - 6.0).abs() < 0.01);
        assert_eq!(file.position_secs(), 0.0);
    }

    #[test]
    fn garbage_bytes_fail_to_initialize() {
        let (tx, _rx) = unbounded();
        let err = AudioFile::decode(b"definitely not audio", tx).err().unwrap();
        assert!(matches!(err, PlayerError::PlayerInitFailed { .. }));
    }

    #[test]
    fn seek_is_clamped_and_reads_back() {
        let (file, _rx) = bundled();
        file.seek(2.5);
        assert!((file.position_secs() - 2.5).abs() < 0.001);
        file.seek(-3.0);
        assert_eq!(file.position_secs(), 0.0);
        file.seek(1_000.0);
        assert!((file.position_secs() - file.duration_secs()).abs() < 0.001);
    }

    #[test]
    fn running_off_the_end_rewinds_and_notifies_once() {
        let (mut file, rx) = bundled();
        file.seek(file.duration_secs());
        assert_eq!(file.next(), None);
        assert_eq!(file.next(), None);
        assert_eq!(file.position_secs(), 0.0);
        assert_eq!(rx.try_recv(), Ok(PlayerEvent::Finished { successfully: true }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn seek_mid_frame_keeps_stereo_channels_in_order() {
        let (tx, _rx) = unbounded();
        // frame n is (left = 2n, right = 2n + 1)
        let samples: Vec<f32> = (0..20u8).map(f32::from).collect();
        let file = AudioFile::from_samples(samples, 2, 2, tx).unwrap();
        let mut source = file.clone();

        assert_eq!(source.next(), Some(0.0));
        // the mixer now expects a right sample
        file.seek(1.5);
        assert_eq!(source.next(), Some(7.0));
        assert_eq!(source.next(), Some(8.0));
        assert_eq!(source.next(), Some(9.0));
        assert!((file.position_secs() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn empty_samples_are_rejected() {
        let (tx, _rx) = unbounded();
        let err = AudioFile::from_samples(Vec::new(), 44100, 2, tx).err().unwrap();
        assert!(matches!(
            err,
            PlayerError::PlayerInitFailed {
                code: InitFailureCode::Decode,
                ..
            }
        ));
    }

    #[test]
    fn clones_share_the_cursor() {
        let (file, _rx) = bundled();
        let mut source = file.clone();
        for _ in 0..11025 {
            source.next();
        }
        assert!((file.position_secs() - 1.0).abs() < 0.001);
    }
}
