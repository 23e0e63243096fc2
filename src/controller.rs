//! Play/pause state and the loop that keeps the slider and time label in step
//! with the audio player.
//!
//! The controller runs entirely on the event loop thread. It owns a
//! [`Screen`] model that the TUI renders and an optional [`Ticker`] that exists
//! only while playing.

use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::audio_player::{AudioPlayer, PlayerEvent};
use crate::error::PlayerError;
use crate::ticker::Ticker;
use crate::time_format::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// Progress slider. `tracking` is true while the user holds it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slider {
    value: f64,
    max: f64,
    tracking: bool,
}

impl Slider {
    pub fn new(max: f64) -> Self {
        Self {
            value: 0.0,
            max: max.max(0.0),
            tracking: false,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Position of the thumb in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.max > 0.0 {
            (self.value / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Non-finite values are ignored and the slider keeps its position.
    pub fn set_value(&mut self, value: f64) {
        if value.is_finite() {
            self.value = value.clamp(0.0, self.max);
        }
    }

    pub fn begin_tracking(&mut self) {
        self.tracking = true;
    }

    pub fn release(&mut self) {
        self.tracking = false;
    }
}

/// Everything the player screen displays.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub toggle_selected: bool,
    pub label: String,
    pub slider: Slider,
    /// Set when the screen came up without a working player.
    pub status: Option<String>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            toggle_selected: false,
            label: format_timestamp(0.0),
            slider: Slider::default(),
            status: None,
        }
    }
}

pub struct PlaybackController<P> {
    player: Option<P>,
    state: PlaybackState,
    ticker: Option<Ticker>,
    interval: Duration,
    screen: Screen,
}

impl<P: AudioPlayer> PlaybackController<P> {
    pub fn new(player: Option<P>, interval: Duration) -> Self {
        let mut screen = Screen::default();
        if let Some(player) = &player {
            screen.slider = Slider::new(player.duration());
            screen.slider.set_value(player.current_time());
            screen.label = format_timestamp(screen.slider.value());
        }
        Self {
            player,
            state: PlaybackState::Paused,
            ticker: None,
            interval,
            screen,
        }
    }

    /// Builds the inert controller used when the asset or player failed to load.
    pub fn failed(err: &PlayerError, interval: Duration) -> Self {
        warn!(error = %err, "playback controls disabled");
        let mut controller = Self::new(None, interval);
        controller.screen.status = Some(err.to_string());
        controller
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.as_ref().map(|t| t.time_until_due(now))
    }

    pub fn toggle_pressed(&mut self, now: Instant) {
        let Some(player) = self.player.as_mut() else {
            debug!("toggle ignored, no player");
            return;
        };
        match self.state {
            PlaybackState::Paused => {
                player.play();
                self.state = PlaybackState::Playing;
                self.screen.toggle_selected = true;
                self.ticker = Some(Ticker::start(self.interval, now));
                info!(position = player.current_time(), "playing");
                // first tick right away, the rest on the interval
                self.tick();
            }
            PlaybackState::Playing => {
                player.pause();
                self.state = PlaybackState::Paused;
                self.screen.toggle_selected = false;
                self.ticker = None;
                info!(position = player.current_time(), "paused");
            }
        }
    }

    /// Fires [`tick`](Self::tick) if the ticker is due. Returns whether it fired.
    pub fn poll_tick(&mut self, now: Instant) -> bool {
        let due = self.ticker.as_mut().is_some_and(|t| t.poll(now));
        if due {
            self.tick();
        }
        due
    }

    pub fn tick(&mut self) {
        if self.state != PlaybackState::Playing || self.screen.slider.is_tracking() {
            return;
        }
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let position = player.current_time();
        trace!(position, "tick");
        self.screen.label = format_timestamp(position);
        self.screen.slider.set_value(position);
    }

    /// The slider moved to `value`. Seeks only when the user is not holding it.
    pub fn slider_value_changed(&mut self, value: f64) {
        if !value.is_finite() {
            debug!(value, "ignoring non-finite slider value");
            return;
        }
        self.screen.slider.set_value(value);
        let value = self.screen.slider.value();
        self.screen.label = format_timestamp(value);
        if self.screen.slider.is_tracking() {
            return;
        }
        match self.player.as_mut() {
            Some(player) => {
                player.set_current_time(value);
                debug!(position = value, "seek");
            }
            None => debug!("seek ignored, no player"),
        }
    }

    pub fn slider_pressed(&mut self, value: f64) {
        self.screen.slider.begin_tracking();
        self.slider_value_changed(value);
    }

    pub fn slider_dragged(&mut self, value: f64) {
        if !self.screen.slider.is_tracking() {
            return;
        }
        self.slider_value_changed(value);
    }

    pub fn slider_released(&mut self, value: f64) {
        if !self.screen.slider.is_tracking() {
            return;
        }
        self.screen.slider.release();
        self.slider_value_changed(value);
    }

    /// Seeks by `delta` seconds from the slider's position, like a tap-and-release.
    pub fn nudge(&mut self, delta: f64) {
        if self.screen.slider.is_tracking() || !delta.is_finite() {
            return;
        }
        let target = self.screen.slider.value() + delta;
        self.slider_value_changed(target);
    }

    pub fn playback_finished(&mut self, successfully: bool) {
        info!(successfully, "playback finished");
        self.state = PlaybackState::Paused;
        self.screen.toggle_selected = false;
        self.screen.slider.set_value(0.0);
        self.screen.label = format_timestamp(0.0);
        self.ticker = None;
    }

    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Finished { successfully } => self.playback_finished(successfully),
        }
    }

    /// Stops playback and releases the ticker when the screen goes away.
    pub fn shutdown(&mut self) {
        if self.state == PlaybackState::Playing {
            if let Some(player) = self.player.as_mut() {
                player.pause();
            }
            self.state = PlaybackState::Paused;
        }
        self.ticker = None;
    }
}
