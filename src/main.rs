mod assets;
mod audio_player;
mod config;
mod controller;
mod error;
mod logging;
mod themes;
mod ticker;
mod time_format;
mod tui;
use crate::audio_player::{AudioFile, PlayerEvent, RodioPlayer};
use crate::config::{Config, ConfigSource};
use crate::controller::PlaybackController;
use crate::themes::Theme;
use color_eyre::Result;
use crossbeam::channel::{Sender, unbounded};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    color_eyre::install()?;

    let (config, source) = Config::load(Config::default_path().as_deref());

    // keep the guard alive for the whole run so buffered log lines get flushed
    let _log_guard = match logging::init(&config.log_dir(), &config.log_level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("logging disabled: {err}");
            None
        }
    };
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "loaded config"),
        ConfigSource::Defaults => info!("no config file, using defaults"),
        ConfigSource::Invalid { path, reason } => {
            warn!(path = %path.display(), %reason, "ignoring invalid config")
        }
    }

    let theme = themes::by_name(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, available = ?themes::list(), "unknown theme");
        Theme::default()
    });

    // the audio thread reports "finished" through this channel
    let (player_event_tx, player_event_rx) = unbounded::<PlayerEvent>();

    let controller = match open_player(&config.asset, player_event_tx) {
        Ok(player) => PlaybackController::new(Some(player), config.tick_interval()),
        Err(err) => {
            error!(error = %err, asset = %config.asset, "cannot initialize player");
            PlaybackController::failed(&err, config.tick_interval())
        }
    };

    tui::run(
        controller,
        player_event_rx,
        theme,
        config.asset.clone(),
        config.seek_step_secs,
    )
}

fn open_player(asset: &str, events_tx: Sender<PlayerEvent>) -> error::Result<RodioPlayer> {
    let bytes = assets::lookup(asset).inspect_err(|_| {
        let available: Vec<_> = assets::names().collect();
        warn!(?available, "bundled asset not found");
    })?;
    let audio_file = AudioFile::decode(bytes, events_tx)?;
    RodioPlayer::open(audio_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;

    #[test]
    fn unknown_asset_fails_before_opening_a_device() {
        let (tx, _rx) = unbounded::<PlayerEvent>();
        let err = open_player("nope", tx).err();
        assert_eq!(
            err,
            Some(PlayerError::AssetNotFound {
                name: "nope".to_string()
            })
        );
    }

    #[test]
    fn unknown_asset_leaves_an_inert_controller() {
        let (tx, _rx) = unbounded::<PlayerEvent>();
        let err = open_player("nope", tx).err().unwrap();
        let mut controller =
            PlaybackController::<RodioPlayer>::failed(&err, std::time::Duration::from_millis(10));
        controller.toggle_pressed(std::time::Instant::now());
        assert!(!controller.has_player());
        assert_eq!(
            controller.screen().status.as_deref(),
            Some("cannot retrieve bundled audio asset `nope`")
        );
    }
}
