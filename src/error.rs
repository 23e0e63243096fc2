//! Failure kinds that leave the player screen without a working audio player.
//!
//! None of these are propagated past screen setup: they are logged, shown on
//! the status line, and the controls stay inert.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFailureCode {
    /// The container or codec rejected the asset data.
    Decode,
    /// The asset probed fine but has no decodable audio track.
    NoTrack,
    /// No audio output device could be opened.
    Output,
}

impl fmt::Display for InitFailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            InitFailureCode::Decode => "decode",
            InitFailureCode::NoTrack => "no-track",
            InitFailureCode::Output => "output",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("cannot retrieve bundled audio asset `{name}`")]
    AssetNotFound { name: String },

    #[error("player initialization failed ({code}): {message}")]
    PlayerInitFailed {
        code: InitFailureCode,
        message: String,
    },
}

impl PlayerError {
    pub fn init_failed(code: InitFailureCode, message: impl Into<String>) -> Self {
        PlayerError::PlayerInitFailed {
            code,
            message: message.into(),
        }
    }
}

impl From<symphonia::core::errors::Error> for PlayerError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        PlayerError::init_failed(InitFailureCode::Decode, err.to_string())
    }
}

impl From<rodio::StreamError> for PlayerError {
    fn from(err: rodio::StreamError) -> Self {
        PlayerError::init_failed(InitFailureCode::Output, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_code_and_detail() {
        let err = PlayerError::init_failed(InitFailureCode::NoTrack, "empty container");
        assert_eq!(
            err.to_string(),
            "player initialization failed (no-track): empty container"
        );

        let err = PlayerError::AssetNotFound {
            name: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "cannot retrieve bundled audio asset `missing`");
    }

    #[test]
    fn symphonia_errors_map_to_decode_failures() {
        let err: PlayerError = symphonia::core::errors::Error::Unsupported("codec").into();
        assert!(matches!(
            err,
            PlayerError::PlayerInitFailed {
                code: InitFailureCode::Decode,
                ..
            }
        ));
    }
}
