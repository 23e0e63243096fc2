//! Audio compiled into the binary, looked up by name.

use crate::error::{PlayerError, Result};

const BUNDLED: &[(&str, &[u8])] = &[("sound", include_bytes!("../assets/sound.wav"))];

pub fn lookup(name: &str) -> Result<&'static [u8]> {
    BUNDLED
        .iter()
        .find(|(asset, _)| *asset == name)
        .map(|(_, bytes)| *bytes)
        .ok_or_else(|| PlayerError::AssetNotFound {
            name: name.to_string(),
        })
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_bundled_sound() {
        let bytes = lookup("sound").unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert!(names().any(|n| n == "sound"));
    }

    #[test]
    fn unknown_name_is_asset_not_found() {
        assert_eq!(
            lookup("nope"),
            Err(PlayerError::AssetNotFound {
                name: "nope".to_string()
            })
        );
    }
}
