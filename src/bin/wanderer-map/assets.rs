//! Asset embedding and loading utilities.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;
use wanderer_map::{MapOptionsError, ViewerConfig};

/// Name of the bundled viewer configuration.
const CONFIG_FILE: &str = "map.ron";

/// Embeds all assets from the assets/ directory into the binary.
/// In debug mode, assets are loaded from the filesystem for faster iteration.
/// In release mode, assets are compressed and embedded in the binary.
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

/// Errors that can occur when loading the viewer configuration.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("map.ron not found in embedded assets")]
    ConfigNotFound,
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid UTF-8 in map.ron: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] ron::de::SpannedError),
    #[error("invalid map options: {0}")]
    Invalid(#[from] MapOptionsError),
}

/// Errors that can occur when loading and decoding images.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("image not found in assets or on disk: {0}")]
    AssetNotFound(String),
    #[error("failed to decode image '{path}': {source}")]
    DecodeError {
        path: String,
        source: image::ImageError,
    },
}

/// Decoded image data ready for texture creation.
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// State of the map image being loaded asynchronously.
pub enum AssetLoadState {
    /// Image is being decoded in a background thread.
    Loading(mpsc::Receiver<Result<DecodedImage, ImageLoadError>>),
    /// Image has been uploaded as a texture.
    Ready,
    /// Loading failed; stores the error message (already displayed via toast).
    Error(String),
}

/// Reads an asset from the embedded folder, falling back to the filesystem.
fn read_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    if let Some(file) = Assets::get(path) {
        return Some(file.data);
    }
    std::fs::read(path).ok().map(Cow::Owned)
}

/// Loads and decodes an image from embedded assets or disk.
pub fn load_and_decode_image(path: &str) -> Result<DecodedImage, ImageLoadError> {
    let data = read_asset(path).ok_or_else(|| ImageLoadError::AssetNotFound(path.to_string()))?;

    let img = image::load_from_memory(&data).map_err(|source| ImageLoadError::DecodeError {
        path: path.to_string(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// Loads the viewer configuration from `path`, or the embedded one.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, ConfigLoadError> {
    let source = match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => {
            let file = Assets::get(CONFIG_FILE).ok_or(ConfigLoadError::ConfigNotFound)?;
            std::str::from_utf8(&file.data)?.to_owned()
        }
    };
    let config = ViewerConfig::from_ron(&source)?;
    config.map.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_loads() {
        let config = load_config(None).unwrap();

        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn embedded_map_image_decodes() {
        let config = load_config(None).unwrap();

        let image = load_and_decode_image(&config.map.image_path).unwrap();

        assert_eq!([image.width, image.height], config.map.image_size);
    }

    #[test]
    fn unknown_image_is_reported() {
        let err = load_and_decode_image("images/missing.jpg").err().unwrap();

        assert!(matches!(err, ImageLoadError::AssetNotFound(path) if path == "images/missing.jpg"));
    }

    #[test]
    fn config_file_on_disk_overrides_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.ron");
        std::fs::write(&path, "(map: (min_zoom: 1))").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.map.min_zoom, 1);
        assert_eq!(config.map.max_zoom, 4);
    }

    #[test]
    fn reversed_zoom_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.ron");
        std::fs::write(&path, "(map: (min_zoom: 5, max_zoom: 4))").unwrap();

        let err = load_config(Some(&path)).err().unwrap();

        assert!(matches!(
            err,
            ConfigLoadError::Invalid(MapOptionsError::ZoomRange {
                min_zoom: 5,
                max_zoom: 4
            })
        ));
    }
}
