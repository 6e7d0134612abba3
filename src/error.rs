// One error type for the whole app.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the framebuffer failed
    #[error("Texture load error ({path}): {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Texture loader thread went away")]
    TextureChannel,
    #[error("Audio error: {0}")]
    Audio(String), // Playback refused or no device
    #[error("Config read error ({path}): {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config parse error ({path}): {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Heart path error: {0}")]
    HeartPath(String), // Bad SVG path data or no enclosed area
    #[error("Invalid colour {0:?}")]
    Colour(String),
}
