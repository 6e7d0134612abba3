// Loads the glitter texture off the main thread.
// The result shows up later as one message (Ready or Failed); the main loop
// polls for it and redraws the cover either way.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::RgbaImage;
use image::imageops::FilterType;
use log::{debug, error};

use crate::error::Error;

/// Where the texture is in its life.
pub enum TextureState {
    Loading,
    Loaded(RgbaImage),
    Failed,
}

impl TextureState {
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            TextureState::Loaded(img) => Some(img),
            _ => None,
        }
    }
}

/// Handle for one in-flight texture load.
pub struct TextureLoader {
    rx: Option<Receiver<Result<RgbaImage, Error>>>,
    state: TextureState,
}

impl TextureLoader {
    /// Start decoding `path` on a worker thread, scaled to `size` x `size`.
    pub fn spawn(path: PathBuf, size: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may be gone if the window closed first; nothing to do then.
            let _ = tx.send(load_scaled(&path, size));
        });
        Self { rx: Some(rx), state: TextureState::Loading }
    }

    pub fn state(&self) -> &TextureState {
        &self.state
    }

    /// Check the worker. Returns true exactly once: when the load finished
    /// (either way) and the cover should be redrawn.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.rx else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(Error::TextureChannel),
        };
        self.rx = None;
        self.settle(result);
        true
    }

    fn settle(&mut self, result: Result<RgbaImage, Error>) {
        self.state = match result {
            Ok(img) => {
                debug!("texture ready ({}x{})", img.width(), img.height());
                TextureState::Loaded(img)
            }
            Err(e) => {
                error!("Failed to load glitter image: {e}");
                TextureState::Failed
            }
        };
    }
}

/// Decode and stretch to the surface size, like `drawImage(img, x, y, w, h)`.
pub fn load_scaled(path: &Path, size: u32) -> Result<RgbaImage, Error> {
    let img = image::open(path).map_err(|source| Error::TextureLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image::imageops::resize(&img.to_rgba8(), size, size, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut TextureLoader) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !loader.poll() {
            assert!(Instant::now() < deadline, "loader never finished");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_missing_file_fails() {
        let mut loader = TextureLoader::spawn(PathBuf::from("does/not/exist.png"), 200);
        wait_for(&mut loader);
        assert!(matches!(loader.state(), TextureState::Failed));
        assert!(loader.state().image().is_none());
        // Settled loaders report nothing new
        assert!(!loader.poll());
    }

    #[test]
    fn test_loads_and_scales() {
        let dir = std::env::temp_dir().join(format!("scratch-heart-texture-{}-loads", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.png");
        RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255])).save(&path).unwrap();

        let mut loader = TextureLoader::spawn(path, 200);
        wait_for(&mut loader);
        let img = loader.state().image().expect("loaded");
        assert_eq!(img.dimensions(), (200, 200));
        let px = img.get_pixel(100, 100).0;
        for (got, want) in px.iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1, "{px:?}");
        }
    }
}
