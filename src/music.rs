// Background music with an autoplay policy:
// try once at startup, then exactly one more try on the first press.
// Failures are logged and otherwise ignored.

use std::path::PathBuf;

use log::{info, warn};

use crate::error::Error;

/// Something that can play the background track.
pub trait MusicBackend {
    fn is_paused(&self) -> bool;
    fn play(&mut self) -> Result<(), Error>;
}

/// Backend used when no audio output exists: every play is refused.
pub struct NoAudioOutput {
    track: PathBuf,
}

impl NoAudioOutput {
    pub fn new(track: PathBuf) -> Self {
        Self { track }
    }
}

impl MusicBackend for NoAudioOutput {
    fn is_paused(&self) -> bool {
        true
    }

    fn play(&mut self) -> Result<(), Error> {
        Err(Error::Audio(format!("no audio output for {}", self.track.display())))
    }
}

pub struct Soundtrack<B: MusicBackend> {
    backend: B,
    /// The one-shot first-interaction retry is still pending.
    retry_armed: bool,
}

impl<B: MusicBackend> Soundtrack<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, retry_armed: true }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Startup attempt.
    pub fn start(&mut self) {
        self.play_if_paused();
    }

    /// Call on every press anywhere in the window; only the first one counts.
    pub fn on_interaction(&mut self) {
        if !self.retry_armed {
            return;
        }
        self.retry_armed = false;
        info!("retrying music after first interaction");
        self.play_if_paused();
    }

    fn play_if_paused(&mut self) {
        if !self.backend.is_paused() {
            return;
        }
        if let Err(e) = self.backend.play() {
            warn!("Audio play failed/blocked: {e}");
        }
    }
}
