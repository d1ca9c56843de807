//! Video lightbox
//!
//! The overlay owns no decoding. It drives a [`VideoBackend`] through a
//! load/pause/unload lifecycle and remembers which video is showing.

use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

use crate::ring::VideoRef;

/// Lightbox failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LightboxError {
    /// A playback call arrived while nothing is loaded
    #[error("no video is loaded")]
    NotOpen,
    /// The backend could not load the reference
    #[error("could not load {video}: {reason}")]
    LoadFailed { video: VideoRef, reason: String },
    /// The platform refused to start playback
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

/// Whatever actually shows the video
pub trait VideoBackend {
    /// Load a video, ready to play from the start
    fn load(&mut self, video: &VideoRef) -> Result<(), LightboxError>;
    fn play(&mut self) -> Result<(), LightboxError>;
    fn pause(&mut self);
    /// Release the loaded resource
    fn unload(&mut self);
    /// Playhead position of the loaded video
    fn position(&self) -> Duration;
}

/// Playback state while the overlay is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Paused,
    Playing,
}

/// Overlay state
#[derive(Debug, Clone, PartialEq)]
pub enum LightboxState {
    Closed,
    Open { video: VideoRef, playback: Playback },
}

/// Modal video overlay
#[derive(Debug)]
pub struct Lightbox<B> {
    backend: B,
    state: LightboxState,
}

impl<B: VideoBackend> Lightbox<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: LightboxState::Closed,
        }
    }

    /// Show a video, loaded and paused at the start
    ///
    /// Opening over an already open overlay swaps the video.
    pub fn open(&mut self, video: VideoRef) -> Result<(), LightboxError> {
        if self.is_open() {
            self.backend.pause();
            self.backend.unload();
        }
        if let Err(e) = self.backend.load(&video) {
            self.state = LightboxState::Closed;
            return Err(e);
        }
        self.backend.pause();
        debug!("lightbox opened with {}", video);
        self.state = LightboxState::Open {
            video,
            playback: Playback::Paused,
        };
        Ok(())
    }

    /// Hide the overlay and release the video. Closing twice is a no-op.
    pub fn close(&mut self) {
        if let LightboxState::Open { video, .. } = &self.state {
            debug!("lightbox closed ({})", video);
            self.backend.pause();
            self.backend.unload();
            self.state = LightboxState::Closed;
        }
    }

    /// Start playback of the loaded video
    ///
    /// A rejected start leaves the overlay open and paused.
    pub fn play(&mut self) -> Result<(), LightboxError> {
        let LightboxState::Open { playback, .. } = &mut self.state else {
            return Err(LightboxError::NotOpen);
        };
        match self.backend.play() {
            Ok(()) => {
                *playback = Playback::Playing;
                Ok(())
            }
            Err(e) => {
                warn!("video playback failed: {}", e);
                *playback = Playback::Paused;
                Err(e)
            }
        }
    }

    pub fn pause(&mut self) -> Result<(), LightboxError> {
        let LightboxState::Open { playback, .. } = &mut self.state else {
            return Err(LightboxError::NotOpen);
        };
        self.backend.pause();
        *playback = Playback::Paused;
        Ok(())
    }

    pub fn toggle_playback(&mut self) -> Result<(), LightboxError> {
        match self.playback() {
            Some(Playback::Playing) => self.pause(),
            Some(Playback::Paused) => self.play(),
            None => Err(LightboxError::NotOpen),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    pub fn state(&self) -> &LightboxState {
        &self.state
    }

    pub fn video(&self) -> Option<&VideoRef> {
        match &self.state {
            LightboxState::Open { video, .. } => Some(video),
            LightboxState::Closed => None,
        }
    }

    pub fn playback(&self) -> Option<Playback> {
        match &self.state {
            LightboxState::Open { playback, .. } => Some(*playback),
            LightboxState::Closed => None,
        }
    }

    /// Playhead of the loaded video, if any
    pub fn position(&self) -> Option<Duration> {
        self.is_open().then(|| self.backend.position())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingBackend;
    use super::*;

    #[test]
    fn test_open_loads_paused() {
        let mut lightbox = Lightbox::new(RecordingBackend::default());
        lightbox.open(VideoRef::new("a.mp4")).unwrap();

        assert!(lightbox.is_open());
        assert_eq!(lightbox.video(), Some(&VideoRef::new("a.mp4")));
        assert_eq!(lightbox.playback(), Some(Playback::Paused));
        assert_eq!(lightbox.backend().calls, vec!["load a.mp4", "pause"]);
    }

    #[test]
    fn test_close_twice_is_noop() {
        let mut lightbox = Lightbox::new(RecordingBackend::default());
        lightbox.open(VideoRef::new("a.mp4")).unwrap();
        lightbox.close();
        lightbox.close();

        assert!(!lightbox.is_open());
        assert_eq!(lightbox.backend().loaded, None);
        let unloads = lightbox.backend().calls.iter().filter(|c| *c == "unload").count();
        assert_eq!(unloads, 1);
    }

    #[test]
    fn test_close_when_never_opened() {
        let mut lightbox = Lightbox::new(RecordingBackend::default());
        lightbox.close();
        assert_eq!(lightbox.state(), &LightboxState::Closed);
        assert!(lightbox.backend().calls.is_empty());
    }

    #[test]
    fn test_rejected_play_stays_open_paused() {
        let backend = RecordingBackend {
            reject_play: true,
            ..Default::default()
        };
        let mut lightbox = Lightbox::new(backend);
        lightbox.open(VideoRef::new("a.mp4")).unwrap();

        let err = lightbox.play().unwrap_err();
        assert!(matches!(err, LightboxError::PlaybackRejected(_)));
        assert!(lightbox.is_open());
        assert_eq!(lightbox.playback(), Some(Playback::Paused));
    }

    #[test]
    fn test_load_failure_keeps_closed() {
        let backend = RecordingBackend {
            reject_load: true,
            ..Default::default()
        };
        let mut lightbox = Lightbox::new(backend);
        let err = lightbox.open(VideoRef::new("gone.mp4")).unwrap_err();
        assert!(matches!(err, LightboxError::LoadFailed { .. }));
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_playback_requires_open() {
        let mut lightbox = Lightbox::new(RecordingBackend::default());
        assert_eq!(lightbox.play(), Err(LightboxError::NotOpen));
        assert_eq!(lightbox.toggle_playback(), Err(LightboxError::NotOpen));
        assert_eq!(lightbox.position(), None);
    }

    #[test]
    fn test_toggle_playback() {
        let mut lightbox = Lightbox::new(RecordingBackend::default());
        lightbox.open(VideoRef::new("a.mp4")).unwrap();
        lightbox.toggle_playback().unwrap();
        assert_eq!(lightbox.playback(), Some(Playback::Playing));
        lightbox.toggle_playback().unwrap();
        assert_eq!(lightbox.playback(), Some(Playback::Paused));
    }
}
