//! Preview video backend
//!
//! There is no decoder in the page. The backend checks that a reference is
//! reachable, then runs a playhead clock so the lightbox can show progress.

use std::path::Path;
use std::time::{Duration, Instant};

use shared::{LightboxError, VideoBackend, VideoRef};

/// Simulated player with a wall-clock playhead
#[derive(Debug, Default)]
pub struct PreviewBackend {
    loaded: Option<VideoRef>,
    /// Set while playing
    started: Option<Instant>,
    /// Playhead accumulated before the current run
    elapsed: Duration,
}

impl PreviewBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn loaded(&self) -> Option<&VideoRef> {
        self.loaded.as_ref()
    }

    #[allow(dead_code)]
    pub fn is_playing(&self) -> bool {
        self.started.is_some()
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

impl VideoBackend for PreviewBackend {
    fn load(&mut self, video: &VideoRef) -> Result<(), LightboxError> {
        let reference = video.as_str();
        if !is_remote(reference) && !Path::new(reference).exists() {
            return Err(LightboxError::LoadFailed {
                video: video.clone(),
                reason: "file not found".to_string(),
            });
        }
        self.loaded = Some(video.clone());
        self.started = None;
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<(), LightboxError> {
        if self.loaded.is_none() {
            return Err(LightboxError::NotOpen);
        }
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed += started.elapsed();
        }
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.started = None;
        self.elapsed = Duration::ZERO;
    }

    fn position(&self) -> Duration {
        self.elapsed + self.started.map(|s| s.elapsed()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_local_file_fails_to_load() {
        let mut backend = PreviewBackend::new();
        let err = backend
            .load(&VideoRef::new("definitely/not/here.mp4"))
            .unwrap_err();
        assert!(matches!(err, LightboxError::LoadFailed { .. }));
        assert!(backend.loaded().is_none());
    }

    #[test]
    fn test_remote_reference_loads_paused() {
        let mut backend = PreviewBackend::new();
        backend
            .load(&VideoRef::new("https://example.com/a.mp4"))
            .unwrap();
        assert!(!backend.is_playing());
        assert_eq!(backend.position(), Duration::ZERO);
    }

    #[test]
    fn test_pause_keeps_playhead_and_unload_resets() {
        let mut backend = PreviewBackend::new();
        backend
            .load(&VideoRef::new("https://example.com/a.mp4"))
            .unwrap();
        backend.play().unwrap();
        std::thread::sleep(Duration::from_millis(5));
        backend.pause();
        let held = backend.position();
        assert!(held >= Duration::from_millis(5));
        assert_eq!(backend.position(), held);

        backend.unload();
        assert_eq!(backend.position(), Duration::ZERO);
        assert_eq!(backend.play(), Err(LightboxError::NotOpen));
    }
}
