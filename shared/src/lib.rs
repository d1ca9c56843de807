//! Shared carousel engine for the site pages
//!
//! Everything here is rendering-agnostic: pages feed pointer, key and frame
//! events into a [`Carousel`] and draw the poses it produces.

pub mod carousel;
pub mod circular;
pub mod config;
pub mod geometry;
pub mod lightbox;
pub mod ring;
pub mod settings;

pub use carousel::{Activation, Carousel, CarouselKey, KeyOutcome, RotationState};
pub use circular::{nearest_slot, shortest_delta, slot_distance, wrap_index};
pub use config::{config_dir, config_path, delete_config, load_config, save_config, ConfigError};
pub use geometry::{CardPose, Emphasis, Geometry};
pub use lightbox::{Lightbox, LightboxError, LightboxState, Playback, VideoBackend};
pub use ring::{Card, CardEntry, DeckManifest, Ring, RingError, VideoRef, DEFAULT_GHOSTS};
pub use settings::{CarouselSettings, GeometryProfile, GeometrySettings, MotionSettings, SettingsError};
