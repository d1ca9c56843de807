//! Ring of cards and the deck manifest it is built from
//!
//! A deck manifest is a small TOML file listing the cards in ring order:
//!
//! ```toml
//! ghosts = 2
//!
//! [[cards]]
//! id = "tenebrous"
//! title = "TENEBROUS"
//! video = "videos/tenebrous.mp4"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ghost clones added when a manifest does not say otherwise
pub const DEFAULT_GHOSTS: usize = 2;

const GHOST_SUFFIX: &str = "~ghost";

/// Errors building a ring
#[derive(Debug, Error)]
pub enum RingError {
    /// A ring needs at least one card
    #[error("a ring needs at least one card")]
    Empty,
    /// Two cards share an id
    #[error("duplicate card id: {0}")]
    DuplicateId(String),
    /// A card id uses the suffix kept for ghost clones
    #[error("card id {0:?} ends with the reserved suffix \"~ghost\"")]
    ReservedId(String),
    /// The manifest could not be read
    #[error("failed to read deck manifest: {0}")]
    Io(#[from] io::Error),
    /// The manifest is not valid TOML for a deck
    #[error("failed to parse deck manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reference to a card's video (URL or path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoRef(String);

impl VideoRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single card on the ring
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub video: Option<VideoRef>,
    /// Visual duplicate padding out a small ring
    pub ghost: bool,
}

impl Card {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            video: None,
            ghost: false,
        }
    }

    pub fn with_video(mut self, video: impl Into<String>) -> Self {
        self.video = Some(VideoRef::new(video));
        self
    }

    fn ghost_of(source: &Card) -> Self {
        Self {
            id: format!("{}{}", source.id, GHOST_SUFFIX),
            title: source.title.clone(),
            video: source.video.clone(),
            ghost: true,
        }
    }
}

/// Fixed, circular sequence of cards
///
/// Built once and never resized. Slot arithmetic is modulo `len()`.
#[derive(Debug, Clone)]
pub struct Ring {
    cards: Vec<Card>,
}

impl Ring {
    /// Build a ring from cards in order
    pub fn new(cards: Vec<Card>) -> Result<Self, RingError> {
        if cards.is_empty() {
            return Err(RingError::Empty);
        }
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !card.ghost && card.id.ends_with(GHOST_SUFFIX) {
                return Err(RingError::ReservedId(card.id.clone()));
            }
            if !seen.insert(card.id.as_str()) {
                return Err(RingError::DuplicateId(card.id.clone()));
            }
        }
        Ok(Self { cards })
    }

    /// Build a ring padded with up to `max_ghosts` clones of its first cards
    pub fn with_ghosts(cards: Vec<Card>, max_ghosts: usize) -> Result<Self, RingError> {
        let clones = max_ghosts.min(cards.len());
        let ghosts: Vec<Card> = cards[..clones].iter().map(Card::ghost_of).collect();
        let mut all = cards;
        all.extend(ghosts);
        Self::new(all)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false: construction rejects empty rings
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card at a slot, wrapping around the ring
    pub fn get(&self, slot: usize) -> &Card {
        &self.cards[slot % self.cards.len()]
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Angular step between neighbouring slots, in degrees
    pub fn step_degrees(&self) -> f32 {
        360.0 / self.cards.len() as f32
    }

    /// Number of non-ghost cards
    pub fn original_count(&self) -> usize {
        self.cards.iter().filter(|c| !c.ghost).count()
    }
}

/// One `[[cards]]` entry of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEntry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

/// On-disk description of a deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckManifest {
    /// Ghost clones to append (capped at the card count)
    #[serde(default = "default_ghosts")]
    pub ghosts: usize,
    #[serde(default)]
    pub cards: Vec<CardEntry>,
}

fn default_ghosts() -> usize {
    DEFAULT_GHOSTS
}

impl DeckManifest {
    pub fn from_toml_str(contents: &str) -> Result<Self, RingError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read a manifest file; relative video paths are taken from its directory
    pub fn load(path: &Path) -> Result<Self, RingError> {
        let contents = fs::read_to_string(path)?;
        let mut manifest = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            manifest.resolve_videos(base);
        }
        Ok(manifest)
    }

    /// Rebase relative local video paths onto `base`; URLs and absolute paths are kept
    pub fn resolve_videos(&mut self, base: &Path) {
        for entry in &mut self.cards {
            let Some(video) = entry.video.as_mut() else {
                continue;
            };
            let reference = video.trim();
            let remote = reference.contains("://");
            if reference.is_empty() || remote || Path::new(reference).is_absolute() {
                continue;
            }
            *video = base.join(reference).to_string_lossy().into_owned();
        }
    }

    pub fn into_ring(self) -> Result<Ring, RingError> {
        let cards = self
            .cards
            .into_iter()
            .map(|entry| Card {
                id: entry.id,
                title: entry.title,
                video: entry.video.filter(|v| !v.trim().is_empty()).map(VideoRef::new),
                ghost: false,
            })
            .collect();
        Ring::with_ghosts(cards, self.ghosts)
    }
}
