//! Deck models at the computation boundary.
//!
//! [`DeckConfig`] is the exact-math view: mutually exclusive category buckets
//! with per-category requirements. [`SimDeck`] is the Monte Carlo view: one
//! entry per physical card with cost/flag data, where a card may satisfy
//! several tag predicates at once via a bitmask. Both load from JSON files
//! supplied by whatever front end drives the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid deck: {0}")]
    Invalid(String),
}

/// A labeled category of cards tracked by the exact-math path.
///
/// `count` copies exist in the library; a keepable game needs `required`
/// copies seen (hand plus draws) by turn `by_turn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardType {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub required: u32,
    #[serde(default = "default_by_turn")]
    pub by_turn: u32,
}

fn default_by_turn() -> u32 {
    1
}

/// Library size plus the tracked categories. Cards not covered by any
/// category form the implicit "other" pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    pub deck_size: u32,
    pub types: Vec<CardType>,
}

impl DeckConfig {
    pub fn new(deck_size: u32, types: Vec<CardType>) -> Result<Self, DeckError> {
        let config = DeckConfig { deck_size, types };
        config.validate()?;
        Ok(config)
    }

    /// Load a deck configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DeckError> {
        let content = std::fs::read_to_string(path)?;
        let config: DeckConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DeckError> {
        let tracked: u64 = self.types.iter().map(|t| t.count as u64).sum();
        if tracked > self.deck_size as u64 {
            return Err(DeckError::Invalid(format!(
                "tracked cards ({}) exceed deck size ({})",
                tracked, self.deck_size
            )));
        }
        for card_type in &self.types {
            if card_type.by_turn < 1 {
                return Err(DeckError::Invalid(format!(
                    "type '{}' has by_turn {}; must be at least 1",
                    card_type.name, card_type.by_turn
                )));
            }
        }
        Ok(())
    }

    /// Per-type copy counts, in declaration order.
    pub fn type_counts(&self) -> Vec<u32> {
        self.types.iter().map(|t| t.count).collect()
    }
}

/// One physical card in a Monte Carlo deck.
///
/// `type_mask` has one bit per tag declared anywhere in the deck file, so a
/// single card can count toward several diversity categories at once.
#[derive(Debug, Clone)]
pub struct SimCard {
    pub name: String,
    pub cmc: u32,
    pub land: bool,
    pub permanent: bool,
    pub discover: bool,
    pub type_mask: u32,
}

/// One line of a Monte Carlo deck file, before count expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimCardSpec {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub cmc: u32,
    #[serde(default)]
    pub land: bool,
    #[serde(default = "default_permanent")]
    pub permanent: bool,
    #[serde(default)]
    pub discover: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_permanent() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimDeckSpec {
    cards: Vec<SimCardSpec>,
}

/// Expanded Monte Carlo deck: one `SimCard` per physical copy, plus the tag
/// table mapping bit positions back to names.
#[derive(Debug, Clone)]
pub struct SimDeck {
    pub cards: Vec<SimCard>,
    pub tags: Vec<String>,
}

impl SimDeck {
    /// Load a Monte Carlo deck from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DeckError> {
        let content = std::fs::read_to_string(path)?;
        let spec: SimDeckSpec = serde_json::from_str(&content)?;
        Self::from_specs(&spec.cards)
    }

    /// Expand card specs into individual cards, assigning tag bits in order
    /// of first appearance.
    pub fn from_specs(specs: &[SimCardSpec]) -> Result<Self, DeckError> {
        let mut tags: Vec<String> = Vec::new();
        for spec in specs {
            for tag in &spec.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }
        if tags.len() > 32 {
            return Err(DeckError::Invalid(format!(
                "{} distinct tags; at most 32 are supported",
                tags.len()
            )));
        }

        let mut cards = Vec::new();
        for spec in specs {
            let mut type_mask = 0u32;
            for tag in &spec.tags {
                let bit = tags
                    .iter()
                    .position(|t| t == tag)
                    .expect("tag was registered in the first pass");
                type_mask |= 1 << bit;
            }
            for _ in 0..spec.count {
                cards.push(SimCard {
                    name: spec.name.clone(),
                    cmc: spec.cmc,
                    land: spec.land,
                    permanent: spec.permanent,
                    discover: spec.discover,
                    type_mask,
                });
            }
        }
        Ok(SimDeck { cards, tags })
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}
