use metrics::counter;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::config::OutputShape;
use crate::error::{Result, SyncError};
use crate::pipeline::processing::normalize::Normalizer;
use crate::types::{CanonicalCard, RawCardRecord};

/// A language's normalized cards, accumulated across sets
#[derive(Debug, Clone)]
pub struct CardCollection {
    shape: OutputShape,
    cards: Vec<CanonicalCard>,
    by_code: HashMap<String, usize>,
}

impl CardCollection {
    pub fn new(shape: OutputShape) -> Self {
        Self {
            shape,
            cards: Vec::new(),
            by_code: HashMap::new(),
        }
    }

    /// Adds a card. In by-code shape an existing card with the same code is
    /// replaced wholesale and `true` is returned.
    pub fn insert(&mut self, card: CanonicalCard) -> bool {
        if self.shape == OutputShape::Array {
            self.cards.push(card);
            return false;
        }
        match self.by_code.get(&card.card_code) {
            Some(&position) => {
                self.cards[position] = card;
                true
            }
            None => {
                self.by_code.insert(card.card_code.clone(), self.cards.len());
                self.cards.push(card);
                false
            }
        }
    }

    /// Last card stored under `card_code`.
    pub fn get(&self, card_code: &str) -> Option<&CanonicalCard> {
        match self.shape {
            OutputShape::ByCode => self.by_code.get(card_code).map(|&position| &self.cards[position]),
            OutputShape::Array => self.cards.iter().rev().find(|card| card.card_code == card_code),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// By-code output is keyed and sorted by card code; array output keeps
// processing order.
impl Serialize for CardCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.shape {
            OutputShape::Array => serializer.collect_seq(&self.cards),
            OutputShape::ByCode => {
                let sorted: BTreeMap<&str, &CanonicalCard> = self
                    .cards
                    .iter()
                    .map(|card| (card.card_code.as_str(), card))
                    .collect();
                let mut map = serializer.serialize_map(Some(sorted.len()))?;
                for (code, card) in sorted {
                    map.serialize_entry(code, card)?;
                }
                map.end()
            }
        }
    }
}

/// Counts from aggregating one set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetSummary {
    pub records: usize,
    pub normalized: usize,
    pub ignored: usize,
    pub replaced: usize,
}

/// Drives the normalizer over every record of a set
pub struct SetAggregator<'a> {
    language: &'a str,
    normalizer: &'a dyn Normalizer,
    ignored_codes: &'a [String],
}

impl<'a> SetAggregator<'a> {
    pub fn new(language: &'a str, normalizer: &'a dyn Normalizer, ignored_codes: &'a [String]) -> Self {
        Self {
            language,
            normalizer,
            ignored_codes,
        }
    }

    /// Normalizes `records` into `collection`. The first failing record
    /// aborts the whole set.
    #[instrument(skip_all, fields(language = %self.language, records = records.len()))]
    pub fn aggregate(&self, records: &[RawCardRecord], collection: &mut CardCollection) -> Result<SetSummary> {
        let mut summary = SetSummary {
            records: records.len(),
            ..SetSummary::default()
        };

        for raw in records {
            if let Some(code) = raw.get("cardCode").and_then(|v| v.as_str()) {
                if self.ignored_codes.iter().any(|ignored| ignored == code) {
                    debug!("Skipping ignored card {}", code);
                    summary.ignored += 1;
                    continue;
                }
            }

            let card = self.normalizer.normalize(raw)?;
            let code = card.card_code.clone();
            if collection.insert(card) {
                debug!("Card {} replaced by a later set", code);
                summary.replaced += 1;
            }
            summary.normalized += 1;
        }

        let language = self.language.to_string();
        counter!("cards_normalized_total", "language" => language.clone()).increment(summary.normalized as u64);
        counter!("cards_ignored_total", "language" => language.clone()).increment(summary.ignored as u64);
        counter!("cards_replaced_total", "language" => language).increment(summary.replaced as u64);

        info!(
            "Normalized {} cards ({} ignored, {} replaced)",
            summary.normalized, summary.ignored, summary.replaced
        );
        Ok(summary)
    }
}

/// Reads a set's card data file: a JSON array of raw records.
pub fn load_records(path: &Path) -> Result<Vec<RawCardRecord>> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    match value {
        serde_json::Value::Array(records) => Ok(records),
        _ => Err(SyncError::config(format!(
            "card data file {} is not a JSON array",
            path.display()
        ))),
    }
}
