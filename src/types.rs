use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One card as exported by the upstream data provider. The schema drifts
/// between export versions, so it is kept untyped until normalization.
pub type RawCardRecord = serde_json::Value;

/// Normalized card, the unit of every output document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCard {
    pub card_code: String,
    pub name: String,
    pub name_ref: String,
    pub cost: i64,
    pub attack: i64,
    pub health: i64,
    #[serde(rename = "type")]
    pub card_type: String,
    /// Empty when the card has no supertype
    pub supertype: String,
    pub subtypes: Vec<String>,
    pub regions: Vec<String>,
    pub rarity: String,
    pub spell_speed: String,
    pub collectible: bool,
    pub set: String,
    pub description: String,
    pub levelup_description: String,
    pub flavor_text: String,
    pub artist_name: String,
    pub keywords: Vec<String>,
    pub associated_cards: Vec<String>,
    pub art_path: Vec<String>,
    pub full_art_path: Vec<String>,
    /// Present only when origin tracking is enabled for the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<BTreeMap<String, bool>>,
    /// Absent means the export carried no format data, not "no format"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
}
