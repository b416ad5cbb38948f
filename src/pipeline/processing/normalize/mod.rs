use serde_json::Value;

use crate::config::LanguageProfile;
use crate::error::{Result, SyncError};
use crate::pipeline::processing::champion::{
    ChampionCandidate, ChampionNameIndex, ChampionNamingTable,
};
use crate::pipeline::processing::origin::OriginMembership;
use crate::types::{CanonicalCard, RawCardRecord};

/// Trait for turning one raw export record into a canonical card
pub trait Normalizer {
    fn normalize(&self, raw: &RawCardRecord) -> Result<CanonicalCard>;
}

/// Normalizer for one language's records.
///
/// Holds only borrowed, read-only reference data, so normalizing the same
/// record twice yields identical output.
pub struct CardNormalizer<'a> {
    pub profile: &'a LanguageProfile,
    pub champion_names: &'a ChampionNameIndex,
    pub naming: &'a ChampionNamingTable,
    /// `None` when the run does not track origins
    pub origins: Option<&'a OriginMembership>,
}

impl<'a> CardNormalizer<'a> {
    pub fn new(
        profile: &'a LanguageProfile,
        champion_names: &'a ChampionNameIndex,
        naming: &'a ChampionNamingTable,
        origins: Option<&'a OriginMembership>,
    ) -> Self {
        Self {
            profile,
            champion_names,
            naming,
            origins,
        }
    }

    fn display_name(&self, fields: &RawFields<'_>, card_type: &str, supertype: &str) -> Result<String> {
        let name = fields.owned_text("name")?;
        let Some(localized) = self.profile.localized_naming() else {
            return Ok(name);
        };
        let candidate = ChampionCandidate {
            card_code: fields.card_code,
            card_type,
            supertype,
            collectible: fields.boolean("collectible")?,
        };
        Ok(match self.naming.level_suffix(candidate, localized) {
            Some(suffix) => format!("{name} {suffix}"),
            None => name,
        })
    }
}

impl Normalizer for CardNormalizer<'_> {
    fn normalize(&self, raw: &RawCardRecord) -> Result<CanonicalCard> {
        let fields = RawFields::new(raw)?;
        let dictionary = &self.profile.dictionary;

        let card_type = dictionary.resolve_type(fields.text("type")?)?;
        let supertype = dictionary.resolve_supertype(fields.text("supertype")?)?;
        let subtypes = fields
            .string_list("subtypes")?
            .iter()
            .map(|subtype| dictionary.resolve_subtype(subtype))
            .collect::<Result<Vec<_>>>()?;

        let name = self.display_name(&fields, &card_type, &supertype)?;
        let (art_path, full_art_path) = fields.asset_paths()?;

        Ok(CanonicalCard {
            card_code: fields.card_code.to_string(),
            name,
            name_ref: self.champion_names.name_ref(fields.card_code),
            cost: fields.integer("cost")?,
            attack: fields.integer("attack")?,
            health: fields.integer("health")?,
            card_type,
            supertype,
            subtypes,
            regions: lowercase_all(fields.string_list("regionRefs")?),
            rarity: fields.text("rarityRef")?.to_lowercase(),
            spell_speed: fields.text("spellSpeedRef")?.to_lowercase(),
            collectible: fields.boolean("collectible")?,
            set: fields.text("set")?.to_lowercase(),
            description: fields.owned_text("description")?,
            levelup_description: fields.owned_text("levelupDescription")?,
            flavor_text: fields.owned_text("flavorText")?,
            artist_name: fields.owned_text("artistName")?,
            keywords: lowercase_all(fields.string_list("keywordRefs")?),
            associated_cards: fields.string_list("associatedCardRefs")?,
            art_path,
            full_art_path,
            origin: self.origins.map(|origins| origins.classify(fields.card_code)),
            formats: fields.optional_string_list("formatRefs")?.map(lowercase_all),
        })
    }
}

fn lowercase_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|value| value.to_lowercase()).collect()
}

/// Typed access to a raw record's fields, reporting failures against the
/// record's card code.
struct RawFields<'a> {
    card_code: &'a str,
    raw: &'a Value,
}

impl<'a> RawFields<'a> {
    fn new(raw: &'a Value) -> Result<Self> {
        let card_code = match raw.get("cardCode") {
            Some(Value::String(code)) => code.as_str(),
            Some(_) => {
                return Err(SyncError::InvalidField {
                    card: "<unknown>".to_string(),
                    field: "cardCode".to_string(),
                    expected: "a string",
                })
            }
            None => {
                return Err(SyncError::MissingField {
                    card: "<unknown>".to_string(),
                    field: "cardCode".to_string(),
                })
            }
        };
        Ok(Self { card_code, raw })
    }

    fn field(&self, name: &str) -> Result<&'a Value> {
        self.raw.get(name).ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> SyncError {
        SyncError::MissingField {
            card: self.card_code.to_string(),
            field: name.to_string(),
        }
    }

    fn invalid(&self, name: &str, expected: &'static str) -> SyncError {
        SyncError::InvalidField {
            card: self.card_code.to_string(),
            field: name.to_string(),
            expected,
        }
    }

    fn text(&self, name: &str) -> Result<&'a str> {
        self.field(name)?
            .as_str()
            .ok_or_else(|| self.invalid(name, "a string"))
    }

    fn owned_text(&self, name: &str) -> Result<String> {
        self.text(name).map(str::to_string)
    }

    fn integer(&self, name: &str) -> Result<i64> {
        self.field(name)?
            .as_i64()
            .ok_or_else(|| self.invalid(name, "an integer"))
    }

    fn boolean(&self, name: &str) -> Result<bool> {
        self.field(name)?
            .as_bool()
            .ok_or_else(|| self.invalid(name, "a boolean"))
    }

    fn string_list(&self, name: &str) -> Result<Vec<String>> {
        self.strings_of(name, self.field(name)?)
    }

    /// Absent or null fields are `None`; older exports simply lack them.
    fn optional_string_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        match self.raw.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.strings_of(name, value).map(Some),
        }
    }

    fn strings_of(&self, name: &str, value: &Value) -> Result<Vec<String>> {
        value
            .as_array()
            .ok_or_else(|| self.invalid(name, "a list"))?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(name, "a list of strings"))
            })
            .collect()
    }

    /// Splits the asset list into in-game and full art paths, in order.
    fn asset_paths(&self) -> Result<(Vec<String>, Vec<String>)> {
        let assets = self
            .field("assets")?
            .as_array()
            .ok_or_else(|| self.invalid("assets", "a list"))?;

        let mut art_path = Vec::with_capacity(assets.len());
        let mut full_art_path = Vec::with_capacity(assets.len());
        for asset in assets {
            art_path.push(self.asset_path(asset, "gameAbsolutePath")?);
            full_art_path.push(self.asset_path(asset, "fullAbsolutePath")?);
        }
        Ok((art_path, full_art_path))
    }

    fn asset_path(&self, asset: &Value, key: &str) -> Result<String> {
        let name = format!("assets.{key}");
        asset
            .get(key)
            .ok_or_else(|| self.missing(&name))?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(&name, "a string"))
    }
}
