use serde::Deserialize;
use std::collections::HashMap;

/// Card code to the nameRef that groups a champion's leveled forms
#[derive(Debug, Clone, Default)]
pub struct ChampionNameIndex {
    names: HashMap<String, String>,
}

impl ChampionNameIndex {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// Empty when the card belongs to no group.
    pub fn name_ref(&self, card_code: &str) -> String {
        self.names.get(card_code).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// How leveled champion forms are told apart in the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    /// Names are left alone; `nameRef` carries the grouping
    #[default]
    NameRef,
    /// Leveled forms get a localized "level 2"/"level 3" suffix on their name
    LevelSuffix,
}

/// Rosters for the level-suffix naming mode. These change with every
/// release, so they live in configuration. The labels they are matched
/// against are per language, see [`LocalizedNaming`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChampionNamingTable {
    pub mode: NamingMode,
    /// Non-collectible champion cards that are really a level 1 form
    pub level_one_aliases: Vec<String>,
    /// Champions whose only leveled form should keep its plain name
    pub without_level_2: Vec<String>,
    /// Leveled forms that are a third evolution stage
    pub level_3: Vec<String>,
}

/// The active language's resolved unit/champion labels and suffix strings
#[derive(Debug, Clone, Copy)]
pub struct LocalizedNaming<'a> {
    pub unit_type: &'a str,
    pub champion_supertype: &'a str,
    pub level_2: &'a str,
    pub level_3: Option<&'a str>,
}

/// The facts about a card the level-suffix rule looks at
#[derive(Debug, Clone, Copy)]
pub struct ChampionCandidate<'a> {
    pub card_code: &'a str,
    pub card_type: &'a str,
    pub supertype: &'a str,
    pub collectible: bool,
}

impl ChampionNamingTable {
    /// Suffix to append to the card's name, if any.
    pub fn level_suffix<'a>(
        &self,
        card: ChampionCandidate<'_>,
        localized: LocalizedNaming<'a>,
    ) -> Option<&'a str> {
        if self.mode != NamingMode::LevelSuffix {
            return None;
        }
        let leveled_champion = card.card_type == localized.unit_type
            && card.supertype == localized.champion_supertype
            && !card.collectible;
        if !leveled_champion || self.is_listed(&self.level_one_aliases, card.card_code) {
            return None;
        }
        if self.is_listed(&self.without_level_2, card.card_code) {
            return None;
        }
        if self.is_listed(&self.level_3, card.card_code) {
            return localized.level_3.or(Some(localized.level_2));
        }
        Some(localized.level_2)
    }

    fn is_listed(&self, list: &[String], card_code: &str) -> bool {
        list.iter().any(|code| code == card_code)
    }
}
