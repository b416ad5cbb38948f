use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{
    fill_language, CHAMPION_NAMES_FILE, CONFIG_FILE, DEFAULT_WORK_FOLDER, LANGUAGE_FILE,
    ORIGIN_LISTS_FILE,
};
use crate::error::{Result, SyncError};
use crate::pipeline::processing::champion::{
    ChampionNameIndex, ChampionNamingTable, LocalizedNaming, NamingMode,
};
use crate::pipeline::processing::dictionary::LocalizationDictionary;
use crate::pipeline::processing::origin::OriginMembership;

/// Contents of `config.json`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub output_folder: PathBuf,
    pub images_folder: PathBuf,
    /// Output file name template, with a language placeholder
    pub output_file: String,
    #[serde(deserialize_with = "yes_or_no")]
    pub include_images: bool,
    pub included_languages: Vec<String>,
    pub card_sets: Vec<CardSet>,
    #[serde(default)]
    pub output_shape: OutputShape,
    #[serde(default)]
    pub origin_tracking: bool,
    #[serde(default)]
    pub champion_naming: ChampionNamingTable,
    #[serde(default)]
    pub ignored_card_codes: Vec<String>,
    #[serde(default)]
    pub remove_alternate_art: bool,
    #[serde(default = "default_work_folder")]
    pub work_folder: PathBuf,
}

fn default_work_folder() -> PathBuf {
    PathBuf::from(DEFAULT_WORK_FOLDER)
}

/// One released card set as listed in the configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CardSet {
    pub name: String,
    /// Archive url template, with a language placeholder
    pub url: String,
    pub folder: String,
}

impl CardSet {
    pub fn url_for(&self, language: &str) -> String {
        fill_language(&self.url, language)
    }
}

/// Representation of a language's output document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// Mapping keyed by card code; one record per code
    #[default]
    ByCode,
    /// Sequence of every normalized record in processing order
    Array,
}

impl Config {
    pub fn output_path(&self, language: &str) -> PathBuf {
        self.output_folder.join(fill_language(&self.output_file, language))
    }
}

// Older configs spell booleans as "yes"/"no"
fn yes_or_no<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Word(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Word(word) => match word.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "sim" => Ok(true),
            "no" | "n" | "false" | "nao" | "não" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected yes or no, found {other:?}"
            ))),
        },
    }
}

/// Per-category lookup tables of one language
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryTables {
    #[serde(default)]
    pub types: HashMap<String, String>,
    #[serde(default)]
    pub subtypes: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    pub properties: LanguageProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageProperties {
    #[serde(flatten)]
    pub tables: DictionaryTables,
    /// Resolved type label of units in this language
    #[serde(default)]
    pub unit_type: Option<String>,
    /// Resolved supertype label of champions in this language
    #[serde(default)]
    pub champion_supertype: Option<String>,
    #[serde(default)]
    pub champion_level_2: Option<String>,
    #[serde(default)]
    pub champion_level_3: Option<String>,
}

/// Contents of `language.json`, in either of its two layouts
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LanguageFile {
    Entries(Vec<LanguageEntry>),
    Dictionary {
        dictionary: HashMap<String, DictionaryTables>,
    },
}

/// Everything the normalizer needs to know about one language
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub language: String,
    pub dictionary: LocalizationDictionary,
    pub unit_type: Option<String>,
    pub champion_supertype: Option<String>,
    pub level_2_suffix: Option<String>,
    pub level_3_suffix: Option<String>,
}

impl LanguageProfile {
    /// Labels and suffixes for level-suffix naming; `None` unless the
    /// language defines the unit and champion labels and a level 2 suffix.
    pub fn localized_naming(&self) -> Option<LocalizedNaming<'_>> {
        Some(LocalizedNaming {
            unit_type: self.unit_type.as_deref()?,
            champion_supertype: self.champion_supertype.as_deref()?,
            level_2: self.level_2_suffix.as_deref()?,
            level_3: self.level_3_suffix.as_deref(),
        })
    }
}

impl LanguageFile {
    pub fn profile(&self, language: &str) -> Result<LanguageProfile> {
        let (tables, properties) = match self {
            LanguageFile::Entries(entries) => {
                let entry = entries
                    .iter()
                    .find(|entry| entry.language == language)
                    .ok_or_else(|| {
                        SyncError::config(format!("language {language} has no entry in {LANGUAGE_FILE}"))
                    })?;
                (entry.properties.tables.clone(), Some(&entry.properties))
            }
            LanguageFile::Dictionary { dictionary } => {
                let tables = dictionary.get(language).ok_or_else(|| {
                    SyncError::config(format!("language {language} has no dictionary in {LANGUAGE_FILE}"))
                })?;
                (tables.clone(), None)
            }
        };
        let properties = properties.cloned();

        Ok(LanguageProfile {
            language: language.to_string(),
            dictionary: LocalizationDictionary::new(language, tables.types, tables.subtypes),
            unit_type: properties.as_ref().and_then(|p| p.unit_type.clone()),
            champion_supertype: properties.as_ref().and_then(|p| p.champion_supertype.clone()),
            level_2_suffix: properties.as_ref().and_then(|p| p.champion_level_2.clone()),
            level_3_suffix: properties.and_then(|p| p.champion_level_3),
        })
    }
}

/// All configuration documents of a run, loaded once and passed by reference
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub languages: LanguageFile,
    pub champion_names: ChampionNameIndex,
    pub origins: Option<OriginMembership>,
}

impl Settings {
    /// Loads and validates every configuration document found in `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let config: Config = read_json(&dir.join(CONFIG_FILE))?;
        let languages: LanguageFile = read_json(&dir.join(LANGUAGE_FILE))?;

        let champion_path = dir.join(CHAMPION_NAMES_FILE);
        let champion_names = if champion_path.exists() {
            ChampionNameIndex::new(read_json(&champion_path)?)
        } else {
            ChampionNameIndex::default()
        };
        if champion_names.is_empty() {
            debug!("No {} entries, nameRef will be empty", CHAMPION_NAMES_FILE);
        }

        let origins = if config.origin_tracking {
            let membership: HashMap<String, Vec<String>> = read_json(&dir.join(ORIGIN_LISTS_FILE))?;
            Some(OriginMembership::new(membership))
        } else {
            None
        };

        let settings = Self {
            config,
            languages,
            champion_names,
            origins,
        };
        settings.validate()?;
        info!(
            "Loaded configuration: {} language(s), {} set(s), {} nameRef entries",
            settings.config.included_languages.len(),
            settings.config.card_sets.len(),
            settings.champion_names.len()
        );
        Ok(settings)
    }

    /// Checks every configured language up front so nothing is fetched for a
    /// run that is bound to fail.
    pub fn validate(&self) -> Result<()> {
        if self.config.included_languages.is_empty() {
            return Err(SyncError::config("included_languages is empty"));
        }
        if self.config.origin_tracking && self.origins.is_none() {
            return Err(SyncError::config(format!(
                "origin_tracking is on but {ORIGIN_LISTS_FILE} was not loaded"
            )));
        }
        for language in &self.config.included_languages {
            let profile = self.languages.profile(language)?;
            if self.config.champion_naming.mode == NamingMode::LevelSuffix {
                let required = [
                    ("unit_type", &profile.unit_type),
                    ("champion_supertype", &profile.champion_supertype),
                    ("champion_level_2", &profile.level_2_suffix),
                ];
                if let Some((property, _)) = required.iter().find(|(_, value)| value.is_none()) {
                    return Err(SyncError::config(format!(
                        "language {language} has no {property} for level_suffix naming"
                    )));
                }
                if !self.config.champion_naming.level_3.is_empty() && profile.level_3_suffix.is_none() {
                    return Err(SyncError::config(format!(
                        "language {language} has no champion_level_3 suffix"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Narrows the run to `requested`, keeping the configured order.
    pub fn restrict_languages(&mut self, requested: &[String]) -> Result<()> {
        if requested.is_empty() {
            return Ok(());
        }
        if let Some(unknown) = requested
            .iter()
            .find(|language| !self.config.included_languages.contains(language))
        {
            return Err(SyncError::config(format!(
                "language {unknown} is not listed in included_languages"
            )));
        }
        self.config
            .included_languages
            .retain(|language| requested.contains(language));
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        SyncError::config(format!("Failed to read config file '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        SyncError::config(format!("Failed to parse config file '{}': {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_config() -> serde_json::Value {
        json!({
            "output_folder": "out",
            "images_folder": "img",
            "output_file": "cards-{}.json",
            "include_images": "no",
            "included_languages": ["en_us", "pt_br"],
            "card_sets": [
                {"name": "Foundations", "url": "https://example.com/{}/set1.zip", "folder": "set1"}
            ]
        })
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_value(base_config()).unwrap();
        assert!(!config.include_images);
        assert_eq!(config.output_shape, OutputShape::ByCode);
        assert!(!config.origin_tracking);
        assert_eq!(config.champion_naming.mode, NamingMode::NameRef);
        assert_eq!(config.work_folder, PathBuf::from("__sets"));
        assert_eq!(config.output_path("pt_br"), PathBuf::from("out").join("cards-pt_br.json"));
        assert_eq!(config.card_sets[0].url_for("en_us"), "https://example.com/en_us/set1.zip");
    }

    #[test]
    fn test_include_images_accepts_booleans_and_words() {
        let mut raw = base_config();
        raw["include_images"] = json!("yes");
        assert!(serde_json::from_value::<Config>(raw.clone()).unwrap().include_images);
        raw["include_images"] = json!(true);
        assert!(serde_json::from_value::<Config>(raw.clone()).unwrap().include_images);
        raw["include_images"] = json!("maybe");
        assert!(serde_json::from_value::<Config>(raw).is_err());
    }

    #[test]
    fn test_language_file_entries_layout() {
        let file: LanguageFile = serde_json::from_value(json!([
            {
                "language": "pt_br",
                "properties": {
                    "types": {"Unidade": "Unit"},
                    "subtypes": {"ELITE": "Elite"},
                    "unit_type": "Unidade",
                    "champion_supertype": "Campeão",
                    "champion_level_2": "nível 2",
                    "champion_level_3": "nível 3"
                }
            }
        ]))
        .unwrap();
        let profile = file.profile("pt_br").unwrap();
        assert_eq!(profile.level_2_suffix.as_deref(), Some("nível 2"));
        let naming = profile.localized_naming().unwrap();
        assert_eq!(naming.unit_type, "Unidade");
        assert_eq!(naming.champion_supertype, "Campeão");
        assert_eq!(naming.level_3, Some("nível 3"));
        assert_eq!(profile.dictionary.resolve_type("Unidade").unwrap(), "Unit");
        assert!(matches!(file.profile("en_us"), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_language_file_dictionary_layout() {
        let file: LanguageFile = serde_json::from_value(json!({
            "dictionary": {
                "en_us": {"types": {"Spell": "Spell"}, "subtypes": {}}
            }
        }))
        .unwrap();
        let profile = file.profile("en_us").unwrap();
        assert!(profile.level_2_suffix.is_none());
        assert!(profile.localized_naming().is_none());
        assert_eq!(profile.dictionary.resolve_type("Spell").unwrap(), "Spell");
    }

    #[test]
    fn test_validate_rejects_unknown_language_before_any_fetch() {
        let config: Config = serde_json::from_value(base_config()).unwrap();
        let languages: LanguageFile = serde_json::from_value(json!({
            "dictionary": {"en_us": {"types": {}, "subtypes": {}}}
        }))
        .unwrap();
        let settings = Settings {
            config,
            languages,
            champion_names: ChampionNameIndex::default(),
            origins: None,
        };
        assert!(matches!(settings.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_restrict_languages_keeps_configured_order() {
        let config: Config = serde_json::from_value(base_config()).unwrap();
        let languages: LanguageFile = serde_json::from_value(json!({
            "dictionary": {
                "en_us": {"types": {}, "subtypes": {}},
                "pt_br": {"types": {}, "subtypes": {}}
            }
        }))
        .unwrap();
        let mut settings = Settings {
            config,
            languages,
            champion_names: ChampionNameIndex::default(),
            origins: None,
        };
        settings.restrict_languages(&["pt_br".to_string()]).unwrap();
        assert_eq!(settings.config.included_languages, vec!["pt_br".to_string()]);
        assert!(settings.restrict_languages(&["de_de".to_string()]).is_err());
    }

    #[test]
    fn test_level_suffix_mode_requires_per_language_labels() {
        let mut config: Config = serde_json::from_value(base_config()).unwrap();
        config.champion_naming.mode = NamingMode::LevelSuffix;
        let languages: LanguageFile = serde_json::from_value(json!([
            {"language": "en_us", "properties": {"unit_type": "Unit", "champion_supertype": "Champion", "champion_level_2": "level 2"}},
            {"language": "pt_br", "properties": {"champion_level_2": "nível 2"}}
        ]))
        .unwrap();
        let settings = Settings {
            config,
            languages,
            champion_names: ChampionNameIndex::default(),
            origins: None,
        };
        match settings.validate() {
            Err(SyncError::Config(message)) => {
                assert!(message.contains("pt_br"));
                assert!(message.contains("unit_type"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_origin_tracking_loads_origin_lists() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config();
        config["origin_tracking"] = json!(true);
        fs::write(dir.path().join(CONFIG_FILE), config.to_string()).unwrap();
        fs::write(
            dir.path().join(LANGUAGE_FILE),
            json!({"dictionary": {"en_us": {}, "pt_br": {}}}).to_string(),
        )
        .unwrap();

        // Tracking without the membership document is a configuration error
        assert!(matches!(Settings::load(dir.path()), Err(SyncError::Config(_))));

        fs::write(
            dir.path().join(ORIGIN_LISTS_FILE),
            json!({"Bard": ["06RU001"], "Jhin": []}).to_string(),
        )
        .unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        let origin = settings.origins.unwrap().classify("06RU001");
        assert!(origin["Bard"]);
        assert!(!origin["Jhin"]);
    }
}
