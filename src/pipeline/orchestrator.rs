use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, instrument, warn};

use crate::app::ports::ArchiveFetcher;
use crate::config::{CardSet, Settings};
use crate::constants::data_entry_path;
use crate::error::Result;
use crate::infra::archive::{extract_archive, ArchiveSelector};
use crate::infra::output_writer::write_json_atomic;
use crate::pipeline::images::{prune_images, relocate_images, remove_tree};
use crate::pipeline::processing::aggregate::{load_records, CardCollection, SetAggregator, SetSummary};
use crate::pipeline::processing::normalize::CardNormalizer;

/// Outcome of one language pass
#[derive(Debug, Clone)]
pub struct LanguageSummary {
    pub language: String,
    pub output_file: PathBuf,
    pub cards: usize,
    pub sets: Vec<(String, SetSummary)>,
    pub images_moved: usize,
}

/// Runs every configured language through every configured set, one at a
/// time, and writes one output document per language.
pub struct Orchestrator<'a> {
    settings: &'a Settings,
    fetcher: &'a dyn ArchiveFetcher,
    /// Relative paths in the configuration are resolved against this
    base_dir: PathBuf,
}

impl<'a> Orchestrator<'a> {
    pub fn new(settings: &'a Settings, fetcher: &'a dyn ArchiveFetcher, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            fetcher,
            base_dir: base_dir.into(),
        }
    }

    fn work_dir(&self) -> PathBuf {
        self.base_dir.join(&self.settings.config.work_folder)
    }

    fn images_dir(&self) -> PathBuf {
        self.base_dir.join(&self.settings.config.images_folder)
    }

    /// Processes all languages in configured order. The first failure ends
    /// the run; languages finished before it keep their output files.
    pub fn run(&self) -> Result<Vec<LanguageSummary>> {
        let mut summaries = Vec::with_capacity(self.settings.config.included_languages.len());
        for language in &self.settings.config.included_languages {
            let span = info_span!("language", language = %language);
            let _enter = span.enter();
            summaries.push(self.run_language(language)?);
        }
        Ok(summaries)
    }

    fn run_language(&self, language: &str) -> Result<LanguageSummary> {
        let config = &self.settings.config;
        let profile = self.settings.languages.profile(language)?;
        let normalizer = CardNormalizer::new(
            &profile,
            &self.settings.champion_names,
            &config.champion_naming,
            self.settings.origins.as_ref(),
        );
        let aggregator = SetAggregator::new(language, &normalizer, &config.ignored_card_codes);

        // Fresh per language; nothing is shared across passes
        let mut collection = CardCollection::new(config.output_shape);
        let mut sets = Vec::with_capacity(config.card_sets.len());
        let mut images_moved = 0;

        for set in &config.card_sets {
            let span = info_span!("set", set = %set.name);
            let _enter = span.enter();
            let (summary, moved) = self.process_set(set, language, &aggregator, &mut collection)?;
            sets.push((set.name.clone(), summary));
            images_moved += moved;
        }

        if config.include_images {
            prune_images(&self.images_dir(), &config.ignored_card_codes, config.remove_alternate_art)?;
        }

        if collection.is_empty() {
            warn!("No cards normalized for {}", language);
        }
        let output_file = self.base_dir.join(config.output_path(language));
        write_json_atomic(&output_file, &collection)?;
        info!("💾 Wrote {} cards to {}", collection.len(), output_file.display());

        remove_tree(&self.work_dir())?;

        Ok(LanguageSummary {
            language: language.to_string(),
            output_file,
            cards: collection.len(),
            sets,
            images_moved,
        })
    }

    #[instrument(skip_all, fields(folder = %set.folder))]
    fn process_set(
        &self,
        set: &CardSet,
        language: &str,
        aggregator: &SetAggregator<'_>,
        collection: &mut CardCollection,
    ) -> Result<(SetSummary, usize)> {
        let config = &self.settings.config;
        let work_dir = self.work_dir();
        let set_dir = work_dir.join(&set.folder);
        fs::create_dir_all(&work_dir)?;
        remove_tree(&set_dir)?;

        let url = set.url_for(language);
        let archive = work_dir.join(format!("{}-{}.zip", set.folder, language));
        info!("📡 Downloading set {} from {}", set.name, url);
        self.fetcher.fetch(&url, &archive)?;

        let entry = data_entry_path(&set.folder, language);
        let selector = if config.include_images {
            ArchiveSelector::All
        } else {
            ArchiveSelector::Entry(entry.clone())
        };
        extract_archive(&archive, &set_dir, &selector)?;
        fs::remove_file(&archive)?;
        info!("📦 Extracted {}", archive.display());

        let records = load_records(&set_dir.join(&entry))?;
        info!("🔧 Normalizing {} records", records.len());
        let summary = aggregator.aggregate(&records, collection)?;

        let moved = if config.include_images {
            relocate_images(&card_images_dir(&set_dir, language), &self.images_dir(), language)?
        } else {
            0
        };

        Ok((summary, moved))
    }
}

fn card_images_dir(set_dir: &Path, language: &str) -> PathBuf {
    set_dir.join(language).join("img").join("cards")
}
