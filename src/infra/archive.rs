use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

use crate::error::{Result, SyncError};

/// What to take out of a set archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSelector {
    /// Every entry, images included
    All,
    /// A single entry, by its path inside the archive
    Entry(String),
}

/// Extracts `archive` under `target_dir`, keeping entry paths relative to it.
pub fn extract_archive(archive: &Path, target_dir: &Path, selector: &ArchiveSelector) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    fs::create_dir_all(target_dir)?;

    match selector {
        ArchiveSelector::All => {
            zip.extract(target_dir)?;
            debug!("Extracted {} entries into {}", zip.len(), target_dir.display());
        }
        ArchiveSelector::Entry(name) => {
            let mut entry = match zip.by_name(name) {
                Ok(entry) => entry,
                Err(zip::result::ZipError::FileNotFound) => {
                    return Err(SyncError::ArchiveEntry {
                        archive: archive.to_path_buf(),
                        entry: name.clone(),
                    })
                }
                Err(e) => return Err(e.into()),
            };
            // enclosed_name rejects entries that would escape target_dir
            let relative: PathBuf = entry.enclosed_name().ok_or_else(|| SyncError::ArchiveEntry {
                archive: archive.to_path_buf(),
                entry: name.clone(),
            })?;
            let destination = target_dir.join(relative);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&destination)?;
            io::copy(&mut entry, &mut out)?;
            debug!("Extracted {} into {}", name, destination.display());
        }
    }
    Ok(())
}
