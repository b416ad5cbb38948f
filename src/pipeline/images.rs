use metrics::counter;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::constants::ALT_ART_MARKER;
use crate::error::Result;

/// Moves every file of an extracted set's image folder into `images_folder`,
/// replacing files of the same name. Returns how many were moved.
#[instrument(skip_all, fields(source = %source_dir.display()))]
pub fn relocate_images(source_dir: &Path, images_folder: &Path, language: &str) -> Result<usize> {
    fs::create_dir_all(images_folder)?;

    let mut moved = 0;
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let destination = images_folder.join(entry.file_name());
        move_file(&entry.path(), &destination)?;
        moved += 1;
    }

    counter!("images_moved_total", "language" => language.to_string()).increment(moved as u64);
    info!("Moved {} images to {}", moved, images_folder.display());
    Ok(moved)
}

// rename cannot cross filesystems, so fall back to copy + delete
fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }
    fs::copy(source, destination)?;
    fs::remove_file(source)?;
    Ok(())
}

/// Deletes images of ignored cards and, when asked, alternate artwork.
/// Files that are already gone are not an error.
pub fn prune_images(images_folder: &Path, ignored_codes: &[String], remove_alternate_art: bool) -> Result<usize> {
    let mut removed = 0;

    for code in ignored_codes {
        for file_name in [format!("{code}.png"), format!("{code}-full.png")] {
            if remove_if_present(&images_folder.join(&file_name))? {
                debug!("Removed {}", file_name);
                removed += 1;
            }
        }
    }

    if remove_alternate_art && images_folder.is_dir() {
        for entry in fs::read_dir(images_folder)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().contains(ALT_ART_MARKER) && remove_if_present(&entry.path())? {
                removed += 1;
            }
        }
    }

    if removed > 0 {
        info!("Removed {} unwanted images from {}", removed, images_folder.display());
    }
    Ok(removed)
}

fn remove_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Removes a scratch directory tree; a missing tree is fine.
pub fn remove_tree(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_relocate_moves_and_overwrites() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("set1/en_us/img/cards");
        let target = dir.path().join("images");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&target).unwrap();
        fs::write(source.join("01DE001.png"), "new").unwrap();
        fs::write(source.join("01DE002.png"), "b").unwrap();
        fs::write(target.join("01DE001.png"), "old").unwrap();

        let moved = relocate_images(&source, &target, "en_us").unwrap();

        assert_eq!(moved, 2);
        assert_eq!(fs::read_to_string(target.join("01DE001.png")).unwrap(), "new");
        assert_eq!(fs::read_dir(&source).unwrap().count(), 0);
    }

    #[test]
    fn test_relocate_fails_without_source_folder() {
        let dir = tempdir().unwrap();
        assert!(relocate_images(&dir.path().join("missing"), &dir.path().join("images"), "en_us").is_err());
    }

    #[test]
    fn test_prune_removes_ignored_and_alt_art() {
        let dir = tempdir().unwrap();
        for name in ["01DE001.png", "01DE001-full.png", "01DE002.png", "01DE002-alt.png"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let removed = prune_images(dir.path(), &["01DE001".to_string(), "09XX999".to_string()], true).unwrap();

        assert_eq!(removed, 3);
        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["01DE002.png"]);
    }

    #[test]
    fn test_remove_tree_tolerates_missing_path() {
        let dir = tempdir().unwrap();
        remove_tree(&dir.path().join("__sets")).unwrap();
    }
}
