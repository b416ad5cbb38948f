use std::path::Path;

use crate::error::Result;

/// Downloads a remote set archive to a local file.
///
/// Implementations block until the whole body is on disk; any failure is
/// fatal to the run.
pub trait ArchiveFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}
