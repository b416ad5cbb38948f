use reqwest::blocking::Client;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, instrument};

use crate::app::ports::ArchiveFetcher;
use crate::error::{Result, SyncError};

/// Blocking HTTP fetcher. No timeout and no retry: a stalled download
/// stalls the run, a failed one ends it.
pub struct ReqwestFetcher {
    client: Client,
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl ArchiveFetcher for ReqwestFetcher {
    #[instrument(skip(self, destination))]
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = File::create(destination)?;
        let written = io::copy(&mut response, &mut file)?;
        debug!("Wrote {} bytes to {}", written, destination.display());
        Ok(())
    }
}
