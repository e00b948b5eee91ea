// This file's job is to fetch patch and checksum files over the network.

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context};

#[cfg(not(test))]
use log::debug;
// https://stackoverflow.com/questions/67087597/is-it-possible-to-use-rusts-log-info-for-tests
#[cfg(test)]
use std::println as debug; // Workaround to use println! for logs.

pub type DownloadFileFn = fn(&str, &Path) -> anyhow::Result<()>;

/// A container for network callbacks which can be mocked out for testing.
#[derive(Clone)]
pub struct NetworkHooks {
    /// The function to call to download a URL's bytes into a local file.
    pub download_file_fn: DownloadFileFn,
}

// We have to implement Debug by hand since fn types don't implement it.
impl core::fmt::Debug for NetworkHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkHooks")
            .field("download_file_fn", &"<fn>")
            .finish()
    }
}

impl Default for NetworkHooks {
    fn default() -> Self {
        Self {
            download_file_fn: download_file_default,
        }
    }
}

/// Streams the body at `url` into `path`.  No retries, no timeout; a hung
/// server hangs the run.
pub fn download_file_default(url: &str, path: &Path) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::new();
    let result = client.get(url).send();
    let mut response = handle_network_result(result)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create_dir_all failed for {}", parent.display()))?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create download file: {}", path.display()))?;
    response.copy_to(&mut file)?;
    Ok(())
}

/// Handles the result of a network request, returning the response if it
/// was successful, an error if it was not, or a special error if the
/// request failed due to a lack of internet connection.
fn handle_network_result(
    result: Result<reqwest::blocking::Response, reqwest::Error>,
) -> anyhow::Result<reqwest::blocking::Response> {
    use std::error::Error;

    match result {
        Ok(response) => {
            if response.status().is_success() {
                Ok(response)
            } else {
                bail!("Download failed with status: {}", response.status())
            }
        }
        Err(e) => match e.source() {
            Some(source)
                if source
                    .to_string()
                    .contains("failed to lookup address information") =>
            {
                bail!("Download failed due to network error. Please check your internet connection.");
            }
            _ => bail!(e),
        },
    }
}

pub fn download_to_path(
    network_hooks: &NetworkHooks,
    url: &str,
    path: &Path,
) -> anyhow::Result<()> {
    debug!("Downloading patch from: {}", url);
    let download_file_hook = network_hooks.download_file_fn;
    download_file_hook(url, path)
}
