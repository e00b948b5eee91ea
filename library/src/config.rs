// This file handles the run configuration for the patch applier.

use std::path::PathBuf;

use anyhow::Context;

use crate::git::GitHooks;
use crate::network::NetworkHooks;

/// Where the packaged default patch lives, relative to the executable.
const DEFAULT_PATCH_SUBPATH: &str = "patches/pinned.patch";

/// The full configuration for one apply run.  Built once by the caller
/// (the cli, or a test) and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ApplyConfig {
    /// Path to the target git repository.
    pub repo: PathBuf,
    /// The revision the repository must be at before patching, unless
    /// `force` is set.  Always supplied by the caller; the library has no
    /// compiled-in baseline.
    pub base_revision: String,
    /// HTTP(S) URL to download the patch from.  Wins over `patch_file`.
    pub patch_url: Option<String>,
    /// Local patch file path.  Falls back to the packaged default when
    /// neither this nor `patch_url` is set.
    pub patch_file: Option<PathBuf>,
    /// Expected patch sha256 as a hex string.  Always wins over any
    /// checksum source file.
    pub patch_sha256: Option<String>,
    /// Path or URL of a file whose first token is the expected sha256.
    pub sha256_file: Option<String>,
    /// Skip the base revision and clean tree checks.
    pub force: bool,
    pub network_hooks: NetworkHooks,
    pub git_hooks: GitHooks,
}

impl ApplyConfig {
    /// A config with no patch source, no checksum and default hooks.
    pub fn new(repo: PathBuf, base_revision: String) -> Self {
        Self {
            repo,
            base_revision,
            patch_url: None,
            patch_file: None,
            patch_sha256: None,
            sha256_file: None,
            force: false,
            network_hooks: NetworkHooks::default(),
            git_hooks: GitHooks::default(),
        }
    }
}

/// The default patch location when no source is configured: a `patches`
/// directory shipped next to the executable.
pub fn default_patch_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    let dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(dir.join(DEFAULT_PATCH_SUBPATH))
}

/// Classifies a patch or checksum source as remote or local.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
