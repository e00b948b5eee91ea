// This file's job is the apply flow itself: validate the checkout,
// acquire the patch, verify its digest, hand it to git.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;

use crate::config::{default_patch_path, is_url, ApplyConfig};
use crate::network::download_to_path;
use crate::verify::{file_sha256, read_digest_file};

#[cfg(not(test))]
use log::info;
// https://stackoverflow.com/questions/67087597/is-it-possible-to-use-rusts-log-info-for-tests
#[cfg(test)]
use std::println as info; // Workaround to use println! for logs.

/// Precondition and integrity failures with dedicated exit codes.
/// Failures from the external collaborators (git, the network) stay plain
/// anyhow errors and exit non-zero without a dedicated code.
#[derive(Debug, PartialEq)]
pub enum ApplyError {
    RepoNotFound(PathBuf),
    RevisionMismatch { actual: String, expected: String },
    RepoNotClean,
    PatchNotFound(PathBuf),
    DigestFileNotFound(PathBuf),
    DigestMismatch { expected: String, actual: String },
}

impl std::error::Error for ApplyError {}

impl Display for ApplyError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ApplyError::RepoNotFound(path) => write!(f, "Repo not found: {}", path.display()),
            ApplyError::RevisionMismatch { actual, expected } => {
                write!(
                    f,
                    "Repo HEAD is {}, expected {}\nUse --force to bypass this check.",
                    actual, expected
                )
            }
            ApplyError::RepoNotClean => {
                write!(f, "Repo has uncommitted changes. Please clean or use --force.")
            }
            ApplyError::PatchNotFound(path) => {
                write!(f, "Patch file not found: {}", path.display())
            }
            ApplyError::DigestFileNotFound(path) => {
                write!(f, "SHA256 file not found: {}", path.display())
            }
            ApplyError::DigestMismatch { expected, actual } => {
                write!(
                    f,
                    "SHA256 mismatch for patch file.\nExpected: {}\nActual:   {}",
                    expected, actual
                )
            }
        }
    }
}

impl ApplyError {
    /// The process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApplyError::RepoNotFound(_) => 1,
            ApplyError::RevisionMismatch { .. } => 2,
            ApplyError::RepoNotClean => 3,
            ApplyError::PatchNotFound(_) => 4,
            ApplyError::DigestFileNotFound(_) => 5,
            ApplyError::DigestMismatch { .. } => 6,
        }
    }
}

/// `<patch path>.sha256`, the conventional location checked when no
/// checksum source is configured.
fn adjacent_digest_path(patch: &Path) -> PathBuf {
    let mut path = patch.as_os_str().to_os_string();
    path.push(".sha256");
    PathBuf::from(path)
}

fn new_workspace() -> anyhow::Result<TempDir> {
    tempfile::Builder::new()
        .prefix("patchpin_")
        .tempdir()
        .context("Failed to create temporary download directory")
}

/// Runs the whole sequence: repository checks, acquisition, verification,
/// application.  Any temporary download workspace is removed when this
/// returns, on success and on error alike.
pub fn run(config: &ApplyConfig) -> anyhow::Result<()> {
    if !config.repo.is_dir() {
        return Err(ApplyError::RepoNotFound(config.repo.clone()).into());
    }

    if !config.force {
        let head = (config.git_hooks.current_revision_fn)(&config.repo)?;
        if head != config.base_revision {
            return Err(ApplyError::RevisionMismatch {
                actual: head,
                expected: config.base_revision.clone(),
            }
            .into());
        }
        if !(config.git_hooks.is_clean_fn)(&config.repo)? {
            return Err(ApplyError::RepoNotClean.into());
        }
    }

    // Owns any downloaded files until the end of the run.
    let mut temp_dir: Option<TempDir> = None;
    let mut digest_source = config.sha256_file.clone();

    let patch_file = if let Some(url) = &config.patch_url {
        let dir = new_workspace()?;
        let path = dir.path().join("pinned.patch");
        info!("Downloading patch: {}", url);
        download_to_path(&config.network_hooks, url, &path)?;
        temp_dir = Some(dir);
        path
    } else {
        let path = match &config.patch_file {
            Some(path) => path.clone(),
            None => default_patch_path()?,
        };
        // Only a locally-sourced patch gets the adjacent-file discovery.
        if digest_source.is_none() {
            let adjacent = adjacent_digest_path(&path);
            if adjacent.is_file() {
                digest_source = Some(adjacent.to_string_lossy().into_owned());
            }
        }
        path
    };

    if !patch_file.is_file() {
        return Err(ApplyError::PatchNotFound(patch_file).into());
    }

    // An explicitly supplied digest always wins; the source file is only
    // consulted when no explicit value was ever set.
    let mut expected_digest = config.patch_sha256.clone();
    if expected_digest.is_none() {
        if let Some(source) = &digest_source {
            if is_url(source) {
                if temp_dir.is_none() {
                    temp_dir = Some(new_workspace()?);
                }
                if let Some(dir) = temp_dir.as_ref() {
                    let sha_path = dir.path().join("pinned.patch.sha256");
                    download_to_path(&config.network_hooks, source, &sha_path)?;
                    expected_digest = Some(read_digest_file(&sha_path)?);
                }
            } else {
                let source_path = Path::new(source);
                if !source_path.is_file() {
                    return Err(ApplyError::DigestFileNotFound(source_path.to_path_buf()).into());
                }
                expected_digest = Some(read_digest_file(source_path)?);
            }
        }
    }

    if let Some(expected) = &expected_digest {
        let actual = file_sha256(&patch_file)?;
        if &actual != expected {
            return Err(ApplyError::DigestMismatch {
                expected: expected.clone(),
                actual,
            }
            .into());
        }
        info!("SHA256 verified: {}", actual);
    }
    // No expected digest resolved from anywhere: verification is
    // intentionally skipped.

    info!("Applying patch: {}", patch_file.display());
    (config.git_hooks.apply_patch_fn)(&config.repo, &patch_file)?;
    Ok(())
}
