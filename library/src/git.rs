// This file's job is to talk to the external version-control system.
// Everything goes through GitHooks so tests can swap in fakes.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context};

pub type CurrentRevisionFn = fn(&Path) -> anyhow::Result<String>;
pub type IsCleanFn = fn(&Path) -> anyhow::Result<bool>;
pub type ApplyPatchFn = fn(&Path, &Path) -> anyhow::Result<()>;

/// A container for version-control callbacks which can be mocked out for
/// testing.
#[derive(Clone)]
pub struct GitHooks {
    /// Returns the repository's current revision identifier.
    pub current_revision_fn: CurrentRevisionFn,
    /// Returns true iff the working tree has no tracked or untracked changes.
    pub is_clean_fn: IsCleanFn,
    /// Applies a patch file to the repository's working tree.
    pub apply_patch_fn: ApplyPatchFn,
}

// We have to implement Debug by hand since fn types don't implement it.
impl core::fmt::Debug for GitHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHooks")
            .field("current_revision_fn", &"<fn>")
            .field("is_clean_fn", &"<fn>")
            .field("apply_patch_fn", &"<fn>")
            .finish()
    }
}

impl Default for GitHooks {
    fn default() -> Self {
        Self {
            current_revision_fn: current_revision_default,
            is_clean_fn: is_clean_default,
            apply_patch_fn: apply_patch_default,
        }
    }
}

/// Runs a git subcommand in `repo`, failing with git's stderr on a
/// non-zero exit.
fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

pub fn current_revision_default(repo: &Path) -> anyhow::Result<String> {
    let stdout = run_git(repo, &["rev-parse", "HEAD"])?;
    Ok(stdout.trim().to_string())
}

pub fn is_clean_default(repo: &Path) -> anyhow::Result<bool> {
    let stdout = run_git(repo, &["status", "--porcelain"])?;
    Ok(stdout.trim().is_empty())
}

pub fn apply_patch_default(repo: &Path, patch: &Path) -> anyhow::Result<()> {
    let patch = patch.to_str().context("Patch path is not valid UTF-8")?;
    // nowarn keeps whitespace-only context differences from blocking the
    // apply.
    run_git(repo, &["apply", "--whitespace=nowarn", patch])?;
    Ok(())
}
