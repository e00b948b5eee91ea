// This file's job is patch integrity checking.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Computes the sha256 of the file at `path` as a lowercase hex string.
pub fn file_sha256(path: &Path) -> anyhow::Result<String> {
    use sha2::{Digest, Sha256}; // Digest is needed for Sha256::new();

    // Based on guidance from:
    // https://github.com/RustCrypto/hashes#hashing-readable-objects
    let mut file = fs::File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;
    let mut hasher = Sha256::new();
    // io::copy streams in fixed-size chunks, so memory use is bounded
    // regardless of patch size.
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Reads the expected digest out of a checksum file: the first
/// whitespace-delimited token, matching `sha256sum` output.
pub fn read_digest_file(path: &Path) -> anyhow::Result<String> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read checksum file: {}", path.display()))?;
    let digest = contents
        .split_whitespace()
        .next()
        .with_context(|| format!("Checksum file is empty: {}", path.display()))?;
    Ok(digest.to_string())
}
