use std::path::PathBuf;

use clap::Parser;
use patchpin::{init_logging, run, ApplyConfig, ApplyError};

/// The revision of the target checkout this tool's packaged patch is
/// pinned to.  Override with --base-revision when pinning elsewhere.
const DEFAULT_BASE_REVISION: &str = "7c2a4e9d0b3f5a61c8e2d4f6a9b1c3d5e7f9a0b2";

/// Verify and apply a pinned patch to a source checkout.
#[derive(Parser, Debug)]
#[command(name = "patchpin", version)]
struct Args {
    /// Path to the target git repository.
    #[arg(long)]
    repo: PathBuf,

    /// HTTP(S) URL for the patch file.
    #[arg(long)]
    patch_url: Option<String>,

    /// Local patch file path.
    #[arg(long)]
    patch_file: Option<PathBuf>,

    /// Expected patch sha256 hex string.
    #[arg(long)]
    patch_sha256: Option<String>,

    /// Path/URL to a sha256 file.
    #[arg(long)]
    sha256_file: Option<String>,

    /// Revision the repository must be at before patching.
    #[arg(long, default_value = DEFAULT_BASE_REVISION)]
    base_revision: String,

    /// Skip the base revision and clean checks.
    #[arg(long)]
    force: bool,
}

fn main() {
    init_logging();
    let args = Args::parse();

    let mut config = ApplyConfig::new(args.repo, args.base_revision);
    config.patch_url = args.patch_url;
    config.patch_file = args.patch_file;
    config.patch_sha256 = args.patch_sha256;
    config.sha256_file = args.sha256_file;
    config.force = args.force;

    match run(&config) {
        Ok(()) => println!("Patch applied successfully."),
        Err(err) => {
            eprintln!("{err}");
            // Precondition and integrity failures carry their own exit
            // codes; anything propagated from git or the network exits 1.
            let code = err
                .downcast_ref::<ApplyError>()
                .map(ApplyError::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}
