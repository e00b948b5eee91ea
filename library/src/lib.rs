// This file declares what files are part of the library and what
// interfaces are public from the library.

mod applier;
mod config;
mod git;
mod logging;
mod network;
mod verify;

pub use self::applier::{run, ApplyError};
pub use self::config::{default_patch_path, is_url, ApplyConfig};
pub use self::git::GitHooks;
pub use self::logging::init_logging;
pub use self::network::NetworkHooks;

#[cfg(test)]
extern crate tempdir;
