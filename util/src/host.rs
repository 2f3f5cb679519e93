//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Environment variable pointing at the root of the software tree.
pub const SW_ROOT_ENV_VAR: &str = "MISSION_SW_ROOT";

/// Get the root directory of the software, which holds the `params` and `sessions`
/// directories.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
