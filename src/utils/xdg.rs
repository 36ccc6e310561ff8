use std::{env, path::PathBuf};

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
pub fn config_folder() -> Option<PathBuf> {
    match env::var_os("XDG_CONFIG_HOME") {
        Some(s) if !s.is_empty() => Some(PathBuf::from(s)),
        _ => env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")),
    }
}
