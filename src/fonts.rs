//! Utility module for fonts

use fontconfig::Fontconfig as FontConfig;
use rusttype::Font;
use std::{fs, path::Path, path::PathBuf};

use crate::error::{Error, Result};

/// FontSeeker is a marker struct that is used to look up fonts
pub(crate) struct FontSeeker;

impl FontSeeker {
    /// Acts like fc-match.
    /// Given a string, it matches it to a font file and returns its path.
    pub(crate) fn from_string(name: &str) -> Result<PathBuf> {
        let fc = FontConfig::new().ok_or_else(|| Error::Font(name.to_string()))?;
        fc.find(name, None)
            .map(|f| f.path)
            .ok_or_else(|| Error::Font(name.to_string()))
    }
}

/// FontLoader is a marker struct that is used to load files
pub(crate) struct FontLoader;

impl FontLoader {
    /// Given a path, loads it as a Font, which can be rendered to the screen.
    pub(crate) fn from_path<P>(path: P) -> Result<Font<'static>>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Font::try_from_vec(data).ok_or_else(|| Error::Font(path.display().to_string()))
    }

    pub(crate) fn from_name(name: &str) -> Result<Font<'static>> {
        let path = FontSeeker::from_string(name)?;
        log::debug!("font {:?} resolved to {}", name, path.display());
        FontLoader::from_path(path)
    }
}
