use serde::{de::DeserializeOwned, Serialize};
use std::{io::BufRead, path::Path};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFmt {
    #[cfg(feature = "yaml-cfg")]
    Yaml,
    #[cfg(feature = "json-cfg")]
    Json,
}

pub const CONFIG_NAMES: &[&str] = &[
    #[cfg(feature = "yaml-cfg")]
    "config.yaml",
    #[cfg(feature = "json-cfg")]
    "config.json",
];

impl ConfigFmt {
    #[inline]
    pub fn new(ext: &str) -> Option<Self> {
        match ext {
            #[cfg(feature = "yaml-cfg")]
            "yaml" | "yml" => Some(ConfigFmt::Yaml),
            #[cfg(feature = "json-cfg")]
            "json" => Some(ConfigFmt::Json),
            _ => None,
        }
    }

    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(ConfigFmt::new)
            .ok_or_else(|| Error::ConfigFormat(path.to_path_buf()))
    }

    #[inline]
    pub fn from_reader<B: BufRead, T: DeserializeOwned>(&self, path: &Path, r: B) -> Result<T> {
        let parsed = match self {
            #[cfg(feature = "yaml-cfg")]
            ConfigFmt::Yaml => serde_yaml::from_reader(r).map_err(|e| e.to_string()),
            #[cfg(feature = "json-cfg")]
            ConfigFmt::Json => serde_json::from_reader(r).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| Error::ConfigParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    #[inline]
    pub fn to_string<T: Serialize + ?Sized>(&self, src: &T) -> Result<String> {
        let out = match self {
            #[cfg(feature = "yaml-cfg")]
            ConfigFmt::Yaml => serde_yaml::to_string(&src).map_err(|e| e.to_string()),
            #[cfg(feature = "json-cfg")]
            ConfigFmt::Json => serde_json::to_string_pretty(&src).map_err(|e| e.to_string()),
        };
        out.map_err(|reason| Error::ConfigParse {
            path: Default::default(),
            reason,
        })
    }
}

impl Default for ConfigFmt {
    fn default() -> Self {
        // attributes require curly braces to work
        #[cfg(feature = "yaml-cfg")]
        {
            ConfigFmt::Yaml
        }
        #[cfg(all(feature = "json-cfg", not(feature = "yaml-cfg")))]
        {
            ConfigFmt::Json
        }
    }
}
