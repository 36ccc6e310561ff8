use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::configfmt::{ConfigFmt, CONFIG_NAMES};
use crate::error::{Error, Result};
use crate::utils::xdg;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Scheme {
    pub bg: Color,
    pub fg: Color,
    pub high: Color,
    pub swipe: Color,
    pub text: Color,
}

impl Default for Scheme {
    fn default() -> Self {
        Scheme {
            bg: Color::SLATE,
            fg: Color::STEEL,
            high: Color::GREY,
            swipe: Color::MINT,
            text: Color::WHITE,
        }
    }
}

/// Colour schemes indexed by `Key::scheme`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Schemes {
    pub normal: Scheme,
    pub special: Scheme,
}

impl Default for Schemes {
    fn default() -> Self {
        Schemes {
            normal: Scheme::default(),
            special: Scheme {
                fg: Color::DUSK,
                ..Scheme::default()
            },
        }
    }
}

impl Schemes {
    pub fn get(&self, index: usize) -> &Scheme {
        match index {
            0 => &self.normal,
            _ => &self.special,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub layers: Vec<String>,
    pub landscape_layers: Vec<String>,
    pub height: u32,
    pub landscape_height: u32,
    pub font: String,
    pub font_size: f32,
    pub key_border: u32,
    pub schemes: Schemes,
    pub keymaps: BTreeMap<String, String>,
    pub print: bool,
    pub print_intersect: bool,
    pub hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            layers: vec!["full".into(), "special".into(), "cyrillic".into()],
            landscape_layers: vec!["landscape".into(), "landscapespecial".into()],
            height: 280,
            landscape_height: 240,
            font: "Sans".to_string(),
            font_size: 20.0,
            key_border: 2,
            schemes: Default::default(),
            keymaps: {
                let mut map = BTreeMap::new();
                map.insert("latin".to_string(), "us".to_string());
                map.insert("cyrillic".to_string(), "ru".to_string());
                map
            },
            print: false,
            print_intersect: false,
            hidden: false,
        }
    }
}

impl Config {
    /// Reads `path`, or the first config file found in the XDG config
    /// folder. Without either, the defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Config::read(p),
            None => match Config::find() {
                Some(p) => Config::read(&p),
                None => {
                    log::debug!("no config file found, using defaults");
                    Ok(Default::default())
                }
            },
        }
    }

    fn find() -> Option<PathBuf> {
        let dir = xdg::config_folder()?.join("wlkbd");
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }

    fn read(path: &Path) -> Result<Config> {
        let fmt = ConfigFmt::from_path(path)?;
        let f = File::open(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loading config from {}", path.display());
        fmt.from_reader(path, BufReader::new(f))
    }

    /// The XKB layout name a layout's keymap maps to.
    pub fn xkb_layout(&self, keymap: &str) -> Result<&str> {
        self.keymaps
            .get(keymap)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownKeymap(keymap.to_string()))
    }

    pub fn height(&self, landscape: bool) -> u32 {
        if landscape {
            self.landscape_height
        } else {
            self.height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.height(false), 280);
        assert_eq!(c.height(true), 240);
        assert_eq!(c.key_border, 2);
        assert_eq!(c.xkb_layout("latin").unwrap(), "us");
        assert_eq!(c.xkb_layout("cyrillic").unwrap(), "ru");
        assert_eq!(c.schemes.get(1).fg, Color::DUSK);
        assert_eq!(c.schemes.get(0).fg, Color::STEEL);
    }

    #[test]
    fn unknown_keymap() {
        assert!(matches!(
            Config::default().xkb_layout("greek"),
            Err(Error::UnknownKeymap(_))
        ));
    }

    #[cfg(feature = "yaml-cfg")]
    #[test]
    fn partial_yaml_keeps_defaults() {
        let src = "layers: [swipe, numpad]\nheight: 320\nschemes:\n  special:\n    fg: \"#101010\"\n";
        let c: Config = ConfigFmt::Yaml
            .from_reader(Path::new("config.yaml"), src.as_bytes())
            .unwrap();
        assert_eq!(c.layers, vec!["swipe", "numpad"]);
        assert_eq!(c.height, 320);
        assert_eq!(c.landscape_height, 240);
        assert_eq!(c.schemes.special.fg, Color(0xFF101010));
        assert_eq!(c.schemes.special.bg, Color::SLATE);
        assert_eq!(c.schemes.normal, Scheme::default());
    }

    #[cfg(feature = "yaml-cfg")]
    #[test]
    fn invalid_colour_fails_parse() {
        let src = "schemes:\n  normal:\n    text: purple\n";
        let res: Result<Config> =
            ConfigFmt::Yaml.from_reader(Path::new("config.yaml"), src.as_bytes());
        assert!(matches!(res, Err(Error::ConfigParse { .. })));
    }

    #[cfg(feature = "json-cfg")]
    #[test]
    fn json_config() {
        let src = r#"{"landscapeLayers": ["landscape"], "printIntersect": true, "keymaps": {"latin": "de"}}"#;
        let c: Config = ConfigFmt::Json
            .from_reader(Path::new("config.json"), src.as_bytes())
            .unwrap();
        assert_eq!(c.landscape_layers, vec!["landscape"]);
        assert!(c.print_intersect);
        assert_eq!(c.xkb_layout("latin").unwrap(), "de");
        assert!(c.xkb_layout("cyrillic").is_err());
    }

    #[test]
    fn unknown_extension() {
        assert!(matches!(
            Config::load(Some(Path::new("/nonexistent/config.toml"))),
            Err(Error::ConfigFormat(_))
        ));
    }

    #[cfg(feature = "yaml-cfg")]
    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::load(Some(Path::new("/nonexistent/config.yaml"))),
            Err(Error::ConfigRead { .. })
        ));
    }
}
