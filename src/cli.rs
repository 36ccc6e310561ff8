use std::path::PathBuf;

use clap::Parser;

use crate::color::Color;
use crate::config::Config;
use crate::error::Result;

/// On-screen keyboard for wlroots-based Wayland compositors
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Comma separated list of layers for portrait mode
    #[arg(short = 'l', long, env = "WLKBD_LAYERS", value_delimiter = ',')]
    pub layers: Option<Vec<String>>,

    /// Comma separated list of layers for landscape mode
    #[arg(long, env = "WLKBD_LANDSCAPE_LAYERS", value_delimiter = ',')]
    pub landscape_layers: Option<Vec<String>>,

    /// Height in pixels in portrait mode
    #[arg(short = 'H', long, env = "WLKBD_HEIGHT")]
    pub height: Option<u32>,

    /// Height in pixels in landscape mode
    #[arg(short = 'L', long, env = "WLKBD_LANDSCAPE_HEIGHT")]
    pub landscape_height: Option<u32>,

    /// Font name, resolved through fontconfig
    #[arg(long = "fn", value_name = "FONT")]
    pub font: Option<String>,

    /// Print pressed keys to standard output
    #[arg(short = 'o')]
    pub print: bool,

    /// Print every key crossed while swiping to standard output
    #[arg(short = 'O')]
    pub print_intersect: bool,

    /// Start hidden; send SIGUSR2 to show
    #[arg(long)]
    pub hidden: bool,

    /// List the available layers and exit
    #[arg(long)]
    pub list_layers: bool,

    /// Enable debug logging
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Path to a configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Keyboard background colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub bg: Option<String>,

    /// Key colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub fg: Option<String>,

    /// Special key colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub fg_sp: Option<String>,

    /// Pressed key colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub press: Option<String>,

    /// Pressed special key colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub press_sp: Option<String>,

    /// Swiped key colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub swipe: Option<String>,

    /// Swiped special key colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub swipe_sp: Option<String>,

    /// Label colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub text: Option<String>,

    /// Special key label colour
    #[arg(long, value_name = "rrggbb[aa]")]
    pub text_sp: Option<String>,
}

fn set_color(target: &mut Color, value: &Option<String>) -> Result<()> {
    if let Some(s) = value {
        *target = Color::parse(s)?;
    }
    Ok(())
}

impl Args {
    /// Overlays the command line on top of the file configuration.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(layers) = &self.layers {
            config.layers = layers.clone();
        }
        if let Some(layers) = &self.landscape_layers {
            config.landscape_layers = layers.clone();
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(height) = self.landscape_height {
            config.landscape_height = height;
        }
        if let Some(font) = &self.font {
            config.font = font.clone();
        }
        config.print |= self.print;
        config.print_intersect |= self.print_intersect;
        config.hidden |= self.hidden;

        let schemes = &mut config.schemes;
        if let Some(bg) = &self.bg {
            let bg = Color::parse(bg)?;
            schemes.normal.bg = bg;
            schemes.special.bg = bg;
        }
        set_color(&mut schemes.normal.fg, &self.fg)?;
        set_color(&mut schemes.special.fg, &self.fg_sp)?;
        set_color(&mut schemes.normal.high, &self.press)?;
        set_color(&mut schemes.special.high, &self.press_sp)?;
        set_color(&mut schemes.normal.swipe, &self.swipe)?;
        set_color(&mut schemes.special.swipe, &self.swipe_sp)?;
        set_color(&mut schemes.normal.text, &self.text)?;
        set_color(&mut schemes.special.text, &self.text_sp)?;
        Ok(())
    }
}
