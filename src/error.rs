use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no such layer: {0}")]
    UnknownLayer(String),
    #[error("no layers defined")]
    NoLayers,
    #[error("too many layers specified, the maximum is {0}")]
    TooManyLayers(usize),
    #[error("no such keymap defined: {0}")]
    UnknownKeymap(String),
    #[error("invalid color {0:?}, expected rrggbb or rrggbbaa")]
    InvalidColor(String),
    #[error("unable to read config {path}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },
    #[error("unable to parse config {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },
    #[error("unknown config format for {0}")]
    ConfigFormat(PathBuf),
    #[error("compositor does not support {0}")]
    MissingGlobal(&'static str),
    #[error("unable to compile keymap for layout {0:?}")]
    KeymapCompile(String),
    #[error("keymap text has no {0} section")]
    KeymapMalformed(&'static str),
    #[error("unable to load font {0:?}")]
    Font(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Nix(#[from] nix::Error),
    #[error(transparent)]
    Connect(#[from] wayland_client::ConnectError),
    #[error(transparent)]
    Dispatch(#[from] wayland_client::DispatchError),
    #[error("event loop: {0}")]
    EventLoop(#[from] calloop::Error),
}
