//! Static key tables and their pixel geometry.
//!
//! A [`Layout`] is a flat list of keys where [`KeyType::EndRow`] entries
//! split rows. Relative key widths are turned into absolute rectangles by
//! [`compute_layout`] whenever the surface size changes.

use std::{
    cmp::{max, min},
    fmt,
    ops::{Index, IndexMut},
};

use crate::error::{Error, Result};
use crate::gesture::Direction;

mod builtin;
mod key;
pub mod keycodes;

pub use self::key::{Command, Key, KeyType, Modifiers};

/// Layer sequences longer than this are rejected at startup.
pub const MAX_LAYERS: usize = 25;

// Slack for float error when checking the running width target.
const WIDTH_EPSILON: f64 = 1e-6;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {}, y: {}, width: {}, height: {})",
            self.x, self.y, self.width, self.height
        )
    }
}

impl Geometry {
    pub fn new() -> Geometry {
        Geometry {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    #[cfg(test)]
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn expand(&self, other: Geometry) -> Geometry {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = min(self.x, other.x);
        let y = min(self.y, other.y);
        Geometry {
            x,
            y,
            width: max(self.width + self.x, other.width + other.x) - x,
            height: max(self.height + self.y, other.height + other.y) - y,
        }
    }

    /// Shrinks the rectangle by `border` on every side.
    #[cfg(test)]
    pub fn inset(&self, border: u32) -> Geometry {
        if self.width <= border * 2 || self.height <= border * 2 {
            return Geometry {
                x: self.x,
                y: self.y,
                width: 0,
                height: 0,
            };
        }
        Geometry {
            x: self.x + border,
            y: self.y + border,
            width: self.width - border * 2,
            height: self.height - border * 2,
        }
    }
}

/// Dense identifier of every layout compiled into the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutId {
    Full,
    Special,
    Cyrillic,
    Landscape,
    LandscapeSpecial,
    Swipe,
    Numpad,
    Index,
    ComposeA,
    ComposeE,
    ComposeI,
    ComposeO,
    ComposeU,
    ComposeY,
    ComposeN,
    ComposeC,
    ComposeS,
    ComposeZ,
    ComposeBracket,
    ComposePunctuation,
    ComposeMath,
}

impl LayoutId {
    pub const ALL: [LayoutId; 21] = [
        LayoutId::Full,
        LayoutId::Special,
        LayoutId::Cyrillic,
        LayoutId::Landscape,
        LayoutId::LandscapeSpecial,
        LayoutId::Swipe,
        LayoutId::Numpad,
        LayoutId::Index,
        LayoutId::ComposeA,
        LayoutId::ComposeE,
        LayoutId::ComposeI,
        LayoutId::ComposeO,
        LayoutId::ComposeU,
        LayoutId::ComposeY,
        LayoutId::ComposeN,
        LayoutId::ComposeC,
        LayoutId::ComposeS,
        LayoutId::ComposeZ,
        LayoutId::ComposeBracket,
        LayoutId::ComposePunctuation,
        LayoutId::ComposeMath,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug)]
pub struct Layout {
    pub id: LayoutId,
    pub name: &'static str,
    pub keymap: &'static str,
    /// Typing layouts that compose and back-layer return to.
    pub primary: bool,
    pub keys: Vec<Key>,
    pub row_height: u32,
}

impl Layout {
    pub fn new(
        id: LayoutId,
        name: &'static str,
        keymap: &'static str,
        primary: bool,
        keys: Vec<Key>,
    ) -> Layout {
        Layout {
            id,
            name,
            keymap,
            primary,
            keys,
            row_height: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.keys
            .iter()
            .filter(|k| matches!(k.kind, KeyType::EndRow))
            .count()
            + 1
    }
}

/// Which key of a layout entry a [`KeyRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Key,
    Swipe(Direction),
    LongTap,
}

/// Stable address of a key: a layout, an entry in its key list, and
/// optionally one of the entry's gesture keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRef {
    pub layout: LayoutId,
    pub index: usize,
    pub slot: Slot,
}

impl KeyRef {
    pub fn new(layout: LayoutId, index: usize) -> KeyRef {
        KeyRef {
            layout,
            index,
            slot: Slot::Key,
        }
    }

    pub fn with_slot(self, slot: Slot) -> KeyRef {
        KeyRef { slot, ..self }
    }
}

/// Arena holding one [`Layout`] per [`LayoutId`].
pub struct Layouts {
    layouts: Vec<Layout>,
}

impl Layouts {
    pub fn builtin() -> Layouts {
        Layouts {
            layouts: builtin::layouts(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<LayoutId> {
        self.layouts.iter().find(|l| l.name == name).map(|l| l.id)
    }

    /// Resolves a key reference. Returns `None` for an empty gesture slot.
    pub fn key(&self, r: KeyRef) -> Option<&Key> {
        let key = self[r.layout].keys.get(r.index)?;
        match r.slot {
            Slot::Key => Some(key),
            Slot::Swipe(dir) => key.swipes.as_ref()?.neighbour(dir),
            Slot::LongTap => key.swipes.as_ref()?.long_tap.as_ref(),
        }
    }

    /// The on-screen cell of a key. Gesture keys are drawn over the cell of
    /// the key that hosts them.
    pub fn area(&self, r: KeyRef) -> Geometry {
        self[r.layout]
            .keys
            .get(r.index)
            .map(|k| k.geometry)
            .unwrap_or_default()
    }

    pub fn compute(&mut self, width: u32, height: u32) {
        for layout in self.layouts.iter_mut() {
            compute_layout(layout, width, height);
        }
    }
}

impl Index<LayoutId> for Layouts {
    type Output = Layout;

    fn index(&self, id: LayoutId) -> &Layout {
        &self.layouts[id.index()]
    }
}

impl IndexMut<LayoutId> for Layouts {
    fn index_mut(&mut self, id: LayoutId) -> &mut Layout {
        &mut self.layouts[id.index()]
    }
}

/// Assigns every key of `layout` its rectangle for a surface of the given
/// size. Rows share the height evenly, and within a row each entry takes its
/// share of the relative width, widened by a pixel whenever the running
/// total falls behind so that every row ends exactly at `width`.
pub fn compute_layout(layout: &mut Layout, width: u32, height: u32) {
    let rows = layout.rows() as u32;
    let row_height = height / rows;
    layout.row_height = row_height;

    let mut y = 0;
    for row in layout
        .keys
        .split_mut(|k| matches!(k.kind, KeyType::EndRow))
    {
        let row_length: f64 = row.iter().map(|k| k.width.abs()).sum();
        let mut x = 0;
        let mut acc = 0.0;
        for key in row.iter_mut() {
            let rel = key.width.abs();
            let mut w = 0;
            if row_length > 0.0 {
                w = (width as f64 / row_length * rel).floor() as u32;
                acc += rel;
                let target = acc / row_length * width as f64;
                if ((x + w) as f64) + WIDTH_EPSILON < target {
                    w += 1;
                }
            }
            if !matches!(key.kind, KeyType::Pad) {
                key.geometry = Geometry {
                    x,
                    y,
                    width: w,
                    height: row_height,
                };
            }
            x += w;
        }
        y += row_height;
    }
}

/// Index of the first interactive key whose rectangle contains the point.
pub fn find_key_at(layout: &Layout, x: u32, y: u32) -> Option<usize> {
    layout
        .keys
        .iter()
        .position(|k| k.is_interactive() && k.geometry.contains(x, y))
}

/// Maps configured layer names onto layouts.
pub fn resolve_layers<S: AsRef<str>>(layouts: &Layouts, names: &[S]) -> Result<Vec<LayoutId>> {
    if names.is_empty() {
        return Err(Error::NoLayers);
    }
    if names.len() > MAX_LAYERS {
        return Err(Error::TooManyLayers(MAX_LAYERS));
    }
    names
        .iter()
        .map(|name| {
            let name = name.as_ref().trim();
            layouts
                .by_name(name)
                .ok_or_else(|| Error::UnknownLayer(name.to_string()))
        })
        .collect()
}

/// Names accepted by [`resolve_layers`].
pub fn list_layers(layouts: &Layouts) -> Vec<&'static str> {
    layouts.iter().map(|l| l.name).collect()
}
