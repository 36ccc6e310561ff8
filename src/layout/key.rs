use bitflags::bitflags;

use super::{Geometry, LayoutId};
use crate::gesture::Direction;

bitflags! {
    /// Modifier mask in the bit layout `zwp_virtual_keyboard_v1` expects.
    #[derive(Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1;
        const CAPSLOCK = 2;
        const CTRL = 4;
        const ALT = 8;
        const SUPER = 64;
        const ALTGR = 128;
    }
}

/// Host actions bound to command keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    IncreaseHeight,
    DecreaseHeight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyType {
    /// Reserves space in a row.
    Pad,
    /// Emits an evdev scancode.
    Code(u32),
    /// Toggles a modifier.
    Mod(Modifiers),
    /// Emits a code point through a temporary keymap.
    Copy { codepoint: u32, shift_codepoint: u32 },
    Layout(LayoutId),
    BackLayer,
    NextLayer,
    Compose,
    Command(Command, Command),
    EndRow,
}

#[derive(Debug, Clone, Default)]
pub struct Swipes {
    neighbours: [Option<Key>; 8],
    pub long_tap: Option<Key>,
}

impl Swipes {
    pub fn neighbour(&self, dir: Direction) -> Option<&Key> {
        self.neighbours[dir as usize].as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct Key {
    pub label: &'static str,
    pub shift_label: &'static str,
    pub width: f64,
    pub kind: KeyType,
    /// Modifiers forced while this key is emitted.
    pub code_mod: Modifiers,
    /// Replace the current modifiers with `code_mod` instead of toggling.
    pub reset_mod: bool,
    pub scheme: usize,
    /// Sub-layout selected when this key follows the compose key.
    pub compose: Option<LayoutId>,
    pub geometry: Geometry,
    pub swipes: Option<Box<Swipes>>,
}

impl Key {
    pub fn new(label: &'static str, shift_label: &'static str, kind: KeyType) -> Key {
        Key {
            label,
            shift_label,
            width: 1.0,
            kind,
            code_mod: Modifiers::empty(),
            reset_mod: false,
            scheme: 0,
            compose: None,
            geometry: Geometry::new(),
            swipes: None,
        }
    }

    pub fn code(label: &'static str, shift_label: &'static str, code: u32) -> Key {
        Key::new(label, shift_label, KeyType::Code(code))
    }

    pub fn copy(
        label: &'static str,
        shift_label: &'static str,
        codepoint: u32,
        shift_codepoint: u32,
    ) -> Key {
        Key::new(
            label,
            shift_label,
            KeyType::Copy {
                codepoint,
                shift_codepoint,
            },
        )
    }

    pub fn modifier(label: &'static str, shift_label: &'static str, mods: Modifiers) -> Key {
        Key::new(label, shift_label, KeyType::Mod(mods)).scheme(1)
    }

    pub fn layout(label: &'static str, target: LayoutId) -> Key {
        Key::new(label, label, KeyType::Layout(target)).scheme(1)
    }

    pub fn pad(width: f64) -> Key {
        Key::new("", "", KeyType::Pad).width(width)
    }

    pub fn end_row() -> Key {
        Key::new("", "", KeyType::EndRow).width(0.0)
    }

    pub fn width(mut self, width: f64) -> Key {
        self.width = width;
        self
    }

    pub fn scheme(mut self, scheme: usize) -> Key {
        self.scheme = scheme;
        self
    }

    pub fn compose(mut self, layout: LayoutId) -> Key {
        self.compose = Some(layout);
        self
    }

    pub fn with_mod(mut self, mods: Modifiers) -> Key {
        self.code_mod = mods;
        self
    }

    #[cfg(test)]
    pub fn reset_mod(mut self) -> Key {
        self.reset_mod = true;
        self
    }

    pub fn swipe(mut self, dir: Direction, key: Key) -> Key {
        self.swipes.get_or_insert_with(Default::default).neighbours[dir as usize] = Some(key);
        self
    }

    pub fn long_tap(mut self, key: Key) -> Key {
        self.swipes.get_or_insert_with(Default::default).long_tap = Some(key);
        self
    }

    /// Pads and row breaks are layout markers only.
    pub fn is_interactive(&self) -> bool {
        !matches!(self.kind, KeyType::Pad | KeyType::EndRow)
    }

    pub fn label(&self, shifted: bool) -> &'static str {
        if shifted {
            self.shift_label
        } else {
            self.label
        }
    }
}
