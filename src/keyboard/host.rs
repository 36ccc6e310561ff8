use crate::error::Result;
use crate::layout::{Command, Geometry, Key, Layout, Modifiers};

/// How a single key is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    Normal,
    Pressed,
    /// Crossed by a stroke in print-intersect mode.
    Swiped,
}

/// Everything the keyboard needs from the outside world: a surface to draw
/// on, a virtual keyboard to type with, and somewhere to send commands.
///
/// Drawing calls only update an off-screen canvas; nothing reaches the
/// compositor until [`Host::request_present`] has been called and the event
/// loop comes around.
pub trait Host {
    /// Paints `key` into `area`, which is the cell of the key hosting it.
    fn draw_key(&mut self, key: &Key, area: Geometry, visual: Visual, shifted: bool);

    /// Clears the surface and paints every key of `layout`.
    fn draw_layout(&mut self, layout: &Layout, mods: Modifiers, compose_armed: bool);

    fn request_present(&mut self);

    fn emit_modifiers(&mut self, mods: Modifiers);

    fn emit_key(&mut self, code: u32, pressed: bool, time: u32);

    /// Installs the named keymap, binding `codepoint` and `shift_codepoint`
    /// to the compose scancode when they are non-zero. Must take effect
    /// before the next [`Host::emit_key`].
    fn upload_keymap(&mut self, name: &str, codepoint: u32, shift_codepoint: u32) -> Result<()>;

    fn invoke_command(&mut self, primary: Command, secondary: Command);

    /// Echoes typed text for print modes.
    fn print(&mut self, text: &str);
}
