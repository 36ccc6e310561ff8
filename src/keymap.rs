use std::{collections::HashMap, ffi::CStr, fs::File, io, io::Write, os::unix::io::AsFd};

use wayland_client::protocol::wl_keyboard;
use wayland_protocols_misc::zwp_virtual_keyboard_v1::client::zwp_virtual_keyboard_v1;
use xkbcommon::xkb;

use crate::buffer::memfd;
use crate::error::{Error, Result};

const SYMBOLS_SECTION: &str = "xkb_symbols";

/// Binds `cp` and its shifted form `shift_cp` to the `<COMP>` key (evdev
/// scancode 127) at the end of the symbols section of `base`.
pub fn with_compose_symbols(base: &str, cp: u32, shift_cp: u32) -> Result<String> {
    let section = base
        .find(SYMBOLS_SECTION)
        .ok_or(Error::KeymapMalformed(SYMBOLS_SECTION))?;
    let end = base[section..]
        .find("\n};")
        .map(|off| section + off + 1)
        .ok_or(Error::KeymapMalformed(SYMBOLS_SECTION))?;

    let mut out = String::with_capacity(base.len() + 64);
    out.push_str(&base[..end]);
    out.push_str(&format!(
        "\tkey <COMP> {{ type= \"TWO_LEVEL\", [ U{:04X}, U{:04X} ] }};\n",
        cp, shift_cp
    ));
    out.push_str(&base[end..]);
    Ok(out)
}

/// Compiles XKB layouts by name and caches the resulting keymap text.
pub struct KeymapBuilder {
    context: xkb::Context,
    compiled: HashMap<String, String>,
}

impl KeymapBuilder {
    pub fn new() -> KeymapBuilder {
        KeymapBuilder {
            context: xkb::Context::new(xkb::CONTEXT_NO_FLAGS),
            compiled: HashMap::new(),
        }
    }

    fn base(&mut self, layout: &str) -> Result<&str> {
        if !self.compiled.contains_key(layout) {
            let keymap = xkb::Keymap::new_from_names(
                &self.context,
                "evdev",
                "pc105",
                layout,
                "",
                None,
                xkb::KEYMAP_COMPILE_NO_FLAGS,
            )
            .ok_or_else(|| Error::KeymapCompile(layout.to_string()))?;
            log::debug!("compiled xkb layout {:?}", layout);
            self.compiled.insert(
                layout.to_string(),
                keymap.get_as_string(xkb::KEYMAP_FORMAT_TEXT_V1),
            );
        }
        self.compiled
            .get(layout)
            .map(String::as_str)
            .ok_or_else(|| Error::KeymapCompile(layout.to_string()))
    }

    /// Keymap text for `layout`; a non-zero `cp` also binds the compose key.
    pub fn build(&mut self, layout: &str, cp: u32, shift_cp: u32) -> Result<String> {
        let base = self.base(layout)?;
        if cp == 0 {
            Ok(base.to_string())
        } else {
            with_compose_symbols(base, cp, shift_cp)
        }
    }
}

impl Default for KeymapBuilder {
    fn default() -> Self {
        KeymapBuilder::new()
    }
}

fn keymap_file(text: &str) -> Result<(File, u32)> {
    let name = CStr::from_bytes_with_nul(b"wlkbd-keymap\0")
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let size = text.len() + 1;
    let mut file = memfd(name, size as u64)?;
    file.write_all(text.as_bytes())?;
    file.write_all(&[0])?;
    Ok((file, size as u32))
}

/// Hands `text` to the compositor as the virtual keyboard's keymap.
pub fn upload(vkbd: &zwp_virtual_keyboard_v1::ZwpVirtualKeyboardV1, text: &str) -> Result<()> {
    let (file, size) = keymap_file(text)?;
    vkbd.keymap(wl_keyboard::KeymapFormat::XkbV1 as u32, file.as_fd(), size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYMAP: &str = "xkb_keymap {\nxkb_keycodes \"evdev\" {\n\t<COMP> = 135;\n};\nxkb_symbols \"pc+us\" {\n\tkey <AC01> { [ a, A ] };\n};\n};\n";

    #[test]
    fn compose_key_lands_in_symbols() {
        let out = with_compose_symbols(KEYMAP, 0xe9, 0xc9).unwrap();
        let symbols = out.find("xkb_symbols").unwrap();
        let comp = out.find("key <COMP>").unwrap();
        assert!(comp > symbols);
        assert!(out.contains("[ U00E9, U00C9 ]"));
        assert!(out[comp..].starts_with("key <COMP> { type= \"TWO_LEVEL\""));
        let close = out[comp..].find("\n};").unwrap();
        assert!(out[comp..comp + close].lines().count() == 1);
        assert_eq!(out.len(), KEYMAP.len() + out[comp..].find('\n').unwrap() + 2);
    }

    #[test]
    fn keycodes_section_untouched() {
        let out = with_compose_symbols(KEYMAP, 0x41f, 0x43f).unwrap();
        assert!(out.starts_with("xkb_keymap {\nxkb_keycodes \"evdev\" {\n\t<COMP> = 135;\n};\n"));
        assert!(out.contains("U041F, U043F"));
    }

    #[test]
    fn missing_symbols_section() {
        assert!(matches!(
            with_compose_symbols("xkb_keymap {\n};\n", 0x41, 0x61),
            Err(Error::KeymapMalformed(_))
        ));
        assert!(matches!(
            with_compose_symbols("xkb_symbols \"x\" { key <A> {}; }", 0x41, 0x61),
            Err(Error::KeymapMalformed(_))
        ));
    }

    #[test]
    fn keymap_file_is_nul_terminated() {
        use std::io::{Read, Seek, SeekFrom};
        let (mut file, size) = keymap_file("abc").unwrap();
        assert_eq!(size, 4);
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"abc\0");
    }
}
