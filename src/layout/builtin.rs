//! Key tables compiled into the keyboard.

use super::keycodes::*;
use super::{Command, Key, KeyType, Layout, LayoutId, Modifiers};
use crate::gesture::Direction::*;

const COMPOSE_ROW: f64 = 10.0;

fn k(label: &'static str, shift_label: &'static str, code: u32) -> Key {
    Key::code(label, shift_label, code)
}

/// A control key drawn with the secondary scheme.
fn f(label: &'static str, code: u32) -> Key {
    Key::code(label, label, code).scheme(1)
}

/// A symbol typed by holding Shift on `code`.
fn s(label: &'static str, code: u32) -> Key {
    Key::code(label, label, code).with_mod(Modifiers::SHIFT)
}

fn cp(label: &'static str, shift_label: &'static str, codepoint: u32, shift_codepoint: u32) -> Key {
    Key::copy(label, shift_label, codepoint, shift_codepoint)
}

fn row() -> Key {
    Key::end_row()
}

fn shift(width: f64) -> Key {
    Key::modifier("⇧", "⇫", Modifiers::SHIFT).width(width)
}

fn next_layer(width: f64) -> Key {
    Key::new("⌨", "⌨", KeyType::NextLayer).scheme(1).width(width)
}

fn back_layer(width: f64) -> Key {
    Key::new("Abc", "Abc", KeyType::BackLayer).scheme(1).width(width)
}

fn space(width: f64) -> Key {
    Key::code("", "", KEY_SPACE).width(width)
}

pub fn layouts() -> Vec<Layout> {
    vec![
        full(),
        special(),
        cyrillic(),
        landscape(),
        landscape_special(),
        swipe(),
        numpad(),
        index(),
        compose(
            LayoutId::ComposeA,
            "compose-a",
            vec![
                cp("à", "À", 0x00E0, 0x00C0),
                cp("á", "Á", 0x00E1, 0x00C1),
                cp("â", "Â", 0x00E2, 0x00C2),
                cp("ã", "Ã", 0x00E3, 0x00C3),
                cp("ä", "Ä", 0x00E4, 0x00C4),
                cp("å", "Å", 0x00E5, 0x00C5),
                cp("æ", "Æ", 0x00E6, 0x00C6),
                cp("ā", "Ā", 0x0101, 0x0100),
                cp("ă", "Ă", 0x0103, 0x0102),
                cp("ą", "Ą", 0x0105, 0x0104),
            ],
            vec![cp("α", "Α", 0x03B1, 0x0391)],
        ),
        compose(
            LayoutId::ComposeE,
            "compose-e",
            vec![
                cp("è", "È", 0x00E8, 0x00C8),
                cp("é", "É", 0x00E9, 0x00C9),
                cp("ê", "Ê", 0x00EA, 0x00CA),
                cp("ë", "Ë", 0x00EB, 0x00CB),
                cp("ē", "Ē", 0x0113, 0x0112),
                cp("ĕ", "Ĕ", 0x0115, 0x0114),
                cp("ė", "Ė", 0x0117, 0x0116),
                cp("ę", "Ę", 0x0119, 0x0118),
                cp("ě", "Ě", 0x011B, 0x011A),
            ],
            vec![cp("ε", "Ε", 0x03B5, 0x0395), cp("ə", "Ə", 0x0259, 0x018F)],
        ),
        compose(
            LayoutId::ComposeI,
            "compose-i",
            vec![
                cp("ì", "Ì", 0x00EC, 0x00CC),
                cp("í", "Í", 0x00ED, 0x00CD),
                cp("î", "Î", 0x00EE, 0x00CE),
                cp("ï", "Ï", 0x00EF, 0x00CF),
                cp("ĩ", "Ĩ", 0x0129, 0x0128),
                cp("ī", "Ī", 0x012B, 0x012A),
                cp("į", "Į", 0x012F, 0x012E),
                cp("ı", "I", 0x0131, 0x0049),
            ],
            vec![cp("ι", "Ι", 0x03B9, 0x0399)],
        ),
        compose(
            LayoutId::ComposeO,
            "compose-o",
            vec![
                cp("ò", "Ò", 0x00F2, 0x00D2),
                cp("ó", "Ó", 0x00F3, 0x00D3),
                cp("ô", "Ô", 0x00F4, 0x00D4),
                cp("õ", "Õ", 0x00F5, 0x00D5),
                cp("ö", "Ö", 0x00F6, 0x00D6),
                cp("ø", "Ø", 0x00F8, 0x00D8),
                cp("ō", "Ō", 0x014D, 0x014C),
                cp("ő", "Ő", 0x0151, 0x0150),
                cp("œ", "Œ", 0x0153, 0x0152),
            ],
            vec![cp("ο", "Ο", 0x03BF, 0x039F), cp("ω", "Ω", 0x03C9, 0x03A9)],
        ),
        compose(
            LayoutId::ComposeU,
            "compose-u",
            vec![
                cp("ù", "Ù", 0x00F9, 0x00D9),
                cp("ú", "Ú", 0x00FA, 0x00DA),
                cp("û", "Û", 0x00FB, 0x00DB),
                cp("ü", "Ü", 0x00FC, 0x00DC),
                cp("ũ", "Ũ", 0x0169, 0x0168),
                cp("ū", "Ū", 0x016B, 0x016A),
                cp("ů", "Ů", 0x016F, 0x016E),
                cp("ű", "Ű", 0x0171, 0x0170),
                cp("ų", "Ų", 0x0173, 0x0172),
            ],
            vec![cp("υ", "Υ", 0x03C5, 0x03A5)],
        ),
        compose(
            LayoutId::ComposeY,
            "compose-y",
            vec![
                cp("ý", "Ý", 0x00FD, 0x00DD),
                cp("ÿ", "Ÿ", 0x00FF, 0x0178),
                cp("ŷ", "Ŷ", 0x0177, 0x0176),
            ],
            vec![cp("ψ", "Ψ", 0x03C8, 0x03A8)],
        ),
        compose(
            LayoutId::ComposeN,
            "compose-n",
            vec![
                cp("ñ", "Ñ", 0x00F1, 0x00D1),
                cp("ń", "Ń", 0x0144, 0x0143),
                cp("ň", "Ň", 0x0148, 0x0147),
                cp("ņ", "Ņ", 0x0146, 0x0145),
                cp("ŋ", "Ŋ", 0x014B, 0x014A),
            ],
            vec![cp("ν", "Ν", 0x03BD, 0x039D)],
        ),
        compose(
            LayoutId::ComposeC,
            "compose-c",
            vec![
                cp("ç", "Ç", 0x00E7, 0x00C7),
                cp("ć", "Ć", 0x0107, 0x0106),
                cp("ĉ", "Ĉ", 0x0109, 0x0108),
                cp("č", "Č", 0x010D, 0x010C),
                cp("ċ", "Ċ", 0x010B, 0x010A),
            ],
            vec![cp("χ", "Χ", 0x03C7, 0x03A7)],
        ),
        compose(
            LayoutId::ComposeS,
            "compose-s",
            vec![
                cp("ś", "Ś", 0x015B, 0x015A),
                cp("ŝ", "Ŝ", 0x015D, 0x015C),
                cp("š", "Š", 0x0161, 0x0160),
                cp("ş", "Ş", 0x015F, 0x015E),
                cp("ș", "Ș", 0x0219, 0x0218),
                cp("ß", "ẞ", 0x00DF, 0x1E9E),
            ],
            vec![cp("σ", "Σ", 0x03C3, 0x03A3)],
        ),
        compose(
            LayoutId::ComposeZ,
            "compose-z",
            vec![
                cp("ź", "Ź", 0x017A, 0x0179),
                cp("ż", "Ż", 0x017C, 0x017B),
                cp("ž", "Ž", 0x017E, 0x017D),
            ],
            vec![cp("ζ", "Ζ", 0x03B6, 0x0396)],
        ),
        compose(
            LayoutId::ComposeBracket,
            "compose-bracket",
            vec![
                s("{", KEY_LEFTBRACE),
                s("}", KEY_RIGHTBRACE),
                k("[", "[", KEY_LEFTBRACE),
                k("]", "]", KEY_RIGHTBRACE),
                s("<", KEY_COMMA),
                s(">", KEY_DOT),
            ],
            vec![
                k("`", "`", KEY_GRAVE),
                s("\"", KEY_APOSTROPHE),
                k("'", "'", KEY_APOSTROPHE),
                cp("«", "‹", 0x00AB, 0x2039),
                cp("»", "›", 0x00BB, 0x203A),
            ],
        ),
        compose(
            LayoutId::ComposePunctuation,
            "compose-punctuation",
            vec![
                k(".", ".", KEY_DOT),
                cp("…", "…", 0x2026, 0x2026),
                s(":", KEY_SEMICOLON),
                k(";", ";", KEY_SEMICOLON),
                cp("⍽", "⍽", 0x202F, 0x00A0),
            ],
            vec![
                s("!", KEY_1),
                s("?", KEY_SLASH),
                cp("·", "·", 0x00B7, 0x00B7),
                k(",", ",", KEY_COMMA),
                cp("—", "–", 0x2014, 0x2013),
            ],
        ),
        compose(
            LayoutId::ComposeMath,
            "compose-math",
            vec![
                cp("±", "±", 0x00B1, 0x00B1),
                cp("×", "×", 0x00D7, 0x00D7),
                cp("÷", "÷", 0x00F7, 0x00F7),
                cp("≠", "≠", 0x2260, 0x2260),
                cp("≈", "≈", 0x2248, 0x2248),
                cp("≤", "≤", 0x2264, 0x2264),
                cp("≥", "≥", 0x2265, 0x2265),
                cp("∞", "∞", 0x221E, 0x221E),
            ],
            vec![
                cp("√", "√", 0x221A, 0x221A),
                cp("π", "Π", 0x03C0, 0x03A0),
                cp("∑", "∑", 0x2211, 0x2211),
                cp("°", "°", 0x00B0, 0x00B0),
            ],
        ),
    ]
}

/// Sub-layouts shown after the compose key share one shape: two rows of
/// characters, a shift row and a way back.
fn compose(id: LayoutId, name: &'static str, first: Vec<Key>, second: Vec<Key>) -> Layout {
    let mut keys = Vec::new();
    for chars in [first, second] {
        let fill = COMPOSE_ROW - chars.len() as f64;
        keys.extend(chars);
        if fill > 0.0 {
            keys.push(Key::pad(fill));
        }
        keys.push(row());
    }
    keys.push(shift(1.5));
    keys.push(Key::pad(COMPOSE_ROW - 1.5));
    keys.push(row());
    keys.push(back_layer(1.0));
    keys.push(Key::pad(COMPOSE_ROW - 1.0));
    Layout::new(id, name, "latin", false, keys)
}

fn full() -> Layout {
    let keys = vec![
        f("Esc", KEY_ESC).width(1.25),
        f("F1", KEY_F1),
        f("F2", KEY_F2),
        f("F3", KEY_F3),
        f("F4", KEY_F4),
        f("F5", KEY_F5),
        f("F6", KEY_F6),
        f("F7", KEY_F7),
        f("F8", KEY_F8),
        f("F9", KEY_F9),
        f("F10", KEY_F10),
        f("F11", KEY_F11),
        f("F12", KEY_F12),
        f("Del", KEY_DELETE).width(1.25),
        row(),
        k("`", "~", KEY_GRAVE),
        k("1", "!", KEY_1),
        k("2", "@", KEY_2),
        k("3", "#", KEY_3),
        k("4", "$", KEY_4),
        k("5", "%", KEY_5),
        k("6", "^", KEY_6),
        k("7", "&", KEY_7),
        k("8", "*", KEY_8),
        k("9", "(", KEY_9).compose(LayoutId::ComposeBracket),
        k("0", ")", KEY_0).compose(LayoutId::ComposeBracket),
        k("-", "_", KEY_MINUS).compose(LayoutId::ComposeMath),
        k("=", "+", KEY_EQUAL).compose(LayoutId::ComposeMath),
        f("⌫", KEY_BACKSPACE).width(1.5),
        row(),
        f("Tab", KEY_TAB).width(1.5),
        k("q", "Q", KEY_Q),
        k("w", "W", KEY_W),
        k("e", "E", KEY_E).compose(LayoutId::ComposeE),
        k("r", "R", KEY_R),
        k("t", "T", KEY_T),
        k("y", "Y", KEY_Y).compose(LayoutId::ComposeY),
        k("u", "U", KEY_U).compose(LayoutId::ComposeU),
        k("i", "I", KEY_I).compose(LayoutId::ComposeI),
        k("o", "O", KEY_O).compose(LayoutId::ComposeO),
        k("p", "P", KEY_P),
        k("[", "{", KEY_LEFTBRACE).compose(LayoutId::ComposeBracket),
        k("]", "}", KEY_RIGHTBRACE).compose(LayoutId::ComposeBracket),
        k("\\", "|", KEY_BACKSLASH),
        row(),
        Key::new("Cmp", "Cmp", KeyType::Compose).scheme(1),
        Key::modifier("Caps", "Caps", Modifiers::CAPSLOCK),
        k("a", "A", KEY_A).compose(LayoutId::ComposeA),
        k("s", "S", KEY_S).compose(LayoutId::ComposeS),
        k("d", "D", KEY_D),
        k("f", "F", KEY_F),
        k("g", "G", KEY_G),
        k("h", "H", KEY_H),
        k("j", "J", KEY_J),
        k("k", "K", KEY_K),
        k("l", "L", KEY_L),
        k(";", ":", KEY_SEMICOLON).compose(LayoutId::ComposePunctuation),
        k("'", "\"", KEY_APOSTROPHE).compose(LayoutId::ComposeBracket),
        f("Enter", KEY_ENTER).width(1.5),
        row(),
        shift(2.5),
        k("z", "Z", KEY_Z).compose(LayoutId::ComposeZ),
        k("x", "X", KEY_X),
        k("c", "C", KEY_C).compose(LayoutId::ComposeC),
        k("v", "V", KEY_V),
        k("b", "B", KEY_B),
        k("n", "N", KEY_N).compose(LayoutId::ComposeN),
        k("m", "M", KEY_M),
        k(",", "<", KEY_COMMA).compose(LayoutId::ComposeMath),
        k(".", ">", KEY_DOT).compose(LayoutId::ComposePunctuation),
        k("/", "?", KEY_SLASH),
        f("↑", KEY_UP),
        shift(1.0),
        row(),
        next_layer(1.5),
        Key::modifier("Ctr", "Ctr", Modifiers::CTRL),
        Key::modifier("Sup", "Sup", Modifiers::SUPER),
        Key::modifier("Alt", "Alt", Modifiers::ALT),
        space(5.0),
        Key::modifier("AGr", "AGr", Modifiers::ALTGR),
        Key::modifier("Ctr", "Ctr", Modifiers::CTRL),
        f("←", KEY_LEFT),
        f("↓", KEY_DOWN),
        f("→", KEY_RIGHT),
    ];
    Layout::new(LayoutId::Full, "full", "latin", true, keys)
}

fn special() -> Layout {
    let keys = vec![
        Key::pad(0.5),
        s("~", KEY_GRAVE),
        s("!", KEY_1),
        s("@", KEY_2),
        s("#", KEY_3),
        s("$", KEY_4),
        s("%", KEY_5),
        s("^", KEY_6),
        s("&", KEY_7),
        s("*", KEY_8),
        s("(", KEY_9),
        s(")", KEY_0),
        Key::pad(0.5),
        row(),
        Key::pad(0.5),
        k("`", "`", KEY_GRAVE),
        k("-", "-", KEY_MINUS),
        s("_", KEY_MINUS),
        k("=", "=", KEY_EQUAL),
        s("+", KEY_EQUAL),
        k("[", "[", KEY_LEFTBRACE),
        k("]", "]", KEY_RIGHTBRACE),
        s("{", KEY_LEFTBRACE),
        s("}", KEY_RIGHTBRACE),
        k("\\", "\\", KEY_BACKSLASH),
        s("|", KEY_BACKSLASH),
        Key::pad(0.5),
        row(),
        f("Tab", KEY_TAB).width(1.5),
        k(";", ";", KEY_SEMICOLON),
        s(":", KEY_SEMICOLON),
        k("'", "'", KEY_APOSTROPHE),
        s("\"", KEY_APOSTROPHE),
        k(",", ",", KEY_COMMA),
        k(".", ".", KEY_DOT),
        s("<", KEY_COMMA),
        s(">", KEY_DOT),
        k("/", "/", KEY_SLASH),
        s("?", KEY_SLASH),
        f("⌫", KEY_BACKSPACE).width(1.5),
        row(),
        shift(1.5),
        f("Ins", KEY_INSERT),
        f("Home", KEY_HOME),
        f("PgUp", KEY_PAGEUP),
        f("↑", KEY_UP),
        f("PgDn", KEY_PAGEDOWN),
        f("End", KEY_END),
        f("Del", KEY_DELETE),
        f("Esc", KEY_ESC).width(1.5),
        row(),
        next_layer(1.25),
        back_layer(1.25),
        Key::modifier("Ctr", "Ctr", Modifiers::CTRL),
        Key::modifier("Alt", "Alt", Modifiers::ALT),
        space(4.0),
        f("←", KEY_LEFT),
        f("↓", KEY_DOWN),
        f("→", KEY_RIGHT),
    ];
    Layout::new(LayoutId::Special, "special", "latin", false, keys)
}

fn cyrillic() -> Layout {
    let keys = vec![
        k("1", "!", KEY_1),
        k("2", "\"", KEY_2),
        k("3", "№", KEY_3),
        k("4", ";", KEY_4),
        k("5", "%", KEY_5),
        k("6", ":", KEY_6),
        k("7", "?", KEY_7),
        k("8", "*", KEY_8),
        k("9", "(", KEY_9),
        k("0", ")", KEY_0),
        k("-", "_", KEY_MINUS),
        row(),
        k("й", "Й", KEY_Q),
        k("ц", "Ц", KEY_W),
        k("у", "У", KEY_E),
        k("к", "К", KEY_R),
        k("е", "Е", KEY_T),
        k("н", "Н", KEY_Y),
        k("г", "Г", KEY_U),
        k("ш", "Ш", KEY_I),
        k("щ", "Щ", KEY_O),
        k("з", "З", KEY_P),
        k("х", "Х", KEY_LEFTBRACE),
        row(),
        k("ф", "Ф", KEY_A),
        k("ы", "Ы", KEY_S),
        k("в", "В", KEY_D),
        k("а", "А", KEY_F),
        k("п", "П", KEY_G),
        k("р", "Р", KEY_H),
        k("о", "О", KEY_J),
        k("л", "Л", KEY_K),
        k("д", "Д", KEY_L),
        k("ж", "Ж", KEY_SEMICOLON),
        k("э", "Э", KEY_APOSTROPHE),
        row(),
        shift(1.5),
        k("я", "Я", KEY_Z),
        k("ч", "Ч", KEY_X),
        k("с", "С", KEY_C),
        k("м", "М", KEY_V),
        k("и", "И", KEY_B),
        k("т", "Т", KEY_N),
        k("ь", "Ь", KEY_M),
        k("б", "Б", KEY_COMMA),
        k("ю", "Ю", KEY_DOT),
        f("⌫", KEY_BACKSPACE).width(1.5),
        row(),
        next_layer(1.5),
        Key::modifier("Ctr", "Ctr", Modifiers::CTRL),
        Key::modifier("Alt", "Alt", Modifiers::ALT),
        space(5.0),
        k(".", ",", KEY_SLASH),
        f("Enter", KEY_ENTER).width(2.0),
    ];
    Layout::new(LayoutId::Cyrillic, "cyrillic", "cyrillic", true, keys)
}

fn landscape() -> Layout {
    let keys = vec![
        f("Esc", KEY_ESC),
        k("1", "!", KEY_1),
        k("2", "@", KEY_2),
        k("3", "#", KEY_3),
        k("4", "$", KEY_4),
        k("5", "%", KEY_5),
        k("6", "^", KEY_6),
        k("7", "&", KEY_7),
        k("8", "*", KEY_8),
        k("9", "(", KEY_9).compose(LayoutId::ComposeBracket),
        k("0", ")", KEY_0).compose(LayoutId::ComposeBracket),
        k("-", "_", KEY_MINUS).compose(LayoutId::ComposeMath),
        f("⌫", KEY_BACKSPACE).width(1.5),
        row(),
        f("Tab", KEY_TAB),
        k("q", "Q", KEY_Q),
        k("w", "W", KEY_W),
        k("e", "E", KEY_E).compose(LayoutId::ComposeE),
        k("r", "R", KEY_R),
        k("t", "T", KEY_T),
        k("y", "Y", KEY_Y).compose(LayoutId::ComposeY),
        k("u", "U", KEY_U).compose(LayoutId::ComposeU),
        k("i", "I", KEY_I).compose(LayoutId::ComposeI),
        k("o", "O", KEY_O).compose(LayoutId::ComposeO),
        k("p", "P", KEY_P),
        k("'", "\"", KEY_APOSTROPHE).compose(LayoutId::ComposeBracket),
        f("Enter", KEY_ENTER).width(1.5),
        row(),
        Key::new("Cmp", "Cmp", KeyType::Compose).scheme(1),
        k("a", "A", KEY_A).compose(LayoutId::ComposeA),
        k("s", "S", KEY_S).compose(LayoutId::ComposeS),
        k("d", "D", KEY_D),
        k("f", "F", KEY_F),
        k("g", "G", KEY_G),
        k("h", "H", KEY_H),
        k("j", "J", KEY_J),
        k("k", "K", KEY_K),
        k("l", "L", KEY_L),
        k(";", ":", KEY_SEMICOLON).compose(LayoutId::ComposePunctuation),
        k("/", "?", KEY_SLASH),
        f("↑", KEY_UP).width(1.5),
        row(),
        shift(1.5),
        k("z", "Z", KEY_Z).compose(LayoutId::ComposeZ),
        k("x", "X", KEY_X),
        k("c", "C", KEY_C).compose(LayoutId::ComposeC),
        k("v", "V", KEY_V),
        space(3.0),
        k("b", "B", KEY_B),
        k("n", "N", KEY_N).compose(LayoutId::ComposeN),
        k("m", "M", KEY_M),
        k(",", "<", KEY_COMMA).compose(LayoutId::ComposeMath),
        k(".", ">", KEY_DOT).compose(LayoutId::ComposePunctuation),
        next_layer(1.5),
    ];
    Layout::new(LayoutId::Landscape, "landscape", "latin", true, keys)
}

fn landscape_special() -> Layout {
    let keys = vec![
        f("Esc", KEY_ESC),
        s("!", KEY_1),
        s("@", KEY_2),
        s("#", KEY_3),
        s("$", KEY_4),
        s("%", KEY_5),
        s("^", KEY_6),
        s("&", KEY_7),
        s("*", KEY_8),
        s("(", KEY_9),
        s(")", KEY_0),
        s("_", KEY_MINUS),
        f("⌫", KEY_BACKSPACE).width(1.5),
        row(),
        f("Tab", KEY_TAB),
        k("`", "`", KEY_GRAVE),
        s("~", KEY_GRAVE),
        k("=", "=", KEY_EQUAL),
        s("+", KEY_EQUAL),
        k("[", "[", KEY_LEFTBRACE),
        k("]", "]", KEY_RIGHTBRACE),
        s("{", KEY_LEFTBRACE),
        s("}", KEY_RIGHTBRACE),
        k("\\", "\\", KEY_BACKSLASH),
        s("|", KEY_BACKSLASH),
        f("Enter", KEY_ENTER).width(1.5),
        row(),
        Key::modifier("Ctr", "Ctr", Modifiers::CTRL),
        Key::modifier("Alt", "Alt", Modifiers::ALT),
        f("Ins", KEY_INSERT),
        f("Home", KEY_HOME),
        f("PgUp", KEY_PAGEUP),
        f("↑", KEY_UP),
        f("PgDn", KEY_PAGEDOWN),
        f("End", KEY_END),
        f("Del", KEY_DELETE),
        Key::pad(1.5),
        row(),
        back_layer(1.5),
        Key::modifier("Sup", "Sup", Modifiers::SUPER),
        space(4.0),
        f("←", KEY_LEFT),
        f("↓", KEY_DOWN),
        f("→", KEY_RIGHT),
        next_layer(1.5),
    ];
    Layout::new(
        LayoutId::LandscapeSpecial,
        "landscapespecial",
        "latin",
        false,
        keys,
    )
}

fn numpad() -> Layout {
    let keys = vec![
        k("7", "7", KEY_7),
        k("8", "8", KEY_8),
        k("9", "9", KEY_9),
        k("/", "/", KEY_SLASH),
        f("⌫", KEY_BACKSPACE),
        row(),
        k("4", "4", KEY_4),
        k("5", "5", KEY_5),
        k("6", "6", KEY_6),
        s("*", KEY_8),
        f("Tab", KEY_TAB),
        row(),
        k("1", "1", KEY_1),
        k("2", "2", KEY_2),
        k("3", "3", KEY_3),
        k("-", "-", KEY_MINUS),
        f("Enter", KEY_ENTER),
        row(),
        back_layer(1.0),
        k("0", "0", KEY_0),
        k(".", ".", KEY_DOT),
        s("+", KEY_EQUAL),
        next_layer(1.0),
    ];
    Layout::new(LayoutId::Numpad, "numpad", "latin", true, keys)
}

fn index() -> Layout {
    let keys = vec![
        Key::layout("Full", LayoutId::Full),
        Key::layout("Special", LayoutId::Special),
        Key::layout("Cyrillic", LayoutId::Cyrillic),
        row(),
        Key::layout("Swipe", LayoutId::Swipe),
        Key::layout("Numpad", LayoutId::Numpad),
        Key::layout("Landscape", LayoutId::Landscape),
    ];
    Layout::new(LayoutId::Index, "index", "latin", false, keys)
}

/// A three by three letter grid; every cell carries eight more keys reached
/// by swiping, and a digit on long press.
fn swipe() -> Layout {
    let a = k("a", "A", KEY_A)
        .swipe(North, f("Esc", KEY_ESC))
        .swipe(NorthEast, cp("ı", "İ", 0x0131, 0x0130))
        .swipe(East, cp("-", "÷", 0x002D, 0x00F7))
        .swipe(SouthEast, k("v", "V", KEY_V))
        .swipe(South, cp("ä", "Ä", 0x00E4, 0x00C4))
        .swipe(SouthWest, cp("$", "¥", 0x0024, 0x00A5))
        .swipe(West, cp("ß", "ẞ", 0x00DF, 0x1E9E))
        .swipe(NorthWest, Key::new("Cmp", "Cmp", KeyType::Compose))
        .long_tap(k("1", "1", KEY_1));
    let n = k("n", "N", KEY_N)
        .swipe(North, cp("^", "ˇ", 0x005E, 0x02C7))
        .swipe(NorthEast, cp("´", "’", 0x00B4, 0x2019))
        .swipe(East, cp("!", "¡", 0x0021, 0x00A1))
        .swipe(SouthEast, cp("\\", "—", 0x005C, 0x2014))
        .swipe(South, k("l", "L", KEY_L))
        .swipe(SouthWest, cp("/", "–", 0x002F, 0x2013))
        .swipe(West, cp("+", "×", 0x002B, 0x00D7))
        .swipe(NorthWest, cp("`", "‘", 0x0060, 0x2018))
        .long_tap(k("2", "2", KEY_2));
    let i = k("i", "I", KEY_I)
        .swipe(North, f("↑", KEY_UP))
        .swipe(NorthEast, f("⇈", KEY_PAGEUP))
        .swipe(East, cp("ü", "Ü", 0x00FC, 0x00DC))
        .swipe(SouthEast, cp("€", "£", 0x20AC, 0x00A3))
        .swipe(South, cp("=", "±", 0x003D, 0x00B1))
        .swipe(SouthWest, k("x", "X", KEY_X))
        .swipe(West, cp("?", "¿", 0x003F, 0x00BF))
        .swipe(NorthWest, cp("ö", "Ö", 0x00F6, 0x00D6))
        .long_tap(k("3", "3", KEY_3));
    let settings = next_layer(2.0)
        .swipe(
            North,
            Key::new("+", "-", KeyType::Command(Command::IncreaseHeight, Command::DecreaseHeight)),
        )
        .swipe(
            South,
            Key::new("-", "+", KeyType::Command(Command::DecreaseHeight, Command::IncreaseHeight)),
        );
    let h = k("h", "H", KEY_H)
        .swipe(North, cp("ğ", "Ğ", 0x011F, 0x011E))
        .swipe(NorthEast, cp("%", "‰", 0x0025, 0x2030))
        .swipe(East, k("k", "K", KEY_K))
        .swipe(SouthEast, cp("_", "¬", 0x005F, 0x00AC))
        .swipe(South, cp("ç", "Ç", 0x00E7, 0x00C7))
        .swipe(SouthWest, k("[", "{", KEY_LEFTBRACE))
        .swipe(West, f("⇤", KEY_HOME))
        .swipe(NorthWest, s("(", KEY_9))
        .long_tap(k("4", "4", KEY_4));
    let o = k("o", "O", KEY_O)
        .swipe(North, k("u", "U", KEY_U))
        .swipe(NorthEast, k("p", "P", KEY_P))
        .swipe(East, k("b", "B", KEY_B))
        .swipe(SouthEast, k("j", "J", KEY_J))
        .swipe(South, k("d", "D", KEY_D))
        .swipe(SouthWest, k("g", "G", KEY_G))
        .swipe(West, k("c", "C", KEY_C))
        .swipe(NorthWest, k("q", "Q", KEY_Q))
        .long_tap(k("5", "5", KEY_5));
    let r = k("r", "R", KEY_R)
        .swipe(North, shift(1.0))
        .swipe(NorthEast, s(")", KEY_0))
        .swipe(East, f("⇥", KEY_END))
        .swipe(SouthEast, k("]", "}", KEY_RIGHTBRACE))
        .swipe(South, Key::modifier("CpL", "CpL", Modifiers::CAPSLOCK))
        .swipe(SouthWest, cp("@", "ᵃ", 0x0040, 0x1D43))
        .swipe(West, k("m", "M", KEY_M))
        .swipe(NorthWest, cp("|", "¶", 0x007C, 0x00B6))
        .long_tap(k("6", "6", KEY_6));
    let navigation = Key::layout("abc", LayoutId::Swipe)
        .width(2.0)
        .swipe(North, Key::layout("sym", LayoutId::Special))
        .swipe(West, Key::layout("№", LayoutId::Numpad))
        .long_tap(Key::layout("idx", LayoutId::Index));
    let t = k("t", "T", KEY_T)
        .swipe(North, cp("¨", "˝", 0x00A8, 0x02DD))
        .swipe(NorthEast, k("y", "Y", KEY_Y))
        .swipe(East, cp("*", "†", 0x002A, 0x2020))
        .swipe(SouthEast, f("↹", KEY_TAB))
        .swipe(SouthWest, f("⌫", KEY_BACKSPACE))
        .swipe(West, cp("<", "‹", 0x003C, 0x2039))
        .swipe(NorthWest, cp("~", "≈", 0x007E, 0x2248))
        .long_tap(k("7", "7", KEY_7));
    let e = k("e", "E", KEY_E)
        .swipe(North, k("w", "W", KEY_W))
        .swipe(NorthEast, cp("'", "”", 0x0027, 0x201D))
        .swipe(East, k("z", "Z", KEY_Z))
        .swipe(SouthEast, cp(":", "„", 0x003A, 0x201E))
        .swipe(South, cp(".", "…", 0x002E, 0x2026))
        .swipe(SouthWest, cp(",", "‚", 0x002C, 0x201A))
        .swipe(West, cp("ş", "Ş", 0x015F, 0x015E))
        .swipe(NorthWest, cp("\"", "“", 0x0022, 0x201C))
        .long_tap(k("8", "8", KEY_8));
    let s_key = k("s", "S", KEY_S)
        .swipe(North, cp("&", "§", 0x0026, 0x00A7))
        .swipe(NorthEast, cp("°", "°", 0x00B0, 0x00B0))
        .swipe(East, cp(">", "›", 0x003E, 0x203A))
        .swipe(SouthEast, f("⇊", KEY_PAGEDOWN))
        .swipe(South, f("↓", KEY_DOWN))
        .swipe(SouthWest, k(";", ":", KEY_SEMICOLON))
        .swipe(West, cp("#", "¥", 0x0023, 0x00A5))
        .swipe(NorthWest, k("f", "F", KEY_F))
        .long_tap(k("9", "9", KEY_9));
    let backspace = f("⌫", KEY_BACKSPACE)
        .width(2.0)
        .swipe(North, f("⌦", KEY_DELETE))
        .swipe(West, f("⌫", KEY_BACKSPACE).with_mod(Modifiers::CTRL));
    let space_key = space(6.0)
        .swipe(NorthEast, Key::modifier("Ctr", "Ctr", Modifiers::CTRL))
        .swipe(East, f("→", KEY_RIGHT))
        .swipe(SouthEast, Key::modifier("Sup", "Sup", Modifiers::SUPER))
        .swipe(West, f("←", KEY_LEFT))
        .swipe(NorthWest, Key::modifier("Alt", "Alt", Modifiers::ALT))
        .long_tap(k("0", "0", KEY_0));

    let keys = vec![
        Key::pad(1.0),
        a.width(2.0).scheme(1),
        n.width(2.0).scheme(1),
        i.width(2.0).scheme(1),
        settings,
        Key::pad(1.0),
        row(),
        Key::pad(1.0),
        h.width(2.0).scheme(1),
        o.width(2.0).scheme(1),
        r.width(2.0).scheme(1),
        navigation,
        Key::pad(1.0),
        row(),
        Key::pad(1.0),
        t.width(2.0).scheme(1),
        e.width(2.0).scheme(1),
        s_key.width(2.0).scheme(1),
        backspace,
        Key::pad(1.0),
        row(),
        Key::pad(1.0),
        space_key,
        f("⏎", KEY_ENTER).width(2.0),
        Key::pad(1.0),
    ];
    Layout::new(LayoutId::Swipe, "swipe", "latin", true, keys)
}
