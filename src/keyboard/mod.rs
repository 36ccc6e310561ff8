//! The keyboard proper: which layout is showing, which modifiers are held,
//! whether compose is armed, and what each press and release sends.
//!
//! Input arrives as surface coordinates through [`Keyboard::on_press`],
//! [`Keyboard::on_motion`] and [`Keyboard::on_release`]. A stroke is
//! classified when it ends and the resulting gesture picks the key that is
//! actually pressed: the touched key itself, one of its eight swipe
//! neighbours, or its long-tap key. Output goes through a [`Host`].

use crate::error::{Error, Result};
use crate::gesture::{Gesture, Point, Shape};
use crate::layout::keycodes::{KEY_BACKSPACE, KEY_COMPOSE, KEY_ENTER, KEY_SPACE, KEY_TAB};
use crate::layout::{find_key_at, KeyRef, KeyType, LayoutId, Layouts, Modifiers, Slot};

mod host;

pub use self::host::{Host, Visual};

/// The stroke in progress and the key it started on.
#[derive(Debug, Clone, Copy)]
struct Touch {
    origin: KeyRef,
    /// Already acted upon by the long-tap timer.
    consumed: bool,
}

/// A key that has been sent down and not yet up.
#[derive(Debug, Clone, Copy)]
struct Held {
    key: KeyRef,
    code: u32,
    /// Modifiers other than the current mask were sent with the key.
    forced: bool,
}

pub struct Keyboard {
    layouts: Layouts,
    layers: Vec<LayoutId>,
    landscape_layers: Vec<LayoutId>,
    landscape: bool,

    layout: LayoutId,
    prev_layout: LayoutId,
    layer_index: usize,
    mods: Modifiers,
    compose: u8,

    last_press: Option<Held>,
    last_swipe: Option<KeyRef>,
    last_abc: Option<LayoutId>,
    last_abc_index: usize,

    gesture: Gesture,
    touch: Option<Touch>,

    print: bool,
    print_intersect: bool,
}

/// Keys that leave an armed compose for the layout chooser.
fn exits_compose(kind: KeyType, code_mod: Modifiers) -> bool {
    match kind {
        KeyType::NextLayer | KeyType::BackLayer => true,
        KeyType::Code(code) => code == KEY_SPACE || code_mod.contains(Modifiers::CTRL),
        _ => false,
    }
}

impl Keyboard {
    pub fn new(
        layouts: Layouts,
        layers: Vec<LayoutId>,
        landscape_layers: Vec<LayoutId>,
    ) -> Result<Keyboard> {
        let first = *layers.first().ok_or(Error::NoLayers)?;
        if landscape_layers.is_empty() {
            return Err(Error::NoLayers);
        }
        log::debug!("found {} layers", layers.len());
        Ok(Keyboard {
            layouts,
            layers,
            landscape_layers,
            landscape: false,
            layout: first,
            prev_layout: first,
            layer_index: 0,
            mods: Modifiers::empty(),
            compose: 0,
            last_press: None,
            last_swipe: None,
            last_abc: Some(first),
            last_abc_index: 0,
            gesture: Gesture::new(),
            touch: None,
            print: false,
            print_intersect: false,
        })
    }

    /// Enables echoing of pressed keys, and of keys crossed by a stroke.
    pub fn set_print(&mut self, print: bool, intersect: bool) {
        self.print = print;
        self.print_intersect = intersect;
    }

    #[cfg(test)]
    pub fn current(&self) -> LayoutId {
        self.layout
    }

    #[cfg(test)]
    pub fn previous(&self) -> LayoutId {
        self.prev_layout
    }

    #[cfg(test)]
    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    #[cfg(test)]
    pub fn modifiers(&self) -> Modifiers {
        self.mods
    }

    #[cfg(test)]
    pub fn compose_depth(&self) -> u8 {
        self.compose
    }

    pub fn is_landscape(&self) -> bool {
        self.landscape
    }

    fn active_layers(&self) -> &[LayoutId] {
        if self.landscape {
            &self.landscape_layers
        } else {
            &self.layers
        }
    }

    fn layer_position(&self, id: LayoutId) -> Option<usize> {
        self.active_layers().iter().position(|&l| l == id)
    }

    fn shifted(&self) -> bool {
        self.mods.intersects(Modifiers::SHIFT | Modifiers::CAPSLOCK)
    }

    /// Uploads the keymap of the initial layout and paints it.
    pub fn init<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let layout = &self.layouts[self.layout];
        log::info!("starting on layout {} with keymap {}", layout.name, layout.keymap);
        host.upload_keymap(layout.keymap, 0, 0)?;
        self.redraw(host);
        host.request_present();
        Ok(())
    }

    pub fn resize<H: Host>(&mut self, width: u32, height: u32, host: &mut H) {
        log::info!("resizing layouts to {}x{}", width, height);
        self.layouts.compute(width, height);
        self.redraw(host);
        host.request_present();
    }

    /// Swaps between the portrait and landscape layer sequences, starting
    /// over at the first layer of the new one.
    pub fn set_landscape<H: Host>(&mut self, landscape: bool, host: &mut H) -> Result<()> {
        if landscape == self.landscape {
            return Ok(());
        }
        self.landscape = landscape;
        let target = self.active_layers()[0];
        let outgoing = self.layout;
        log::debug!(
            "orientation changed to {}, showing {}",
            if landscape { "landscape" } else { "portrait" },
            self.layouts[target].name
        );

        self.layout = target;
        self.prev_layout = target;
        self.layer_index = 0;
        self.last_abc = Some(target);
        self.last_abc_index = 0;
        self.compose = 0;
        self.last_swipe = None;
        self.touch = None;
        self.gesture.clear();

        if self.layouts[outgoing].keymap != self.layouts[target].keymap {
            host.upload_keymap(self.layouts[target].keymap, 0, 0)?;
        }
        self.redraw(host);
        host.request_present();
        Ok(())
    }

    fn redraw<H: Host>(&self, host: &mut H) {
        host.draw_layout(&self.layouts[self.layout], self.mods, self.compose > 0);
    }

    /// Paints a key of the current layout. Returning to `Normal` always
    /// restores the cell's own key, whichever gesture key was shown over it.
    fn draw_ref<H: Host>(&self, host: &mut H, r: KeyRef, visual: Visual) {
        if r.layout != self.layout {
            return;
        }
        let r = match visual {
            Visual::Normal => r.with_slot(Slot::Key),
            _ => r,
        };
        if let Some(key) = self.layouts.key(r) {
            let visual = match (visual, key.kind) {
                (Visual::Normal, KeyType::Mod(m)) if self.mods.contains(m) => Visual::Pressed,
                (Visual::Normal, KeyType::Compose) if self.compose > 0 => Visual::Pressed,
                _ => visual,
            };
            host.draw_key(key, self.layouts.area(r), visual, self.shifted());
        }
    }

    fn hold<H: Host>(&mut self, r: KeyRef, code: u32, sent: Modifiers, host: &mut H) {
        self.last_press = Some(Held {
            key: r,
            code,
            forced: sent != self.mods,
        });
        self.last_swipe = Some(r);
        self.draw_ref(host, r, Visual::Pressed);
    }

    fn advance_compose(&mut self) {
        if self.compose > 0 {
            log::debug!("pressing composed key");
            self.compose += 1;
        }
    }

    fn reset_back_layer(&mut self) {
        self.last_abc = Some(self.active_layers()[0]);
        self.last_abc_index = 0;
    }

    /// What a key would type, as far as its label tells.
    fn printable(&self, r: KeyRef) -> Option<&'static str> {
        let key = self.layouts.key(r)?;
        match key.kind {
            KeyType::Code(KEY_SPACE) => Some(" "),
            KeyType::Code(KEY_ENTER) => Some("\n"),
            KeyType::Code(KEY_BACKSPACE) => Some("\u{8}"),
            KeyType::Code(KEY_TAB) => Some("\t"),
            KeyType::Code(_) | KeyType::Copy { .. } => {
                if self.shifted() {
                    Some(key.shift_label)
                } else if self
                    .mods
                    .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER)
                {
                    None
                } else {
                    Some(key.label)
                }
            }
            _ => None,
        }
    }

    fn echo<H: Host>(&self, r: KeyRef, host: &mut H) {
        if !self.print {
            return;
        }
        if let Some(text) = self.printable(r) {
            host.print(text);
        }
    }

    fn intersect<H: Host>(&mut self, r: KeyRef, host: &mut H) {
        if let Some(text) = self.printable(r) {
            host.print(text);
        }
        self.last_swipe = Some(r);
        self.draw_ref(host, r, Visual::Swiped);
    }

    pub fn press<H: Host>(&mut self, r: KeyRef, time: u32, host: &mut H) -> Result<()> {
        let (kind, code_mod, reset_mod, compose) = match self.layouts.key(r) {
            Some(key) => (key.kind, key.code_mod, key.reset_mod, key.compose),
            None => return Ok(()),
        };

        if self.compose == 1 && !matches!(kind, KeyType::Compose | KeyType::Mod(_)) {
            if exits_compose(kind, code_mod) {
                log::debug!("compose cancelled, showing layout index");
                self.compose = 0;
                self.switch_layout(LayoutId::Index, 0, host)?;
            } else if let Some(sub) = compose {
                self.compose += 1;
                log::debug!("showing compose layout {}", self.layouts[sub].name);
                let index = self.layer_position(sub).unwrap_or(self.layer_index);
                self.switch_layout(sub, index, host)?;
            }
            host.request_present();
            return Ok(());
        }

        match kind {
            KeyType::Code(code) => {
                let sent = if reset_mod {
                    code_mod
                } else {
                    self.mods ^ code_mod
                };
                self.hold(r, code, sent, host);
                if code == KEY_SPACE && self.mods.contains(Modifiers::SHIFT) {
                    // shift space is tab
                    host.emit_modifiers(Modifiers::empty());
                    host.emit_key(KEY_TAB, true, time);
                } else {
                    host.emit_modifiers(sent);
                    host.emit_key(code, true, time);
                }
                self.echo(r, host);
                self.advance_compose();
            }
            KeyType::Copy {
                codepoint,
                shift_codepoint,
            } => {
                self.hold(r, KEY_COMPOSE, self.mods, host);
                log::debug!("binding U+{:04X} to the compose key", codepoint);
                host.upload_keymap(self.layouts[self.layout].keymap, codepoint, shift_codepoint)?;
                host.emit_modifiers(self.mods);
                host.emit_key(KEY_COMPOSE, true, time);
                self.echo(r, host);
                self.advance_compose();
            }
            KeyType::Mod(m) => {
                self.mods.toggle(m);
                if m.intersects(Modifiers::SHIFT | Modifiers::CAPSLOCK) {
                    self.redraw(host);
                } else if self.mods.contains(m) {
                    self.draw_ref(host, r, Visual::Pressed);
                } else {
                    self.draw_ref(host, r.with_slot(Slot::Key), Visual::Normal);
                }
                host.emit_modifiers(self.mods);
            }
            KeyType::Layout(target) => {
                let index = self.layer_position(target).unwrap_or(self.layer_index);
                self.switch_layout(target, index, host)?;
                self.reset_back_layer();
            }
            KeyType::Compose => {
                self.compose = if self.compose == 0 { 1 } else { 0 };
                log::debug!("compose {}", if self.compose > 0 { "armed" } else { "disarmed" });
                let visual = if self.compose > 0 {
                    Visual::Pressed
                } else {
                    Visual::Normal
                };
                self.draw_ref(host, r, visual);
            }
            KeyType::NextLayer => self.next_layer(Some(r), false, host)?,
            KeyType::BackLayer => {
                if let Some(target) = self.last_abc {
                    self.compose = 0;
                    self.switch_layout(target, self.last_abc_index, host)?;
                    self.reset_back_layer();
                }
            }
            KeyType::Command(primary, secondary) => {
                if self.mods.contains(Modifiers::SHIFT) {
                    self.mods.remove(Modifiers::SHIFT);
                    host.emit_modifiers(self.mods);
                    self.redraw(host);
                    host.invoke_command(secondary, primary);
                } else {
                    host.invoke_command(primary, secondary);
                }
            }
            KeyType::Pad | KeyType::EndRow => {}
        }

        host.request_present();
        Ok(())
    }

    pub fn release<H: Host>(&mut self, time: u32, host: &mut H) -> Result<()> {
        let held = match self.last_press.take() {
            Some(held) => held,
            None => return Ok(()),
        };

        let unlatch = self.mods.contains(Modifiers::SHIFT);
        if unlatch {
            self.mods.remove(Modifiers::SHIFT);
            host.emit_modifiers(self.mods);
        }

        let code = if held.code == KEY_SPACE && unlatch {
            KEY_TAB
        } else {
            held.code
        };
        host.emit_key(code, false, time);
        if held.forced && !unlatch {
            host.emit_modifiers(self.mods);
        }

        if self.compose >= 2 {
            self.compose = 0;
            if let Some(target) = self.last_abc {
                self.switch_layout(target, self.last_abc_index, host)?;
            }
        } else if unlatch {
            self.redraw(host);
        } else {
            self.draw_ref(host, held.key, Visual::Normal);
        }

        host.request_present();
        Ok(())
    }

    /// Steps through the active layer sequence. Ctrl, Alt, AltGr or a
    /// pending compose jump back to the first layer; Shift, CapsLock or
    /// `invert` step backwards.
    pub fn next_layer<H: Host>(
        &mut self,
        held: Option<KeyRef>,
        invert: bool,
        host: &mut H,
    ) -> Result<()> {
        let count = self.active_layers().len();
        let before = self.mods;
        let mut index = self.layer_index;

        if self
            .mods
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::ALTGR)
            || self.compose > 0
        {
            index = 0;
            self.mods = Modifiers::empty();
        } else if self.mods.intersects(Modifiers::SHIFT | Modifiers::CAPSLOCK) || invert {
            index = if index > 0 { index - 1 } else { count - 1 };
            if !invert {
                self.mods.remove(Modifiers::SHIFT);
            }
        } else {
            index += 1;
        }
        if index >= count {
            log::debug!("wrapping layer index back to start");
            index = 0;
        }

        if self.mods != before {
            host.emit_modifiers(self.mods);
        }
        if self.compose > 0 {
            self.compose = 0;
            if let Some(r) = held {
                self.draw_ref(host, r, Visual::Normal);
            }
        }

        let target = self.active_layers()[index];
        self.switch_layout(target, index, host)
    }

    pub fn switch_layout<H: Host>(
        &mut self,
        target: LayoutId,
        layer_index: usize,
        host: &mut H,
    ) -> Result<()> {
        let outgoing = self.layout;
        self.prev_layout = outgoing;
        if self.layouts[outgoing].primary {
            self.last_abc = Some(outgoing);
            self.last_abc_index = self.layer_index;
        }
        self.layer_index = layer_index;
        self.layout = target;
        log::debug!(
            "switching from {} to layout {}, layer index {}",
            self.layouts[self.prev_layout].name,
            self.layouts[target].name,
            layer_index
        );

        let keymap = self.layouts[target].keymap;
        if self.layouts[outgoing].keymap != keymap {
            log::info!("switching to keymap {}", keymap);
            host.upload_keymap(keymap, 0, 0)?;
        }
        self.redraw(host);
        Ok(())
    }

    /// Starts a stroke. Returns whether it landed on a key, in which case
    /// the caller should arm the long-tap timer.
    pub fn on_press<H: Host>(&mut self, x: i32, y: i32, host: &mut H) -> bool {
        self.gesture.start(Point::new(x, y));
        let hit = if x < 0 || y < 0 {
            None
        } else {
            find_key_at(&self.layouts[self.layout], x as u32, y as u32)
        };
        let index = match hit {
            Some(index) => index,
            None => {
                self.touch = None;
                return false;
            }
        };

        let origin = KeyRef::new(self.layout, index);
        self.touch = Some(Touch {
            origin,
            consumed: false,
        });
        if self.print_intersect {
            self.intersect(origin, host);
        } else {
            self.draw_ref(host, origin, Visual::Pressed);
        }
        host.request_present();
        true
    }

    pub fn on_motion<H: Host>(&mut self, x: i32, y: i32, host: &mut H) {
        match self.touch {
            Some(touch) if !touch.consumed => {}
            _ => return,
        }
        self.gesture.push(Point::new(x, y));

        if self.print_intersect && x >= 0 && y >= 0 {
            if let Some(index) = find_key_at(&self.layouts[self.layout], x as u32, y as u32) {
                let r = KeyRef::new(self.layout, index);
                if self.last_swipe != Some(r) {
                    self.intersect(r, host);
                    host.request_present();
                }
            }
        }
    }

    /// Ends a stroke and acts on its shape.
    pub fn on_release<H: Host>(&mut self, time: u32, host: &mut H) -> Result<()> {
        let touch = match self.touch.take() {
            Some(touch) => touch,
            None => return Ok(()),
        };
        let intersecting = self.print_intersect && self.last_swipe.is_some();

        let result = if touch.consumed {
            Ok(())
        } else {
            let shape = self.gesture.classify();
            if intersecting && shape != Shape::Tap {
                // the stroke was only traced
                Ok(())
            } else {
                self.draw_ref(host, touch.origin, Visual::Normal);
                self.dispatch(touch.origin, shape, time, host)
            }
        };
        self.gesture.clear();

        if intersecting {
            host.print("\n");
            self.last_swipe = None;
            self.redraw(host);
        }
        host.request_present();
        result
    }

    /// Drops the stroke in progress without pressing anything.
    pub fn cancel<H: Host>(&mut self, host: &mut H) {
        let touch = match self.touch.take() {
            Some(touch) => touch,
            None => return,
        };
        log::debug!("stroke cancelled");
        self.gesture.clear();
        if self.print_intersect && self.last_swipe.take().is_some() {
            self.redraw(host);
        } else {
            self.draw_ref(host, touch.origin, Visual::Normal);
        }
        host.request_present();
    }

    /// Fired by the long-tap timer while the stroke is still held.
    pub fn on_long_tap<H: Host>(&mut self, time: u32, host: &mut H) -> Result<()> {
        let touch = match self.touch {
            Some(touch) if !touch.consumed => touch,
            _ => return Ok(()),
        };
        if self.gesture.has_moved() || self.gesture.classify() != Shape::Tap {
            return Ok(());
        }
        if self.layouts.key(touch.origin.with_slot(Slot::LongTap)).is_none() {
            return Ok(());
        }

        self.touch = Some(Touch {
            consumed: true,
            ..touch
        });
        self.draw_ref(host, touch.origin, Visual::Normal);
        self.dispatch(touch.origin, Shape::LongTap, time, host)?;
        host.request_present();
        Ok(())
    }

    /// Scrolling cycles layers; scrolling down steps backwards.
    pub fn on_axis<H: Host>(&mut self, delta: f64, host: &mut H) -> Result<()> {
        self.next_layer(None, delta >= 0.0, host)?;
        host.request_present();
        Ok(())
    }

    fn dispatch<H: Host>(
        &mut self,
        origin: KeyRef,
        shape: Shape,
        time: u32,
        host: &mut H,
    ) -> Result<()> {
        let (target, flip_shift) = match shape {
            Shape::Tap => (origin, false),
            Shape::LongTap => (origin.with_slot(Slot::LongTap), false),
            Shape::Line(dir) => (origin.with_slot(Slot::Swipe(dir)), false),
            Shape::Circle => (origin, true),
            Shape::BackAndForth(dir) => (origin.with_slot(Slot::Swipe(dir)), true),
        };
        let label = match self.layouts.key(target) {
            Some(key) => key.label,
            None => {
                log::debug!("{:?} has no key to press", shape);
                return Ok(());
            }
        };
        log::debug!("{:?} presses {:?}", shape, label);

        if flip_shift {
            self.mods.toggle(Modifiers::SHIFT);
        }
        self.press(target, time, host)?;
        self.release(time, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Direction;
    use crate::layout::keycodes::*;
    use crate::layout::{resolve_layers, Command, Geometry, Key, Layout};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Draw(&'static str, Visual),
        Layout(&'static str),
        Present,
        Mods(Modifiers),
        Key(u32, bool),
        Keymap(String, u32, u32),
        Command(Command, Command),
        Print(String),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Recorder {
        fn keys(&self) -> Vec<(u32, bool)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Key(code, pressed) => Some((*code, *pressed)),
                    _ => None,
                })
                .collect()
        }

        fn keymaps(&self) -> Vec<(String, u32, u32)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Keymap(name, cp, shift) => Some((name.clone(), *cp, *shift)),
                    _ => None,
                })
                .collect()
        }

        fn layouts(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, Event::Layout(_)))
                .count()
        }

        fn printed(&self) -> String {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Print(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn typed(&self) -> Vec<Event> {
            self.events
                .iter()
                .filter(|e| matches!(e, Event::Key(..) | Event::Mods(_)))
                .cloned()
                .collect()
        }
    }

    impl Host for Recorder {
        fn draw_key(&mut self, key: &Key, _area: Geometry, visual: Visual, _shifted: bool) {
            self.events.push(Event::Draw(key.label, visual));
        }

        fn draw_layout(&mut self, layout: &Layout, _mods: Modifiers, _compose_armed: bool) {
            self.events.push(Event::Layout(layout.name));
        }

        fn request_present(&mut self) {
            self.events.push(Event::Present);
        }

        fn emit_modifiers(&mut self, mods: Modifiers) {
            self.events.push(Event::Mods(mods));
        }

        fn emit_key(&mut self, code: u32, pressed: bool, _time: u32) {
            self.events.push(Event::Key(code, pressed));
        }

        fn upload_keymap(&mut self, name: &str, codepoint: u32, shift_codepoint: u32) -> Result<()> {
            self.events
                .push(Event::Keymap(name.to_string(), codepoint, shift_codepoint));
            Ok(())
        }

        fn invoke_command(&mut self, primary: Command, secondary: Command) {
            self.events.push(Event::Command(primary, secondary));
        }

        fn print(&mut self, text: &str) {
            self.events.push(Event::Print(text.to_string()));
        }
    }

    fn keyboard(layers: &[&str]) -> (Keyboard, Recorder) {
        let layouts = Layouts::builtin();
        let layers = resolve_layers(&layouts, layers).unwrap();
        let landscape = resolve_layers(&layouts, &["landscape", "landscapespecial"]).unwrap();
        let mut kb = Keyboard::new(layouts, layers, landscape).unwrap();
        let mut host = Recorder::default();
        kb.resize(720, 280, &mut host);
        kb.init(&mut host).unwrap();
        host.events.clear();
        (kb, host)
    }

    fn key(kb: &Keyboard, layout: LayoutId, label: &str) -> KeyRef {
        let index = kb.layouts[layout]
            .keys
            .iter()
            .position(|k| k.is_interactive() && k.label == label)
            .unwrap();
        KeyRef::new(layout, index)
    }

    fn center(kb: &Keyboard, r: KeyRef) -> (i32, i32) {
        let (x, y) = kb.layouts.area(r).center();
        (x as i32, y as i32)
    }

    fn tap(kb: &mut Keyboard, host: &mut Recorder, r: KeyRef) {
        kb.press(r, 0, host).unwrap();
        kb.release(0, host).unwrap();
    }

    fn tap_key(kb: &mut Keyboard, host: &mut Recorder, layout: LayoutId, label: &str) {
        let r = key(kb, layout, label);
        tap(kb, host, r);
    }

    fn stroke(kb: &mut Keyboard, host: &mut Recorder, r: KeyRef, path: &[(i32, i32)]) {
        let (cx, cy) = center(kb, r);
        assert!(kb.on_press(cx, cy, host));
        for &(dx, dy) in path {
            kb.on_motion(cx + dx, cy + dy, host);
        }
        kb.on_release(0, host).unwrap();
    }

    #[test]
    fn empty_sequences_are_rejected() {
        let layouts = Layouts::builtin();
        assert!(matches!(
            Keyboard::new(layouts, vec![], vec![LayoutId::Landscape]),
            Err(Error::NoLayers)
        ));
    }

    #[test]
    fn init_uploads_the_first_keymap() {
        let layouts = Layouts::builtin();
        let mut kb = Keyboard::new(layouts, vec![LayoutId::Cyrillic], vec![LayoutId::Landscape]).unwrap();
        let mut host = Recorder::default();
        kb.init(&mut host).unwrap();
        assert_eq!(host.keymaps(), vec![("cyrillic".to_string(), 0, 0)]);
        assert_eq!(host.layouts(), 1);
    }

    #[test]
    fn shift_unlatches_once() {
        let (mut kb, mut host) = keyboard(&["full", "special"]);
        let shift = key(&kb, LayoutId::Full, "⇧");
        kb.press(shift, 0, &mut host).unwrap();
        assert_eq!(kb.modifiers(), Modifiers::SHIFT);
        host.events.clear();

        tap_key(&mut kb, &mut host, LayoutId::Full, "q");
        assert_eq!(kb.modifiers(), Modifiers::empty());
        assert_eq!(host.layouts(), 1);
        assert_eq!(
            host.typed(),
            vec![
                Event::Mods(Modifiers::SHIFT),
                Event::Key(KEY_Q, true),
                Event::Mods(Modifiers::empty()),
                Event::Key(KEY_Q, false),
            ]
        );
    }

    #[test]
    fn plain_key_redraws_only_itself() {
        let (mut kb, mut host) = keyboard(&["full"]);
        tap_key(&mut kb, &mut host, LayoutId::Full, "q");
        assert_eq!(host.layouts(), 0);
        assert!(host.events.contains(&Event::Draw("q", Visual::Pressed)));
        assert!(host.events.contains(&Event::Draw("q", Visual::Normal)));
    }

    #[test]
    fn forced_modifiers_are_restored() {
        let (mut kb, mut host) = keyboard(&["special"]);
        tap_key(&mut kb, &mut host, LayoutId::Special, "!");
        assert_eq!(
            host.typed(),
            vec![
                Event::Mods(Modifiers::SHIFT),
                Event::Key(KEY_1, true),
                Event::Key(KEY_1, false),
                Event::Mods(Modifiers::empty()),
            ]
        );
        assert_eq!(kb.modifiers(), Modifiers::empty());
    }

    #[test]
    fn reset_mod_replaces_the_mask() {
        let (mut kb, mut host) = keyboard(&["full"]);
        let x = key(&kb, LayoutId::Full, "x");
        let geometry = kb.layouts[LayoutId::Full].keys[x.index].geometry;
        kb.layouts[LayoutId::Full].keys[x.index] = Key {
            geometry,
            ..Key::code("x", "X", KEY_X).with_mod(Modifiers::CTRL).reset_mod()
        };
        kb.press(key(&kb, LayoutId::Full, "⇧"), 0, &mut host).unwrap();
        host.events.clear();

        tap(&mut kb, &mut host, x);
        assert_eq!(
            host.typed(),
            vec![
                Event::Mods(Modifiers::CTRL),
                Event::Key(KEY_X, true),
                Event::Mods(Modifiers::empty()),
                Event::Key(KEY_X, false),
            ]
        );
        assert_eq!(kb.modifiers(), Modifiers::empty());
    }

    #[test]
    fn merged_code_mod_keeps_shift() {
        let (mut kb, mut host) = keyboard(&["full"]);
        let x = key(&kb, LayoutId::Full, "x");
        let geometry = kb.layouts[LayoutId::Full].keys[x.index].geometry;
        kb.layouts[LayoutId::Full].keys[x.index] = Key {
            geometry,
            ..Key::code("x", "X", KEY_X).with_mod(Modifiers::CTRL)
        };
        kb.press(key(&kb, LayoutId::Full, "⇧"), 0, &mut host).unwrap();
        host.events.clear();

        tap(&mut kb, &mut host, x);
        assert_eq!(host.typed()[0], Event::Mods(Modifiers::SHIFT | Modifiers::CTRL));
    }

    #[test]
    fn shift_space_is_tab() {
        let (mut kb, mut host) = keyboard(&["full"]);
        kb.press(key(&kb, LayoutId::Full, "⇧"), 0, &mut host).unwrap();
        host.events.clear();

        tap_key(&mut kb, &mut host, LayoutId::Full, "");
        assert_eq!(
            host.typed(),
            vec![
                Event::Mods(Modifiers::empty()),
                Event::Key(KEY_TAB, true),
                Event::Mods(Modifiers::empty()),
                Event::Key(KEY_TAB, false),
            ]
        );
    }

    #[test]
    fn non_shift_modifiers_redraw_the_key() {
        let (mut kb, mut host) = keyboard(&["full"]);
        let ctrl = key(&kb, LayoutId::Full, "Ctr");
        kb.press(ctrl, 0, &mut host).unwrap();
        assert_eq!(kb.modifiers(), Modifiers::CTRL);
        assert_eq!(host.layouts(), 0);
        assert!(host.events.contains(&Event::Draw("Ctr", Visual::Pressed)));
        assert!(host.events.contains(&Event::Mods(Modifiers::CTRL)));

        host.events.clear();
        kb.press(ctrl, 0, &mut host).unwrap();
        assert_eq!(kb.modifiers(), Modifiers::empty());
        assert!(host.events.contains(&Event::Draw("Ctr", Visual::Normal)));
    }

    #[test]
    fn compose_round_trip() {
        let (mut kb, mut host) = keyboard(&["full", "special"]);
        tap_key(&mut kb, &mut host, LayoutId::Full, "Cmp");
        assert_eq!(kb.compose_depth(), 1);

        tap_key(&mut kb, &mut host, LayoutId::Full, "a");
        assert_eq!(kb.current(), LayoutId::ComposeA);
        assert_eq!(kb.compose_depth(), 2);
        assert_eq!(kb.layer_index(), 0);
        assert!(host.keys().is_empty());

        host.events.clear();
        tap_key(&mut kb, &mut host, LayoutId::ComposeA, "à");
        assert_eq!(kb.compose_depth(), 0);
        assert_eq!(kb.current(), LayoutId::Full);
        assert_eq!(host.keymaps(), vec![("latin".to_string(), 0xE0, 0xC0)]);
        assert_eq!(host.keys(), vec![(KEY_COMPOSE, true), (KEY_COMPOSE, false)]);
    }

    #[test]
    fn compose_ignores_keys_without_sub_layout() {
        let (mut kb, mut host) = keyboard(&["full"]);
        tap_key(&mut kb, &mut host, LayoutId::Full, "Cmp");
        host.events.clear();
        tap_key(&mut kb, &mut host, LayoutId::Full, "q");
        assert_eq!(kb.compose_depth(), 1);
        assert_eq!(kb.current(), LayoutId::Full);
        assert!(host.keys().is_empty());

        // toggles back off
        tap_key(&mut kb, &mut host, LayoutId::Full, "Cmp");
        assert_eq!(kb.compose_depth(), 0);
    }

    #[test]
    fn compose_exits_to_index() {
        let (mut kb, mut host) = keyboard(&["full", "special"]);
        tap_key(&mut kb, &mut host, LayoutId::Full, "Cmp");
        tap_key(&mut kb, &mut host, LayoutId::Full, "");
        assert_eq!(kb.compose_depth(), 0);
        assert_eq!(kb.current(), LayoutId::Index);
        assert!(host.keys().is_empty());

        tap_key(&mut kb, &mut host, LayoutId::Index, "Numpad");
        assert_eq!(kb.current(), LayoutId::Numpad);
        assert_eq!(kb.last_abc, Some(LayoutId::Full));
        assert_eq!(kb.last_abc_index, 0);
    }

    #[test]
    fn ctrl_key_exits_compose() {
        let (mut kb, mut host) = keyboard(&["swipe"]);
        let bs = key(&kb, LayoutId::Swipe, "⌫");
        let cmp = key(&kb, LayoutId::Swipe, "a").with_slot(Slot::Swipe(Direction::NorthWest));
        tap(&mut kb, &mut host, cmp);
        assert_eq!(kb.compose_depth(), 1);
        tap(&mut kb, &mut host, bs.with_slot(Slot::Swipe(Direction::West)));
        assert_eq!(kb.current(), LayoutId::Index);
        assert_eq!(kb.compose_depth(), 0);
    }

    #[test]
    fn layers_cycle_and_wrap() {
        let (mut kb, mut host) = keyboard(&["full", "special", "cyrillic"]);
        for _ in 0..3 {
            kb.next_layer(None, false, &mut host).unwrap();
        }
        assert_eq!(kb.layer_index(), 0);
        assert_eq!(kb.current(), LayoutId::Full);
    }

    #[test]
    fn two_layer_scenario() {
        let (mut kb, mut host) = keyboard(&["full", "special"]);
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Special);
        assert_eq!(kb.previous(), LayoutId::Full);
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Full);

        kb.press(key(&kb, LayoutId::Full, "⇧"), 0, &mut host).unwrap();
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Special);
        assert_eq!(kb.layer_index(), 1);
        assert!(!kb.modifiers().contains(Modifiers::SHIFT));
    }

    #[test]
    fn capslock_steps_back_without_setting_shift() {
        let (mut kb, mut host) = keyboard(&["full", "special", "cyrillic"]);
        kb.press(key(&kb, LayoutId::Full, "Caps"), 0, &mut host).unwrap();
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Cyrillic);
        assert_eq!(kb.modifiers(), Modifiers::CAPSLOCK);
    }

    #[test]
    fn ctrl_jumps_to_first_layer() {
        let (mut kb, mut host) = keyboard(&["full", "special", "cyrillic"]);
        kb.next_layer(None, false, &mut host).unwrap();
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Cyrillic);
        kb.press(key(&kb, LayoutId::Cyrillic, "Ctr"), 0, &mut host).unwrap();
        host.events.clear();

        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Full);
        assert_eq!(kb.layer_index(), 0);
        assert_eq!(kb.modifiers(), Modifiers::empty());
        assert!(host.events.contains(&Event::Mods(Modifiers::empty())));
    }

    #[test]
    fn next_layer_cancels_compose() {
        let (mut kb, mut host) = keyboard(&["full", "special"]);
        let cmp = key(&kb, LayoutId::Full, "Cmp");
        tap(&mut kb, &mut host, cmp);
        kb.next_layer(Some(cmp), false, &mut host).unwrap();
        assert_eq!(kb.compose_depth(), 0);
        assert_eq!(kb.current(), LayoutId::Full);
    }

    #[test]
    fn keymap_follows_layout() {
        let (mut kb, mut host) = keyboard(&["full", "special"]);
        kb.next_layer(None, false, &mut host).unwrap();
        assert!(host.keymaps().is_empty());

        let (mut kb, mut host) = keyboard(&["full", "cyrillic"]);
        kb.next_layer(None, false, &mut host).unwrap();
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(
            host.keymaps(),
            vec![("cyrillic".to_string(), 0, 0), ("latin".to_string(), 0, 0)]
        );
    }

    #[test]
    fn back_layer_returns_and_resets() {
        let (mut kb, mut host) = keyboard(&["full", "cyrillic", "special"]);
        kb.next_layer(None, false, &mut host).unwrap();
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Special);
        assert_eq!(kb.last_abc, Some(LayoutId::Cyrillic));

        tap_key(&mut kb, &mut host, LayoutId::Special, "Abc");
        assert_eq!(kb.current(), LayoutId::Cyrillic);
        assert_eq!(kb.layer_index(), 1);
        assert_eq!(kb.last_abc, Some(LayoutId::Full));
        assert_eq!(kb.last_abc_index, 0);
    }

    #[test]
    fn layout_key_resets_back_layer() {
        let (mut kb, mut host) = keyboard(&["cyrillic", "swipe"]);
        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.last_abc, Some(LayoutId::Cyrillic));
        let nav = key(&kb, LayoutId::Swipe, "abc");
        tap(&mut kb, &mut host, nav.with_slot(Slot::Swipe(Direction::West)));
        assert_eq!(kb.current(), LayoutId::Numpad);
        assert_eq!(kb.layer_index(), 1);
        assert_eq!(kb.last_abc, Some(LayoutId::Cyrillic));
        assert_eq!(kb.last_abc_index, 0);
    }

    #[test]
    fn commands_swap_with_shift() {
        let (mut kb, mut host) = keyboard(&["swipe"]);
        let up = key(&kb, LayoutId::Swipe, "⌨").with_slot(Slot::Swipe(Direction::North));
        tap(&mut kb, &mut host, up);
        kb.mods = Modifiers::SHIFT;
        tap(&mut kb, &mut host, up);
        let commands: Vec<_> = host
            .events
            .iter()
            .filter(|e| matches!(e, Event::Command(..)))
            .cloned()
            .collect();
        assert_eq!(
            commands,
            vec![
                Event::Command(Command::IncreaseHeight, Command::DecreaseHeight),
                Event::Command(Command::DecreaseHeight, Command::IncreaseHeight),
            ]
        );
        assert_eq!(kb.modifiers(), Modifiers::empty());
    }

    #[test]
    fn swipe_presses_the_neighbour() {
        let (mut kb, mut host) = keyboard(&["swipe"]);
        let o = key(&kb, LayoutId::Swipe, "o");
        stroke(&mut kb, &mut host, o, &[(0, -10), (0, -20), (0, -30)]);
        assert_eq!(host.keys(), vec![(KEY_U, true), (KEY_U, false)]);
        assert!(host.events.contains(&Event::Draw("u", Visual::Pressed)));
        let last_draw = host.events.iter().rev().find(|e| matches!(e, Event::Draw(..)));
        assert_eq!(last_draw, Some(&Event::Draw("o", Visual::Normal)));
    }

    #[test]
    fn back_and_forth_shifts_the_neighbour() {
        let (mut kb, mut host) = keyboard(&["swipe"]);
        let o = key(&kb, LayoutId::Swipe, "o");
        stroke(&mut kb, &mut host, o, &[(0, -15), (0, -30), (0, -15), (0, 0)]);
        assert_eq!(
            host.typed(),
            vec![
                Event::Mods(Modifiers::SHIFT),
                Event::Key(KEY_U, true),
                Event::Mods(Modifiers::empty()),
                Event::Key(KEY_U, false),
            ]
        );
    }

    #[test]
    fn circle_shifts_the_key() {
        let (mut kb, mut host) = keyboard(&["swipe"]);
        let o = key(&kb, LayoutId::Swipe, "o");
        let path: Vec<(i32, i32)> = (1..=16)
            .map(|k| {
                let a = std::f64::consts::PI * 2.0 * f64::from(k) / 16.0;
                ((20.0 * a.sin()).round() as i32, (-20.0 + 20.0 * a.cos()).round() as i32)
            })
            .collect();
        stroke(&mut kb, &mut host, o, &path);
        assert_eq!(
            host.typed(),
            vec![
                Event::Mods(Modifiers::SHIFT),
                Event::Key(KEY_O, true),
                Event::Mods(Modifiers::empty()),
                Event::Key(KEY_O, false),
            ]
        );
    }

    #[test]
    fn empty_neighbour_is_a_no_op() {
        let (mut kb, mut host) = keyboard(&["full"]);
        let q = key(&kb, LayoutId::Full, "q");
        stroke(&mut kb, &mut host, q, &[(0, 30)]);
        assert!(host.keys().is_empty());
        assert_eq!(kb.modifiers(), Modifiers::empty());
    }

    #[test]
    fn long_tap_consumes_the_stroke() {
        let (mut kb, mut host) = keyboard(&["swipe"]);
        let o = key(&kb, LayoutId::Swipe, "o");
        let (cx, cy) = center(&kb, o);
        assert!(kb.on_press(cx, cy, &mut host));
        kb.on_motion(cx + 3, cy, &mut host);
        kb.on_long_tap(0, &mut host).unwrap();
        assert_eq!(host.keys(), vec![(KEY_5, true), (KEY_5, false)]);

        kb.on_motion(cx + 40, cy, &mut host);
        kb.on_release(0, &mut host).unwrap();
        kb.on_long_tap(0, &mut host).unwrap();
        assert_eq!(host.keys().len(), 2);
    }

    #[test]
    fn cancelled_stroke_types_nothing() {
        let (mut kb, mut host) = keyboard(&["full"]);
        let q = key(&kb, LayoutId::Full, "q");
        let (cx, cy) = center(&kb, q);
        assert!(kb.on_press(cx, cy, &mut host));
        kb.on_motion(cx, cy - 30, &mut host);
        kb.cancel(&mut host);
        assert!(host.keys().is_empty());
        let last_draw = host.events.iter().rev().find(|e| matches!(e, Event::Draw(..)));
        assert_eq!(last_draw, Some(&Event::Draw("q", Visual::Normal)));

        // nothing left for a late release or timer
        kb.on_long_tap(0, &mut host).unwrap();
        kb.on_release(0, &mut host).unwrap();
        assert!(host.keys().is_empty());

        tap_key(&mut kb, &mut host, LayoutId::Full, "w");
        assert_eq!(host.keys(), vec![(KEY_W, true), (KEY_W, false)]);
    }

    #[test]
    fn cancel_clears_a_traced_stroke() {
        let (mut kb, mut host) = keyboard(&["full"]);
        kb.set_print(false, true);
        let q = key(&kb, LayoutId::Full, "q");
        let (qx, qy) = center(&kb, q);
        let (wx, _) = center(&kb, key(&kb, LayoutId::Full, "w"));
        kb.on_press(qx, qy, &mut host);
        kb.on_motion(wx, qy, &mut host);
        host.events.clear();

        kb.cancel(&mut host);
        assert_eq!(kb.last_swipe, None);
        assert_eq!(host.layouts(), 1);
        assert!(host.keys().is_empty());
        assert_eq!(host.printed(), "");
    }

    #[test]
    fn long_tap_without_target_is_a_tap() {
        let (mut kb, mut host) = keyboard(&["full"]);
        let q = key(&kb, LayoutId::Full, "q");
        let (cx, cy) = center(&kb, q);
        kb.on_press(cx, cy, &mut host);
        kb.on_long_tap(0, &mut host).unwrap();
        assert!(host.keys().is_empty());
        kb.on_release(0, &mut host).unwrap();
        assert_eq!(host.keys(), vec![(KEY_Q, true), (KEY_Q, false)]);
    }

    #[test]
    fn long_tap_after_moving_is_ignored() {
        let (mut kb, mut host) = keyboard(&["swipe"]);
        let o = key(&kb, LayoutId::Swipe, "o");
        let (cx, cy) = center(&kb, o);
        kb.on_press(cx, cy, &mut host);
        kb.on_motion(cx, cy - 30, &mut host);
        kb.on_long_tap(0, &mut host).unwrap();
        assert!(host.keys().is_empty());
        kb.on_release(0, &mut host).unwrap();
        assert_eq!(host.keys(), vec![(KEY_U, true), (KEY_U, false)]);
    }

    #[test]
    fn misses_do_nothing() {
        let (mut kb, mut host) = keyboard(&["special"]);
        assert!(!kb.on_press(2, 2, &mut host));
        kb.on_motion(40, 2, &mut host);
        kb.on_release(0, &mut host).unwrap();
        assert!(host.keys().is_empty());
        assert!(!kb.on_press(-1, 5, &mut host));
    }

    #[test]
    fn print_echoes_labels() {
        let (mut kb, mut host) = keyboard(&["full"]);
        kb.set_print(true, false);
        tap_key(&mut kb, &mut host, LayoutId::Full, "q");
        kb.press(key(&kb, LayoutId::Full, "⇧"), 0, &mut host).unwrap();
        tap_key(&mut kb, &mut host, LayoutId::Full, "w");
        tap_key(&mut kb, &mut host, LayoutId::Full, "");
        tap_key(&mut kb, &mut host, LayoutId::Full, "Enter");
        kb.press(key(&kb, LayoutId::Full, "Ctr"), 0, &mut host).unwrap();
        tap_key(&mut kb, &mut host, LayoutId::Full, "e");
        assert_eq!(host.printed(), "qW \n");
    }

    #[test]
    fn print_intersect_traces_strokes() {
        let (mut kb, mut host) = keyboard(&["full"]);
        kb.set_print(false, true);
        let q = key(&kb, LayoutId::Full, "q");
        let (qx, qy) = center(&kb, q);
        let (wx, _) = center(&kb, key(&kb, LayoutId::Full, "w"));
        let (ex, _) = center(&kb, key(&kb, LayoutId::Full, "e"));
        kb.on_press(qx, qy, &mut host);
        kb.on_motion(qx + 2, qy, &mut host);
        kb.on_motion(wx, qy, &mut host);
        kb.on_motion(ex, qy, &mut host);
        kb.on_release(0, &mut host).unwrap();
        assert_eq!(host.printed(), "qwe\n");
        assert!(host.events.contains(&Event::Draw("w", Visual::Swiped)));
        assert!(host.keys().is_empty());
        assert_eq!(kb.last_swipe, None);
    }

    #[test]
    fn landscape_restarts_the_sequence() {
        let (mut kb, mut host) = keyboard(&["full", "cyrillic"]);
        kb.next_layer(None, false, &mut host).unwrap();
        host.events.clear();

        kb.set_landscape(true, &mut host).unwrap();
        assert!(kb.is_landscape());
        assert_eq!(kb.current(), LayoutId::Landscape);
        assert_eq!(kb.previous(), LayoutId::Landscape);
        assert_eq!(kb.layer_index(), 0);
        assert_eq!(kb.last_abc, Some(LayoutId::Landscape));
        assert_eq!(host.keymaps(), vec![("latin".to_string(), 0, 0)]);

        kb.next_layer(None, false, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::LandscapeSpecial);
        kb.set_landscape(true, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::LandscapeSpecial);
    }

    #[test]
    fn scrolling_cycles_layers() {
        let (mut kb, mut host) = keyboard(&["full", "special", "cyrillic"]);
        kb.on_axis(10.0, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Cyrillic);
        kb.on_axis(-10.0, &mut host).unwrap();
        assert_eq!(kb.current(), LayoutId::Full);
    }
}
