use std::{
    collections::BTreeMap,
    io::{self, Write},
    time::Duration,
};

use calloop::{
    timer::{TimeoutAction, Timer},
    LoopHandle, RegistrationToken,
};
use wayland_client::{
    delegate_noop,
    protocol::{
        wl_buffer, wl_compositor, wl_output, wl_pointer, wl_registry, wl_seat, wl_shm,
        wl_shm_pool, wl_surface, wl_touch,
    },
    Connection, Dispatch, QueueHandle, WEnum,
};
use wayland_protocols_misc::zwp_virtual_keyboard_v1::client::{
    zwp_virtual_keyboard_manager_v1, zwp_virtual_keyboard_v1,
};
use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

use crate::{
    buffer::BufferManager,
    config::Config,
    error::{Error, Result},
    keyboard::{Host, Keyboard, Visual},
    keymap::{self, KeymapBuilder},
    layout::{Command, Geometry, Key, Layout, Modifiers},
    render::Renderer,
};

/// How long a touch must stay put to count as a long tap.
const LONG_TAP: Duration = Duration::from_secs(1);
const HEIGHT_STEP: u32 = 4;

/// The keyboard's view of the outside world: the canvas it paints on, the
/// virtual keyboard it types with and the layer surface it lives in.
pub struct Output {
    pub renderer: Renderer,
    pub dirty: bool,
    vkbd: Option<zwp_virtual_keyboard_v1::ZwpVirtualKeyboardV1>,
    keymaps: KeymapBuilder,
    xkb_layouts: BTreeMap<String, String>,
    surface: Option<wl_surface::WlSurface>,
    layer_surface: Option<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1>,
    heights: [u32; 2],
    landscape: bool,
    rows: u32,
}

impl Output {
    pub fn new(renderer: Renderer, config: &Config) -> Output {
        Output {
            renderer,
            dirty: true,
            vkbd: None,
            keymaps: KeymapBuilder::new(),
            xkb_layouts: config.keymaps.clone(),
            surface: None,
            layer_surface: None,
            heights: [config.height(false), config.height(true)],
            landscape: false,
            rows: 1,
        }
    }

    pub fn height(&self) -> u32 {
        self.heights[self.landscape as usize]
    }

    fn set_landscape(&mut self, landscape: bool) {
        self.landscape = landscape;
        self.apply_height();
    }

    fn apply_height(&mut self) {
        let height = self.height();
        if let (Some(surface), Some(layer_surface)) = (&self.surface, &self.layer_surface) {
            layer_surface.set_size(0, height);
            layer_surface.set_exclusive_zone(height as i32);
            surface.commit();
        }
    }
}

impl Host for Output {
    fn draw_key(&mut self, key: &Key, area: Geometry, visual: Visual, shifted: bool) {
        self.renderer.draw_key(key, area, visual, shifted);
    }

    fn draw_layout(&mut self, layout: &Layout, mods: Modifiers, compose_armed: bool) {
        self.rows = layout.rows().max(1) as u32;
        self.renderer.draw_layout(layout, mods, compose_armed);
    }

    fn request_present(&mut self) {
        self.dirty = true;
    }

    fn emit_modifiers(&mut self, mods: Modifiers) {
        if let Some(vkbd) = &self.vkbd {
            vkbd.modifiers(mods.bits(), 0, 0, 0);
        }
    }

    fn emit_key(&mut self, code: u32, pressed: bool, time: u32) {
        if let Some(vkbd) = &self.vkbd {
            vkbd.key(time, code, pressed as u32);
        }
    }

    fn upload_keymap(&mut self, name: &str, codepoint: u32, shift_codepoint: u32) -> Result<()> {
        let layout = self
            .xkb_layouts
            .get(name)
            .ok_or_else(|| Error::UnknownKeymap(name.to_string()))?;
        let text = self.keymaps.build(layout, codepoint, shift_codepoint)?;
        let vkbd = self
            .vkbd
            .as_ref()
            .ok_or(Error::MissingGlobal("zwp_virtual_keyboard_manager_v1"))?;
        log::debug!("uploading keymap {} from xkb layout {}", name, layout);
        keymap::upload(vkbd, &text)
    }

    fn invoke_command(&mut self, primary: Command, _secondary: Command) {
        let height = self.height();
        let height = match primary {
            Command::IncreaseHeight => height + HEIGHT_STEP,
            Command::DecreaseHeight => height.saturating_sub(HEIGHT_STEP).max(self.rows),
        };
        log::debug!("resizing keyboard to {} px", height);
        self.heights[self.landscape as usize] = height;
        self.apply_height();
    }

    fn print(&mut self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            log::warn!("unable to print {:?}: {}", text, e);
        }
    }
}

struct OutputInfo {
    output: wl_output::WlOutput,
    size: (i32, i32),
}

pub struct State {
    pub running: bool,
    pub error: Option<Error>,
    pub configured: bool,
    pub keyboard: Keyboard,
    pub output: Output,
    pub bufmgr: BufferManager,
    handle: LoopHandle<'static, State>,
    long_tap: Option<RegistrationToken>,
    press_time: u32,
    hidden: bool,

    compositor: Option<wl_compositor::WlCompositor>,
    wl_shm: Option<wl_shm::WlShm>,
    seat: Option<wl_seat::WlSeat>,
    layer_shell: Option<zwlr_layer_shell_v1::ZwlrLayerShellV1>,
    vkbd_manager: Option<zwp_virtual_keyboard_manager_v1::ZwpVirtualKeyboardManagerV1>,
    pointer: Option<wl_pointer::WlPointer>,
    touch: Option<wl_touch::WlTouch>,
    outputs: Vec<OutputInfo>,
    current_output: Option<wl_output::WlOutput>,

    pointer_pos: (f64, f64),
    pointer_down: bool,
    touch_id: Option<i32>,
}

impl State {
    pub fn new(
        keyboard: Keyboard,
        output: Output,
        handle: LoopHandle<'static, State>,
        hidden: bool,
    ) -> State {
        State {
            running: true,
            error: None,
            configured: false,
            keyboard,
            output,
            bufmgr: BufferManager::new(),
            handle,
            long_tap: None,
            press_time: 0,
            hidden,
            compositor: None,
            wl_shm: None,
            seat: None,
            layer_shell: None,
            vkbd_manager: None,
            pointer: None,
            touch: None,
            outputs: Vec::new(),
            current_output: None,
            pointer_pos: (0.0, 0.0),
            pointer_down: false,
            touch_id: None,
        }
    }

    /// Records the first fatal error and stops the loop.
    pub fn check(&mut self, res: Result<()>) {
        if let Err(e) = res {
            self.running = false;
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }

    /// Creates the virtual keyboard and the surface once the registry has
    /// been populated.
    pub fn setup(&mut self, qh: &QueueHandle<State>) -> Result<()> {
        self.compositor
            .as_ref()
            .ok_or(Error::MissingGlobal("wl_compositor"))?;
        self.wl_shm.as_ref().ok_or(Error::MissingGlobal("wl_shm"))?;
        self.layer_shell
            .as_ref()
            .ok_or(Error::MissingGlobal("zwlr_layer_shell_v1"))?;
        let seat = self.seat.as_ref().ok_or(Error::MissingGlobal("wl_seat"))?;
        let manager = self
            .vkbd_manager
            .as_ref()
            .ok_or(Error::MissingGlobal("zwp_virtual_keyboard_manager_v1"))?;

        self.output.vkbd = Some(manager.create_virtual_keyboard(seat, qh, ()));
        self.keyboard.init(&mut self.output)?;
        if !self.hidden {
            self.show(qh);
        }
        Ok(())
    }

    pub fn show(&mut self, qh: &QueueHandle<State>) {
        if self.output.layer_surface.is_some() {
            return;
        }
        let (compositor, layer_shell) = match (&self.compositor, &self.layer_shell) {
            (Some(c), Some(l)) => (c, l),
            _ => return,
        };
        log::debug!("showing keyboard");
        let surface = compositor.create_surface(qh, ());
        let layer_surface = layer_shell.get_layer_surface(
            &surface,
            None,
            zwlr_layer_shell_v1::Layer::Top,
            "wlkbd".to_string(),
            qh,
            (),
        );
        layer_surface.set_anchor(
            zwlr_layer_surface_v1::Anchor::Bottom
                | zwlr_layer_surface_v1::Anchor::Left
                | zwlr_layer_surface_v1::Anchor::Right,
        );
        self.output.surface = Some(surface);
        self.output.layer_surface = Some(layer_surface);
        self.output.apply_height();
        self.hidden = false;
        self.configured = false;
    }

    pub fn hide(&mut self) {
        log::debug!("hiding keyboard");
        self.cancel();
        if let Some(layer_surface) = self.output.layer_surface.take() {
            layer_surface.destroy();
        }
        if let Some(surface) = self.output.surface.take() {
            surface.destroy();
        }
        self.bufmgr.clear_buffers();
        self.pointer_down = false;
        self.touch_id = None;
        self.hidden = true;
        self.configured = false;
    }

    /// Copies the canvas into a free buffer and commits it, if anything
    /// asked for a present since the last one.
    pub fn present(&mut self, qh: &QueueHandle<State>) -> Result<()> {
        if !self.configured || !self.output.dirty {
            return Ok(());
        }
        let surface = match &self.output.surface {
            Some(s) => s.clone(),
            None => return Ok(()),
        };
        let shm = self
            .wl_shm
            .clone()
            .ok_or(Error::MissingGlobal("wl_shm"))?;
        let dimensions = self.output.renderer.dimensions();
        if dimensions.0 == 0 || dimensions.1 == 0 {
            return Ok(());
        }

        let buf = match self.bufmgr.next_buffer(&shm, dimensions, qh)? {
            Some(b) => b,
            // We are still waiting for our buffer
            None => return Ok(()),
        };

        self.output.dirty = false;
        let damage = self.output.renderer.take_damage();
        buf.copy_from(
            self.output.renderer.canvas(),
            Geometry {
                x: 0,
                y: 0,
                width: dimensions.0,
                height: dimensions.1,
            },
        );
        buf.acquire();
        surface.damage_buffer(
            damage.x as i32,
            damage.y as i32,
            damage.width as i32,
            damage.height as i32,
        );
        surface.attach(Some(&buf.buffer), 0, 0);
        surface.commit();
        Ok(())
    }

    fn arm_long_tap(&mut self) {
        self.disarm_long_tap();
        let time = self.press_time.wrapping_add(LONG_TAP.as_millis() as u32);
        let timer = Timer::from_duration(LONG_TAP);
        let res = self.handle.insert_source(timer, move |_, _, state| {
            state.long_tap = None;
            let res = state.keyboard.on_long_tap(time, &mut state.output);
            state.check(res);
            TimeoutAction::Drop
        });
        match res {
            Ok(token) => self.long_tap = Some(token),
            Err(e) => log::warn!("unable to arm long-tap timer: {}", e.error),
        }
    }

    fn disarm_long_tap(&mut self) {
        if let Some(token) = self.long_tap.take() {
            self.handle.remove(token);
        }
    }

    fn press(&mut self, x: f64, y: f64, time: u32) {
        self.press_time = time;
        if self
            .keyboard
            .on_press(x as i32, y as i32, &mut self.output)
        {
            self.arm_long_tap();
        }
    }

    fn motion(&mut self, x: f64, y: f64) {
        self.keyboard
            .on_motion(x as i32, y as i32, &mut self.output);
    }

    fn release(&mut self, time: u32) {
        self.disarm_long_tap();
        let res = self.keyboard.on_release(time, &mut self.output);
        self.check(res);
    }

    fn cancel(&mut self) {
        self.disarm_long_tap();
        self.keyboard.cancel(&mut self.output);
    }

    fn update_orientation(&mut self) {
        let landscape = match &self.current_output {
            Some(current) => match self.outputs.iter().find(|o| &o.output == current) {
                Some(info) => info.size.0 > info.size.1,
                None => return,
            },
            None => self.outputs.iter().any(|o| o.size.0 > o.size.1),
        };
        if landscape == self.keyboard.is_landscape() {
            return;
        }
        let res = self.keyboard.set_landscape(landscape, &mut self.output);
        self.output.set_landscape(landscape);
        self.check(res);
    }
}

impl Dispatch<wl_registry::WlRegistry, ()> for State {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name, interface, ..
        } = event
        {
            match &interface[..] {
                "wl_compositor" => {
                    state.compositor =
                        Some(registry.bind::<wl_compositor::WlCompositor, _, _>(name, 4, qh, ()));
                }
                "wl_shm" => {
                    state.wl_shm = Some(registry.bind::<wl_shm::WlShm, _, _>(name, 1, qh, ()));
                }
                "wl_seat" => {
                    if state.seat.is_none() {
                        state.seat = Some(registry.bind::<wl_seat::WlSeat, _, _>(name, 1, qh, ()));
                    }
                }
                "wl_output" => {
                    let output = registry.bind::<wl_output::WlOutput, _, _>(name, 2, qh, ());
                    state.outputs.push(OutputInfo {
                        output,
                        size: (0, 0),
                    });
                }
                "zwlr_layer_shell_v1" => {
                    state.layer_shell = Some(
                        registry.bind::<zwlr_layer_shell_v1::ZwlrLayerShellV1, _, _>(
                            name, 1, qh, (),
                        ),
                    );
                }
                "zwp_virtual_keyboard_manager_v1" => {
                    state.vkbd_manager = Some(
                        registry
                            .bind::<zwp_virtual_keyboard_manager_v1::ZwpVirtualKeyboardManagerV1, _, _>(
                                name, 1, qh, (),
                            ),
                    );
                }
                _ => {}
            }
        } else if let wl_registry::Event::GlobalRemove { .. } = event {
            log::debug!("global removed");
        }
    }
}

delegate_noop!(State: wl_compositor::WlCompositor);
delegate_noop!(State: wl_shm_pool::WlShmPool);
delegate_noop!(State: ignore wl_shm::WlShm);
delegate_noop!(State: zwlr_layer_shell_v1::ZwlrLayerShellV1);
delegate_noop!(State: zwp_virtual_keyboard_manager_v1::ZwpVirtualKeyboardManagerV1);
delegate_noop!(State: zwp_virtual_keyboard_v1::ZwpVirtualKeyboardV1);

impl Dispatch<wl_buffer::WlBuffer, ()> for State {
    fn event(
        state: &mut Self,
        buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            state.bufmgr.release(buffer);
        }
    }
}

impl Dispatch<wl_surface::WlSurface, ()> for State {
    fn event(
        state: &mut Self,
        _: &wl_surface::WlSurface,
        event: wl_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_surface::Event::Enter { output } = event {
            if state.current_output.as_ref() != Some(&output) {
                state.current_output = Some(output);
                state.update_orientation();
            }
        }
    }
}

impl Dispatch<wl_output::WlOutput, ()> for State {
    fn event(
        state: &mut Self,
        output: &wl_output::WlOutput,
        event: wl_output::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_output::Event::Geometry {
                physical_width,
                physical_height,
                transform,
                ..
            } => {
                let rotated = matches!(
                    transform,
                    WEnum::Value(
                        wl_output::Transform::_90
                            | wl_output::Transform::_270
                            | wl_output::Transform::Flipped90
                            | wl_output::Transform::Flipped270
                    )
                );
                let size = if rotated {
                    (physical_height, physical_width)
                } else {
                    (physical_width, physical_height)
                };
                if let Some(info) = state.outputs.iter_mut().find(|o| &o.output == output) {
                    info.size = size;
                }
            }
            wl_output::Event::Done => state.update_orientation(),
            _ => (),
        }
    }
}

impl Dispatch<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, ()> for State {
    fn event(
        state: &mut Self,
        layer_surface: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_layer_surface_v1::Event::Configure {
                serial,
                width,
                height,
            } => {
                layer_surface.ack_configure(serial);
                if width == 0 || height == 0 {
                    return;
                }
                if state.output.renderer.dimensions() != (width, height) {
                    state.output.renderer.resize(width, height);
                    state.keyboard.resize(width, height, &mut state.output);
                }
                state.configured = true;
                state.output.dirty = true;
            }
            zwlr_layer_surface_v1::Event::Closed => {
                state.running = false;
            }
            _ => (),
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for State {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_seat::Event::Capabilities {
            capabilities: WEnum::Value(capabilities),
        } = event
        {
            if capabilities.contains(wl_seat::Capability::Pointer) && state.pointer.is_none() {
                state.pointer = Some(seat.get_pointer(qh, ()));
            }
            if capabilities.contains(wl_seat::Capability::Touch) && state.touch.is_none() {
                state.touch = Some(seat.get_touch(qh, ()));
            }
        }
    }
}

impl Dispatch<wl_pointer::WlPointer, ()> for State {
    fn event(
        state: &mut Self,
        _: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_pointer::Event::Enter {
                surface_x,
                surface_y,
                ..
            } => {
                state.pointer_pos = (surface_x, surface_y);
            }
            wl_pointer::Event::Motion {
                surface_x,
                surface_y,
                ..
            } => {
                state.pointer_pos = (surface_x, surface_y);
                if state.pointer_down {
                    state.motion(surface_x, surface_y);
                }
            }
            wl_pointer::Event::Button {
                time,
                state: WEnum::Value(button_state),
                ..
            } => match button_state {
                wl_pointer::ButtonState::Pressed => {
                    if !state.pointer_down {
                        state.pointer_down = true;
                        let (x, y) = state.pointer_pos;
                        state.press(x, y, time);
                    }
                }
                wl_pointer::ButtonState::Released => {
                    if state.pointer_down {
                        state.pointer_down = false;
                        state.release(time);
                    }
                }
                _ => (),
            },
            wl_pointer::Event::Leave { .. } => {
                if state.pointer_down {
                    state.pointer_down = false;
                    let time = state.press_time;
                    state.release(time);
                }
            }
            wl_pointer::Event::Axis {
                axis: WEnum::Value(wl_pointer::Axis::VerticalScroll),
                value,
                ..
            } => {
                let res = state.keyboard.on_axis(value, &mut state.output);
                state.check(res);
            }
            _ => (),
        }
    }
}

impl Dispatch<wl_touch::WlTouch, ()> for State {
    fn event(
        state: &mut Self,
        _: &wl_touch::WlTouch,
        event: wl_touch::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_touch::Event::Down { time, id, x, y, .. } => {
                if state.touch_id.is_none() {
                    state.touch_id = Some(id);
                    state.press(x, y, time);
                }
            }
            wl_touch::Event::Motion { id, x, y, .. } => {
                if state.touch_id == Some(id) {
                    state.motion(x, y);
                }
            }
            wl_touch::Event::Up { time, id, .. } => {
                if state.touch_id == Some(id) {
                    state.touch_id = None;
                    state.release(time);
                }
            }
            wl_touch::Event::Cancel => {
                if state.touch_id.take().is_some() {
                    state.cancel();
                }
            }
            _ => (),
        }
    }
}
