use crate::buffer::BufferView;
use crate::config::Schemes;
use crate::draw::{draw_box, Font};
use crate::keyboard::Visual;
use crate::layout::{Geometry, Key, KeyType, Layout, Modifiers};

/// Software renderer painting keys into an off-screen ARGB8888 canvas and
/// accumulating the damaged region until the next present.
pub struct Renderer {
    canvas: Vec<u32>,
    dimensions: (u32, u32),
    font: Option<Font>,
    schemes: Schemes,
    border: u32,
    damage: Geometry,
}

impl Renderer {
    pub fn new(schemes: Schemes, border: u32, font: Option<Font>) -> Renderer {
        Renderer {
            canvas: Vec::new(),
            dimensions: (0, 0),
            font,
            schemes,
            border,
            damage: Geometry::new(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub fn canvas(&self) -> &[u32] {
        &self.canvas
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.dimensions == (width, height) {
            return;
        }
        self.dimensions = (width, height);
        self.canvas = vec![self.schemes.normal.bg.0; (width * height) as usize];
        self.damage = self.full();
    }

    fn full(&self) -> Geometry {
        Geometry {
            x: 0,
            y: 0,
            width: self.dimensions.0,
            height: self.dimensions.1,
        }
    }

    /// Returns and resets the region painted since the last call.
    pub fn take_damage(&mut self) -> Geometry {
        std::mem::take(&mut self.damage)
    }

    pub fn draw_key(&mut self, key: &Key, area: Geometry, visual: Visual, shifted: bool) {
        if area.is_empty() {
            return;
        }
        let scheme = self.schemes.get(key.scheme).clone();
        let fill = match visual {
            Visual::Normal => scheme.fg,
            Visual::Pressed => scheme.high,
            Visual::Swiped => scheme.swipe.over(scheme.fg),
        };

        let (width, height) = self.dimensions;
        let mut view = BufferView::new(&mut self.canvas, (width, height));
        let mut cell = match view.subgeometry(area) {
            Ok(cell) => cell,
            Err(e) => {
                log::warn!("skipping key {:?}: {}", key.label, e);
                return;
            }
        };
        cell.memset(fill);
        draw_box(&mut cell, scheme.bg, self.border);

        let label = key.label(shifted);
        if let Some(font) = self.font.as_mut() {
            if !label.is_empty() {
                let text_width = font.measure(label).min(area.width);
                let text_height = (font.size() as u32).min(area.height);
                let origin = Geometry {
                    x: (area.width - text_width) / 2,
                    y: (area.height - text_height) / 2,
                    width: area.width - (area.width - text_width) / 2,
                    height: area.height - (area.height - text_height) / 2,
                };
                if let Ok(mut text) = cell.subgeometry(origin) {
                    font.draw_text(&mut text, scheme.text, label);
                }
            }
        }

        self.damage = self.damage.expand(area);
    }

    pub fn draw_layout(&mut self, layout: &Layout, mods: Modifiers, compose_armed: bool) {
        let full = self.full();
        BufferView::new(&mut self.canvas, self.dimensions).memset(self.schemes.normal.bg);
        self.damage = full;

        let shifted = mods.intersects(Modifiers::SHIFT | Modifiers::CAPSLOCK);
        for key in layout.keys.iter().filter(|k| k.is_interactive()) {
            let visual = match key.kind {
                KeyType::Mod(m) if mods.contains(m) => Visual::Pressed,
                KeyType::Compose if compose_armed => Visual::Pressed,
                _ => Visual::Normal,
            };
            self.draw_key(key, key.geometry, visual, shifted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::layout::{compute_layout, LayoutId, Layouts};

    fn renderer() -> Renderer {
        let mut r = Renderer::new(Schemes::default(), 2, None);
        r.resize(100, 40);
        r
    }

    fn cell(x: u32, y: u32, width: u32, height: u32) -> Geometry {
        Geometry {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn key_fill_and_border() {
        let mut r = renderer();
        r.take_damage();
        let key = Key::code("a", "A", 30);
        r.draw_key(&key, cell(10, 10, 20, 20), Visual::Pressed, false);
        let px = |x: u32, y: u32| Color(r.canvas()[(y * 100 + x) as usize]);
        assert_eq!(px(20, 20), Color::GREY);
        assert_eq!(px(10, 10), Color::SLATE);
        assert_eq!(px(11, 20), Color::SLATE);
        assert_eq!(px(12, 20), Color::GREY);
        assert_eq!(r.take_damage(), cell(10, 10, 20, 20));
        assert!(r.take_damage().is_empty());
    }

    #[test]
    fn special_scheme_and_swipe() {
        let mut r = renderer();
        let key = Key::code("Tab", "Tab", 15).scheme(1);
        r.draw_key(&key, cell(0, 0, 10, 10), Visual::Normal, false);
        assert_eq!(r.canvas()[5 * 100 + 5], Color::DUSK.0);
        r.draw_key(&key, cell(0, 0, 10, 10), Visual::Swiped, false);
        assert_eq!(r.canvas()[5 * 100 + 5], Color::MINT.over(Color::DUSK).0);
    }

    #[test]
    fn damage_accumulates() {
        let mut r = renderer();
        r.take_damage();
        let key = Key::code("a", "A", 30);
        r.draw_key(&key, cell(0, 0, 10, 10), Visual::Normal, false);
        r.draw_key(&key, cell(50, 20, 10, 10), Visual::Normal, false);
        assert_eq!(r.take_damage(), cell(0, 0, 60, 30));
    }

    #[test]
    fn out_of_bounds_key_is_skipped() {
        let mut r = renderer();
        r.take_damage();
        r.draw_key(&Key::code("a", "A", 30), cell(95, 0, 10, 10), Visual::Normal, false);
        assert!(r.take_damage().is_empty());
    }

    #[test]
    fn layout_covers_surface() {
        let mut r = renderer();
        let mut layouts = Layouts::builtin();
        let numpad = &mut layouts[LayoutId::Numpad];
        compute_layout(numpad, 100, 40);
        r.draw_layout(numpad, Modifiers::empty(), false);
        assert_eq!(r.take_damage(), cell(0, 0, 100, 40));
        let painted = r.canvas().iter().filter(|&&p| p == Color::STEEL.0).count()
            + r.canvas().iter().filter(|&&p| p == Color::DUSK.0).count();
        assert!(painted > 0);
    }
}
