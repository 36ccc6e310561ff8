use std::collections::HashMap;

use rusttype::{point, Font as RustFont, Scale};

use crate::buffer::BufferView;
use crate::color::Color;

struct CachedGlyph {
    dimensions: (u32, u32),
    origin: (i32, i32),
    advance: i32,
    render: Vec<f32>,
}

impl CachedGlyph {
    fn new(font: &RustFont, size: f32, ch: char) -> CachedGlyph {
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyph = font
            .glyph(ch)
            .scaled(scale)
            .positioned(point(0.0, v_metrics.ascent));
        let advance = glyph.unpositioned().h_metrics().advance_width.ceil() as i32;

        if let Some(bounding_box) = glyph.pixel_bounding_box() {
            let origin = (bounding_box.min.x, bounding_box.min.y);
            let dimensions = (
                (bounding_box.max.x - bounding_box.min.x) as u32,
                (bounding_box.max.y - bounding_box.min.y) as u32,
            );
            let mut render = vec![0.0; (dimensions.0 * dimensions.1) as usize];
            glyph.draw(|x, y, o| {
                let pos = x + (y * dimensions.0);
                render[pos as usize] = o;
            });
            CachedGlyph {
                origin,
                dimensions,
                advance,
                render,
            }
        } else {
            CachedGlyph {
                origin: (0, 0),
                dimensions: (0, 0),
                advance: advance.max((size / 4.0) as i32),
                render: Vec::new(),
            }
        }
    }

    fn draw(&self, buf: &mut BufferView, pos: (i32, i32), c: Color) {
        if self.dimensions.0 == 0 {
            return;
        }
        for (idx, v) in self.render.iter().enumerate() {
            if *v <= 0.0 {
                continue;
            }
            let x = (idx as u32 % self.dimensions.0) as i32 + pos.0 + self.origin.0;
            let y = (idx as u32 / self.dimensions.0) as i32 + pos.1 + self.origin.1;
            if x < 0 || y < 0 {
                continue;
            }
            let pos = (x as u32, y as u32);
            if let Some(bg) = buf.get(pos) {
                let _ = buf.put(pos, bg.blend(c, v.min(1.0) * c.opacity() as f32 / 255.0));
            }
        }
    }
}

/// A rasterised font at a fixed pixel size with a per-character cache.
pub struct Font {
    glyphs: HashMap<char, CachedGlyph>,
    font: RustFont<'static>,
    size: f32,
}

impl Font {
    pub fn new(font: RustFont<'static>, size: f32) -> Font {
        Font {
            glyphs: HashMap::new(),
            font,
            size,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    fn cache(&mut self, s: &str) {
        for ch in s.chars() {
            if !self.glyphs.contains_key(&ch) {
                let glyph = CachedGlyph::new(&self.font, self.size, ch);
                self.glyphs.insert(ch, glyph);
            }
        }
    }

    /// Width of `s` in pixels.
    pub fn measure(&mut self, s: &str) -> u32 {
        self.cache(s);
        s.chars()
            .filter_map(|ch| self.glyphs.get(&ch))
            .map(|g| g.advance)
            .sum::<i32>()
            .max(0) as u32
    }

    /// Draws `s` with the top of its line box at the top of `buf`.
    pub fn draw_text(&mut self, buf: &mut BufferView, c: Color, s: &str) -> (u32, u32) {
        self.cache(s);
        let mut x_off = 0;
        for ch in s.chars() {
            if let Some(glyph) = self.glyphs.get(&ch) {
                glyph.draw(buf, (x_off, 0), c);
                x_off += glyph.advance;
            }
        }
        (x_off.max(0) as u32, self.size as u32)
    }
}

/// Draws a `border` pixels wide outline along the edges of `buf`.
pub fn draw_box(buf: &mut BufferView, c: Color, border: u32) {
    let bounds = buf.get_bounds();
    let (w, h) = (bounds.width, bounds.height);
    for y in 0..h {
        for x in 0..w {
            if x < border || y < border || x + border >= w || y + border >= h {
                let _ = buf.put((x, y), c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Geometry;

    #[test]
    fn box_outline() {
        let mut px = vec![0u32; 25];
        let mut view = BufferView::new(&mut px, (5, 5));
        draw_box(&mut view, Color::WHITE, 1);
        let inner: Vec<u32> = [6, 7, 8, 11, 12, 13, 16, 17, 18]
            .iter()
            .map(|&i| px[i])
            .collect();
        assert!(inner.iter().all(|&p| p == 0));
        assert_eq!(px.iter().filter(|&&p| p == Color::WHITE.0).count(), 16);
    }

    #[test]
    fn thick_box_on_sub_view() {
        let mut px = vec![0u32; 36];
        let mut view = BufferView::new(&mut px, (6, 6));
        let mut sub = view
            .subgeometry(Geometry {
                x: 1,
                y: 1,
                width: 4,
                height: 4,
            })
            .unwrap();
        draw_box(&mut sub, Color::GREY, 2);
        assert_eq!(px.iter().filter(|&&p| p == Color::GREY.0).count(), 16);
        assert_eq!(px[0], 0);
    }
}
