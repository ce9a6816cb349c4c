//! Software frame buffer used by the population draw call.

use std::io::{self, Write};

use crate::schema::Vec2;

/// RGBA8 color.
pub type Rgba = [u8; 4];

pub mod colors {
    use super::Rgba;

    pub const BLACK: Rgba = [0, 0, 0, 255];
    pub const WHITE: Rgba = [255, 255, 255, 255];
    pub const RED: Rgba = [255, 0, 0, 255];
    pub const GREEN: Rgba = [0, 128, 0, 255];
    pub const GOLD: Rgba = [255, 215, 0, 255];
    pub const HOT_PINK: Rgba = [255, 105, 180, 255];
    pub const ORANGE_RED: Rgba = [255, 69, 0, 255];
}

/// Row-major RGBA pixel grid. Writes outside the grid are dropped.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![colors::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Fill the rectangle spanning `min` to `max`, both inclusive.
    pub fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Rgba) {
        let (x0, x1) = (min.x.floor() as i64, max.x.floor() as i64);
        let (y0, y1) = (min.y.floor() as i64, max.y.floor() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, color);
            }
        }
    }

    /// DDA line from `a` to `b`.
    pub fn draw_line(&mut self, a: Vec2, b: Vec2, color: Rgba) {
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = a + delta * (i as f32 / steps as f32);
            self.set(p.x.floor() as i64, p.y.floor() as i64, color);
        }
    }

    /// Write as binary PPM (alpha dropped).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            rgb.extend_from_slice(&p[..3]);
        }
        out.write_all(&rgb)?;
        out.flush()
    }
}
