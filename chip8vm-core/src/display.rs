use crate::{Chip8Error, Result};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// 64x32 monochrome framebuffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }
}

impl Framebuffer {
    pub fn clear(&mut self) {
        self.pixels = [false; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    }

    /// XORs `data` onto the screen, one byte per row with the most significant
    /// bit leftmost, starting at `(x, y)`. Every pixel wraps around both edges.
    /// Returns true if any lit pixel was switched off.
    pub fn draw(&mut self, x: u8, y: u8, data: &[u8]) -> bool {
        let mut pixel_cleared = false;
        for (i, to_draw) in data.iter().enumerate() {
            let row = (y as usize + i) % DISPLAY_HEIGHT;
            for j in 0..8 {
                if to_draw & (0x80 >> j) == 0 {
                    continue;
                }
                let col = (x as usize + j) % DISPLAY_WIDTH;
                let pixel = &mut self.pixels[row * DISPLAY_WIDTH + col];
                pixel_cleared |= *pixel;
                *pixel = !*pixel;
            }
        }
        pixel_cleared
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<bool> {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return Err(Chip8Error::CoordinateOutOfRange { x, y });
        }
        Ok(self.pixels[y * DISPLAY_WIDTH + x])
    }

    /// Rows of the screen, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(DISPLAY_WIDTH)
    }
}
