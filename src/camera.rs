use crate::GridSize;
use crate::render::Surface;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// A terminal [`Surface`]. Every grid cell is one braille dot, so a single character shows a 2x4
/// block of cells.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Dot bits of each braille character
    cp: Vec<u8>,

    /// Width of the cell buffer
    w: usize,

    /// Height of the cell buffer
    h: usize,
}

impl Camera {
    /// A camera showing `w`x`h` cells
    pub fn new(w: usize, h: usize) -> Self {
        let (w, h) = (w.max(1), h.max(1));

        // Let `w` and `h` refer to width and height of the cell buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our framebuffer
        // (that is, not accounting for the trailing newlines expected at the end of each line).
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));

        // Each braille character is 3 bytes, and newlines one byte
        let fb = String::with_capacity(3 * (bw * bh) + bh);

        Self {
            cb: vec![false; w * h],
            fb,
            cp: vec![0; bw * bh],
            w,
            h,
        }
    }

    /// A camera filling a terminal of `cols`x`rows` characters
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize * 2, rows as usize * 4)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Build the frame. One line per row of braille characters, each terminated by `\n`.
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(0);

        for (n, &px) in self.cb.iter().enumerate() {
            if !px {
                continue;
            }

            let (x, y) = self.xy_to(n);
            self.cp[(y / 4) * bw + (x / 2)] |= Self::get_hex_value(x, y);
        }

        // update framebuffer
        self.fb.clear();

        for (i, &dots) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            // BRAILLE_EMPTY..=BRAILLE_EMPTY + 0xFF are all assigned codepoints
            let c = char::from_u32(BRAILLE_EMPTY + dots as u32).unwrap_or(' ');
            self.fb.push(c);
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u8 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

impl Surface for Camera {
    fn size(&self) -> (GridSize, GridSize) {
        (self.w, self.h)
    }

    /// Reset the cell buffer
    fn clear_surface(&mut self) {
        self.cb.fill(false);
    }

    /// Cells outside of the camera are ignored
    fn draw_cell(&mut self, x: GridSize, y: GridSize, alive: bool) {
        if x >= self.w || y >= self.h {
            return;
        }

        let i = self.xy_from(x, y);
        self.cb[i] = alive;
    }
}
