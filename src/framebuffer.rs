/// Width of the CHIP-8 screen in pixels
pub const SCREEN_WIDTH: usize = 64;
/// Height of the CHIP-8 screen in pixels
pub const SCREEN_HEIGHT: usize = 32;

const PIXEL_COUNT: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// What happens to sprite pixels that land beyond the right or bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteEdge {
    /// drop them; the sprite is cut off at the edge
    #[default]
    Clip,
    /// carry on from the opposite edge
    Wrap,
}

/// The 64x32 monochrome screen. Pixel `(x, y)` is stored at `x + y * 64`
/// and is only ever changed by clearing or XOR-ing a sprite onto it.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [bool; PIXEL_COUNT],
    edge: SpriteEdge,
}

impl FrameBuffer {
    pub fn new(edge: SpriteEdge) -> Self {
        FrameBuffer {
            pixels: [false; PIXEL_COUNT],
            edge,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [false; PIXEL_COUNT];
    }

    pub fn edge(&self) -> SpriteEdge {
        self.edge
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.pixels[x + y * SCREEN_WIDTH]
    }

    /// XOR a sprite onto the screen with its top-left corner at `(x, y)`.
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    /// Returns true if any set pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collided = false;
        for (row, byte) in sprite.iter().enumerate() {
            for col in 0..8 {
                if byte & (0x80 >> col) == 0 {
                    continue;
                }
                if let Some(idx) = self.index(x + col, y + row) {
                    collided |= self.pixels[idx];
                    self.pixels[idx] ^= true;
                }
            }
        }
        collided
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        match self.edge {
            SpriteEdge::Wrap => Some(x % SCREEN_WIDTH + (y % SCREEN_HEIGHT) * SCREEN_WIDTH),
            SpriteEdge::Clip if x < SCREEN_WIDTH && y < SCREEN_HEIGHT => {
                Some(x + y * SCREEN_WIDTH)
            }
            SpriteEdge::Clip => None,
        }
    }

    /// one 0/1 cell per pixel, row-major, as renderers consume it
    pub fn cells(&self) -> impl Iterator<Item = u8> + '_ {
        self.pixels.iter().map(|&p| p as u8)
    }

    /// pack the screen into 256 bytes, eight pixels per byte, MSB leftmost
    pub fn to_packed(&self) -> [u8; PIXEL_COUNT / 8] {
        let mut packed = [0u8; PIXEL_COUNT / 8];
        for (i, &lit) in self.pixels.iter().enumerate() {
            if lit {
                packed[i / 8] |= 0x80 >> (i % 8);
            }
        }
        packed
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(SpriteEdge::default())
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // 2048 bools is no use to anyone
        f.debug_struct("FrameBuffer")
            .field("edge", &self.edge)
            .field("lit", &self.lit_count())
            .finish()
    }
}
