//! Pixel fetcher and the two pixel FIFOs.
//!
//! The fetcher walks ReadTileId -> ReadTileDataLo -> ReadTileDataHi ->
//! Idle -> PushFifo, acting on every second dot. It fetches background or
//! window tiles into the background FIFO and, when the PPU hands it a
//! sprite, interrupts that work to fetch the sprite row into the sprite
//! FIFO. Pixels only leave through [`Fetcher::pop`], which holds back while
//! any sprite fetch is queued or running.

use std::collections::VecDeque;

use super::{LcdControl, Sprite, VRAM_SIZE};
use crate::bits;

const BG_MAP_LOW: usize = 0x1800;
const BG_MAP_HIGH: usize = 0x1C00;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FetchStep {
    ReadTileId,
    ReadTileDataLo,
    ReadTileDataHi,
    Idle,
    PushFifo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Layer {
    Background,
    Window,
}

/// Which palette register resolves a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Palette {
    Background,
    Obp0,
    Obp1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub color: u8,
    pub palette: Palette,
}

#[derive(Clone, Copy, Debug, Default)]
struct SpritePixel {
    /// False for padding ahead of a sprite's first column.
    present: bool,
    color: u8,
    obp1: bool,
    behind_bg: bool,
}

/// Background fetch state parked while sprites are fetched.
#[derive(Clone, Copy, Debug)]
struct ParkedFetch {
    lo: u8,
    hi: u8,
    pushed: bool,
}

/// Registers and memory the fetcher reads, snapshotted for one dot.
pub(crate) struct FetchContext<'a> {
    pub vram: &'a [u8; VRAM_SIZE],
    pub lcdc: LcdControl,
    pub ly: u8,
    pub lx: u8,
    pub scx: u8,
    pub scy: u8,
    pub window_line: u8,
}

#[derive(Clone, Debug)]
pub(crate) struct Fetcher {
    step: FetchStep,
    odd_dot: bool,
    layer: Layer,
    tile_x: u8,
    window_x: u8,
    tile_id: u8,
    tile_row: u8,
    lo: u8,
    hi: u8,
    discard: u8,
    bg_fifo: VecDeque<u8>,
    sprite_fifo: VecDeque<SpritePixel>,
    sprite_queue: VecDeque<Sprite>,
    sprite: Option<Sprite>,
    parked: Option<ParkedFetch>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self {
            step: FetchStep::ReadTileId,
            odd_dot: false,
            layer: Layer::Background,
            tile_x: 0,
            window_x: 0,
            tile_id: 0,
            tile_row: 0,
            lo: 0,
            hi: 0,
            discard: 0,
            bg_fifo: VecDeque::with_capacity(16),
            sprite_fifo: VecDeque::with_capacity(16),
            sprite_queue: VecDeque::with_capacity(10),
            sprite: None,
            parked: None,
        }
    }
}

impl Fetcher {
    /// Prepare for a new scanline.
    pub fn start_line(&mut self, scx: u8) {
        self.step = FetchStep::ReadTileId;
        self.odd_dot = false;
        self.layer = Layer::Background;
        self.tile_x = 0;
        self.window_x = 0;
        self.discard = scx % 8;
        self.bg_fifo.clear();
        self.sprite_fifo.clear();
        self.sprite_queue.clear();
        self.sprite = None;
        self.parked = None;
    }

    /// Restart fetching from the window's first tile.
    pub fn start_window(&mut self) {
        self.restart_layer(Layer::Window);
        self.window_x = 0;
    }

    /// Return to the background after the window was switched off.
    pub fn start_background(&mut self) {
        self.restart_layer(Layer::Background);
    }

    fn restart_layer(&mut self, layer: Layer) {
        self.layer = layer;
        self.bg_fifo.clear();
        self.discard = 0;
        // A running sprite fetch completes first, then resumes on the new layer.
        self.parked = None;
        if self.sprite.is_none() {
            self.step = FetchStep::ReadTileId;
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn step(&self) -> FetchStep {
        self.step
    }

    pub fn queue_sprite(&mut self, sprite: Sprite) {
        self.sprite_queue.push_back(sprite);
    }

    /// Whether a sprite fetch is queued or running.
    pub fn sprite_pending(&self) -> bool {
        self.sprite.is_some() || !self.sprite_queue.is_empty()
    }

    pub fn bg_fifo_len(&self) -> usize {
        self.bg_fifo.len()
    }

    /// Advance one dot.
    pub fn tick(&mut self, ctx: &FetchContext) {
        self.odd_dot = !self.odd_dot;
        if self.odd_dot {
            return;
        }

        match self.step {
            FetchStep::ReadTileId => {
                self.read_tile_id(ctx);
                self.step = FetchStep::ReadTileDataLo;
            }
            FetchStep::ReadTileDataLo => {
                self.lo = ctx.vram[self.tile_data_addr(ctx.lcdc)];
                self.step = FetchStep::ReadTileDataHi;
            }
            FetchStep::ReadTileDataHi => {
                self.hi = ctx.vram[self.tile_data_addr(ctx.lcdc) + 1];
                self.step = FetchStep::Idle;
            }
            FetchStep::Idle => self.step = FetchStep::PushFifo,
            FetchStep::PushFifo => match self.sprite.take() {
                Some(sprite) => self.push_sprite(sprite, ctx.lx),
                None => self.push_background(),
            },
        }
    }

    fn read_tile_id(&mut self, ctx: &FetchContext) {
        if let Some(sprite) = self.sprite_queue.pop_front() {
            let height = if ctx.lcdc.contains(LcdControl::OBJ_SIZE) {
                16
            } else {
                8
            };
            let line = (ctx.ly as u16 + 16).saturating_sub(sprite.y as u16);
            let mut row = line as u8 & (height - 1);
            if sprite.flip_y() {
                row = height - 1 - row;
            }
            self.tile_id = if height == 16 {
                sprite.tile & 0xFE
            } else {
                sprite.tile
            };
            self.tile_row = row;
            self.sprite = Some(sprite);
            return;
        }

        let (map, y, x) = match self.layer {
            Layer::Background => {
                let map = if ctx.lcdc.contains(LcdControl::BG_TILE_MAP) {
                    BG_MAP_HIGH
                } else {
                    BG_MAP_LOW
                };
                let y = ctx.ly.wrapping_add(ctx.scy);
                let x = (self.tile_x as usize + (ctx.scx / 8) as usize) & 0x1F;
                (map, y, x)
            }
            Layer::Window => {
                let map = if ctx.lcdc.contains(LcdControl::WINDOW_TILE_MAP) {
                    BG_MAP_HIGH
                } else {
                    BG_MAP_LOW
                };
                (map, ctx.window_line, self.window_x as usize & 0x1F)
            }
        };
        self.tile_id = ctx.vram[map + (y as usize / 8) * 32 + x];
        self.tile_row = y % 8;
    }

    /// VRAM offset of the low bit-plane byte for the current tile row.
    fn tile_data_addr(&self, lcdc: LcdControl) -> usize {
        let row = self.tile_row as usize * 2;
        if self.sprite.is_some() || lcdc.contains(LcdControl::TILE_DATA) {
            self.tile_id as usize * 16 + row
        } else {
            (0x1000 + self.tile_id as i8 as isize * 16) as usize + row
        }
    }

    fn push_background(&mut self) {
        let pushed = if self.bg_fifo.is_empty() {
            for bit in (0..8).rev() {
                let color = bits::get(self.hi, bit) << 1 | bits::get(self.lo, bit);
                if self.discard > 0 {
                    self.discard -= 1;
                    continue;
                }
                self.bg_fifo.push_back(color);
            }
            match self.layer {
                Layer::Background => self.tile_x = self.tile_x.wrapping_add(1),
                Layer::Window => self.window_x = self.window_x.wrapping_add(1),
            }
            true
        } else {
            false
        };

        if !self.sprite_queue.is_empty() {
            self.parked = Some(ParkedFetch {
                lo: self.lo,
                hi: self.hi,
                pushed,
            });
            self.step = FetchStep::ReadTileId;
        } else if pushed {
            self.step = FetchStep::ReadTileId;
        }
    }

    fn push_sprite(&mut self, sprite: Sprite, lx: u8) {
        // Column of the sprite's leftmost pixel relative to the FIFO head.
        let start = sprite.x as i16 - 8 - lx as i16;
        for i in 0..8i16 {
            let slot = start + i;
            if slot < 0 {
                continue;
            }
            let slot = slot as usize;
            let bit = if sprite.flip_x() { i as u8 } else { 7 - i as u8 };
            let color = bits::get(self.hi, bit) << 1 | bits::get(self.lo, bit);
            while self.sprite_fifo.len() <= slot {
                self.sprite_fifo.push_back(SpritePixel::default());
            }
            // The first opaque sprite pixel at a column wins.
            if self.sprite_fifo[slot].color == 0 {
                self.sprite_fifo[slot] = SpritePixel {
                    present: true,
                    color,
                    obp1: sprite.obp1(),
                    behind_bg: sprite.behind_bg(),
                };
            }
        }

        if !self.sprite_queue.is_empty() {
            self.step = FetchStep::ReadTileId;
            return;
        }

        match self.parked.take() {
            Some(parked) if !parked.pushed => {
                self.lo = parked.lo;
                self.hi = parked.hi;
                self.step = FetchStep::PushFifo;
            }
            _ => self.step = FetchStep::ReadTileId,
        }
    }

    /// Emit the next pixel, if one is ready.
    pub fn pop(&mut self, lcdc: LcdControl) -> Option<Pixel> {
        if self.sprite_pending() {
            return None;
        }
        let bg = self.bg_fifo.pop_front()?;
        let sprite = self.sprite_fifo.pop_front();

        let bg_color = if lcdc.contains(LcdControl::BG_WINDOW_ENABLE) {
            bg
        } else {
            0
        };
        let background = Pixel {
            color: bg_color,
            palette: Palette::Background,
        };

        let pixel = match sprite {
            Some(sp) if sp.present && lcdc.contains(LcdControl::OBJ_ENABLE) => {
                // With the background off every sprite pixel shows, color 0 included.
                let hidden = lcdc.contains(LcdControl::BG_WINDOW_ENABLE)
                    && (sp.color == 0 || (sp.behind_bg && bg_color != 0));
                if hidden {
                    background
                } else {
                    Pixel {
                        color: sp.color,
                        palette: if sp.obp1 {
                            Palette::Obp1
                        } else {
                            Palette::Obp0
                        },
                    }
                }
            }
            _ => background,
        };
        Some(pixel)
    }
}
