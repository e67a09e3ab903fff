//! Dot-driven picture processing unit.
//!
//! Each call to [`Ppu::tick`] advances one dot. A visible scanline is
//! OAM scan (80 dots), pixel transfer (variable), then HBlank padding the
//! line to 456 dots; lines 144-153 are VBlank. The finished frame is a
//! 160x144 grid of palette-resolved shades (0 = lightest, 3 = darkest).

mod fetcher;

use std::collections::VecDeque;

use bitflags::bitflags;

use self::fetcher::{FetchContext, Fetcher, Layer, Palette};
use super::bus::{out_of_range, AddressSpace};
use super::interrupts::{Interrupt, InterruptController};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;
pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;

pub const LCDC_ADDR: u16 = 0xFF40;
pub const STAT_ADDR: u16 = 0xFF41;
pub const SCY_ADDR: u16 = 0xFF42;
pub const SCX_ADDR: u16 = 0xFF43;
pub const LY_ADDR: u16 = 0xFF44;
pub const LYC_ADDR: u16 = 0xFF45;
pub const BGP_ADDR: u16 = 0xFF47;
pub const OBP0_ADDR: u16 = 0xFF48;
pub const OBP1_ADDR: u16 = 0xFF49;
pub const WY_ADDR: u16 = 0xFF4A;
pub const WX_ADDR: u16 = 0xFF4B;

pub(crate) const VRAM_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xA0;

/// Dots per scanline, visible or not.
pub const DOTS_PER_LINE: u32 = 456;
pub const LINES_PER_FRAME: u8 = 154;
/// Dots in one complete frame.
pub const DOTS_PER_FRAME: u32 = DOTS_PER_LINE * LINES_PER_FRAME as u32;

const OAM_SCAN_DOTS: u32 = 80;
const VISIBLE_LINES: u8 = SCREEN_HEIGHT as u8;
const MAX_SPRITES_PER_LINE: usize = 10;
const SPRITE_COUNT: usize = OAM_SIZE / 4;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_WINDOW_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        const OBJ_SIZE = 1 << 2;
        const BG_TILE_MAP = 1 << 3;
        const TILE_DATA = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_TILE_MAP = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Writable STAT bits plus the LYC coincidence flag.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdStatus: u8 {
        const LYC_MATCH = 1 << 2;
        const HBLANK_INT = 1 << 3;
        const VBLANK_INT = 1 << 4;
        const OAM_INT = 1 << 5;
        const LYC_INT = 1 << 6;
    }
}

/// Top-level PPU state; the discriminant is what STAT bits 0-1 report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    PixelTransfer = 3,
}

/// One OAM entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub y: u8,
    pub x: u8,
    pub tile: u8,
    pub attributes: u8,
}

impl Sprite {
    fn from_oam(entry: &[u8]) -> Self {
        Self {
            y: entry[0],
            x: entry[1],
            tile: entry[2],
            attributes: entry[3],
        }
    }

    #[inline]
    pub fn behind_bg(&self) -> bool {
        self.attributes & 0x80 != 0
    }

    #[inline]
    pub fn flip_y(&self) -> bool {
        self.attributes & 0x40 != 0
    }

    #[inline]
    pub fn flip_x(&self) -> bool {
        self.attributes & 0x20 != 0
    }

    #[inline]
    pub fn obp1(&self) -> bool {
        self.attributes & 0x10 != 0
    }
}

pub struct Ppu {
    vram: Box<[u8; VRAM_SIZE]>,
    oam: [u8; OAM_SIZE],

    lcdc: LcdControl,
    stat: LcdStatus,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,

    mode: Mode,
    line_dots: u32,
    lx: u8,
    window_line: u8,
    window_triggered: bool,
    window_drawn: bool,
    oam_cursor: usize,
    line_sprites: VecDeque<Sprite>,
    fetcher: Fetcher,

    framebuffer: Box<[u8; SCREEN_WIDTH * SCREEN_HEIGHT]>,
    frame_ready: bool,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Power-on state: LCD off, everything zeroed.
    pub fn new() -> Self {
        Self {
            vram: Box::new([0; VRAM_SIZE]),
            oam: [0; OAM_SIZE],
            lcdc: LcdControl::empty(),
            stat: LcdStatus::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            mode: Mode::HBlank,
            line_dots: 0,
            lx: 0,
            window_line: 0,
            window_triggered: false,
            window_drawn: false,
            oam_cursor: 0,
            line_sprites: VecDeque::with_capacity(MAX_SPRITES_PER_LINE),
            fetcher: Fetcher::default(),
            framebuffer: Box::new([0; SCREEN_WIDTH * SCREEN_HEIGHT]),
            frame_ready: false,
        }
    }

    /// Register state left by the boot ROM, LCD running from line 0.
    pub fn post_boot() -> Self {
        let mut ppu = Self::new();
        ppu.bgp = 0xFC;
        ppu.obp0 = 0xFF;
        ppu.obp1 = 0xFF;
        ppu.lcdc = LcdControl::from_bits_truncate(0x91);
        ppu.restart();
        ppu
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ly(&self) -> u8 {
        self.ly
    }

    pub fn lcdc(&self) -> LcdControl {
        self.lcdc
    }

    pub fn window_line(&self) -> u8 {
        self.window_line
    }

    /// Latest completed frame, one shade (0-3) per pixel, row-major.
    pub fn frame(&self) -> &[u8] {
        &self.framebuffer[..]
    }

    /// True once per frame, after line 143 finishes.
    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    /// Store a byte copied by OAM DMA.
    pub fn write_oam(&mut self, index: u8, value: u8) {
        self.oam[index as usize % OAM_SIZE] = value;
    }

    pub fn oam(&self) -> &[u8; OAM_SIZE] {
        &self.oam
    }

    /// Advance `dots` dots.
    pub fn step(&mut self, dots: u32, interrupts: &mut InterruptController) {
        for _ in 0..dots {
            self.tick(interrupts);
        }
    }

    /// Advance a single dot.
    pub fn tick(&mut self, interrupts: &mut InterruptController) {
        if !self.lcdc.contains(LcdControl::LCD_ENABLE) {
            return;
        }
        self.line_dots += 1;

        match self.mode {
            Mode::OamScan => self.tick_oam_scan(),
            Mode::PixelTransfer => self.tick_pixel_transfer(interrupts),
            Mode::HBlank => {
                if self.line_dots >= DOTS_PER_LINE {
                    self.line_dots = 0;
                    self.set_ly(self.ly + 1, interrupts);
                    if self.ly >= VISIBLE_LINES {
                        self.enter_vblank(interrupts);
                    } else {
                        self.enter_oam_scan(interrupts);
                    }
                }
            }
            Mode::VBlank => {
                if self.line_dots >= DOTS_PER_LINE {
                    self.line_dots = 0;
                    let next = self.ly + 1;
                    if next >= LINES_PER_FRAME {
                        self.set_ly(0, interrupts);
                        self.enter_oam_scan(interrupts);
                    } else {
                        self.set_ly(next, interrupts);
                    }
                }
            }
        }
    }

    fn tick_oam_scan(&mut self) {
        if self.line_dots % 2 == 0 && self.oam_cursor < SPRITE_COUNT {
            let base = self.oam_cursor * 4;
            let sprite = Sprite::from_oam(&self.oam[base..base + 4]);
            self.oam_cursor += 1;

            let height = self.sprite_height();
            let line = self.ly as u16 + 16;
            let top = sprite.y as u16;
            if sprite.x != 0
                && line >= top
                && line < top + height
                && self.line_sprites.len() < MAX_SPRITES_PER_LINE
            {
                self.line_sprites.push_back(sprite);
            }
        }

        if self.line_dots >= OAM_SCAN_DOTS {
            // Stable: equal X keeps OAM order, which decides priority.
            self.line_sprites
                .make_contiguous()
                .sort_by_key(|sprite| sprite.x);
            self.enter_pixel_transfer();
        }
    }

    fn tick_pixel_transfer(&mut self, interrupts: &mut InterruptController) {
        let window_enabled = self.lcdc.contains(LcdControl::WINDOW_ENABLE);
        match self.fetcher.layer() {
            Layer::Background
                if window_enabled
                    && self.window_triggered
                    && self.lx as u16 + 7 >= self.wx as u16 =>
            {
                self.fetcher.start_window();
                self.window_drawn = true;
            }
            Layer::Window if !window_enabled => self.fetcher.start_background(),
            _ => {}
        }

        if self.lcdc.contains(LcdControl::OBJ_ENABLE) {
            while let Some(sprite) = self.line_sprites.front() {
                if sprite.x as u16 > self.lx as u16 + 8 {
                    break;
                }
                if let Some(sprite) = self.line_sprites.pop_front() {
                    self.fetcher.queue_sprite(sprite);
                }
            }
        }

        let ctx = FetchContext {
            vram: &self.vram,
            lcdc: self.lcdc,
            ly: self.ly,
            lx: self.lx,
            scx: self.scx,
            scy: self.scy,
            window_line: self.window_line,
        };
        self.fetcher.tick(&ctx);

        if let Some(pixel) = self.fetcher.pop(self.lcdc) {
            let palette = match pixel.palette {
                Palette::Background => self.bgp,
                Palette::Obp0 => self.obp0,
                Palette::Obp1 => self.obp1,
            };
            let shade = (palette >> (2 * pixel.color)) & 0x03;
            self.framebuffer[self.ly as usize * SCREEN_WIDTH + self.lx as usize] = shade;
            self.lx += 1;
        }

        if self.lx as usize >= SCREEN_WIDTH {
            if self.window_drawn {
                self.window_line = self.window_line.wrapping_add(1);
            }
            self.enter_hblank(interrupts);
        }
    }

    fn sprite_height(&self) -> u16 {
        if self.lcdc.contains(LcdControl::OBJ_SIZE) {
            16
        } else {
            8
        }
    }

    fn enter_oam_scan(&mut self, interrupts: &mut InterruptController) {
        self.mode = Mode::OamScan;
        self.oam_cursor = 0;
        self.line_sprites.clear();
        if self.lcdc.contains(LcdControl::WINDOW_ENABLE) && self.ly == self.wy {
            self.window_triggered = true;
        }
        if self.stat.contains(LcdStatus::OAM_INT) {
            interrupts.request(Interrupt::LCD_STAT);
        }
    }

    fn enter_pixel_transfer(&mut self) {
        self.mode = Mode::PixelTransfer;
        self.lx = 0;
        self.window_drawn = false;
        self.fetcher.start_line(self.scx);
    }

    fn enter_hblank(&mut self, interrupts: &mut InterruptController) {
        self.mode = Mode::HBlank;
        if self.stat.contains(LcdStatus::HBLANK_INT) {
            interrupts.request(Interrupt::LCD_STAT);
        }
    }

    fn enter_vblank(&mut self, interrupts: &mut InterruptController) {
        self.mode = Mode::VBlank;
        self.window_line = 0;
        self.window_triggered = false;
        self.frame_ready = true;
        interrupts.request(Interrupt::VBLANK);
        if self.stat.contains(LcdStatus::VBLANK_INT) {
            interrupts.request(Interrupt::LCD_STAT);
        }
    }

    fn set_ly(&mut self, ly: u8, interrupts: &mut InterruptController) {
        self.ly = ly;
        self.compare_lyc(Some(interrupts));
    }

    /// Refresh the coincidence flag, raising STAT on a match when enabled
    /// and an interrupt controller is at hand.
    fn compare_lyc(&mut self, interrupts: Option<&mut InterruptController>) {
        let matched = self.ly == self.lyc;
        self.stat.set(LcdStatus::LYC_MATCH, matched);
        if matched && self.stat.contains(LcdStatus::LYC_INT) {
            if let Some(interrupts) = interrupts {
                interrupts.request(Interrupt::LCD_STAT);
            }
        }
    }

    /// Start a frame from the top, as when the LCD is switched on.
    fn restart(&mut self) {
        self.ly = 0;
        self.line_dots = 0;
        self.window_line = 0;
        self.window_triggered = false;
        self.mode = Mode::OamScan;
        self.oam_cursor = 0;
        self.line_sprites.clear();
        if self.lcdc.contains(LcdControl::WINDOW_ENABLE) && self.wy == 0 {
            self.window_triggered = true;
        }
        self.compare_lyc(None);
    }

    fn write_lcdc(&mut self, value: u8) {
        let next = LcdControl::from_bits_truncate(value);
        let was_on = self.lcdc.contains(LcdControl::LCD_ENABLE);
        let now_on = next.contains(LcdControl::LCD_ENABLE);
        self.lcdc = next;

        if was_on && !now_on {
            log::debug!("ppu: LCD off at ly={}", self.ly);
            self.ly = 0;
            self.line_dots = 0;
            self.mode = Mode::HBlank;
        } else if !was_on && now_on {
            log::debug!("ppu: LCD on");
            self.restart();
        }
    }

    fn read_stat(&self) -> u8 {
        let mode = if self.lcdc.contains(LcdControl::LCD_ENABLE) {
            self.mode as u8
        } else {
            0
        };
        0x80 | self.stat.bits() | mode
    }
}

impl AddressSpace for Ppu {
    fn contains(&self, addr: u16) -> bool {
        matches!(
            addr,
            VRAM_START..=VRAM_END | OAM_START..=OAM_END | LCDC_ADDR..=LYC_ADDR | BGP_ADDR..=WX_ADDR
        )
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            VRAM_START..=VRAM_END => self.vram[(addr - VRAM_START) as usize],
            OAM_START..=OAM_END => self.oam[(addr - OAM_START) as usize],
            LCDC_ADDR => self.lcdc.bits(),
            STAT_ADDR => self.read_stat(),
            SCY_ADDR => self.scy,
            SCX_ADDR => self.scx,
            LY_ADDR => self.ly,
            LYC_ADDR => self.lyc,
            BGP_ADDR => self.bgp,
            OBP0_ADDR => self.obp0,
            OBP1_ADDR => self.obp1,
            WY_ADDR => self.wy,
            WX_ADDR => self.wx,
            _ => out_of_range("ppu", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            VRAM_START..=VRAM_END => self.vram[(addr - VRAM_START) as usize] = value,
            OAM_START..=OAM_END => self.oam[(addr - OAM_START) as usize] = value,
            LCDC_ADDR => self.write_lcdc(value),
            STAT_ADDR => {
                let keep = self.stat & LcdStatus::LYC_MATCH;
                self.stat = keep | LcdStatus::from_bits_truncate(value & 0x78);
            }
            SCY_ADDR => self.scy = value,
            SCX_ADDR => self.scx = value,
            // Read-only.
            LY_ADDR => {}
            LYC_ADDR => {
                self.lyc = value;
                self.compare_lyc(None);
            }
            BGP_ADDR => self.bgp = value,
            OBP0_ADDR => self.obp0 = value,
            OBP1_ADDR => self.obp1 = value,
            WY_ADDR => self.wy = value,
            WX_ADDR => self.wx = value,
            _ => {
                out_of_range("ppu", addr);
            }
        }
    }
}
