use super::bus::{out_of_range, AddressSpace};

pub const DMA_ADDR: u16 = 0xFF46;

/// Bytes copied by one OAM DMA transfer.
pub const OAM_DMA_LEN: u8 = 160;
/// Ticks between a write to 0xFF46 and the first byte copy.
const START_DELAY: u8 = 4;
/// Ticks per copied byte.
const TICKS_PER_BYTE: u8 = 4;

/// One byte the DMA engine wants copied this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DmaCopy {
    pub source: u16,
    pub oam_index: u8,
}

/// OAM DMA engine.
///
/// The controller only tracks progress; the owner of the bus performs the
/// actual read and OAM store for each [`DmaCopy`] returned by [`tick`].
///
/// [`tick`]: DmaController::tick
#[derive(Clone, Debug, Default)]
pub struct DmaController {
    source_page: u8,
    active: bool,
    cursor: u8,
    delay: u8,
    sub_tick: u8,
}

impl DmaController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Latch a source page and restart the transfer.
    pub fn start(&mut self, source_page: u8) {
        log::debug!("dma: OAM transfer from {:#06X}", (source_page as u16) << 8);
        self.source_page = source_page;
        self.active = true;
        self.cursor = 0;
        self.delay = START_DELAY;
        self.sub_tick = 0;
    }

    /// Advance one tick, yielding the byte to copy if one is due.
    pub fn tick(&mut self) -> Option<DmaCopy> {
        if !self.active {
            return None;
        }
        if self.delay > 0 {
            self.delay -= 1;
            return None;
        }

        self.sub_tick += 1;
        if self.sub_tick < TICKS_PER_BYTE {
            return None;
        }
        self.sub_tick = 0;

        let copy = DmaCopy {
            source: ((self.source_page as u16) << 8) | self.cursor as u16,
            oam_index: self.cursor,
        };
        self.cursor += 1;
        if self.cursor >= OAM_DMA_LEN {
            self.active = false;
        }
        Some(copy)
    }
}

impl AddressSpace for DmaController {
    fn contains(&self, addr: u16) -> bool {
        addr == DMA_ADDR
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            DMA_ADDR => self.source_page,
            _ => out_of_range("dma", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            DMA_ADDR => self.start(value),
            _ => {
                out_of_range("dma", addr);
            }
        }
    }
}
