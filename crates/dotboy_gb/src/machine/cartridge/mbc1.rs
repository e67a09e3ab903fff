use super::Translation;

/// MBC1 translation state.
///
/// Registers:
/// - 0x0000-0x1FFF: RAM enable, on when the low nibble is 0xA.
/// - 0x2000-0x3FFF: low 5 bits of the ROM bank; 0 selects bank 1.
/// - 0x4000-0x5FFF: 2 extra bits, used as ROM bank bits 5-6 and, in
///   mode 1, as the RAM bank and the bank for the 0x0000 window.
/// - 0x6000-0x7FFF: addressing mode (bit 0).
#[derive(Clone, Debug)]
pub struct Mbc1 {
    rom_banks: usize,
    ram_enabled: bool,
    bank_low: u8,
    bank_high: u8,
    advanced_mode: bool,
}

impl Mbc1 {
    /// `rom_banks` must be a power of two.
    pub fn new(rom_banks: usize) -> Self {
        debug_assert!(rom_banks.is_power_of_two());
        Self {
            rom_banks,
            ram_enabled: false,
            bank_low: 1,
            bank_high: 0,
            advanced_mode: false,
        }
    }

    #[inline]
    fn mask_bank(&self, bank: usize) -> usize {
        bank & (self.rom_banks - 1)
    }

    /// Bank currently visible at 0x4000-0x7FFF.
    pub fn rom_bank(&self) -> usize {
        self.mask_bank(((self.bank_high as usize) << 5) | self.bank_low as usize)
    }

    /// Bank currently visible at 0x0000-0x3FFF.
    pub fn zero_bank(&self) -> usize {
        if self.advanced_mode {
            self.mask_bank((self.bank_high as usize) << 5)
        } else {
            0
        }
    }

    pub fn ram_bank(&self) -> usize {
        if self.advanced_mode {
            self.bank_high as usize
        } else {
            0
        }
    }

    pub fn translate(&self, addr: u16) -> Translation {
        match addr {
            0x0000..=0x3FFF => Translation::Rom(self.zero_bank() * 0x4000 + addr as usize),
            0x4000..=0x7FFF => {
                Translation::Rom(self.rom_bank() * 0x4000 + (addr - 0x4000) as usize)
            }
            0xA000..=0xBFFF if self.ram_enabled => {
                Translation::Ram(self.ram_bank() * 0x2000 + (addr - 0xA000) as usize)
            }
            _ => Translation::Open,
        }
    }

    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                let low = value & 0x1F;
                self.bank_low = if low == 0 { 1 } else { low };
                log::trace!("mbc1: rom bank -> {}", self.rom_bank());
            }
            0x4000..=0x5FFF => self.bank_high = value & 0x03,
            0x6000..=0x7FFF => self.advanced_mode = value & 0x01 != 0,
            _ => {}
        }
    }
}
