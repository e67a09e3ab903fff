use super::Translation;

/// Number of clock registers (S, M, H, DL, DH).
pub const RTC_REGISTERS: usize = 5;

/// MBC3 translation state.
///
/// The clock registers are plain storage: nothing advances them. Writing
/// 0x00 then 0x01 to 0x6000-0x7FFF copies the live registers into the
/// latched set, which is what reads observe.
#[derive(Clone, Debug)]
pub struct Mbc3 {
    rom_banks: usize,
    ram_enabled: bool,
    rom_bank: u8,
    select: u8,
    rtc: [u8; RTC_REGISTERS],
    rtc_latched: [u8; RTC_REGISTERS],
    latch_armed: bool,
}

impl Mbc3 {
    /// `rom_banks` must be a power of two.
    pub fn new(rom_banks: usize) -> Self {
        debug_assert!(rom_banks.is_power_of_two());
        Self {
            rom_banks,
            ram_enabled: false,
            rom_bank: 1,
            select: 0,
            rtc: [0; RTC_REGISTERS],
            rtc_latched: [0; RTC_REGISTERS],
            latch_armed: false,
        }
    }

    pub fn rom_bank(&self) -> usize {
        self.rom_bank as usize & (self.rom_banks - 1)
    }

    pub fn translate(&self, addr: u16) -> Translation {
        match addr {
            0x0000..=0x3FFF => Translation::Rom(addr as usize),
            0x4000..=0x7FFF => {
                Translation::Rom(self.rom_bank() * 0x4000 + (addr - 0x4000) as usize)
            }
            0xA000..=0xBFFF if self.ram_enabled => match self.select {
                0x00..=0x03 => {
                    Translation::Ram(self.select as usize * 0x2000 + (addr - 0xA000) as usize)
                }
                0x08..=0x0C => Translation::Rtc(self.select - 0x08),
                _ => Translation::Open,
            },
            _ => Translation::Open,
        }
    }

    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                let bank = value & 0x7F;
                self.rom_bank = if bank == 0 { 1 } else { bank };
                log::trace!("mbc3: rom bank -> {}", self.rom_bank());
            }
            0x4000..=0x5FFF => {
                if !matches!(value, 0x00..=0x03 | 0x08..=0x0C) {
                    log::debug!("mbc3: ignoring RAM/RTC select {value:#04X}");
                    return;
                }
                self.select = value;
            }
            0x6000..=0x7FFF => {
                if self.latch_armed && value == 0x01 {
                    self.rtc_latched = self.rtc;
                }
                self.latch_armed = value == 0x00;
            }
            _ => {}
        }
    }

    pub fn read_rtc(&self, register: u8) -> u8 {
        self.rtc_latched[register as usize]
    }

    pub fn write_rtc(&mut self, register: u8, value: u8) {
        self.rtc[register as usize] = value;
    }
}
