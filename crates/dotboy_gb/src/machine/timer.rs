use super::bus::{out_of_range, AddressSpace};
use super::interrupts::{Interrupt, InterruptController};

pub const DIV_ADDR: u16 = 0xFF04;
pub const TIMA_ADDR: u16 = 0xFF05;
pub const TMA_ADDR: u16 = 0xFF06;
pub const TAC_ADDR: u16 = 0xFF07;

/// Ticks between DIV increments.
const DIV_PERIOD: u16 = 256;

/// DMG timer block (DIV/TIMA/TMA/TAC).
///
/// Two independent counters are kept:
/// - a DIV sub-counter that advances every tick and bumps the visible DIV
///   register every 256 ticks, regardless of TAC;
/// - a TIMA sub-counter that only advances while TAC bit 2 is set and
///   bumps TIMA when it reaches the TAC-selected period.
///
/// When TIMA wraps it reads as 0x00 for one tick; on the following tick it
/// is reloaded from TMA and the Timer interrupt is requested. Writing TIMA
/// during that window cancels the reload.
#[derive(Clone, Debug, Default)]
pub struct Timer {
    div: u8,
    div_counter: u16,
    tima: u8,
    tma: u8,
    tac: u8,
    tima_counter: u32,
    reload_pending: bool,
}

impl Timer {
    /// Power-on state with every counter at zero, as seen by a boot ROM.
    pub fn new() -> Self {
        Self::default()
    }

    /// State left behind by the DMG boot ROM.
    pub fn post_boot() -> Self {
        Self {
            div: 0xAB,
            div_counter: 0xCC,
            ..Self::default()
        }
    }

    pub fn div(&self) -> u8 {
        self.div
    }

    pub fn tima(&self) -> u8 {
        self.tima
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// TIMA period in ticks for the current TAC frequency select.
    #[inline]
    fn tima_period(&self) -> u32 {
        match self.tac & 0x03 {
            0 => 1024,
            1 => 16,
            2 => 64,
            _ => 256,
        }
    }

    /// Advance the timer by `ticks` master-clock ticks.
    pub fn step(&mut self, ticks: u32, interrupts: &mut InterruptController) {
        for _ in 0..ticks {
            self.tick(interrupts);
        }
    }

    fn tick(&mut self, interrupts: &mut InterruptController) {
        self.div_counter += 1;
        if self.div_counter >= DIV_PERIOD {
            self.div_counter -= DIV_PERIOD;
            self.div = self.div.wrapping_add(1);
        }

        if self.reload_pending {
            self.reload_pending = false;
            self.tima = self.tma;
            interrupts.request(Interrupt::TIMER);
        }

        if self.enabled() {
            self.tima_counter += 1;
            if self.tima_counter >= self.tima_period() {
                self.tima_counter = 0;
                let (next, overflow) = self.tima.overflowing_add(1);
                self.tima = next;
                self.reload_pending = overflow;
            }
        }
    }
}

impl AddressSpace for Timer {
    fn contains(&self, addr: u16) -> bool {
        (DIV_ADDR..=TAC_ADDR).contains(&addr)
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            DIV_ADDR => self.div,
            TIMA_ADDR => self.tima,
            TMA_ADDR => self.tma,
            TAC_ADDR => self.tac | 0xF8,
            _ => out_of_range("timer", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // Any write clears the divider.
            DIV_ADDR => {
                self.div = 0;
                self.div_counter = 0;
            }
            TIMA_ADDR => {
                self.tima = value;
                self.reload_pending = false;
            }
            TMA_ADDR => self.tma = value,
            TAC_ADDR => self.tac = value & 0x07,
            _ => {
                out_of_range("timer", addr);
            }
        }
    }
}
