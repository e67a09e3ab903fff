use bitflags::bitflags;

use super::bus::{out_of_range, AddressSpace};
use super::hardware::GameBoyBus;
use crate::cpu::Cpu;

pub const IF_ADDR: u16 = 0xFF0F;
pub const IE_ADDR: u16 = 0xFFFF;

/// Ticks spent pushing PC and jumping to a vector.
pub const SERVICE_TICKS: u32 = 20;

bitflags! {
    /// Interrupt lines as they appear in IF and IE.
    ///
    /// Bit order is also priority order: VBlank is serviced first.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Interrupt: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

impl Interrupt {
    /// Entry address for a single interrupt line.
    pub fn vector(self) -> u16 {
        0x0040 + 8 * self.bits().trailing_zeros() as u16
    }

    /// The highest-priority line in the set, if any.
    pub fn highest(self) -> Option<Interrupt> {
        if self.is_empty() {
            None
        } else {
            Some(Interrupt::from_bits_truncate(1 << self.bits().trailing_zeros()))
        }
    }
}

/// IF/IE register pair.
#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    requested: Interrupt,
    enabled: Interrupt,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, interrupt: Interrupt) {
        self.requested |= interrupt;
    }

    pub fn requested(&self) -> Interrupt {
        self.requested
    }

    pub fn enabled(&self) -> Interrupt {
        self.enabled
    }

    /// Lines that are both requested and enabled.
    pub fn pending(&self) -> Interrupt {
        self.requested & self.enabled
    }

    pub fn acknowledge(&mut self, interrupt: Interrupt) {
        self.requested.remove(interrupt);
    }
}

impl AddressSpace for InterruptController {
    fn contains(&self, addr: u16) -> bool {
        addr == IF_ADDR || addr == IE_ADDR
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            IF_ADDR => self.requested.bits() | 0xE0,
            IE_ADDR => self.enabled.bits() | 0xE0,
            _ => out_of_range("interrupts", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            IF_ADDR => self.requested = Interrupt::from_bits_truncate(value),
            IE_ADDR => self.enabled = Interrupt::from_bits_truncate(value),
            _ => {
                out_of_range("interrupts", addr);
            }
        }
    }
}

/// Run the once-per-step interrupt check.
///
/// Returns the ticks consumed, which is `SERVICE_TICKS` when the CPU was
/// vectored and zero otherwise.
pub(crate) fn service(cpu: &mut Cpu, bus: &mut GameBoyBus) -> u32 {
    if cpu.take_ime_delay() {
        cpu.ime = true;
    }
    if !cpu.ime && !cpu.halted {
        return 0;
    }

    let Some(interrupt) = bus.interrupts().pending().highest() else {
        return 0;
    };

    if cpu.halted && !cpu.ime {
        // Wake without servicing.
        cpu.halted = false;
        return 0;
    }

    cpu.halted = false;
    cpu.ime = false;
    bus.interrupts_mut().acknowledge(interrupt);
    let vector = interrupt.vector();
    log::debug!(
        "interrupt {:?} -> {:#06X} from pc={:#06X}",
        interrupt,
        vector,
        cpu.regs.pc
    );
    cpu.call_vector(bus, vector);
    SERVICE_TICKS
}
