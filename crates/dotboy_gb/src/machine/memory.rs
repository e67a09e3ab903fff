use super::bus::{out_of_range, AddressSpace};

const WRAM_START: u16 = 0xC000;
const WRAM_END: u16 = 0xDFFF;
const ECHO_START: u16 = 0xE000;
const ECHO_END: u16 = 0xFDFF;
const WRAM_SIZE: usize = 0x2000;

/// 8 KiB work RAM at 0xC000-0xDFFF, mirrored at 0xE000-0xFDFF.
#[derive(Clone)]
pub struct WorkRam {
    data: Box<[u8; WRAM_SIZE]>,
}

impl Default for WorkRam {
    fn default() -> Self {
        Self {
            data: Box::new([0; WRAM_SIZE]),
        }
    }
}

impl WorkRam {
    #[inline]
    fn offset(addr: u16) -> usize {
        // The echo region lands on the same cells.
        (addr as usize - WRAM_START as usize) & (WRAM_SIZE - 1)
    }
}

impl AddressSpace for WorkRam {
    fn contains(&self, addr: u16) -> bool {
        (WRAM_START..=ECHO_END).contains(&addr)
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            WRAM_START..=WRAM_END | ECHO_START..=ECHO_END => self.data[Self::offset(addr)],
            _ => out_of_range("wram", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            WRAM_START..=WRAM_END | ECHO_START..=ECHO_END => {
                self.data[Self::offset(addr)] = value
            }
            _ => {
                out_of_range("wram", addr);
            }
        }
    }
}

const HRAM_START: u16 = 0xFF80;
const HRAM_END: u16 = 0xFFFE;

/// 127 bytes of high RAM at 0xFF80-0xFFFE.
#[derive(Clone)]
pub struct HighRam {
    data: [u8; 0x7F],
}

impl Default for HighRam {
    fn default() -> Self {
        Self { data: [0; 0x7F] }
    }
}

impl AddressSpace for HighRam {
    fn contains(&self, addr: u16) -> bool {
        (HRAM_START..=HRAM_END).contains(&addr)
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            HRAM_START..=HRAM_END => self.data[(addr - HRAM_START) as usize],
            _ => out_of_range("hram", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            HRAM_START..=HRAM_END => self.data[(addr - HRAM_START) as usize] = value,
            _ => {
                out_of_range("hram", addr);
            }
        }
    }
}

const UNUSABLE_START: u16 = 0xFEA0;
const UNUSABLE_END: u16 = 0xFEFF;
const IO_START: u16 = 0xFF00;
const IO_END: u16 = 0xFF7F;

/// Catch-all for I/O registers no component claims.
///
/// Holds the sound registers (stored, never synthesised), the boot-ROM
/// disable latch once the overlay is unmapped, and the unusable block at
/// 0xFEA0-0xFEFF, which reads 0xFF and drops writes. Must be mapped after
/// every component that owns a register in 0xFF00-0xFF7F.
#[derive(Clone)]
pub struct IoRegisters {
    data: [u8; 0x80],
}

impl Default for IoRegisters {
    fn default() -> Self {
        Self { data: [0; 0x80] }
    }
}

impl IoRegisters {
    /// Values the boot ROM leaves in the sound block.
    pub fn post_boot() -> Self {
        let mut io = Self::default();
        for (addr, value) in [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
            (0xFF50, 0x01),
        ] {
            io.data[(addr - IO_START) as usize] = value;
        }
        io
    }
}

impl AddressSpace for IoRegisters {
    fn contains(&self, addr: u16) -> bool {
        matches!(addr, UNUSABLE_START..=UNUSABLE_END | IO_START..=IO_END)
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            UNUSABLE_START..=UNUSABLE_END => 0xFF,
            IO_START..=IO_END => self.data[(addr - IO_START) as usize],
            _ => out_of_range("io", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            UNUSABLE_START..=UNUSABLE_END => {}
            IO_START..=IO_END => self.data[(addr - IO_START) as usize] = value,
            _ => {
                out_of_range("io", addr);
            }
        }
    }
}
