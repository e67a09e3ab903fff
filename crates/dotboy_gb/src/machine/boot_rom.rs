use thiserror::Error;

use super::bus::{out_of_range, AddressSpace};

pub const BOOT_ROM_SIZE: usize = 0x100;
pub const BOOT_ROM_DISABLE_ADDR: u16 = 0xFF50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BootRomError {
    #[error("boot ROM must be {BOOT_ROM_SIZE} bytes, got {0}")]
    WrongSize(usize),
}

/// 256-byte boot image overlaid on 0x0000-0x00FF.
///
/// Also claims the disable register at 0xFF50. A non-zero write there
/// latches `disabled`; the bus notices, unmaps the overlay and replays the
/// write to whatever lies underneath.
#[derive(Clone)]
pub struct BootRom {
    rom: [u8; BOOT_ROM_SIZE],
    disabled: bool,
}

impl BootRom {
    pub fn new(image: &[u8]) -> Result<Self, BootRomError> {
        let rom = image
            .try_into()
            .map_err(|_| BootRomError::WrongSize(image.len()))?;
        Ok(Self {
            rom,
            disabled: false,
        })
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl AddressSpace for BootRom {
    fn contains(&self, addr: u16) -> bool {
        (addr as usize) < BOOT_ROM_SIZE || addr == BOOT_ROM_DISABLE_ADDR
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x00FF => self.rom[addr as usize],
            BOOT_ROM_DISABLE_ADDR => 0xFF,
            _ => out_of_range("boot rom", addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x00FF => {
                log::trace!("boot rom: dropping write {value:#04X} at {addr:#06X}");
            }
            BOOT_ROM_DISABLE_ADDR => {
                if value != 0 {
                    log::info!("boot rom: disabled");
                    self.disabled = true;
                }
            }
            _ => {
                out_of_range("boot rom", addr);
            }
        }
    }
}
