//! The concrete DMG memory map.
//!
//! [`Hardware`] owns every memory-mapped component and is the registry the
//! [`AddressMap`] resolves handles against. [`GameBoyBus`] pairs the two and
//! is what the CPU sees.

use super::boot_rom::{BootRom, BOOT_ROM_DISABLE_ADDR};
use super::bus::{AddressMap, AddressSpace, BusError, SpaceRegistry};
use super::cartridge::Cartridge;
use super::dma::DmaController;
use super::interrupts::{Interrupt, InterruptController};
use super::joypad::Joypad;
use super::memory::{HighRam, IoRegisters, WorkRam};
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use crate::cpu::Bus;

/// Handle for each mapped component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpaceId {
    BootRom,
    Cartridge,
    WorkRam,
    Dma,
    Ppu,
    Joypad,
    Serial,
    Timer,
    Interrupts,
    HighRam,
    Io,
}

/// Owner of every memory-mapped component.
pub struct Hardware {
    pub boot_rom: Option<BootRom>,
    pub cartridge: Cartridge,
    pub wram: WorkRam,
    pub hram: HighRam,
    pub io: IoRegisters,
    pub ppu: Ppu,
    pub dma: DmaController,
    pub joypad: Joypad,
    pub serial: Serial,
    pub timer: Timer,
    pub interrupts: InterruptController,
}

impl SpaceRegistry for Hardware {
    type Id = SpaceId;

    fn space(&self, id: SpaceId) -> &dyn AddressSpace {
        match id {
            // Only ever mapped when a boot ROM was supplied.
            SpaceId::BootRom => match &self.boot_rom {
                Some(boot_rom) => boot_rom,
                None => &self.io,
            },
            SpaceId::Cartridge => &self.cartridge,
            SpaceId::WorkRam => &self.wram,
            SpaceId::Dma => &self.dma,
            SpaceId::Ppu => &self.ppu,
            SpaceId::Joypad => &self.joypad,
            SpaceId::Serial => &self.serial,
            SpaceId::Timer => &self.timer,
            SpaceId::Interrupts => &self.interrupts,
            SpaceId::HighRam => &self.hram,
            SpaceId::Io => &self.io,
        }
    }

    fn space_mut(&mut self, id: SpaceId) -> &mut dyn AddressSpace {
        match id {
            SpaceId::BootRom => match &mut self.boot_rom {
                Some(boot_rom) => boot_rom,
                None => &mut self.io,
            },
            SpaceId::Cartridge => &mut self.cartridge,
            SpaceId::WorkRam => &mut self.wram,
            SpaceId::Dma => &mut self.dma,
            SpaceId::Ppu => &mut self.ppu,
            SpaceId::Joypad => &mut self.joypad,
            SpaceId::Serial => &mut self.serial,
            SpaceId::Timer => &mut self.timer,
            SpaceId::Interrupts => &mut self.interrupts,
            SpaceId::HighRam => &mut self.hram,
            SpaceId::Io => &mut self.io,
        }
    }
}

pub struct GameBoyBus {
    map: AddressMap<SpaceId>,
    hw: Hardware,
}

impl GameBoyBus {
    /// Map every component in priority order. The boot ROM, when present,
    /// goes first so it shadows the cartridge; DMA goes ahead of the PPU
    /// because 0xFF46 sits inside the PPU register block; the generic I/O
    /// block goes last.
    pub fn new(hw: Hardware) -> Self {
        let mut map = AddressMap::new();
        if hw.boot_rom.is_some() {
            map.map(SpaceId::BootRom);
        }
        for id in [
            SpaceId::Cartridge,
            SpaceId::WorkRam,
            SpaceId::Dma,
            SpaceId::Ppu,
            SpaceId::Joypad,
            SpaceId::Serial,
            SpaceId::Timer,
            SpaceId::Interrupts,
            SpaceId::HighRam,
            SpaceId::Io,
        ] {
            map.map(id);
        }
        Self { map, hw }
    }

    pub fn hardware(&self) -> &Hardware {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut Hardware {
        &mut self.hw
    }

    pub fn interrupts(&self) -> &InterruptController {
        &self.hw.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.hw.interrupts
    }

    pub fn is_mapped(&self, id: SpaceId) -> bool {
        self.map.is_mapped(id)
    }

    /// Which component answers `addr`.
    pub fn route(&self, addr: u16) -> Option<SpaceId> {
        self.map.route(&self.hw, addr)
    }

    pub fn try_read8(&self, addr: u16) -> Result<u8, BusError> {
        self.map.try_read(&self.hw, addr)
    }

    pub fn try_write8(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        let target = self.map.try_write(&mut self.hw, addr, value)?;
        if target == SpaceId::BootRom && addr == BOOT_ROM_DISABLE_ADDR {
            self.retire_boot_rom(addr, value);
        }
        Ok(())
    }

    /// Side-effect-free read, for debuggers and DMA.
    pub fn peek(&self, addr: u16) -> u8 {
        self.map.read(&self.hw, addr)
    }

    /// Advance the PPU and timer by `ticks`, in that order.
    pub fn step_peripherals(&mut self, ticks: u32) {
        let hw = &mut self.hw;
        hw.ppu.step(ticks, &mut hw.interrupts);
        hw.timer.step(ticks, &mut hw.interrupts);
    }

    /// Advance OAM DMA by `ticks`, copying each byte as it falls due.
    pub fn step_dma(&mut self, ticks: u32) {
        for _ in 0..ticks {
            if let Some(copy) = self.hw.dma.tick() {
                let value = self.map.read(&self.hw, copy.source);
                self.hw.ppu.write_oam(copy.oam_index, value);
            }
        }
    }

    /// Move interrupt requests raised by the joypad and serial port into IF.
    pub fn collect_interrupts(&mut self) {
        let hw = &mut self.hw;
        if hw.joypad.take_interrupt() {
            hw.interrupts.request(Interrupt::JOYPAD);
        }
        if hw.serial.take_interrupt() {
            hw.interrupts.request(Interrupt::SERIAL);
        }
    }

    /// Drop the boot ROM overlay once it has been disabled, then replay the
    /// disabling write so the component now answering 0xFF50 sees it too.
    fn retire_boot_rom(&mut self, addr: u16, value: u8) {
        let disabled = self
            .hw
            .boot_rom
            .as_ref()
            .is_some_and(BootRom::is_disabled);
        if !disabled {
            return;
        }
        self.map.unmap(SpaceId::BootRom);
        self.map.write(&mut self.hw, addr, value);
    }
}

impl Bus for GameBoyBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.map.read(&self.hw, addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        let target = self.map.write(&mut self.hw, addr, value);
        if target == Some(SpaceId::BootRom) && addr == BOOT_ROM_DISABLE_ADDR {
            self.retire_boot_rom(addr, value);
        }
    }
}
