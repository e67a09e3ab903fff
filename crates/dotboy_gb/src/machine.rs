//! The DMG machine: every component behind the CPU and the scheduler that
//! clocks them.

pub mod battery;
pub mod boot_rom;
pub mod bus;
pub mod cartridge;
pub mod dma;
mod gameboy;
pub mod hardware;
pub mod interrupts;
pub mod joypad;
pub mod memory;
pub mod ppu;
pub mod serial;
pub mod timer;

pub use battery::{BatteryStore, MemoryBatteryStore};
pub use gameboy::{
    FrameSink, GameBoy, GameBoyError, GameBoyOptions, InputSource, TICKS_PER_FRAME,
};
pub use hardware::{GameBoyBus, SpaceId};
pub use joypad::Buttons;

#[cfg(test)]
mod test_rom;

#[cfg(test)]
mod tests;
