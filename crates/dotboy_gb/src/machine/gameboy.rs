use std::io;

use thiserror::Error;
use typed_builder::TypedBuilder;

use super::battery::BatteryStore;
use super::boot_rom::{BootRom, BootRomError};
use super::cartridge::{Cartridge, CartridgeError, CartridgeHeader};
use super::dma::DmaController;
use super::hardware::{GameBoyBus, Hardware};
use super::interrupts::{self, Interrupt, InterruptController};
use super::joypad::{Buttons, Joypad};
use super::memory::{HighRam, IoRegisters, WorkRam};
use super::ppu::{Ppu, DOTS_PER_FRAME};
use super::serial::Serial;
use super::timer::Timer;
use crate::cpu::{Cpu, CpuFault};

/// Ticks in one video frame.
pub const TICKS_PER_FRAME: u32 = DOTS_PER_FRAME;

#[derive(Debug, Error)]
pub enum GameBoyError {
    #[error("cartridge: {0}")]
    Cartridge(#[from] CartridgeError),
    #[error("boot ROM: {0}")]
    BootRom(#[from] BootRomError),
    #[error("battery save '{save_id}': {source}")]
    Battery {
        save_id: String,
        #[source]
        source: io::Error,
    },
}

/// Receives each completed frame: 160x144 shades, 0 (lightest) to 3.
pub trait FrameSink {
    fn present(&mut self, frame: &[u8]);
}

/// Supplies the pressed buttons, sampled once per frame.
pub trait InputSource {
    fn buttons(&mut self) -> Buttons;
}

/// Everything needed to power on a machine.
#[derive(Clone, Debug, TypedBuilder)]
pub struct GameBoyOptions {
    pub rom: Vec<u8>,
    /// 256-byte DMG boot image. Without one the machine starts in the state
    /// the boot ROM would have left it in.
    #[builder(default, setter(strip_option))]
    pub boot_rom: Option<Vec<u8>>,
    /// Key for battery saves. Defaults to the cartridge title.
    #[builder(default, setter(strip_option, into))]
    pub save_id: Option<String>,
}

/// A complete DMG: CPU plus the bus and everything mapped on it.
pub struct GameBoy {
    cpu: Cpu,
    bus: GameBoyBus,
    save_id: String,
    frames: u64,
    /// Ticks the previous frame ran past its budget.
    overshoot: u32,
}

impl GameBoy {
    pub fn new(options: GameBoyOptions) -> Result<Self, GameBoyError> {
        let cartridge = Cartridge::load(&options.rom)?;
        let boot_rom = options
            .boot_rom
            .as_deref()
            .map(BootRom::new)
            .transpose()?;

        let save_id = options
            .save_id
            .unwrap_or_else(|| cartridge.header().title.clone());

        let (cpu, hw) = match boot_rom {
            Some(boot_rom) => {
                log::info!("gameboy: starting from boot ROM");
                let hw = Hardware {
                    boot_rom: Some(boot_rom),
                    cartridge,
                    wram: WorkRam::default(),
                    hram: HighRam::default(),
                    io: IoRegisters::default(),
                    ppu: Ppu::new(),
                    dma: DmaController::new(),
                    joypad: Joypad::default(),
                    serial: Serial::default(),
                    timer: Timer::new(),
                    interrupts: InterruptController::new(),
                };
                (Cpu::new(), hw)
            }
            None => {
                log::info!("gameboy: no boot ROM, starting at 0x0100");
                let mut interrupts = InterruptController::new();
                interrupts.request(Interrupt::VBLANK);
                let hw = Hardware {
                    boot_rom: None,
                    cartridge,
                    wram: WorkRam::default(),
                    hram: HighRam::default(),
                    io: IoRegisters::post_boot(),
                    ppu: Ppu::post_boot(),
                    dma: DmaController::new(),
                    joypad: Joypad::default(),
                    serial: Serial::default(),
                    timer: Timer::post_boot(),
                    interrupts,
                };
                (Cpu::post_boot(), hw)
            }
        };

        Ok(Self {
            cpu,
            bus: GameBoyBus::new(hw),
            save_id,
            frames: 0,
            overshoot: 0,
        })
    }

    /// Power on with just a cartridge image.
    pub fn from_rom(rom: &[u8]) -> Result<Self, GameBoyError> {
        Self::new(GameBoyOptions::builder().rom(rom.to_vec()).build())
    }

    /// Run one instruction (or one halted slot) and everything clocked by
    /// it. Returns the ticks charged, including any interrupt dispatch.
    pub fn step(&mut self) -> u32 {
        let ticks = self.cpu.step(&mut self.bus);
        self.bus.step_peripherals(ticks);
        self.bus.step_dma(ticks);
        self.bus.collect_interrupts();
        ticks + interrupts::service(&mut self.cpu, &mut self.bus)
    }

    /// Run one frame's worth of ticks.
    ///
    /// Input is sampled once up front. The sink sees the picture when the
    /// PPU enters VBlank, which happens once per frame while the LCD is on.
    pub fn run_frame(&mut self, input: &mut dyn InputSource, sink: &mut dyn FrameSink) -> u32 {
        self.set_buttons(input.buttons());

        let mut elapsed = self.overshoot;
        while elapsed < TICKS_PER_FRAME {
            elapsed += self.step();
            if self.bus.hardware_mut().ppu.take_frame_ready() {
                sink.present(self.frame());
            }
        }
        self.overshoot = elapsed - TICKS_PER_FRAME;
        self.frames += 1;
        elapsed
    }

    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.bus.hardware_mut().joypad.set_buttons(buttons);
        self.bus.collect_interrupts();
    }

    /// Latest completed frame.
    pub fn frame(&self) -> &[u8] {
        self.bus.hardware().ppu.frame()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &GameBoyBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut GameBoyBus {
        &mut self.bus
    }

    pub fn header(&self) -> &CartridgeHeader {
        self.bus.hardware().cartridge.header()
    }

    /// Bytes written out of the serial port since the last drain.
    pub fn serial_output(&self) -> &[u8] {
        self.bus.hardware().serial.output()
    }

    /// Drain the captured serial bytes.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.bus.hardware_mut().serial.take_output()
    }

    /// Most recent CPU fault, if any, cleared by reading.
    pub fn take_fault(&mut self) -> Option<CpuFault> {
        self.cpu.take_fault()
    }

    pub fn save_id(&self) -> &str {
        &self.save_id
    }

    /// Restore battery-backed RAM. Returns whether a save was found.
    ///
    /// Cartridges without a battery ignore the store.
    pub fn load_battery(&mut self, store: &mut dyn BatteryStore) -> Result<bool, GameBoyError> {
        if !self.bus.hardware().cartridge.has_battery() {
            return Ok(false);
        }
        let saved = store
            .load(&self.save_id)
            .map_err(|source| self.battery_error(source))?;
        match saved {
            Some(data) => {
                log::info!("gameboy: loaded {} bytes of save '{}'", data.len(), self.save_id);
                self.bus.hardware_mut().cartridge.load_ram(&data);
                Ok(true)
            }
            None => {
                log::info!("gameboy: no save '{}', starting blank", self.save_id);
                Ok(false)
            }
        }
    }

    /// Flush battery-backed RAM to the store.
    pub fn save_battery(&self, store: &mut dyn BatteryStore) -> Result<(), GameBoyError> {
        let cartridge = &self.bus.hardware().cartridge;
        if !cartridge.has_battery() {
            return Ok(());
        }
        log::info!("gameboy: writing save '{}'", self.save_id);
        store
            .save(&self.save_id, cartridge.ram())
            .map_err(|source| self.battery_error(source))
    }

    fn battery_error(&self, source: io::Error) -> GameBoyError {
        GameBoyError::Battery {
            save_id: self.save_id.clone(),
            source,
        }
    }
}
