//! Cartridge ROM/RAM and the bank controllers in front of them.
//!
//! The [`Cartridge`] owns the bytes. A [`BankController`] only holds bank
//! selectors and turns a CPU address into a [`Translation`], which the
//! cartridge then resolves against its ROM or RAM.

mod header;
mod mbc1;
mod mbc3;

use thiserror::Error;

use super::bus::{out_of_range, AddressSpace};

pub use header::{cartridge_type_name, header_checksum, CartridgeHeader, MIN_IMAGE_LEN};
pub use mbc1::Mbc1;
pub use mbc3::Mbc3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("cartridge image is {len} bytes, shorter than its header (0x150 bytes)")]
    TooShort { len: usize },
    #[error("invalid ROM size code {0:#04X}")]
    InvalidRomSize(u8),
    #[error("invalid RAM size code {0:#04X}")]
    InvalidRamSize(u8),
    #[error("unsupported cartridge type {code:#04X} ({name})")]
    UnsupportedType { code: u8, name: &'static str },
}

/// Where a cartridge-window address lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Translation {
    /// Offset into ROM.
    Rom(usize),
    /// Offset into external RAM.
    Ram(usize),
    /// MBC3 clock register index.
    Rtc(u8),
    /// Nothing drives the data bus (RAM disabled or absent).
    Open,
}

/// Bank controller variants.
#[derive(Clone, Debug)]
pub enum BankController {
    /// No banking. 0x08/0x09 carts expose an unbanked RAM window.
    Direct { has_ram: bool },
    Mbc1(Mbc1),
    Mbc3(Mbc3),
}

impl BankController {
    fn for_header(header: &CartridgeHeader) -> Result<Self, CartridgeError> {
        let banks = header.rom_banks();
        match header.cartridge_type {
            0x00 => Ok(BankController::Direct { has_ram: false }),
            0x08 | 0x09 => Ok(BankController::Direct {
                has_ram: header.ram_size() > 0,
            }),
            0x01..=0x03 => Ok(BankController::Mbc1(Mbc1::new(banks))),
            0x0F..=0x13 => Ok(BankController::Mbc3(Mbc3::new(banks))),
            code => Err(CartridgeError::UnsupportedType {
                code,
                name: cartridge_type_name(code),
            }),
        }
    }

    pub fn translate(&self, addr: u16) -> Translation {
        match self {
            BankController::Direct { has_ram } => match addr {
                0x0000..=0x7FFF => Translation::Rom(addr as usize),
                0xA000..=0xBFFF if *has_ram => Translation::Ram((addr - 0xA000) as usize),
                _ => Translation::Open,
            },
            BankController::Mbc1(mbc) => mbc.translate(addr),
            BankController::Mbc3(mbc) => mbc.translate(addr),
        }
    }

    /// Handle a write into the ROM window, which only reaches registers.
    pub fn write_register(&mut self, addr: u16, value: u8) {
        match self {
            BankController::Direct { .. } => {
                log::trace!("cartridge: ignoring ROM write {value:#04X} at {addr:#06X}");
            }
            BankController::Mbc1(mbc) => mbc.write_register(addr, value),
            BankController::Mbc3(mbc) => mbc.write_register(addr, value),
        }
    }
}

pub struct Cartridge {
    header: CartridgeHeader,
    rom: Vec<u8>,
    ram: Vec<u8>,
    controller: BankController,
}

impl Cartridge {
    /// Parse the header and build the matching controller.
    pub fn load(image: &[u8]) -> Result<Self, CartridgeError> {
        let header = CartridgeHeader::parse(image)?;
        let controller = BankController::for_header(&header)?;

        log::info!("cartridge header:\n{header}");
        let checksum = header_checksum(image);
        if checksum != header.header_checksum {
            log::warn!(
                "cartridge: header checksum mismatch (expected {:#04X}, computed {:#04X})",
                header.header_checksum,
                checksum
            );
        }
        if image.len() < header.rom_size() {
            log::warn!(
                "cartridge: image is {} bytes but header declares {}",
                image.len(),
                header.rom_size()
            );
        }

        Ok(Self {
            ram: vec![0; header.ram_size()],
            rom: image.to_vec(),
            header,
            controller,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn controller(&self) -> &BankController {
        &self.controller
    }

    pub fn has_battery(&self) -> bool {
        self.header.has_battery() && !self.ram.is_empty()
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Replace external RAM with saved contents.
    ///
    /// A save of the wrong size is truncated or zero-padded to the declared
    /// RAM size.
    pub fn load_ram(&mut self, data: &[u8]) {
        if data.len() != self.ram.len() {
            log::warn!(
                "cartridge: battery save is {} bytes, expected {}",
                data.len(),
                self.ram.len()
            );
        }
        let len = data.len().min(self.ram.len());
        self.ram.fill(0);
        self.ram[..len].copy_from_slice(&data[..len]);
    }

    #[inline]
    fn rom_byte(&self, offset: usize) -> u8 {
        self.rom[offset % self.rom.len()]
    }
}

impl AddressSpace for Cartridge {
    fn contains(&self, addr: u16) -> bool {
        matches!(addr, 0x0000..=0x7FFF | 0xA000..=0xBFFF)
    }

    fn read(&self, addr: u16) -> u8 {
        if !self.contains(addr) {
            return out_of_range("cartridge", addr);
        }
        match self.controller.translate(addr) {
            Translation::Rom(offset) => self.rom_byte(offset),
            Translation::Ram(offset) if !self.ram.is_empty() => {
                self.ram[offset % self.ram.len()]
            }
            Translation::Rtc(register) => match &self.controller {
                BankController::Mbc3(mbc) => mbc.read_rtc(register),
                _ => 0xFF,
            },
            Translation::Ram(_) | Translation::Open => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => self.controller.write_register(addr, value),
            0xA000..=0xBFFF => match self.controller.translate(addr) {
                Translation::Ram(offset) if !self.ram.is_empty() => {
                    let len = self.ram.len();
                    self.ram[offset % len] = value;
                }
                Translation::Rtc(register) => {
                    if let BankController::Mbc3(mbc) = &mut self.controller {
                        mbc.write_rtc(register, value);
                    }
                }
                _ => {}
            },
            _ => {
                out_of_range("cartridge", addr);
            }
        }
    }
}
