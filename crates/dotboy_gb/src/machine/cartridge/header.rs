use std::fmt;

use super::CartridgeError;

/// Smallest image that still contains a complete header.
pub const MIN_IMAGE_LEN: usize = 0x150;

const TITLE: std::ops::Range<usize> = 0x134..0x144;
const MANUFACTURER: std::ops::Range<usize> = 0x13F..0x143;
const CGB_FLAG: usize = 0x143;
const NEW_LICENSEE: std::ops::Range<usize> = 0x144..0x146;
const SGB_FLAG: usize = 0x146;
const CARTRIDGE_TYPE: usize = 0x147;
const ROM_SIZE: usize = 0x148;
const RAM_SIZE: usize = 0x149;
const DESTINATION: usize = 0x14A;
const OLD_LICENSEE: usize = 0x14B;
const MASK_ROM_VERSION: usize = 0x14C;
const HEADER_CHECKSUM: usize = 0x14D;
const GLOBAL_CHECKSUM: usize = 0x14E;

/// Controller types whose RAM is battery backed.
const BATTERY_TYPES: [u8; 11] = [
    0x03, 0x06, 0x09, 0x0D, 0x0F, 0x10, 0x13, 0x1B, 0x1E, 0x22, 0xFF,
];

/// Parsed cartridge header (0x0134-0x014F).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub manufacturer_code: [u8; 4],
    pub cgb_flag: u8,
    pub new_licensee_code: [u8; 2],
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub destination_code: u8,
    pub old_licensee_code: u8,
    pub mask_rom_version: u8,
    pub header_checksum: u8,
    pub global_checksum: u16,
}

impl CartridgeHeader {
    pub fn parse(image: &[u8]) -> Result<Self, CartridgeError> {
        if image.len() < MIN_IMAGE_LEN {
            return Err(CartridgeError::TooShort { len: image.len() });
        }

        let rom_size_code = image[ROM_SIZE];
        if rom_size_code > 8 {
            return Err(CartridgeError::InvalidRomSize(rom_size_code));
        }
        let ram_size_code = image[RAM_SIZE];
        if ram_size_bytes(ram_size_code).is_none() {
            return Err(CartridgeError::InvalidRamSize(ram_size_code));
        }

        let mut manufacturer_code = [0; 4];
        manufacturer_code.copy_from_slice(&image[MANUFACTURER]);
        let mut new_licensee_code = [0; 2];
        new_licensee_code.copy_from_slice(&image[NEW_LICENSEE]);

        Ok(Self {
            title: parse_title(&image[TITLE]),
            manufacturer_code,
            cgb_flag: image[CGB_FLAG],
            new_licensee_code,
            sgb_flag: image[SGB_FLAG],
            cartridge_type: image[CARTRIDGE_TYPE],
            rom_size_code,
            ram_size_code,
            destination_code: image[DESTINATION],
            old_licensee_code: image[OLD_LICENSEE],
            mask_rom_version: image[MASK_ROM_VERSION],
            header_checksum: image[HEADER_CHECKSUM],
            global_checksum: u16::from_be_bytes([
                image[GLOBAL_CHECKSUM],
                image[GLOBAL_CHECKSUM + 1],
            ]),
        })
    }

    /// Declared ROM size in bytes (32 KiB << code).
    pub fn rom_size(&self) -> usize {
        0x8000 << self.rom_size_code
    }

    /// Number of 16 KiB ROM banks implied by the declared size.
    pub fn rom_banks(&self) -> usize {
        self.rom_size() / 0x4000
    }

    /// Declared external RAM size in bytes.
    pub fn ram_size(&self) -> usize {
        ram_size_bytes(self.ram_size_code).unwrap_or(0)
    }

    pub fn has_battery(&self) -> bool {
        BATTERY_TYPES.contains(&self.cartridge_type)
    }

    pub fn type_name(&self) -> &'static str {
        cartridge_type_name(self.cartridge_type)
    }
}

impl fmt::Display for CartridgeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "title:            {}", self.title)?;
        writeln!(
            f,
            "manufacturer:     {}",
            String::from_utf8_lossy(&self.manufacturer_code)
        )?;
        writeln!(f, "cgb flag:         {:#04X}", self.cgb_flag)?;
        writeln!(
            f,
            "licensee:         {} (old {:#04X})",
            String::from_utf8_lossy(&self.new_licensee_code),
            self.old_licensee_code
        )?;
        writeln!(f, "sgb flag:         {:#04X}", self.sgb_flag)?;
        writeln!(
            f,
            "type:             {:#04X} {}",
            self.cartridge_type,
            self.type_name()
        )?;
        writeln!(f, "rom size:         {} KiB", self.rom_size() / 1024)?;
        writeln!(f, "ram size:         {} KiB", self.ram_size() / 1024)?;
        writeln!(f, "destination:      {:#04X}", self.destination_code)?;
        writeln!(f, "mask rom version: {:#04X}", self.mask_rom_version)?;
        writeln!(f, "header checksum:  {:#04X}", self.header_checksum)?;
        write!(f, "global checksum:  {:#06X}", self.global_checksum)
    }
}

/// Checksum the boot ROM verifies over 0x0134-0x014C.
pub fn header_checksum(image: &[u8]) -> u8 {
    image[TITLE.start..HEADER_CHECKSUM]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1))
}

fn parse_title(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let title: String = bytes[..end]
        .iter()
        .filter(|b| b.is_ascii_graphic() || **b == b' ')
        .map(|&b| b as char)
        .collect();
    let title = title.trim();
    if title.is_empty() {
        "Unknown Title".to_string()
    } else {
        title.to_string()
    }
}

fn ram_size_bytes(code: u8) -> Option<usize> {
    match code {
        0x00 => Some(0),
        0x01 => Some(0x800),
        0x02 => Some(0x2000),
        0x03 => Some(0x8000),
        0x04 => Some(0x20000),
        0x05 => Some(0x10000),
        _ => None,
    }
}

pub fn cartridge_type_name(code: u8) -> &'static str {
    match code {
        0x00 => "ROM ONLY",
        0x01 => "MBC1",
        0x02 => "MBC1+RAM",
        0x03 => "MBC1+RAM+BATTERY",
        0x05 => "MBC2",
        0x06 => "MBC2+BATTERY",
        0x08 => "ROM+RAM",
        0x09 => "ROM+RAM+BATTERY",
        0x0B => "MMM01",
        0x0C => "MMM01+RAM",
        0x0D => "MMM01+RAM+BATTERY",
        0x0F => "MBC3+TIMER+BATTERY",
        0x10 => "MBC3+TIMER+RAM+BATTERY",
        0x11 => "MBC3",
        0x12 => "MBC3+RAM",
        0x13 => "MBC3+RAM+BATTERY",
        0x19 => "MBC5",
        0x1A => "MBC5+RAM",
        0x1B => "MBC5+RAM+BATTERY",
        0x1C => "MBC5+RUMBLE",
        0x1D => "MBC5+RUMBLE+RAM",
        0x1E => "MBC5+RUMBLE+RAM+BATTERY",
        0x20 => "MBC6",
        0x22 => "MBC7+SENSOR+RUMBLE+RAM+BATTERY",
        0xFC => "POCKET CAMERA",
        0xFD => "BANDAI TAMA5",
        0xFE => "HuC3",
        0xFF => "HuC1+RAM+BATTERY",
        _ => "UNKNOWN",
    }
}
