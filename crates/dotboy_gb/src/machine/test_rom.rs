//! Synthetic cartridge images for tests.

use super::cartridge::header_checksum;

/// Build an image with a valid header whose first byte of every 16 KiB bank
/// holds the bank number.
pub(crate) fn image(cartridge_type: u8, rom_size_code: u8, ram_size_code: u8) -> Vec<u8> {
    let len = 0x8000usize << rom_size_code;
    let mut rom = vec![0u8; len];
    rom[0x134..0x13A].copy_from_slice(b"DOTBOY");
    rom[0x147] = cartridge_type;
    rom[0x148] = rom_size_code;
    rom[0x149] = ram_size_code;
    rom[0x14D] = header_checksum(&rom);
    for bank in 0..len / 0x4000 {
        rom[bank * 0x4000] = bank as u8;
    }
    rom
}

/// 32 KiB direct-mapped image with `program` placed at the entry point.
pub(crate) fn with_program(program: &[u8]) -> Vec<u8> {
    let mut rom = image(0x00, 0, 0);
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}
