//! Unprefixed opcode table.
//!
//! Each entry carries the base cost in ticks (conditional forms list the
//! not-taken cost) and the handler that executes it. Handlers return the
//! taken-branch penalty, so `ticks + exec(..)` is always the real cost.

use lazy_static::lazy_static;

use super::{Bus, Cpu};

pub type Handler = fn(&mut Cpu, &mut dyn Bus, u8) -> u32;

pub struct Instruction {
    pub mnemonic: String,
    pub ticks: u32,
    pub exec: Handler,
}

#[rustfmt::skip]
const BASE_TICKS: [u8; 256] = [
    //  0   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        4, 12,  8,  8,  4,  4,  8,  4, 20,  8,  8,  8,  4,  4,  8,  4, // 0x00
        4, 12,  8,  8,  4,  4,  8,  4, 12,  8,  8,  8,  4,  4,  8,  4, // 0x10
        8, 12,  8,  8,  4,  4,  8,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 0x20
        8, 12,  8,  8, 12, 12, 12,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 0x30
        4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 0x40
        4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 0x50
        4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 0x60
        8,  8,  8,  8,  8,  8,  4,  8,  4,  4,  4,  4,  4,  4,  8,  4, // 0x70
        4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 0x80
        4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 0x90
        4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 0xA0
        4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 0xB0
        8, 12, 12, 16, 12, 24,  8, 16,  8, 16, 12,  4, 12, 24,  8, 16, // 0xC0
        8, 12, 12,  4, 12, 16,  8, 16,  8, 16, 12,  4, 12,  4,  8, 16, // 0xD0
       12, 12,  8,  4,  4, 16,  8, 16, 16,  4, 16,  4,  4,  4,  8, 16, // 0xE0
       12, 12,  8,  4,  4, 16,  8, 16, 12,  8, 16,  4,  4,  4,  8, 16, // 0xF0
];

const R8: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const ALU_OPS: [&str; 8] = ["ADD A,", "ADC A,", "SUB ", "SBC A,", "AND ", "XOR ", "OR ", "CP "];

lazy_static! {
    pub static ref OPCODES: Vec<Instruction> = (0..=255u8)
        .map(|opcode| Instruction {
            mnemonic: mnemonic_for(opcode),
            ticks: BASE_TICKS[opcode as usize] as u32,
            exec: handler_for(opcode),
        })
        .collect();
}

/// Whether the opcode has no defined behavior on the DMG.
pub fn is_illegal(opcode: u8) -> bool {
    matches!(
        opcode,
        0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD
    )
}

fn handler_for(opcode: u8) -> Handler {
    match opcode {
        0x00 => Cpu::exec_nop,
        0x01 | 0x11 | 0x21 | 0x31 => Cpu::exec_ld_rr_d16,
        0x02 | 0x12 | 0x22 | 0x32 => Cpu::exec_ld_ind_a,
        0x03 | 0x13 | 0x23 | 0x33 => Cpu::exec_inc16,
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => Cpu::exec_inc8,
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => Cpu::exec_dec8,
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => Cpu::exec_ld_r_d8,
        0x07 | 0x0F | 0x17 | 0x1F => Cpu::exec_rotate_a,
        0x08 => Cpu::exec_ld_a16_sp,
        0x09 | 0x19 | 0x29 | 0x39 => Cpu::exec_add_hl_rr,
        0x0A | 0x1A | 0x2A | 0x3A => Cpu::exec_ld_a_ind,
        0x0B | 0x1B | 0x2B | 0x3B => Cpu::exec_dec16,
        0x10 => Cpu::exec_stop,
        0x18 => Cpu::exec_jr,
        0x20 | 0x28 | 0x30 | 0x38 => Cpu::exec_jr_cc,
        0x27 => Cpu::exec_daa,
        0x2F => Cpu::exec_cpl,
        0x37 => Cpu::exec_scf,
        0x3F => Cpu::exec_ccf,
        0x76 => Cpu::exec_halt,
        0x40..=0x7F => Cpu::exec_ld_r_r,
        0x80..=0xBF => Cpu::exec_alu_r,
        0xC0 | 0xC8 | 0xD0 | 0xD8 => Cpu::exec_ret_cc,
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Cpu::exec_pop,
        0xC2 | 0xCA | 0xD2 | 0xDA => Cpu::exec_jp_cc,
        0xC3 => Cpu::exec_jp,
        0xC4 | 0xCC | 0xD4 | 0xDC => Cpu::exec_call_cc,
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Cpu::exec_push,
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => Cpu::exec_alu_d8,
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => Cpu::exec_rst,
        0xC9 => Cpu::exec_ret,
        0xCB => Cpu::exec_prefix_cb,
        0xCD => Cpu::exec_call,
        0xD9 => Cpu::exec_reti,
        0xE0 | 0xF0 => Cpu::exec_ldh_a8,
        0xE2 | 0xF2 => Cpu::exec_ldh_c,
        0xE8 => Cpu::exec_add_sp_e8,
        0xE9 => Cpu::exec_jp_hl,
        0xEA | 0xFA => Cpu::exec_ld_a16_a,
        0xF3 => Cpu::exec_di,
        0xF8 => Cpu::exec_ld_hl_sp_e8,
        0xF9 => Cpu::exec_ld_sp_hl,
        0xFB => Cpu::exec_ei,
        _ => Cpu::exec_illegal,
    }
}

/// Assembly template for an opcode. Operand placeholders are `d8`, `d16`,
/// `a8`, `a16`, `r8` (jump displacement) and `e8` (signed SP offset).
fn mnemonic_for(opcode: u8) -> String {
    let dst = R8[(opcode >> 3) as usize & 0x07];
    let src = R8[opcode as usize & 0x07];
    let text = match opcode {
        0x00 => "NOP",
        0x01 => "LD BC,d16",
        0x02 => "LD (BC),A",
        0x03 => "INC BC",
        0x07 => "RLCA",
        0x08 => "LD (a16),SP",
        0x09 => "ADD HL,BC",
        0x0A => "LD A,(BC)",
        0x0B => "DEC BC",
        0x0F => "RRCA",
        0x10 => "STOP d8",
        0x11 => "LD DE,d16",
        0x12 => "LD (DE),A",
        0x13 => "INC DE",
        0x17 => "RLA",
        0x18 => "JR r8",
        0x19 => "ADD HL,DE",
        0x1A => "LD A,(DE)",
        0x1B => "DEC DE",
        0x1F => "RRA",
        0x20 => "JR NZ,r8",
        0x21 => "LD HL,d16",
        0x22 => "LD (HL+),A",
        0x23 => "INC HL",
        0x27 => "DAA",
        0x28 => "JR Z,r8",
        0x29 => "ADD HL,HL",
        0x2A => "LD A,(HL+)",
        0x2B => "DEC HL",
        0x2F => "CPL",
        0x30 => "JR NC,r8",
        0x31 => "LD SP,d16",
        0x32 => "LD (HL-),A",
        0x33 => "INC SP",
        0x37 => "SCF",
        0x38 => "JR C,r8",
        0x39 => "ADD HL,SP",
        0x3A => "LD A,(HL-)",
        0x3B => "DEC SP",
        0x3F => "CCF",
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => return format!("INC {dst}"),
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => return format!("DEC {dst}"),
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            return format!("LD {dst},d8")
        }
        0x76 => "HALT",
        0x40..=0x7F => return format!("LD {dst},{src}"),
        0x80..=0xBF => return format!("{}{src}", ALU_OPS[(opcode >> 3) as usize & 0x07]),
        0xC0 => "RET NZ",
        0xC1 => "POP BC",
        0xC2 => "JP NZ,a16",
        0xC3 => "JP a16",
        0xC4 => "CALL NZ,a16",
        0xC5 => "PUSH BC",
        0xC8 => "RET Z",
        0xC9 => "RET",
        0xCA => "JP Z,a16",
        0xCB => "PREFIX CB",
        0xCC => "CALL Z,a16",
        0xCD => "CALL a16",
        0xD0 => "RET NC",
        0xD1 => "POP DE",
        0xD2 => "JP NC,a16",
        0xD4 => "CALL NC,a16",
        0xD5 => "PUSH DE",
        0xD8 => "RET C",
        0xD9 => "RETI",
        0xDA => "JP C,a16",
        0xDC => "CALL C,a16",
        0xE0 => "LDH (a8),A",
        0xE1 => "POP HL",
        0xE2 => "LD (C),A",
        0xE5 => "PUSH HL",
        0xE8 => "ADD SP,e8",
        0xE9 => "JP HL",
        0xEA => "LD (a16),A",
        0xF0 => "LDH A,(a8)",
        0xF1 => "POP AF",
        0xF2 => "LD A,(C)",
        0xF3 => "DI",
        0xF5 => "PUSH AF",
        0xF8 => "LD HL,SP+e8",
        0xF9 => "LD SP,HL",
        0xFA => "LD A,(a16)",
        0xFB => "EI",
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            return format!("{}d8", ALU_OPS[(opcode >> 3) as usize & 0x07])
        }
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            return format!("RST {:02X}H", opcode & 0x38)
        }
        _ => return format!("ILLEGAL_{opcode:02X}"),
    };
    text.to_string()
}
