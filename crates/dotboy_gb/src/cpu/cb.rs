//! CB-prefixed instructions.
//!
//! The 256 entries are the cross product of eight operands with the eight
//! rotate/shift kinds (0x00-0x3F) and with BIT/RES/SET for each bit
//! position (0x40-0xFF). The table is built once; [`Cpu::exec_cb`] decodes
//! nothing at run time beyond the lookup.

use std::fmt;

use lazy_static::lazy_static;

use super::{Bus, Cpu};
use crate::bits;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CbKind {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
    Bit(u8),
    Res(u8),
    Set(u8),
}

const SHIFT_KINDS: [CbKind; 8] = [
    CbKind::Rlc,
    CbKind::Rrc,
    CbKind::Rl,
    CbKind::Rr,
    CbKind::Sla,
    CbKind::Sra,
    CbKind::Swap,
    CbKind::Srl,
];

/// Operand locations in opcode bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    B,
    C,
    D,
    E,
    H,
    L,
    HlIndirect,
    A,
}

const OPERANDS: [Operand; 8] = [
    Operand::B,
    Operand::C,
    Operand::D,
    Operand::E,
    Operand::H,
    Operand::L,
    Operand::HlIndirect,
    Operand::A,
];

impl Operand {
    /// The 3-bit encoding shared with `Cpu::read_r8`.
    fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operand::B => "B",
            Operand::C => "C",
            Operand::D => "D",
            Operand::E => "E",
            Operand::H => "H",
            Operand::L => "L",
            Operand::HlIndirect => "(HL)",
            Operand::A => "A",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CbInstruction {
    pub kind: CbKind,
    pub operand: Operand,
    /// Ticks after the 4-tick prefix fetch.
    pub ticks: u32,
}

impl fmt::Display for CbInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operand = self.operand;
        match self.kind {
            CbKind::Rlc => write!(f, "RLC {operand}"),
            CbKind::Rrc => write!(f, "RRC {operand}"),
            CbKind::Rl => write!(f, "RL {operand}"),
            CbKind::Rr => write!(f, "RR {operand}"),
            CbKind::Sla => write!(f, "SLA {operand}"),
            CbKind::Sra => write!(f, "SRA {operand}"),
            CbKind::Swap => write!(f, "SWAP {operand}"),
            CbKind::Srl => write!(f, "SRL {operand}"),
            CbKind::Bit(bit) => write!(f, "BIT {bit},{operand}"),
            CbKind::Res(bit) => write!(f, "RES {bit},{operand}"),
            CbKind::Set(bit) => write!(f, "SET {bit},{operand}"),
        }
    }
}

lazy_static! {
    pub static ref CB_TABLE: [CbInstruction; 256] = build_cb_table();
}

fn build_cb_table() -> [CbInstruction; 256] {
    let mut table = [CbInstruction {
        kind: CbKind::Rlc,
        operand: Operand::B,
        ticks: 4,
    }; 256];

    for (row, &kind) in SHIFT_KINDS.iter().enumerate() {
        for (column, &operand) in OPERANDS.iter().enumerate() {
            let ticks = if operand == Operand::HlIndirect { 12 } else { 4 };
            table[row * 8 + column] = CbInstruction {
                kind,
                operand,
                ticks,
            };
        }
    }

    for bit in 0..8u8 {
        for (column, &operand) in OPERANDS.iter().enumerate() {
            let memory = operand == Operand::HlIndirect;
            let slot = ((bit as usize) << 3) | column;
            // BIT only reads (HL); RES and SET read and write it back.
            table[0x40 | slot] = CbInstruction {
                kind: CbKind::Bit(bit),
                operand,
                ticks: if memory { 8 } else { 4 },
            };
            table[0x80 | slot] = CbInstruction {
                kind: CbKind::Res(bit),
                operand,
                ticks: if memory { 12 } else { 4 },
            };
            table[0xC0 | slot] = CbInstruction {
                kind: CbKind::Set(bit),
                operand,
                ticks: if memory { 12 } else { 4 },
            };
        }
    }

    table
}

impl Cpu {
    /// Run the CB-table entry for `opcode`, returning its ticks beyond the
    /// prefix.
    pub(super) fn exec_cb(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let instruction = CB_TABLE[opcode as usize];
        let index = instruction.operand.index();
        let value = self.read_r8(bus, index);

        let result = match instruction.kind {
            CbKind::Rlc => self.alu_rlc(value),
            CbKind::Rrc => self.alu_rrc(value),
            CbKind::Rl => self.alu_rl(value),
            CbKind::Rr => self.alu_rr(value),
            CbKind::Sla => self.alu_sla(value),
            CbKind::Sra => self.alu_sra(value),
            CbKind::Swap => self.alu_swap(value),
            CbKind::Srl => self.alu_srl(value),
            CbKind::Bit(bit) => {
                self.alu_bit(bit, value);
                return instruction.ticks;
            }
            CbKind::Res(bit) => bits::reset(value, bit),
            CbKind::Set(bit) => bits::set(value, bit),
        };

        self.write_r8(bus, index, result);
        instruction.ticks
    }
}
