//! Sharp LR35902 core.
//!
//! [`Cpu::step`] runs exactly one instruction against a [`Bus`] and reports
//! how many ticks it took. Interrupt dispatch lives with the interrupt
//! controller; the CPU only exposes the state it needs (IME, halt, the
//! deferred EI flag) and [`Cpu::call_vector`].

mod alu;
mod cb;
mod exec;
mod helpers;
mod regs;
mod table;

use thiserror::Error;

pub use cb::{CbInstruction, CbKind, Operand, CB_TABLE};
pub use regs::{Flags, Registers};
pub use table::{is_illegal, Handler, Instruction, OPCODES};

/// Memory as seen from the CPU.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// Ticks a halted CPU burns per step.
pub const HALT_TICKS: u32 = 4;

/// Conditions the CPU survives but a caller may want to know about.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CpuFault {
    #[error("illegal opcode {opcode:#04X} at {pc:#06X}")]
    IllegalOpcode { opcode: u8, pc: u16 },
    #[error("RST {vector:#06X} executed from its own vector")]
    RstLoop { vector: u16 },
}

#[derive(Clone, Debug, Default)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    pub halted: bool,
    /// Set by EI/RETI; promoted to `ime_delay` when the next instruction
    /// starts.
    ei_pending: bool,
    /// Becomes IME at the next interrupt check.
    ime_delay: bool,
    fault: Option<CpuFault>,
}

impl Cpu {
    /// All registers zero, PC at the boot ROM entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// State after the boot ROM hands over to the cartridge.
    pub fn post_boot() -> Self {
        Self {
            regs: Registers::post_boot(),
            ..Self::default()
        }
    }

    /// Execute one instruction and return the ticks it consumed.
    pub fn step(&mut self, bus: &mut dyn Bus) -> u32 {
        if std::mem::take(&mut self.ei_pending) {
            self.ime_delay = true;
        }
        if self.halted {
            return HALT_TICKS;
        }

        let opcode = self.fetch8(bus);
        let instruction = &OPCODES[opcode as usize];
        log::trace!(
            "{:#06X}: {:02X} {:<12} AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X}",
            self.regs.pc.wrapping_sub(1),
            opcode,
            instruction.mnemonic,
            self.regs.af(),
            self.regs.bc(),
            self.regs.de(),
            self.regs.hl(),
            self.regs.sp
        );
        instruction.ticks + (instruction.exec)(self, bus, opcode)
    }

    /// Consume the deferred-enable flag.
    pub fn take_ime_delay(&mut self) -> bool {
        std::mem::take(&mut self.ime_delay)
    }

    /// Whether EI/RETI has armed IME and it has not landed yet.
    pub fn ime_scheduled(&self) -> bool {
        self.ei_pending || self.ime_delay
    }

    /// Push PC and jump to an interrupt vector.
    pub fn call_vector(&mut self, bus: &mut dyn Bus, vector: u16) {
        self.call(bus, vector);
    }

    /// The most recent fault, cleared by reading it.
    pub fn take_fault(&mut self) -> Option<CpuFault> {
        self.fault.take()
    }

    fn record_fault(&mut self, fault: CpuFault) {
        log::warn!("cpu: {fault}");
        self.fault = Some(fault);
    }
}

/// Decode the instruction at `addr` without executing it.
///
/// Returns the assembly text and the instruction length in bytes.
pub fn disassemble(bus: &mut dyn Bus, addr: u16) -> (String, u16) {
    let opcode = bus.read8(addr);
    let arg8 = bus.read8(addr.wrapping_add(1));

    if opcode == 0xCB {
        return (CB_TABLE[arg8 as usize].to_string(), 2);
    }

    let template = OPCODES[opcode as usize].mnemonic.as_str();
    if template.contains("d16") || template.contains("a16") {
        let arg16 = u16::from_le_bytes([arg8, bus.read8(addr.wrapping_add(2))]);
        let value = format!("${arg16:04X}");
        let text = template.replace("d16", &value).replace("a16", &value);
        (text, 3)
    } else if template.contains("r8") {
        let target = addr.wrapping_add(2).wrapping_add(arg8 as i8 as u16);
        (template.replace("r8", &format!("${target:04X}")), 2)
    } else if template.contains("e8") {
        (template.replace("e8", &format!("{}", arg8 as i8)), 2)
    } else if template.contains("d8") || template.contains("a8") {
        let value = format!("${arg8:02X}");
        (template.replace("d8", &value).replace("a8", &value), 2)
    } else {
        (template.to_string(), 1)
    }
}

#[cfg(test)]
mod tests;
