use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// PUSH BC/DE/HL/AF
    pub(in crate::cpu) fn exec_push(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = match (opcode >> 4) & 0x03 {
            3 => self.regs.af(),
            index => self.read_rr(index),
        };
        self.push16(bus, value);
        0
    }

    /// POP BC/DE/HL/AF. POP AF drops the low nibble of F.
    pub(in crate::cpu) fn exec_pop(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.pop16(bus);
        match (opcode >> 4) & 0x03 {
            3 => self.regs.set_af(value),
            index => self.write_rr(index, value),
        }
        0
    }
}
