use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// INC r / INC (HL)
    pub(in crate::cpu) fn exec_inc8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let index = opcode >> 3;
        let value = self.read_r8(bus, index);
        let result = self.alu_inc8(value);
        self.write_r8(bus, index, result);
        0
    }

    /// DEC r / DEC (HL)
    pub(in crate::cpu) fn exec_dec8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let index = opcode >> 3;
        let value = self.read_r8(bus, index);
        let result = self.alu_dec8(value);
        self.write_r8(bus, index, result);
        0
    }

    /// INC rr. No flags.
    pub(in crate::cpu) fn exec_inc16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let index = opcode >> 4;
        self.write_rr(index, self.read_rr(index).wrapping_add(1));
        0
    }

    /// DEC rr. No flags.
    pub(in crate::cpu) fn exec_dec16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let index = opcode >> 4;
        self.write_rr(index, self.read_rr(index).wrapping_sub(1));
        0
    }
}
