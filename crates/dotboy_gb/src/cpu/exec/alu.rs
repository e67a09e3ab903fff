use crate::cpu::{Bus, Cpu, Flags};

impl Cpu {
    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,r for 0x80-0xBF.
    pub(in crate::cpu) fn exec_alu_r(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.read_r8(bus, opcode);
        self.alu_op(opcode >> 3, value);
        0
    }

    /// The same eight operations with an immediate operand.
    pub(in crate::cpu) fn exec_alu_d8(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.fetch8(bus);
        self.alu_op(opcode >> 3, value);
        0
    }

    /// ADD HL,rr
    pub(in crate::cpu) fn exec_add_hl_rr(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let value = self.read_rr(opcode >> 4);
        self.alu_add_hl(value);
        0
    }

    /// ADD SP,e8
    pub(in crate::cpu) fn exec_add_sp_e8(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let offset = self.fetch8(bus);
        self.regs.sp = self.alu_add_sp_offset(self.regs.sp, offset);
        0
    }

    /// RLCA / RRCA / RLA / RRA. Unlike the CB forms, Z is always cleared.
    pub(in crate::cpu) fn exec_rotate_a(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let a = self.regs.a;
        self.regs.a = match opcode {
            0x07 => self.alu_rlc(a),
            0x0F => self.alu_rrc(a),
            0x17 => self.alu_rl(a),
            _ => self.alu_rr(a),
        };
        self.regs.set_flag(Flags::Z, false);
        0
    }

    pub(in crate::cpu) fn exec_daa(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.alu_daa();
        0
    }

    pub(in crate::cpu) fn exec_cpl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.regs.a = !self.regs.a;
        self.regs.set_flag(Flags::N, true);
        self.regs.set_flag(Flags::H, true);
        0
    }

    pub(in crate::cpu) fn exec_scf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, false);
        self.regs.set_flag(Flags::C, true);
        0
    }

    pub(in crate::cpu) fn exec_ccf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let carry = self.regs.flag(Flags::C);
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, false);
        self.regs.set_flag(Flags::C, !carry);
        0
    }
}
