use crate::cpu::{Bus, Cpu, CpuFault};

/// Extra ticks when a conditional branch is taken.
const JR_TAKEN: u32 = 4;
const JP_TAKEN: u32 = 4;
const CALL_TAKEN: u32 = 12;
const RET_TAKEN: u32 = 12;

impl Cpu {
    fn relative_target(&mut self, bus: &mut dyn Bus) -> u16 {
        let offset = self.fetch8(bus) as i8;
        self.regs.pc.wrapping_add(offset as u16)
    }

    /// JR e8
    pub(in crate::cpu) fn exec_jr(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let target = self.relative_target(bus);
        self.jump(target);
        0
    }

    /// JR cc,e8
    pub(in crate::cpu) fn exec_jr_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let target = self.relative_target(bus);
        if self.condition(opcode) {
            self.jump(target);
            JR_TAKEN
        } else {
            0
        }
    }

    /// JP a16
    pub(in crate::cpu) fn exec_jp(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let target = self.fetch16(bus);
        self.jump(target);
        0
    }

    /// JP cc,a16
    pub(in crate::cpu) fn exec_jp_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let target = self.fetch16(bus);
        if self.condition(opcode) {
            self.jump(target);
            JP_TAKEN
        } else {
            0
        }
    }

    /// JP HL
    pub(in crate::cpu) fn exec_jp_hl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.jump(self.regs.hl());
        0
    }

    /// CALL a16
    pub(in crate::cpu) fn exec_call(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let target = self.fetch16(bus);
        self.call(bus, target);
        0
    }

    /// CALL cc,a16
    pub(in crate::cpu) fn exec_call_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let target = self.fetch16(bus);
        if self.condition(opcode) {
            self.call(bus, target);
            CALL_TAKEN
        } else {
            0
        }
    }

    /// RET
    pub(in crate::cpu) fn exec_ret(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.ret(bus);
        0
    }

    /// RET cc
    pub(in crate::cpu) fn exec_ret_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        if self.condition(opcode) {
            self.ret(bus);
            RET_TAKEN
        } else {
            0
        }
    }

    /// RETI: return, then enable interrupts with the same latency as EI.
    pub(in crate::cpu) fn exec_reti(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.ret(bus);
        self.ei_pending = true;
        0
    }

    /// RST n
    pub(in crate::cpu) fn exec_rst(&mut self, bus: &mut dyn Bus, opcode: u8) -> u32 {
        let vector = (opcode & 0x38) as u16;
        let origin = self.regs.pc.wrapping_sub(1);
        if origin == vector {
            // Executing RST n from address n can only ever repeat itself.
            self.record_fault(CpuFault::RstLoop { vector });
        }
        self.call(bus, vector);
        0
    }
}
