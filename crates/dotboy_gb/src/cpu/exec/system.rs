use crate::cpu::{Bus, Cpu, CpuFault};

impl Cpu {
    pub(in crate::cpu) fn exec_nop(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        0
    }

    pub(in crate::cpu) fn exec_halt(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        log::trace!("cpu: HALT at {:#06X}", self.regs.pc.wrapping_sub(1));
        self.halted = true;
        0
    }

    /// STOP is two bytes long; the second is read and dropped.
    pub(in crate::cpu) fn exec_stop(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let _ = self.fetch8(bus);
        log::debug!("cpu: STOP at {:#06X}", self.regs.pc.wrapping_sub(2));
        self.halted = true;
        0
    }

    pub(in crate::cpu) fn exec_di(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.ime = false;
        self.ei_pending = false;
        self.ime_delay = false;
        0
    }

    /// EI. IME is raised only after the following instruction.
    pub(in crate::cpu) fn exec_ei(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> u32 {
        self.ei_pending = true;
        0
    }

    /// One of the eleven unassigned opcodes. Runs as a NOP.
    pub(in crate::cpu) fn exec_illegal(&mut self, _bus: &mut dyn Bus, opcode: u8) -> u32 {
        let pc = self.regs.pc.wrapping_sub(1);
        self.record_fault(CpuFault::IllegalOpcode { opcode, pc });
        0
    }

    /// 0xCB: fetch the second byte and run it from the CB table.
    pub(in crate::cpu) fn exec_prefix_cb(&mut self, bus: &mut dyn Bus, _opcode: u8) -> u32 {
        let opcode = self.fetch8(bus);
        self.exec_cb(bus, opcode)
    }
}
